/// Unit tests for the public API, run against the in-memory store

mod day_resolution;
mod summary_rules;
