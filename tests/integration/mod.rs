/// Integration tests for the habit heatmap server
///
/// These run the core operations against real SQLite databases and drive
/// the MCP server one JSON-RPC line at a time.

mod concurrency;
mod workflow;
