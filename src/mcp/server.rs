/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Runs tool calls against the habit tracker
/// 3. Sends JSON-RPC responses to stdout

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::domain::today;
use crate::mcp::protocol::*;
use crate::storage::SqliteStorage;
use crate::tools::{self, ToolResponse, TrackerError};
use crate::{HabitTrackerServer, ServerError};

/// Why a tools/call request did not produce a result
enum CallFailure {
    InvalidParams(String),
    Tracker(TrackerError),
    Internal(String),
}

/// MCP server that handles communication with the client
pub struct McpServer {
    /// The underlying habit tracker server
    habit_tracker: HabitTrackerServer,
    /// Whether the client has finished the initialization handshake
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(habit_tracker: HabitTrackerServer) -> Self {
        Self {
            habit_tracker,
            initialized: false,
        }
    }

    /// Whether the client has sent its `initialized` notification
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.response_id(),
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None,
            ));
        }

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        Some(self.handle_request(request).await)
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                info!("MCP client finished initialization");
            }
            other => debug!("Ignoring notification '{}'", other),
        }
    }

    /// Handle a JSON-RPC request
    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.response_id();
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, json!(null))
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        match params.map(serde_json::from_value::<InitializeParams>) {
            Some(Ok(init)) => {
                let client = init
                    .client_info
                    .map(|c| format!("{} {}", c.name, c.version.unwrap_or_default()))
                    .unwrap_or_else(|| "unknown client".to_string());
                info!("MCP client connected: {} (protocol {})", client.trim(), init.protocol_version);
            }
            Some(Err(e)) => warn!("Could not read initialize params: {}", e),
            None => info!("MCP client connected"),
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Habit Heatmap MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
        }
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        let tools = vec![
            tool_definition::<tools::CreateHabitParams>(
                "habit_create",
                "Create a habit scheduled on the given weekdays (0 = Sunday ... 6 = Saturday), starting today",
            ),
            tool_definition::<tools::ListHabitsParams>(
                "habit_list",
                "List every habit with its schedule and creation day",
            ),
            tool_definition::<tools::DayParams>(
                "habit_day",
                "Show which habits were possible on a day and which of them were completed",
            ),
            tool_definition::<tools::ToggleHabitParams>(
                "habit_toggle",
                "Mark a habit complete on a day, or undo it if it was already complete",
            ),
            tool_definition::<tools::SummaryParams>(
                "habit_summary",
                "Per-day totals of possible and completed habits for every day with activity",
            ),
            tool_definition::<tools::HeatmapParams>(
                "habit_heatmap",
                "Calendar heatmap from the start of the tracking year through today",
            ),
        ];

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let arguments = Value::Object(tool_params.arguments.into_iter().collect());
        let storage = self.habit_tracker.storage();
        let analytics = self.habit_tracker.analytics();
        let today = today();

        debug!("Calling tool '{}'", tool_params.name);

        let result = match tool_params.name.as_str() {
            "habit_create" => call_tool(storage, arguments, |s, p| tools::habit_create(s, p, today)),
            "habit_list" => call_tool(storage, arguments, tools::habit_list),
            "habit_day" => call_tool(storage, arguments, tools::habit_day),
            "habit_toggle" => call_tool(storage, arguments, |s, p| tools::habit_toggle(s, p, today)),
            "habit_summary" => call_tool(storage, arguments, tools::habit_summary),
            "habit_heatmap" => call_tool(storage, arguments, |s, p| {
                tools::habit_heatmap(s, analytics, p, today)
            }),
            other => Err(CallFailure::InvalidParams(format!("Unknown tool: {}", other))),
        };

        match result {
            Ok(tool_result) => match serde_json::to_value(tool_result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
            },
            Err(CallFailure::InvalidParams(message)) => {
                JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, message, None)
            }
            Err(CallFailure::Tracker(e)) => {
                warn!("Tool '{}' failed: {}", tool_params.name, e);
                JsonRpcResponse::error(
                    id,
                    tracker_error_code(&e),
                    e.to_string(),
                    Some(json!({ "kind": e.kind() })),
                )
            }
            Err(CallFailure::Internal(message)) => {
                error!("Tool '{}' failed: {}", tool_params.name, message);
                JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, message, None)
            }
        }
    }
}

/// Describe a tool, deriving its input schema from the parameter struct
fn tool_definition<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let input_schema = serde_json::to_value(schemars::schema_for!(P))
        .unwrap_or_else(|_| json!({ "type": "object" }));

    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

/// Decode the arguments, run the tool and package its response
fn call_tool<P, R, F>(
    storage: &SqliteStorage,
    arguments: Value,
    run: F,
) -> Result<ToolCallResult, CallFailure>
where
    P: DeserializeOwned,
    R: Serialize + ToolResponse,
    F: FnOnce(&SqliteStorage, P) -> Result<R, TrackerError>,
{
    let params: P = serde_json::from_value(arguments)
        .map_err(|e| CallFailure::InvalidParams(format!("Invalid arguments: {}", e)))?;

    let response = run(storage, params).map_err(CallFailure::Tracker)?;
    let data = serde_json::to_value(&response).map_err(|e| CallFailure::Internal(e.to_string()))?;

    Ok(ToolCallResult::with_data(response.message().to_string(), &data))
}
