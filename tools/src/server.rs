use crate::anomaly::AnomalyDetectTool;
use crate::metric::{MetricCreateTool, MetricListTool, ReadingAddTool};
use crate::service::{ServiceCreateTool, ServiceGetTool, ServiceListTool};
use crate::tools::{Tool, ToolContext, ToolDefinition, ToolRegistry};
use async_trait::async_trait;
use errors::{ErrorKind, ToolError};
use observability::AnomalyDetector;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Value,
    pub method: String,
    pub params: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
            data: None,
        }
    }

    pub fn method_not_found(message: impl Into<String>) -> Self {
        Self {
            code: -32601,
            message: message.into(),
            data: None,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            code: -32000,
            message: message.into(),
            data: None,
        }
    }

    pub fn request_timeout(message: impl Into<String>) -> Self {
        Self {
            code: -32001,
            message: message.into(),
            data: None,
        }
    }
}

impl From<&ToolError> for JsonRpcError {
    fn from(err: &ToolError) -> Self {
        let kind = err.kind();
        let code = match kind {
            ErrorKind::InvalidInput => -32602,
            ErrorKind::NotFound => -32004,
            ErrorKind::Conflict => -32009,
            ErrorKind::NoData => -32010,
            ErrorKind::Internal => -32000,
        };
        Self {
            code,
            message: err.to_string(),
            data: Some(json!({ "kind": kind, "retryable": err.is_retryable() })),
        }
    }
}

pub struct HealthTool;

#[async_trait]
impl Tool for HealthTool {
    fn name(&self) -> &str {
        "health"
    }

    fn description(&self) -> &str {
        "Report service health."
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn call(&self, _params: Value) -> Result<Value, ToolError> {
        Ok(json!({ "status": "healthy" }))
    }
}

/// JSON-RPC front for the metric tools.
///
/// Every call runs under the owner scope held by the `ToolContext`.
pub struct ToolServer {
    registry: ToolRegistry,
    timeout_duration: Duration,
}

impl ToolServer {
    pub fn new(ctx: ToolContext, detector: Arc<AnomalyDetector>) -> Self {
        let mut registry = ToolRegistry::new();

        registry.register(Box::new(ServiceCreateTool::new(ctx.clone())));
        registry.register(Box::new(ServiceListTool::new(ctx.clone())));
        registry.register(Box::new(ServiceGetTool::new(ctx.clone())));

        registry.register(Box::new(MetricCreateTool::new(ctx.clone())));
        registry.register(Box::new(MetricListTool::new(ctx.clone())));
        registry.register(Box::new(ReadingAddTool::new(ctx.clone())));

        registry.register(Box::new(AnomalyDetectTool::new(ctx, detector)));
        registry.register(Box::new(HealthTool));

        Self {
            registry,
            timeout_duration: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout_duration = duration;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.registry.list_tools()
    }

    #[instrument(skip(self, request), fields(method = %request.method, request_id = ?request.id))]
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling JSON-RPC request");
        let id = request.id.clone();

        match timeout(self.timeout_duration, self.dispatch(request)).await {
            Ok(response) => response,
            Err(_) => {
                error!("Request timed out");
                JsonRpcResponse::err(id, JsonRpcError::request_timeout("Request timed out"))
            }
        }
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "tools/list" => match serde_json::to_value(self.registry.list_tools()) {
                Ok(tools) => JsonRpcResponse::ok(request.id, json!({ "tools": tools })),
                Err(e) => {
                    JsonRpcResponse::err(request.id, JsonRpcError::internal_error(e.to_string()))
                }
            },
            "tools/call" => {
                let Some(params) = request.params else {
                    return JsonRpcResponse::err(
                        request.id,
                        JsonRpcError::invalid_params("Invalid params"),
                    );
                };
                let Some(name) = params["name"].as_str() else {
                    return JsonRpcResponse::err(
                        request.id,
                        JsonRpcError::invalid_params("Missing tool name"),
                    );
                };
                if !self.registry.contains(name) {
                    return JsonRpcResponse::err(
                        request.id,
                        JsonRpcError::method_not_found(format!("Unknown tool {name}")),
                    );
                }

                info!(tool = %name, "Calling tool");
                let arguments = params
                    .get("arguments")
                    .cloned()
                    .unwrap_or_else(|| json!({}));

                match self.registry.call(name, arguments).await {
                    Ok(result) => JsonRpcResponse::ok(request.id, result),
                    Err(e) => {
                        if e.kind() == ErrorKind::Internal {
                            error!(tool = %name, error = %e, "Tool call failed");
                        } else {
                            debug!(tool = %name, error = %e, "Tool call rejected");
                        }
                        JsonRpcResponse::err(request.id, JsonRpcError::from(&e))
                    }
                }
            }
            _ => {
                debug!(method = %request.method, "Method not found");
                JsonRpcResponse::err(
                    request.id,
                    JsonRpcError::method_not_found("Method not found"),
                )
            }
        }
    }
}
