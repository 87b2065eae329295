use async_trait::async_trait;
use errors::ToolError;
use nm_core::{MetricStore, OwnerContext};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use validator::{Validate, ValidationError};

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;
    async fn call(&self, params: Value) -> Result<Value, ToolError>;
}

/// Store handle and caller scope shared by every tool.
#[derive(Clone)]
pub struct ToolContext {
    pub store: Arc<dyn MetricStore>,
    pub owner: OwnerContext,
}

impl ToolContext {
    pub fn new(store: Arc<dyn MetricStore>, owner: OwnerContext) -> Self {
        Self { store, owner }
    }
}

/// Deserialize and validate tool params before anything touches the store.
pub fn parse_params<T>(params: Value) -> Result<T, ToolError>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T =
        serde_json::from_value(params).map_err(|e| ToolError::invalid_input("params", e))?;
    parsed.validate()?;
    Ok(parsed)
}

/// Parse an id taken from params. A malformed id cannot name any resource,
/// so it is reported the same way as an unknown one.
pub fn parse_id<T>(resource: &str, raw: &str) -> Result<T, ToolError>
where
    T: std::str::FromStr,
{
    raw.parse().map_err(|_| ToolError::NotFound {
        resource: resource.to_string(),
        id: raw.to_string(),
    })
}

pub(crate) fn render<T: Serialize>(view: T) -> Result<Value, ToolError> {
    serde_json::to_value(view).map_err(|e| ToolError::Internal {
        reason: e.to_string(),
    })
}

pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    utils::validate_name(name).map_err(|reason| {
        let mut err = ValidationError::new("name");
        err.message = Some(reason.into());
        err
    })
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub async fn call(&self, name: &str, params: Value) -> Result<Value, ToolError> {
        let tool = self.tools.get(name).ok_or_else(|| ToolError::NotFound {
            resource: "Tool".to_string(),
            id: name.to_string(),
        })?;
        tool.call(params).await
    }

    /// Definitions sorted by tool name.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}
