use crate::tools::{Tool, ToolContext, parse_id, parse_params, render, validate_name};
use crate::views::ServiceView;
use async_trait::async_trait;
use errors::ToolError;
use nm_core::{NewService, ServiceId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use validator::Validate;

#[derive(Serialize, Deserialize, JsonSchema, Validate)]
pub struct ServiceCreateParams {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, JsonSchema, Validate)]
pub struct ServiceGetParams {
    #[serde(rename = "serviceId")]
    pub service_id: String,
}

pub struct ServiceCreateTool {
    ctx: ToolContext,
}

impl ServiceCreateTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ServiceCreateTool {
    fn name(&self) -> &str {
        "service_create"
    }

    fn description(&self) -> &str {
        "Register a service whose metrics will be monitored."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "minLength": 1, "maxLength": 100 },
                "description": { "type": "string" }
            },
            "required": ["name"]
        })
    }

    async fn call(&self, params: Value) -> Result<Value, ToolError> {
        let p: ServiceCreateParams = parse_params(params)?;

        let service = self
            .ctx
            .store
            .create_service(
                &self.ctx.owner,
                NewService {
                    name: p.name,
                    description: p.description,
                },
            )
            .await?;
        render(ServiceView::from(&service))
    }
}

pub struct ServiceListTool {
    ctx: ToolContext,
}

impl ServiceListTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ServiceListTool {
    fn name(&self) -> &str {
        "service_list"
    }

    fn description(&self) -> &str {
        "List the caller's services, newest first."
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn call(&self, _params: Value) -> Result<Value, ToolError> {
        let services = self.ctx.store.list_services(&self.ctx.owner).await?;
        render(services.iter().map(ServiceView::from).collect::<Vec<_>>())
    }
}

pub struct ServiceGetTool {
    ctx: ToolContext,
}

impl ServiceGetTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ServiceGetTool {
    fn name(&self) -> &str {
        "service_get"
    }

    fn description(&self) -> &str {
        "Fetch a single service by id."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "serviceId": { "type": "string" }
            },
            "required": ["serviceId"]
        })
    }

    async fn call(&self, params: Value) -> Result<Value, ToolError> {
        let p: ServiceGetParams = parse_params(params)?;
        let service_id: ServiceId = parse_id("Service", &p.service_id)?;

        let service = self
            .ctx
            .store
            .get_service(&self.ctx.owner, &service_id)
            .await?;
        render(ServiceView::from(&service))
    }
}
