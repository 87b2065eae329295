use crate::tools::{Tool, ToolContext, parse_id, parse_params, render, validate_name};
use crate::views::MetricView;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use errors::ToolError;
use nm_core::{MetricId, NewMetric, ServiceId, TimestampMs};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;
use validator::Validate;

#[derive(Serialize, Deserialize, JsonSchema, Validate)]
pub struct MetricCreateParams {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "serviceId")]
    pub service_id: String,
}

#[derive(Serialize, Deserialize, JsonSchema, Validate)]
pub struct MetricListParams {
    #[serde(rename = "serviceId")]
    pub service_id: String,
}

#[derive(Serialize, Deserialize, JsonSchema, Validate)]
pub struct ReadingAddParams {
    #[serde(rename = "metricId")]
    pub metric_id: String,
    pub value: f64,
    /// RFC 3339; the current time when omitted.
    pub timestamp: Option<DateTime<Utc>>,
}

pub struct MetricCreateTool {
    ctx: ToolContext,
}

impl MetricCreateTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for MetricCreateTool {
    fn name(&self) -> &str {
        "metric_create"
    }

    fn description(&self) -> &str {
        "Register a named metric under a service."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "minLength": 1, "maxLength": 100 },
                "description": { "type": "string" },
                "serviceId": { "type": "string" }
            },
            "required": ["name", "serviceId"]
        })
    }

    async fn call(&self, params: Value) -> Result<Value, ToolError> {
        let p: MetricCreateParams = parse_params(params)?;
        let service_id: ServiceId = parse_id("Service", &p.service_id)?;

        let metric = self
            .ctx
            .store
            .create_metric(
                &self.ctx.owner,
                NewMetric {
                    service_id,
                    name: p.name,
                    description: p.description,
                },
            )
            .await?;
        render(MetricView::registered(&metric))
    }
}

pub struct MetricListTool {
    ctx: ToolContext,
}

impl MetricListTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for MetricListTool {
    fn name(&self) -> &str {
        "metric_list"
    }

    fn description(&self) -> &str {
        "List a service's metrics in registration order with their latest reading."
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
        let p: MetricListParams = parse_params(params)?;
        let service_id: ServiceId = parse_id("Service", &p.service_id)?;

        let metrics = self
            .ctx
            .store
            .list_metrics(&self.ctx.owner, &service_id)
            .await?;
        render(metrics.iter().map(MetricView::listed).collect::<Vec<_>>())
    }
}

pub struct ReadingAddTool {
    ctx: ToolContext,
}

impl ReadingAddTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ReadingAddTool {
    fn name(&self) -> &str {
        "reading_add"
    }

    fn description(&self) -> &str {
        "Append a reading to a metric."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "metricId": { "type": "string" },
                "value": { "type": "number" },
                "timestamp": { "type": "string", "format": "date-time" }
            },
            "required": ["metricId", "value"]
        })
    }

    async fn call(&self, params: Value) -> Result<Value, ToolError> {
        let p: ReadingAddParams = parse_params(params)?;
        let metric_id: MetricId = parse_id("Metric", &p.metric_id)?;

        let reading = self
            .ctx
            .store
            .append_reading(
                &self.ctx.owner,
                &metric_id,
                p.value,
                p.timestamp.map(TimestampMs::from_datetime),
            )
            .await?;
        info!(%metric_id, timestamp = %reading.timestamp, "Reading added");

        Ok(json!({ "message": "Metric reading added successfully" }))
    }
}
