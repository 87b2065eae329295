use crate::tools::{Tool, ToolContext, parse_id, parse_params, render, validate_name};
use crate::views::AnomalyView;
use async_trait::async_trait;
use errors::ToolError;
use nm_core::ServiceId;
use observability::{AnomalyDetector, DetectionRequest};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use validator::Validate;

#[derive(Serialize, Deserialize, JsonSchema, Validate)]
pub struct AnomalyDetectParams {
    #[serde(rename = "serviceId")]
    pub service_id: String,
    #[serde(rename = "metricName")]
    #[validate(custom(function = "validate_name"))]
    pub metric_name: String,
    #[serde(rename = "timeWindowSeconds")]
    pub time_window_seconds: Option<i64>,
    #[serde(rename = "sigmaThreshold")]
    pub sigma_threshold: Option<f64>,
}

pub struct AnomalyDetectTool {
    ctx: ToolContext,
    detector: Arc<AnomalyDetector>,
}

impl AnomalyDetectTool {
    pub fn new(ctx: ToolContext, detector: Arc<AnomalyDetector>) -> Self {
        Self { ctx, detector }
    }
}

#[async_trait]
impl Tool for AnomalyDetectTool {
    fn name(&self) -> &str {
        "anomaly_detect"
    }

    fn description(&self) -> &str {
        "Check whether a metric's latest reading is an outlier within a trailing time window."
    }

    fn input_schema(&self) -> Value {
        let defaults = self.detector.config();
        json!({
            "type": "object",
            "properties": {
                "serviceId": { "type": "string" },
                "metricName": { "type": "string", "minLength": 1, "maxLength": 100 },
                "timeWindowSeconds": { "type": "integer", "default": defaults.window_seconds },
                "sigmaThreshold": { "type": "number", "default": defaults.sigma_threshold }
            },
            "required": ["serviceId", "metricName"]
        })
    }

    async fn call(&self, params: Value) -> Result<Value, ToolError> {
        let p: AnomalyDetectParams = parse_params(params)?;
        let service_id: ServiceId = parse_id("Service", &p.service_id)?;

        let result = self
            .detector
            .detect(
                self.ctx.store.as_ref(),
                &self.ctx.owner,
                &service_id,
                &p.metric_name,
                DetectionRequest {
                    window_seconds: p.time_window_seconds,
                    sigma_threshold: p.sigma_threshold,
                },
            )
            .await?;
        render(AnomalyView::from(&result))
    }
}
