//! # Metric Tools Interface
//!
//! JSON tools over the metric store: service and metric registration,
//! reading ingestion and anomaly detection, plus a JSON-RPC front.

pub mod anomaly;
pub mod metric;
pub mod server;
pub mod service;
pub mod tools;
pub mod views;

pub use server::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolServer};
pub use tools::{Tool, ToolContext, ToolDefinition, ToolRegistry};
