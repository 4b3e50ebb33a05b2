//! Incoming lifecycle events.

use crate::error::{LifecycleError, LifecycleResult};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Kind of lifecycle transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

/// One lifecycle event as delivered by the deployment system
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    pub request_type: RequestType,
    pub request_id: String,
    #[serde(default)]
    pub stack_id: String,
    pub logical_resource_id: String,
    /// Absent on create; echoed back on every later event
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: HashMap<String, serde_json::Value>,
}

impl LifecycleEvent {
    /// Parse an event from its JSON payload
    pub fn from_json(payload: &str) -> LifecycleResult<Self> {
        serde_json::from_str(payload).map_err(|e| LifecycleError::InvalidEvent(e.to_string()))
    }

    /// The physical id the deployment system already holds, or
    /// `<prefix>-<uuid>` when this is the first event for the resource.
    pub fn physical_resource_id_or_new(&self, prefix: &str) -> String {
        match &self.physical_resource_id {
            Some(id) if !id.is_empty() => id.clone(),
            _ => format!("{prefix}-{}", Uuid::new_v4()),
        }
    }
}
