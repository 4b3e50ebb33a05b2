//! Outgoing lifecycle responses.

use crate::event::LifecycleEvent;
use serde::Serialize;

/// Overall outcome reported to the deployment system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// Attributes exposed to the rest of the deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_successful_order: Option<i64>,
    pub migration_table: String,
}

/// Response envelope for one lifecycle event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub data: ResponseData,
}

impl LifecycleResponse {
    pub fn success(event: &LifecycleEvent, physical_resource_id: String, data: ResponseData) -> Self {
        Self::build(event, physical_resource_id, ResponseStatus::Success, None, data)
    }

    pub fn failed(
        event: &LifecycleEvent,
        physical_resource_id: String,
        reason: String,
        data: ResponseData,
    ) -> Self {
        Self::build(
            event,
            physical_resource_id,
            ResponseStatus::Failed,
            Some(reason),
            data,
        )
    }

    fn build(
        event: &LifecycleEvent,
        physical_resource_id: String,
        status: ResponseStatus,
        reason: Option<String>,
        data: ResponseData,
    ) -> Self {
        Self {
            status,
            reason,
            physical_resource_id,
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Serialize to the JSON body sent back to the deployment system
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
