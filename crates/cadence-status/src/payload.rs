//! Response and request payloads of the status queries.

use cadence_model::{RunState, WorkflowInstance};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Client-facing projection of a [`RunState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStateData {
  pub workflow_instance: WorkflowInstance,
  pub state: String,
  pub state_data: serde_json::Value,
  pub latest_timestamp: DateTime<Utc>,
}

impl From<RunState> for RunStateData {
  fn from(state: RunState) -> Self {
    Self {
      workflow_instance: state.workflow_instance,
      state: state.state_name,
      state_data: state.state_data,
      latest_timestamp: state.timestamp,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStateDataPayload {
  pub active_states: Vec<RunStateData>,
}

/// An event payload and the time it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampedEvent {
  pub event: serde_json::Value,
  pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsPayload {
  pub events: Vec<TimestampedEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestServiceAccountUsageAuthorizationRequest {
  pub service_account: String,
  pub principal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestServiceAccountUsageAuthorizationResponse {
  pub service_account: String,
  pub principal: String,
  pub access_reason: String,
}
