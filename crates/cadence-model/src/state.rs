use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::WorkflowInstance;

/// The most recently observed phase of one active workflow instance.
///
/// `state_name` comes from the execution engine's state machine (for
/// example `"QUEUED"` or `"RUNNING"`) and is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
  pub workflow_instance: WorkflowInstance,
  pub state_name: String,
  pub state_data: serde_json::Value,
  pub timestamp: DateTime<Utc>,
}
