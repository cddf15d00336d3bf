use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::WorkflowInstance;

/// One recorded occurrence in a workflow instance's history.
///
/// Events are identified by their instance and `counter`, the position the
/// storage layer assigned when the event was appended. Equality and hashing
/// use only that identity so events can be collected into sets even though
/// the payload is arbitrary JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceEvent {
  pub workflow_instance: WorkflowInstance,
  pub counter: i64,
  pub event: serde_json::Value,
  pub timestamp: DateTime<Utc>,
}

impl PartialEq for SequenceEvent {
  fn eq(&self, other: &Self) -> bool {
    self.workflow_instance == other.workflow_instance && self.counter == other.counter
  }
}

impl Eq for SequenceEvent {}

impl Hash for SequenceEvent {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.workflow_instance.hash(state);
    self.counter.hash(state);
  }
}
