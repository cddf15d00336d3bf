use cadence_model::{RunState, SequenceEvent, WorkflowId, WorkflowInstance};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

/// A row of the `active_states` table.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ActiveStateRow {
  pub component_id: String,
  pub workflow_id: String,
  pub instance_id: String,
  pub state_name: String,
  pub state_data: Json<serde_json::Value>,
  pub timestamp: DateTime<Utc>,
}

impl From<ActiveStateRow> for RunState {
  fn from(row: ActiveStateRow) -> Self {
    RunState {
      workflow_instance: WorkflowInstance::new(
        WorkflowId::new(row.component_id, row.workflow_id),
        row.instance_id,
      ),
      state_name: row.state_name,
      state_data: row.state_data.0,
      timestamp: row.timestamp,
    }
  }
}

/// A row of the `sequence_events` table.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct SequenceEventRow {
  pub counter: i64,
  pub event: Json<serde_json::Value>,
  pub timestamp: DateTime<Utc>,
}

impl SequenceEventRow {
  pub fn into_event(self, workflow_instance: &WorkflowInstance) -> SequenceEvent {
    SequenceEvent {
      workflow_instance: workflow_instance.clone(),
      counter: self.counter,
      event: self.event.0,
      timestamp: self.timestamp,
    }
  }
}
