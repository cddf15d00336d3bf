//! Event log listing.

use std::collections::HashSet;
use std::sync::Arc;

use cadence_model::{SequenceEvent, WorkflowId, WorkflowInstance};
use cadence_store::Storage;

use crate::error::StatusError;
use crate::payload::TimestampedEvent;

/// Reads the recorded events of a workflow instance.
#[derive(Clone)]
pub struct EventLogReader {
  storage: Arc<dyn Storage>,
}

impl EventLogReader {
  pub fn new(storage: Arc<dyn Storage>) -> Self {
    Self { storage }
  }

  /// Events of one instance in recording order. An instance that never ran
  /// has an empty log. Component and workflow ids containing `#` are rejected.
  pub async fn events_for_instance(
    &self,
    component_id: &str,
    workflow_id: &str,
    instance_id: &str,
  ) -> Result<Vec<TimestampedEvent>, StatusError> {
    let workflow_instance =
      WorkflowInstance::new(WorkflowId::try_new(component_id, workflow_id)?, instance_id);

    let events = self.storage.read_events(&workflow_instance).await?;
    Ok(order_events(events))
  }
}

/// Order an unordered event set by timestamp, then by storage counter.
///
/// The counter only breaks ties between events recorded at the same instant
/// and is not part of the output.
pub fn order_events(events: HashSet<SequenceEvent>) -> Vec<TimestampedEvent> {
  let mut events: Vec<SequenceEvent> = events.into_iter().collect();
  events.sort_by_key(|e| (e.timestamp, e.counter));

  events
    .into_iter()
    .map(|e| TimestampedEvent {
      event: e.event,
      timestamp: e.timestamp,
    })
    .collect()
}
