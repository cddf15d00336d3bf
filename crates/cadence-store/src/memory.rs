use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use cadence_model::{RunState, SequenceEvent, WorkflowInstance};
use chrono::{DateTime, Utc};

use crate::{Error, Storage};

/// In-memory storage implementation.
///
/// Suitable for tests and local tooling. Reads can be made to fail with
/// [`MemoryStorage::fail_reads`] to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
  active_states: RwLock<HashMap<WorkflowInstance, RunState>>,
  events: RwLock<HashMap<WorkflowInstance, Vec<SequenceEvent>>>,
  fail_reads: AtomicBool,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make every subsequent read fail with [`Error::Unavailable`].
  pub fn fail_reads(&self, fail: bool) {
    self.fail_reads.store(fail, Ordering::SeqCst);
  }

  /// Insert or overwrite the run-state of an instance.
  pub fn write_active_state(&self, state: RunState) -> Result<(), Error> {
    let mut states = self.active_states.write().map_err(poisoned)?;
    states.insert(state.workflow_instance.clone(), state);
    Ok(())
  }

  /// Remove an instance from the active set.
  pub fn delete_active_state(&self, instance: &WorkflowInstance) -> Result<(), Error> {
    let mut states = self.active_states.write().map_err(poisoned)?;
    states.remove(instance);
    Ok(())
  }

  /// Append an event to an instance's log, assigning the next counter.
  pub fn write_event(
    &self,
    instance: &WorkflowInstance,
    event: serde_json::Value,
    timestamp: DateTime<Utc>,
  ) -> Result<SequenceEvent, Error> {
    let mut events = self.events.write().map_err(poisoned)?;
    let log = events.entry(instance.clone()).or_default();
    let counter = log.last().map_or(1, |last| last.counter + 1);
    let sequence_event = SequenceEvent {
      workflow_instance: instance.clone(),
      counter,
      event,
      timestamp,
    };
    log.push(sequence_event.clone());
    Ok(sequence_event)
  }

  fn check_available(&self) -> Result<(), Error> {
    if self.fail_reads.load(Ordering::SeqCst) {
      return Err(Error::Unavailable("reads disabled".to_string()));
    }
    Ok(())
  }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> Error {
  Error::Unavailable(format!("storage lock poisoned: {}", e))
}

#[async_trait]
impl Storage for MemoryStorage {
  async fn read_active_states(&self) -> Result<HashMap<WorkflowInstance, RunState>, Error> {
    self.check_available()?;
    let states = self.active_states.read().map_err(poisoned)?;
    Ok(states.clone())
  }

  async fn read_active_states_for_component(
    &self,
    component_id: &str,
  ) -> Result<HashMap<WorkflowInstance, RunState>, Error> {
    self.check_available()?;
    let states = self.active_states.read().map_err(poisoned)?;
    Ok(
      states
        .iter()
        .filter(|(instance, _)| instance.component_id() == component_id)
        .map(|(instance, state)| (instance.clone(), state.clone()))
        .collect(),
    )
  }

  async fn read_events(
    &self,
    workflow_instance: &WorkflowInstance,
  ) -> Result<HashSet<SequenceEvent>, Error> {
    self.check_available()?;
    let events = self.events.read().map_err(poisoned)?;
    Ok(
      events
        .get(workflow_instance)
        .map(|log| log.iter().cloned().collect())
        .unwrap_or_default(),
    )
  }
}
