//! Active run-state listing.

use std::collections::HashMap;
use std::sync::Arc;

use cadence_model::{RunState, WorkflowInstance};
use cadence_store::Storage;

use crate::error::StatusError;
use crate::payload::RunStateData;

/// Reads the current run-state snapshot from storage.
#[derive(Clone)]
pub struct RunStateReader {
  storage: Arc<dyn Storage>,
}

impl RunStateReader {
  pub fn new(storage: Arc<dyn Storage>) -> Self {
    Self { storage }
  }

  /// List active run-states, restricted to one component when a filter is given.
  pub async fn active_states(
    &self,
    component_filter: Option<&str>,
  ) -> Result<Vec<RunStateData>, StatusError> {
    let states = match component_filter {
      Some(component_id) => {
        self
          .storage
          .read_active_states_for_component(component_id)
          .await?
      }
      None => self.storage.read_active_states().await?,
    };

    Ok(project_active_states(states, component_filter))
  }
}

/// Project a storage snapshot into a listing ordered by workflow instance.
///
/// Rows outside `component_filter` are dropped, so the result only ever holds
/// the requested component even if storage returned more.
pub fn project_active_states(
  states: HashMap<WorkflowInstance, RunState>,
  component_filter: Option<&str>,
) -> Vec<RunStateData> {
  let mut states: Vec<RunState> = states
    .into_values()
    .filter(|state| {
      component_filter
        .is_none_or(|component_id| state.workflow_instance.component_id() == component_id)
    })
    .collect();

  states.sort_by(|a, b| a.workflow_instance.cmp(&b.workflow_instance));
  states.into_iter().map(RunStateData::from).collect()
}
