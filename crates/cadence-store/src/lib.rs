//! Cadence Store
//!
//! This crate provides the storage trait and implementations for workflow
//! run-states and sequence events. Data is persisted to SQLite, or kept in
//! memory for tests and local tooling.
//!
//! The [`Storage`] trait is the read side consumed by the query engine:
//! - Reading the active run-state of every instance, optionally per component
//! - Reading the recorded events of one workflow instance
//!
//! Writes are inherent methods on each implementation and belong to the
//! execution engine.

mod memory;
mod sqlite;
mod types;

use std::collections::{HashMap, HashSet};

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use async_trait::async_trait;
use cadence_model::{RunState, SequenceEvent, WorkflowInstance};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// A database error occurred.
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),

  /// Applying schema migrations failed.
  #[error("migration error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  /// The backing store could not be reached.
  #[error("storage unavailable: {0}")]
  Unavailable(String),
}

/// Read access to run-states and event logs.
#[async_trait]
pub trait Storage: Send + Sync {
  /// Read the active run-state of every workflow instance.
  async fn read_active_states(&self) -> Result<HashMap<WorkflowInstance, RunState>, Error>;

  /// Read the active run-states of instances belonging to one component.
  async fn read_active_states_for_component(
    &self,
    component_id: &str,
  ) -> Result<HashMap<WorkflowInstance, RunState>, Error>;

  /// Read every recorded event of a workflow instance, in no particular order.
  async fn read_events(
    &self,
    workflow_instance: &WorkflowInstance,
  ) -> Result<HashSet<SequenceEvent>, Error>;
}
