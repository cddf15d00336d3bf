use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use cadence_model::{RunState, SequenceEvent, WorkflowInstance};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::types::Json;
use tracing::debug;

use crate::types::{ActiveStateRow, SequenceEventRow};
use crate::{Error, Storage};

/// SQLite-based storage implementation.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
  pool: SqlitePool,
}

impl SqliteStorage {
  /// Create a new SQLite storage with the given connection pool.
  pub fn new(pool: SqlitePool) -> Self {
    Self { pool }
  }

  /// Open (creating if needed) the database file at `path` and run migrations.
  ///
  /// The path is used as-is, so characters such as `?` or `%` in directory
  /// names are not read as URL syntax.
  pub async fn open(path: &Path) -> Result<Self, Error> {
    let options = SqliteConnectOptions::new()
      .filename(path)
      .create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;
    let storage = Self::new(pool);
    storage.migrate().await?;
    Ok(storage)
  }

  /// Run database migrations.
  pub async fn migrate(&self) -> Result<(), Error> {
    sqlx::migrate!("../../migrations").run(&self.pool).await?;
    Ok(())
  }

  /// Insert or overwrite the run-state of an instance.
  pub async fn write_active_state(&self, state: &RunState) -> Result<(), Error> {
    let instance = &state.workflow_instance;
    sqlx::query(
      r#"
            INSERT INTO active_states (component_id, workflow_id, instance_id, state_name, state_data, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (component_id, workflow_id, instance_id)
            DO UPDATE SET state_name = excluded.state_name,
                          state_data = excluded.state_data,
                          timestamp = excluded.timestamp
            "#,
    )
    .bind(&instance.workflow_id.component_id)
    .bind(&instance.workflow_id.id)
    .bind(&instance.instance_id)
    .bind(&state.state_name)
    .bind(Json(&state.state_data))
    .bind(state.timestamp)
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  /// Remove an instance from the active set once it reaches a final state.
  pub async fn delete_active_state(&self, instance: &WorkflowInstance) -> Result<(), Error> {
    sqlx::query(
      r#"
            DELETE FROM active_states
            WHERE component_id = ? AND workflow_id = ? AND instance_id = ?
            "#,
    )
    .bind(&instance.workflow_id.component_id)
    .bind(&instance.workflow_id.id)
    .bind(&instance.instance_id)
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  /// Append an event to an instance's log, assigning the next counter.
  ///
  /// The counter is computed inside the INSERT, so concurrent appends to the
  /// same instance serialize on the write lock instead of racing on a read.
  pub async fn write_event(
    &self,
    instance: &WorkflowInstance,
    event: serde_json::Value,
    timestamp: DateTime<Utc>,
  ) -> Result<SequenceEvent, Error> {
    let counter: i64 = sqlx::query_scalar(
      r#"
            INSERT INTO sequence_events (component_id, workflow_id, instance_id, counter, event, timestamp)
            SELECT ?1, ?2, ?3, COALESCE(MAX(counter), 0) + 1, ?4, ?5
            FROM sequence_events
            WHERE component_id = ?1 AND workflow_id = ?2 AND instance_id = ?3
            RETURNING counter
            "#,
    )
    .bind(&instance.workflow_id.component_id)
    .bind(&instance.workflow_id.id)
    .bind(&instance.instance_id)
    .bind(Json(&event))
    .bind(timestamp)
    .fetch_one(&self.pool)
    .await?;

    Ok(SequenceEvent {
      workflow_instance: instance.clone(),
      counter,
      event,
      timestamp,
    })
  }
}

fn index_by_instance(rows: Vec<ActiveStateRow>) -> HashMap<WorkflowInstance, RunState> {
  rows
    .into_iter()
    .map(RunState::from)
    .map(|state| (state.workflow_instance.clone(), state))
    .collect()
}

#[async_trait]
impl Storage for SqliteStorage {
  async fn read_active_states(&self) -> Result<HashMap<WorkflowInstance, RunState>, Error> {
    let rows: Vec<ActiveStateRow> = sqlx::query_as(
      r#"
            SELECT component_id, workflow_id, instance_id, state_name, state_data, timestamp
            FROM active_states
            "#,
    )
    .fetch_all(&self.pool)
    .await?;

    debug!(count = rows.len(), "read active states");
    Ok(index_by_instance(rows))
  }

  async fn read_active_states_for_component(
    &self,
    component_id: &str,
  ) -> Result<HashMap<WorkflowInstance, RunState>, Error> {
    let rows: Vec<ActiveStateRow> = sqlx::query_as(
      r#"
            SELECT component_id, workflow_id, instance_id, state_name, state_data, timestamp
            FROM active_states
            WHERE component_id = ?
            "#,
    )
    .bind(component_id)
    .fetch_all(&self.pool)
    .await?;

    debug!(component_id, count = rows.len(), "read active states");
    Ok(index_by_instance(rows))
  }

  async fn read_events(
    &self,
    workflow_instance: &WorkflowInstance,
  ) -> Result<HashSet<SequenceEvent>, Error> {
    let rows: Vec<SequenceEventRow> = sqlx::query_as(
      r#"
            SELECT counter, event, timestamp
            FROM sequence_events
            WHERE component_id = ? AND workflow_id = ? AND instance_id = ?
            "#,
    )
    .bind(&workflow_instance.workflow_id.component_id)
    .bind(&workflow_instance.workflow_id.id)
    .bind(&workflow_instance.instance_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(
      rows
        .into_iter()
        .map(|row| row.into_event(workflow_instance))
        .collect(),
    )
  }
}
