//! Integration tests for StatusService over in-memory storage.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use cadence_model::{RunState, WorkflowId, WorkflowInstance};
use cadence_status::{
  AllowAllAuthorizer, AuthorizationOutcome, Denial, ServiceAccountUsageAuthorizationResult,
  ServiceAccountUsageAuthorizer, StatusError, StatusService,
  TestServiceAccountUsageAuthorizationRequest,
};
use cadence_store::MemoryStorage;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

/// Authorizer that always returns the same outcome.
struct FixedAuthorizer(AuthorizationOutcome);

#[async_trait]
impl ServiceAccountUsageAuthorizer for FixedAuthorizer {
  async fn authorize_service_account_usage(
    &self,
    _service_account: &str,
    _principal: &str,
  ) -> AuthorizationOutcome {
    self.0.clone()
  }
}

fn ts(secs: i64) -> DateTime<Utc> {
  Utc.timestamp_opt(secs, 0).unwrap()
}

fn instance(component: &str, workflow: &str, parameter: &str) -> WorkflowInstance {
  WorkflowInstance::new(WorkflowId::new(component, workflow), parameter)
}

fn run_state(instance: WorkflowInstance, name: &str) -> RunState {
  RunState {
    workflow_instance: instance,
    state_name: name.to_string(),
    state_data: json!({ "trigger": "natural" }),
    timestamp: ts(1_000),
  }
}

fn seeded_storage() -> Arc<MemoryStorage> {
  let storage = Arc::new(MemoryStorage::new());
  for (component, workflow, parameter, state) in [
    ("etl", "ingest", "2024-03-01", "RUNNING"),
    ("etl", "ingest", "2024-03-02", "QUEUED"),
    ("etl", "export", "2024-03-01", "SUBMITTED"),
    ("ml", "train", "2024-03-01", "RUNNING"),
    ("reports", "weekly", "2024-W09", "PREPARE"),
  ] {
    storage
      .write_active_state(run_state(instance(component, workflow, parameter), state))
      .unwrap();
  }
  storage
}

fn service(storage: Arc<MemoryStorage>) -> StatusService {
  StatusService::new(storage, Arc::new(AllowAllAuthorizer))
}

fn keys(payload: &cadence_status::RunStateDataPayload) -> HashSet<String> {
  payload
    .active_states
    .iter()
    .map(|s| s.workflow_instance.to_key())
    .collect()
}

#[tokio::test]
async fn test_unfiltered_listing_is_union_of_component_listings() {
  let service = service(seeded_storage());

  let all = service.active_states(None).await.unwrap();
  let mut union = HashSet::new();
  for component in ["etl", "ml", "reports"] {
    let listing = service.active_states(Some(component)).await.unwrap();
    union.extend(keys(&listing));
  }

  assert_eq!(all.active_states.len(), 5);
  assert_eq!(keys(&all), union);
}

#[tokio::test]
async fn test_filtered_listing_only_contains_component() {
  let service = service(seeded_storage());

  let etl = service.active_states(Some("etl")).await.unwrap();
  assert_eq!(etl.active_states.len(), 3);
  assert!(
    etl
      .active_states
      .iter()
      .all(|s| s.workflow_instance.workflow_id.component_id == "etl")
  );

  let unknown = service.active_states(Some("nope")).await.unwrap();
  assert!(unknown.active_states.is_empty());
}

#[tokio::test]
async fn test_listing_is_stable_across_calls() {
  let service = service(seeded_storage());
  let first = service.active_states(None).await.unwrap();
  let second = service.active_states(None).await.unwrap();
  assert_eq!(first, second);
}

#[tokio::test]
async fn test_listing_projects_state_fields() {
  let service = service(seeded_storage());
  let ml = service.active_states(Some("ml")).await.unwrap();

  let state = &ml.active_states[0];
  assert_eq!(state.workflow_instance, instance("ml", "train", "2024-03-01"));
  assert_eq!(state.state, "RUNNING");
  assert_eq!(state.state_data, json!({ "trigger": "natural" }));
  assert_eq!(state.latest_timestamp, ts(1_000));
}

#[tokio::test]
async fn test_events_for_instance_without_events_is_empty() {
  let service = service(seeded_storage());
  let payload = service
    .events_for_workflow_instance("etl", "ingest", "1999-01-01")
    .await
    .unwrap();
  assert!(payload.events.is_empty());
}

#[tokio::test]
async fn test_events_reject_separator_in_workflow_identity() {
  let service = service(seeded_storage());
  let result = service
    .events_for_workflow_instance("etl#ingest", "x", "2024-03-01")
    .await;
  assert!(matches!(result, Err(StatusError::InvalidIdentity(_))));

  // The instance id is the last key part and may contain the separator.
  let payload = service
    .events_for_workflow_instance("etl", "ingest", "a#b")
    .await
    .unwrap();
  assert!(payload.events.is_empty());
}

#[tokio::test]
async fn test_events_are_ordered_by_timestamp() {
  let storage = seeded_storage();
  let key = instance("etl", "ingest", "2024-03-01");
  // Recorded out of time order.
  storage
    .write_event(&key, json!({ "type": "success" }), ts(30))
    .unwrap();
  storage
    .write_event(&key, json!({ "type": "triggerExecution" }), ts(10))
    .unwrap();
  storage
    .write_event(&key, json!({ "type": "started" }), ts(20))
    .unwrap();

  let payload = service(storage)
    .events_for_workflow_instance("etl", "ingest", "2024-03-01")
    .await
    .unwrap();

  let timestamps: Vec<DateTime<Utc>> = payload.events.iter().map(|e| e.timestamp).collect();
  assert_eq!(timestamps, vec![ts(10), ts(20), ts(30)]);
  assert_eq!(payload.events[0].event, json!({ "type": "triggerExecution" }));
}

#[tokio::test]
async fn test_events_grow_between_reads() {
  let storage = seeded_storage();
  let key = instance("ml", "train", "2024-03-01");
  let service = service(storage.clone());

  storage
    .write_event(&key, json!({ "type": "triggerExecution" }), ts(10))
    .unwrap();
  let first = service
    .events_for_workflow_instance("ml", "train", "2024-03-01")
    .await
    .unwrap();

  storage
    .write_event(&key, json!({ "type": "started" }), ts(20))
    .unwrap();
  let second = service
    .events_for_workflow_instance("ml", "train", "2024-03-01")
    .await
    .unwrap();

  assert_eq!(first.events.len(), 1);
  assert_eq!(second.events.len(), 2);
  assert_eq!(second.events[0], first.events[0]);
}

#[tokio::test]
async fn test_storage_failure_propagates() {
  let storage = seeded_storage();
  storage.fail_reads(true);
  let service = service(storage);

  let states = service.active_states(None).await;
  assert!(matches!(states, Err(StatusError::StorageRead(_))));

  let filtered = service.active_states(Some("etl")).await;
  assert!(matches!(filtered, Err(StatusError::StorageRead(_))));

  let events = service
    .events_for_workflow_instance("etl", "ingest", "2024-03-01")
    .await;
  assert!(matches!(events, Err(StatusError::StorageRead(_))));
}

#[tokio::test]
async fn test_authorization_denial_is_returned_verbatim() {
  let denial = Denial {
    status: 403,
    message: "alice may not act as etl@project.iam".to_string(),
  };
  let service = StatusService::new(
    seeded_storage(),
    Arc::new(FixedAuthorizer(AuthorizationOutcome::Denied(denial.clone()))),
  );

  let result = service
    .test_service_account_usage_authorization(TestServiceAccountUsageAuthorizationRequest {
      service_account: "etl@project.iam".to_string(),
      principal: "alice@example.com".to_string(),
    })
    .await;

  match result {
    Err(StatusError::AuthorizationDenied(returned)) => assert_eq!(returned, denial),
    other => panic!("expected denial, got {:?}", other),
  }
}

#[tokio::test]
async fn test_authorization_approval_echoes_request() {
  let service = StatusService::new(
    seeded_storage(),
    Arc::new(FixedAuthorizer(AuthorizationOutcome::Approved(
      ServiceAccountUsageAuthorizationResult {
        access_message: "alice is an owner of project".to_string(),
      },
    ))),
  );

  let response = service
    .test_service_account_usage_authorization(TestServiceAccountUsageAuthorizationRequest {
      service_account: "etl@project.iam".to_string(),
      principal: "alice@example.com".to_string(),
    })
    .await
    .unwrap();

  assert_eq!(response.service_account, "etl@project.iam");
  assert_eq!(response.principal, "alice@example.com");
  assert_eq!(response.access_reason, "alice is an owner of project");
}
