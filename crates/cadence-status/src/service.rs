//! The query facade called by transports.

use std::sync::Arc;

use cadence_store::Storage;
use tracing::{error, info, instrument};

use crate::authorizer::{AuthorizationOutcome, ServiceAccountUsageAuthorizer};
use crate::error::StatusError;
use crate::events::EventLogReader;
use crate::payload::{
  EventsPayload, RunStateDataPayload, TestServiceAccountUsageAuthorizationRequest,
  TestServiceAccountUsageAuthorizationResponse,
};
use crate::snapshot::RunStateReader;

/// Read-only status queries over run-states, event logs and service-account
/// authorization.
///
/// Failures from storage or the authorizer are returned unchanged so the
/// transport can map each to its own response.
#[derive(Clone)]
pub struct StatusService {
  run_states: RunStateReader,
  events: EventLogReader,
  authorizer: Arc<dyn ServiceAccountUsageAuthorizer>,
}

impl StatusService {
  pub fn new(
    storage: Arc<dyn Storage>,
    authorizer: Arc<dyn ServiceAccountUsageAuthorizer>,
  ) -> Self {
    Self {
      run_states: RunStateReader::new(storage.clone()),
      events: EventLogReader::new(storage),
      authorizer,
    }
  }

  /// List active run-states, optionally for a single component.
  #[instrument(name = "active_states", skip(self))]
  pub async fn active_states(
    &self,
    component: Option<&str>,
  ) -> Result<RunStateDataPayload, StatusError> {
    match self.run_states.active_states(component).await {
      Ok(active_states) => {
        info!(count = active_states.len(), "listed active states");
        Ok(RunStateDataPayload { active_states })
      }
      Err(e) => {
        error!(error = %e, "failed to list active states");
        Err(e)
      }
    }
  }

  /// List the events of one workflow instance in recording order.
  #[instrument(name = "events_for_workflow_instance", skip(self))]
  pub async fn events_for_workflow_instance(
    &self,
    component_id: &str,
    workflow_id: &str,
    instance_id: &str,
  ) -> Result<EventsPayload, StatusError> {
    match self
      .events
      .events_for_instance(component_id, workflow_id, instance_id)
      .await
    {
      Ok(events) => {
        info!(count = events.len(), "listed events");
        Ok(EventsPayload { events })
      }
      Err(e) => {
        error!(error = %e, "failed to list events");
        Err(e)
      }
    }
  }

  /// Check whether a principal may use a service account, echoing the request
  /// with the granted access reason.
  #[instrument(
    name = "test_service_account_usage_authorization",
    skip(self, request),
    fields(
      service_account = %request.service_account,
      principal = %request.principal,
    )
  )]
  pub async fn test_service_account_usage_authorization(
    &self,
    request: TestServiceAccountUsageAuthorizationRequest,
  ) -> Result<TestServiceAccountUsageAuthorizationResponse, StatusError> {
    let outcome = self
      .authorizer
      .authorize_service_account_usage(&request.service_account, &request.principal)
      .await;

    match outcome {
      AuthorizationOutcome::Approved(result) => {
        info!("service account usage authorized");
        Ok(TestServiceAccountUsageAuthorizationResponse {
          service_account: request.service_account,
          principal: request.principal,
          access_reason: result.access_message,
        })
      }
      AuthorizationOutcome::Denied(denial) => {
        info!(status = denial.status, "service account usage denied");
        Err(StatusError::AuthorizationDenied(denial))
      }
    }
  }
}
