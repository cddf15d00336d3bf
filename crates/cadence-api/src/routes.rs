//! Status routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use cadence_status::{
  EventsPayload, RunStateDataPayload, StatusService, TestServiceAccountUsageAuthorizationRequest,
  TestServiceAccountUsageAuthorizationResponse,
};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub(crate) struct ActiveStatesQuery {
  component: Option<String>,
}

pub(crate) fn status_routes() -> Router<StatusService> {
  Router::new()
    .route("/status/activeStates", get(active_states))
    .route(
      "/status/events/{cid}/{wfid}/{iid}",
      get(events_for_workflow_instance),
    )
    .route(
      "/status/testServiceAccountUsageAuthorization",
      post(test_service_account_usage_authorization),
    )
}

async fn active_states(
  State(service): State<StatusService>,
  Query(query): Query<ActiveStatesQuery>,
) -> Result<Json<RunStateDataPayload>, ApiError> {
  let payload = service.active_states(query.component.as_deref()).await?;
  Ok(Json(payload))
}

async fn events_for_workflow_instance(
  State(service): State<StatusService>,
  Path((cid, wfid, iid)): Path<(String, String, String)>,
) -> Result<Json<EventsPayload>, ApiError> {
  let payload = service
    .events_for_workflow_instance(&cid, &wfid, &iid)
    .await?;
  Ok(Json(payload))
}

async fn test_service_account_usage_authorization(
  State(service): State<StatusService>,
  request: Result<Json<TestServiceAccountUsageAuthorizationRequest>, JsonRejection>,
) -> Result<Json<TestServiceAccountUsageAuthorizationResponse>, ApiError> {
  let Json(request) = request.map_err(|e| ApiError::bad_request(e.body_text()))?;
  let response = service
    .test_service_account_usage_authorization(request)
    .await?;
  Ok(Json(response))
}
