//! Cadence Status
//!
//! This crate is the query engine behind the status API. It answers two
//! questions from storage snapshots and checks service-account usage:
//!
//! - *What is running now?* The [`RunStateReader`] lists the active run-state
//!   of every workflow instance, optionally for one component.
//! - *What happened to this instance?* The [`EventLogReader`] returns an
//!   instance's recorded events ordered by time.
//! - *May this principal use that service account?* Delegated to a
//!   [`ServiceAccountUsageAuthorizer`].
//!
//! [`StatusService`] composes the three and is what transports call. It is
//! stateless; every call is an independent point-in-time read.

mod authorizer;
mod error;
mod events;
mod payload;
mod service;
mod snapshot;

pub use authorizer::{
  AllowAllAuthorizer, AuthorizationOutcome, Denial, Grant, Policy, PolicyAuthorizer, PolicyError,
  ServiceAccountUsageAuthorizationResult, ServiceAccountUsageAuthorizer,
};
pub use error::StatusError;
pub use events::{EventLogReader, order_events};
pub use payload::{
  EventsPayload, RunStateData, RunStateDataPayload, TestServiceAccountUsageAuthorizationRequest,
  TestServiceAccountUsageAuthorizationResponse, TimestampedEvent,
};
pub use service::StatusService;
pub use snapshot::{RunStateReader, project_active_states};
