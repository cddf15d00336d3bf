//! Cadence API
//!
//! HTTP transport for the status queries of [`cadence_status::StatusService`].
//!
//! ## Routes
//!
//! - `GET  /health` - Liveness probe
//! - `GET  /api/v3/status/activeStates[?component=<id>]` - Active run-states
//! - `GET  /api/v3/status/events/{cid}/{wfid}/{iid}` - Events of one instance
//! - `POST /api/v3/status/testServiceAccountUsageAuthorization` - Check
//!   whether a principal may use a service account

mod error;
mod routes;
mod server;

pub use error::{ApiError, ApiErrorBody};
pub use server::{ServerConfig, ServerError, router, serve};
