//! Cadence Model
//!
//! Shared data types for the Cadence run-state query engine:
//!
//! - [`WorkflowId`] and [`WorkflowInstance`] identify a workflow and one
//!   scheduled execution of it.
//! - [`RunState`] is the latest observed phase of an active instance.
//! - [`SequenceEvent`] is one entry in an instance's append-only history.
//! - [`Schedule`] is the canonical form of a recurrence alias such as
//!   `"daily"` or `"HOURS"`.
//!
//! These types are owned by the execution engine and the storage layer; the
//! query side only reads them.

mod error;
mod event;
mod identity;
mod schedule;
mod state;

pub use error::{KeyError, ScheduleError};
pub use event::SequenceEvent;
pub use identity::{WorkflowId, WorkflowInstance};
pub use schedule::Schedule;
pub use state::RunState;
