use thiserror::Error;

/// A recurrence token that matches none of the accepted aliases.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparsable schedule: {token:?}")]
pub struct ScheduleError {
  pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
  #[error("malformed key {key:?}: expected {expected} '#'-separated parts")]
  Malformed { key: String, expected: usize },

  #[error("empty {part} in key {key:?}")]
  EmptyPart { key: String, part: &'static str },

  #[error("{part} {value:?} must not contain '#'")]
  ReservedSeparator { value: String, part: &'static str },
}
