use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::KeyError;

const KEY_SEPARATOR: char = '#';

/// Identity of a workflow definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkflowId {
  pub component_id: String,
  pub id: String,
}

impl WorkflowId {
  /// Build an id without validation. Use [`WorkflowId::try_new`] for ids
  /// that come from outside, since a `#` in either part makes the key
  /// ambiguous.
  pub fn new(component_id: impl Into<String>, id: impl Into<String>) -> Self {
    Self {
      component_id: component_id.into(),
      id: id.into(),
    }
  }

  /// Build an id, rejecting parts that contain the key separator.
  pub fn try_new(
    component_id: impl Into<String>,
    id: impl Into<String>,
  ) -> Result<Self, KeyError> {
    let workflow_id = Self::new(component_id, id);
    no_separator("component id", &workflow_id.component_id)?;
    no_separator("workflow id", &workflow_id.id)?;
    Ok(workflow_id)
  }

  /// Storage key, e.g. `"my-component#my-workflow"`. Only reversible with
  /// [`WorkflowId::parse_key`] when neither part contains `#`.
  pub fn to_key(&self) -> String {
    format!("{}{KEY_SEPARATOR}{}", self.component_id, self.id)
  }

  /// Parse a key produced by [`WorkflowId::to_key`].
  pub fn parse_key(key: &str) -> Result<Self, KeyError> {
    let parts: Vec<&str> = key.split(KEY_SEPARATOR).collect();
    let [component_id, id] = parts.as_slice() else {
      return Err(KeyError::Malformed {
        key: key.to_string(),
        expected: 2,
      });
    };

    non_empty(key, "component id", component_id)?;
    non_empty(key, "workflow id", id)?;

    Ok(Self::new(*component_id, *id))
  }
}

impl fmt::Display for WorkflowId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_key())
  }
}

/// Identity of one scheduled execution of a workflow.
///
/// The instance id is usually a date or parameter string such as
/// `"2024-03-01T10"`. It is the lookup key for both the run-state snapshot
/// and the event log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkflowInstance {
  #[serde(rename = "workflow")]
  pub workflow_id: WorkflowId,
  #[serde(rename = "parameter")]
  pub instance_id: String,
}

impl WorkflowInstance {
  pub fn new(workflow_id: WorkflowId, instance_id: impl Into<String>) -> Self {
    Self {
      workflow_id,
      instance_id: instance_id.into(),
    }
  }

  /// Component owning the workflow of this instance.
  pub fn component_id(&self) -> &str {
    &self.workflow_id.component_id
  }

  /// Storage key, e.g. `"my-component#my-workflow#2024-03-01"`.
  pub fn to_key(&self) -> String {
    format!(
      "{}{KEY_SEPARATOR}{}",
      self.workflow_id.to_key(),
      self.instance_id
    )
  }

  /// Parse a key produced by [`WorkflowInstance::to_key`].
  ///
  /// Only the first two separators are significant, so the instance id may
  /// itself contain `#`.
  pub fn parse_key(key: &str) -> Result<Self, KeyError> {
    let parts: Vec<&str> = key.splitn(3, KEY_SEPARATOR).collect();
    let [component_id, id, instance_id] = parts.as_slice() else {
      return Err(KeyError::Malformed {
        key: key.to_string(),
        expected: 3,
      });
    };

    non_empty(key, "component id", component_id)?;
    non_empty(key, "workflow id", id)?;
    non_empty(key, "instance id", instance_id)?;

    Ok(Self::new(WorkflowId::new(*component_id, *id), *instance_id))
  }
}

impl fmt::Display for WorkflowInstance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_key())
  }
}

fn non_empty(key: &str, part: &'static str, value: &str) -> Result<(), KeyError> {
  if value.is_empty() {
    return Err(KeyError::EmptyPart {
      key: key.to_string(),
      part,
    });
  }
  Ok(())
}

fn no_separator(part: &'static str, value: &str) -> Result<(), KeyError> {
  if value.contains(KEY_SEPARATOR) {
    return Err(KeyError::ReservedSeparator {
      value: value.to_string(),
      part,
    });
  }
  Ok(())
}
