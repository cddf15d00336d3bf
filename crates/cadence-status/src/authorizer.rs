//! Service-account usage authorization.
//!
//! The status API lets operators check ahead of time whether a principal may
//! run workflows as a given service account. The decision itself belongs to
//! an external policy system, reached through [`ServiceAccountUsageAuthorizer`].

use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

const FORBIDDEN: u16 = 403;
const ANY_PRINCIPAL: &str = "*";

/// A rejection produced by the authorizer, returned to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denial {
  /// HTTP status the transport should answer with.
  pub status: u16,
  pub message: String,
}

impl Denial {
  pub fn forbidden(message: impl Into<String>) -> Self {
    Self {
      status: FORBIDDEN,
      message: message.into(),
    }
  }
}

impl fmt::Display for Denial {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.message, self.status)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountUsageAuthorizationResult {
  /// Why access was granted, in human-readable form.
  pub access_message: String,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
  Denied(Denial),
  Approved(ServiceAccountUsageAuthorizationResult),
}

/// Decides whether a principal may use a service account.
#[async_trait]
pub trait ServiceAccountUsageAuthorizer: Send + Sync {
  async fn authorize_service_account_usage(
    &self,
    service_account: &str,
    principal: &str,
  ) -> AuthorizationOutcome;
}

/// Approves every request. Used when no policy is configured.
#[derive(Debug, Clone, Default)]
pub struct AllowAllAuthorizer;

#[async_trait]
impl ServiceAccountUsageAuthorizer for AllowAllAuthorizer {
  async fn authorize_service_account_usage(
    &self,
    _service_account: &str,
    _principal: &str,
  ) -> AuthorizationOutcome {
    AuthorizationOutcome::Approved(ServiceAccountUsageAuthorizationResult {
      access_message: "authorization is disabled".to_string(),
    })
  }
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
  #[error("failed to read policy file: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to parse policy file: {0}")]
  Parse(#[from] serde_json::Error),
}

/// Principals allowed to use one service account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
  pub service_account: String,
  /// Exact principal names, or `"*"` for anyone.
  pub principals: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
}

impl Grant {
  fn allows(&self, principal: &str) -> bool {
    self
      .principals
      .iter()
      .any(|p| p == ANY_PRINCIPAL || p == principal)
  }
}

/// Service-account usage policy, usually loaded from a JSON file:
///
/// ```json
/// {
///   "grants": [
///     {
///       "service_account": "etl@project.iam",
///       "principals": ["alice@example.com"],
///       "reason": "member of the etl team"
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
  #[serde(default)]
  pub grants: Vec<Grant>,
}

/// Authorizer backed by a static [`Policy`].
#[derive(Debug, Clone)]
pub struct PolicyAuthorizer {
  policy: Policy,
}

impl PolicyAuthorizer {
  pub fn new(policy: Policy) -> Self {
    Self { policy }
  }

  /// Load the policy from a JSON file.
  pub async fn from_file(path: &Path) -> Result<Self, PolicyError> {
    let content = tokio::fs::read_to_string(path).await?;
    let policy: Policy = serde_json::from_str(&content)?;
    debug!(path = %path.display(), grants = policy.grants.len(), "loaded policy");
    Ok(Self::new(policy))
  }
}

#[async_trait]
impl ServiceAccountUsageAuthorizer for PolicyAuthorizer {
  async fn authorize_service_account_usage(
    &self,
    service_account: &str,
    principal: &str,
  ) -> AuthorizationOutcome {
    let mut grants = self
      .policy
      .grants
      .iter()
      .filter(|g| g.service_account == service_account)
      .peekable();

    if grants.peek().is_none() {
      return AuthorizationOutcome::Denied(Denial::forbidden(format!(
        "service account {} has no usage grants",
        service_account
      )));
    }

    match grants.find(|g| g.allows(principal)) {
      Some(grant) => {
        let access_message = grant.reason.clone().unwrap_or_else(|| {
          format!(
            "{} is granted usage of {} by policy",
            principal, service_account
          )
        });
        AuthorizationOutcome::Approved(ServiceAccountUsageAuthorizationResult { access_message })
      }
      None => AuthorizationOutcome::Denied(Denial::forbidden(format!(
        "{} is not authorized to use service account {}",
        principal, service_account
      ))),
    }
  }
}
