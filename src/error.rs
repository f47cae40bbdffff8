//! Error types for the restart workflow.
//!
//! No `anyhow` leakage. Explicit, typed errors.

use crate::types::RuntimeFailure;

#[derive(Debug, thiserror::Error)]
pub enum RedeployError {
    #[error("malformed notification event: {0}")]
    MalformedEvent(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("redeploy of service {service} failed ({kind}): {message}")]
    Runtime {
        service: String,
        kind: RuntimeFailure,
        message: String,
    },

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl RedeployError {
    /// Whether re-invoking the workflow might succeed without operator action.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RedeployError::Runtime {
                kind: RuntimeFailure::Throttled,
                ..
            }
        )
    }

    /// Shorthand for a runtime failure against one service.
    pub fn runtime(
        service: impl Into<String>,
        kind: RuntimeFailure,
        message: impl Into<String>,
    ) -> Self {
        RedeployError::Runtime {
            service: service.into(),
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RedeployError::MalformedEvent("record 0 has no object key".to_string());
        assert_eq!(
            err.to_string(),
            "malformed notification event: record 0 has no object key"
        );

        let err = RedeployError::Config("CLUSTER_NAME is not set".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: CLUSTER_NAME is not set"
        );

        let err = RedeployError::runtime("locust-workers", RuntimeFailure::Throttled, "rate exceeded");
        assert_eq!(
            err.to_string(),
            "redeploy of service locust-workers failed (throttled): rate exceeded"
        );

        let err = RedeployError::Serialization("bad utf-8".to_string());
        assert_eq!(err.to_string(), "serialization failed: bad utf-8");
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(RedeployError::runtime("svc", RuntimeFailure::Throttled, "slow down").is_recoverable());

        assert!(!RedeployError::runtime("svc", RuntimeFailure::AccessDenied, "nope").is_recoverable());
        assert!(!RedeployError::runtime("svc", RuntimeFailure::ServiceNotFound, "gone").is_recoverable());
        assert!(!RedeployError::runtime("svc", RuntimeFailure::Other, "?").is_recoverable());
        assert!(!RedeployError::MalformedEvent("x".to_string()).is_recoverable());
        assert!(!RedeployError::Config("x".to_string()).is_recoverable());
    }
}
