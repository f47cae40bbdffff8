//! Minimal domain types for the restart workflow.
//!
//! The notification types mirror only the slice of the object-store event
//! the coordinator reads. Everything else in the payload is ignored.

use crate::error::RedeployError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// One object-store notification delivery. May carry several records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<NotificationRecord>,
}

impl NotificationEvent {
    /// Event with a single record for `key` in `bucket`.
    pub fn for_key(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            records: vec![NotificationRecord::new(bucket, key)],
        }
    }

    /// Records that carry an object key, paired with that key, in delivery order.
    ///
    /// An event without records, or whose first record has no key, is
    /// malformed. Later records without a key are logged and skipped.
    pub fn keyed_records(&self) -> Result<Vec<(&NotificationRecord, &str)>, RedeployError> {
        let Some(first) = self.records.first() else {
            return Err(RedeployError::MalformedEvent(
                "event contains no records".into(),
            ));
        };
        let first_key = first.object_key().map_err(|_| {
            RedeployError::MalformedEvent("record 0 has no object key".into())
        })?;

        let mut keyed = Vec::with_capacity(self.records.len());
        keyed.push((first, first_key));
        for (i, record) in self.records.iter().enumerate().skip(1) {
            match record.object_key() {
                Ok(key) => keyed.push((record, key)),
                Err(_) => warn!(record = i, "record has no object key, skipping"),
            }
        }
        Ok(keyed)
    }

    /// Object keys of every keyed record, in delivery order.
    pub fn object_keys(&self) -> Result<Vec<&str>, RedeployError> {
        Ok(self.keyed_records()?.into_iter().map(|(_, key)| key).collect())
    }
}

/// A single object write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(default)]
    pub s3: StoreEntity,
}

impl NotificationRecord {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            event_name: Some("ObjectCreated:Put".to_string()),
            aws_region: None,
            s3: StoreEntity {
                bucket: Some(BucketRef { name: bucket.into() }),
                object: Some(ObjectRef {
                    key: Some(key.into()),
                    size: None,
                }),
            },
        }
    }

    /// The created object's key.
    pub fn object_key(&self) -> Result<&str, RedeployError> {
        self.s3
            .object
            .as_ref()
            .and_then(|o| o.key.as_deref())
            .ok_or_else(|| RedeployError::MalformedEvent("missing s3.object.key".into()))
    }

    /// Size in bytes of the created object, if reported.
    pub fn object_size(&self) -> Option<u64> {
        self.s3.object.as_ref().and_then(|o| o.size)
    }

    /// Name of the store that emitted the record, if present.
    pub fn bucket_name(&self) -> Option<&str> {
        self.s3.bucket.as_ref().map(|b| b.name.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<BucketRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Instruction to replace every running instance of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedeployCommand {
    pub cluster: String,
    pub service: String,
    pub force_new_deployment: bool,
}

impl RedeployCommand {
    /// Forced redeploy: the runtime rolls instances even if nothing changed.
    pub fn force(cluster: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            service: service.into(),
            force_new_deployment: true,
        }
    }
}

/// What the runtime reported after accepting a redeploy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentReceipt {
    pub service: String,
    pub service_arn: Option<String>,
    pub task_definition: Option<String>,
    pub desired_count: Option<i32>,
}

/// Response handed back to the invocation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
}

impl InvocationResponse {
    pub fn ok() -> Self {
        Self { status_code: 200 }
    }
}

/// What one invocation did. Only used for logging and tests; the caller
/// sees an [`InvocationResponse`] either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No key matched the trigger filename.
    Skipped { key: String },
    /// Every configured service accepted a redeploy.
    Redeployed {
        key: String,
        receipts: Vec<DeploymentReceipt>,
    },
}

impl Outcome {
    pub fn is_redeployed(&self) -> bool {
        matches!(self, Outcome::Redeployed { .. })
    }
}

/// Why the control plane rejected a redeploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeFailure {
    Throttled,
    AccessDenied,
    ClusterNotFound,
    ServiceNotFound,
    ServiceInactive,
    Other,
}

impl RuntimeFailure {
    /// Map a control-plane error code onto a failure kind.
    pub fn from_error_code(code: Option<&str>) -> Self {
        match code {
            Some("ThrottlingException") | Some("TooManyRequestsException")
            | Some("RequestLimitExceeded") => RuntimeFailure::Throttled,
            Some("AccessDeniedException") | Some("UnauthorizedOperation") => {
                RuntimeFailure::AccessDenied
            }
            Some("ClusterNotFoundException") => RuntimeFailure::ClusterNotFound,
            Some("ServiceNotFoundException") => RuntimeFailure::ServiceNotFound,
            Some("ServiceNotActiveException") => RuntimeFailure::ServiceInactive,
            _ => RuntimeFailure::Other,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RuntimeFailure::Throttled => "throttled",
            RuntimeFailure::AccessDenied => "access_denied",
            RuntimeFailure::ClusterNotFound => "cluster_not_found",
            RuntimeFailure::ServiceNotFound => "service_not_found",
            RuntimeFailure::ServiceInactive => "service_inactive",
            RuntimeFailure::Other => "other",
        }
    }
}

impl fmt::Display for RuntimeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
