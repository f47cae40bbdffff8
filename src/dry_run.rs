//! Dry-run runtime.
//!
//! Serializes each redeploy command as JSON to stdout instead of calling
//! the control plane. Every command is "accepted". Useful for:
//! - Checking a new trigger/service layout before pointing it at a cluster
//! - Piping the command stream to other tools (`restart-coordinator | jq`)

use crate::backend::ServiceRuntime;
use crate::error::RedeployError;
use crate::types::{DeploymentReceipt, RedeployCommand};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Runtime that prints commands and never touches a cluster.
pub struct DryRunRuntime {
    print: bool,
    issued: AtomicUsize,
}

impl DryRunRuntime {
    pub fn new() -> Self {
        Self {
            print: true,
            issued: AtomicUsize::new(0),
        }
    }

    /// Same, but without the stdout JSON.
    pub fn quiet() -> Self {
        Self {
            print: false,
            issued: AtomicUsize::new(0),
        }
    }

    /// How many commands this runtime has accepted.
    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }
}

impl Default for DryRunRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceRuntime for DryRunRuntime {
    async fn update_service(
        &self,
        command: &RedeployCommand,
    ) -> Result<DeploymentReceipt, RedeployError> {
        if self.print {
            let json = serde_json::to_string(command).map_err(|e| {
                RedeployError::Serialization(format!("failed to serialize command: {}", e))
            })?;
            println!("{}", json);
        }
        self.issued.fetch_add(1, Ordering::SeqCst);
        info!(
            cluster = %command.cluster,
            service = %command.service,
            "dry run: redeploy not sent"
        );

        Ok(DeploymentReceipt {
            service: command.service.clone(),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dry_run_accepts_and_counts() {
        let runtime = DryRunRuntime::quiet();
        let cmd = RedeployCommand::force("c", "s");

        let receipt = runtime.update_service(&cmd).await.unwrap();
        assert_eq!(receipt.service, "s");
        assert!(receipt.service_arn.is_none());

        runtime.update_service(&cmd).await.unwrap();
        assert_eq!(runtime.issued(), 2);
    }
}
