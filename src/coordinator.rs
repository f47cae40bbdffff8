//! Restart Coordinator
//!
//! Filter-then-act. One notification in, zero or more redeploy commands
//! out. No state survives an invocation; the runtime owns the rollout.

use crate::backend::ServiceRuntime;
use crate::config::CoordinatorConfig;
use crate::error::RedeployError;
use crate::types::{InvocationResponse, NotificationEvent, Outcome, RedeployCommand};
use tracing::{debug, info, warn};

/// The restart workflow.
///
/// Borrows whatever runtime it is given and never outlives it.
pub struct RestartCoordinator<'a, R: ServiceRuntime> {
    runtime: &'a R,
    config: CoordinatorConfig,
}

impl<'a, R: ServiceRuntime> RestartCoordinator<'a, R> {
    /// Create a coordinator. Fails if the config does not validate.
    pub fn new(runtime: &'a R, config: CoordinatorConfig) -> Result<Self, RedeployError> {
        config.validate()?;
        Ok(Self { runtime, config })
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Does this object key name the trigger file?
    pub fn matches(&self, key: &str) -> bool {
        key.ends_with(self.config.trigger_filename.as_str())
    }

    /// The commands a matching upload produces, in issue order.
    pub fn plan(&self) -> Vec<RedeployCommand> {
        self.config
            .services
            .iter()
            .map(|service| RedeployCommand::force(&self.config.cluster, service))
            .collect()
    }

    /// Process one notification and report what happened.
    ///
    /// Commands go out one at a time in plan order. The first runtime error
    /// stops the run and is returned; commands already accepted stay accepted.
    pub async fn process(&self, event: &NotificationEvent) -> Result<Outcome, RedeployError> {
        debug!(?event, "received notification");

        let keyed = event.keyed_records()?;
        for (record, key) in &keyed {
            info!(
                key = %key,
                bucket = record.bucket_name().unwrap_or("-"),
                region = record.aws_region.as_deref().unwrap_or("-"),
                size = ?record.object_size(),
                "object key updated"
            );
        }
        let keys: Vec<&str> = keyed.iter().map(|(_, key)| *key).collect();

        let Some(key) = keys.iter().find(|k| self.matches(k)) else {
            info!(
                trigger = %self.config.trigger_filename,
                "object key does not match trigger file, nothing to do"
            );
            return Ok(Outcome::Skipped {
                key: keys[0].to_string(),
            });
        };

        info!(
            cluster = %self.config.cluster,
            services = self.config.services.len(),
            "starting restart of services"
        );

        let mut receipts = Vec::with_capacity(self.config.services.len());
        for command in self.plan() {
            match self.runtime.update_service(&command).await {
                Ok(receipt) => {
                    info!(
                        service = %command.service,
                        arn = receipt.service_arn.as_deref().unwrap_or("-"),
                        task_definition = receipt.task_definition.as_deref().unwrap_or("-"),
                        desired_count = ?receipt.desired_count,
                        "redeploy accepted"
                    );
                    receipts.push(receipt);
                }
                Err(e) => {
                    warn!(
                        service = %command.service,
                        accepted = receipts.len(),
                        error = %e,
                        "redeploy rejected, aborting invocation"
                    );
                    return Err(e);
                }
            }
        }

        Ok(Outcome::Redeployed {
            key: key.to_string(),
            receipts,
        })
    }

    /// Process one notification and answer the invocation layer.
    ///
    /// Filtered-out and acted-on events produce the same response.
    pub async fn handle(&self, event: &NotificationEvent) -> Result<InvocationResponse, RedeployError> {
        self.process(event).await?;
        Ok(InvocationResponse::ok())
    }
}
