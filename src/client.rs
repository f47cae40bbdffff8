//! Default runtime implementation over Amazon ECS.
//!
//! # Quick Start
//!
//! ```ignore
//! use locust_redeploy_rs::{CoordinatorConfig, EcsRuntime, RestartCoordinator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let runtime = EcsRuntime::from_env().await;
//! let config = CoordinatorConfig::from_env()?;
//! let coordinator = RestartCoordinator::new(&runtime, config)?;
//! # Ok(())
//! # }
//! ```

use crate::backend::ServiceRuntime;
use crate::error::RedeployError;
use crate::types::{DeploymentReceipt, RedeployCommand, RuntimeFailure};

use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata};
use tracing::debug;

/// `ServiceRuntime` backed by the ECS `UpdateService` API.
#[derive(Debug, Clone)]
pub struct EcsRuntime {
    client: aws_sdk_ecs::Client,
}

impl EcsRuntime {
    pub fn new(client: aws_sdk_ecs::Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential and region chain.
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_ecs::Client::new(&sdk_config))
    }
}

impl ServiceRuntime for EcsRuntime {
    async fn update_service(
        &self,
        command: &RedeployCommand,
    ) -> Result<DeploymentReceipt, RedeployError> {
        let output = self
            .client
            .update_service()
            .cluster(&command.cluster)
            .service(&command.service)
            .force_new_deployment(command.force_new_deployment)
            .send()
            .await
            .map_err(|err| {
                let code = err.as_service_error().and_then(|e| e.code());
                let kind = RuntimeFailure::from_error_code(code);
                RedeployError::runtime(
                    &command.service,
                    kind,
                    DisplayErrorContext(&err).to_string(),
                )
            })?;

        debug!(?output, "update_service response");

        let service = output.service();
        Ok(DeploymentReceipt {
            service: command.service.clone(),
            service_arn: service.and_then(|s| s.service_arn()).map(String::from),
            task_definition: service.and_then(|s| s.task_definition()).map(String::from),
            desired_count: service.map(|s| s.desired_count()),
        })
    }
}
