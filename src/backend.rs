//! The One Trait: ServiceRuntime
//!
//! The single abstraction point over the managed container runtime.
//! The coordinator is pure logic: it doesn't know about HTTP, SDKs or
//! credentials. That's the implementor's problem.

use crate::error::RedeployError;
use crate::types::{DeploymentReceipt, RedeployCommand};
use std::future::Future;

/// The control-plane operations the restart workflow needs.
///
/// Implementations must treat every call as an independent request: the
/// same command may arrive twice (duplicate notifications, concurrent
/// invocations) and each one simply starts another rollout.
pub trait ServiceRuntime: Send + Sync {
    /// Ask the runtime to replace all running instances of `command.service`.
    ///
    /// Returns once the runtime has accepted the request, not when the
    /// rollout finishes. Errors are returned as-is; the caller does not retry.
    fn update_service(
        &self,
        command: &RedeployCommand,
    ) -> impl Future<Output = Result<DeploymentReceipt, RedeployError>> + Send;
}
