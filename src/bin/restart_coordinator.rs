//! Lambda entry point for the restart coordinator.
//!
//! Environment:
//!   CLUSTER_NAME          - cluster hosting the services (required)
//!   SERVICE_NAME          - single combined service, or
//!   MASTER_SERVICE_NAME   - master service, redeployed first, plus
//!   WORKERS_SERVICE_NAME  - workers service, redeployed second, or
//!   TARGET_SERVICES       - comma-separated list, redeployed in order
//!   TRIGGER_FILENAME      - upload suffix that triggers a restart (default: locustfile.py)
//!   LAMBDA_LOG_LEVEL      - DEBUG | INFO | WARNING | ERROR (default: INFO)
//!   DRY_RUN               - "true" prints commands instead of calling ECS

use lambda_runtime::{service_fn, Error, LambdaEvent};
use locust_redeploy_rs::{
    CoordinatorConfig, DryRunRuntime, EcsRuntime, InvocationResponse, NotificationEvent,
    RestartCoordinator, ServiceRuntime,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    let config = CoordinatorConfig::from_env()?;

    // RUST_LOG wins over LAMBDA_LOG_LEVEL when both are set.
    let fallback = config.log_directive().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .init();

    tracing::info!(
        cluster = %config.cluster,
        services = ?config.services,
        trigger = %config.trigger_filename,
        "restart coordinator starting"
    );

    let dry_run = std::env::var("DRY_RUN")
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);

    if dry_run {
        let runtime = DryRunRuntime::new();
        serve(&runtime, config).await
    } else {
        let runtime = EcsRuntime::from_env().await;
        serve(&runtime, config).await
    }
}

async fn serve<R: ServiceRuntime>(runtime: &R, config: CoordinatorConfig) -> Result<(), Error> {
    let coordinator = RestartCoordinator::new(runtime, config)?;
    let coordinator = &coordinator;

    lambda_runtime::run(service_fn(
        move |event: LambdaEvent<NotificationEvent>| async move {
            tracing::debug!(request_id = %event.context.request_id, "invocation");
            let response: InvocationResponse = coordinator.handle(&event.payload).await?;
            Ok::<_, Error>(response)
        },
    ))
    .await
}
