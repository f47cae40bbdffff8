#![cfg(feature = "default-client")]

use aws_sdk_ecs::error::ErrorMetadata;
use aws_sdk_ecs::operation::update_service::{UpdateServiceError, UpdateServiceOutput};
use aws_sdk_ecs::types::Service;
use aws_smithy_mocks::{mock, mock_client};
use locust_redeploy_rs::{
    CoordinatorConfig, EcsRuntime, NotificationEvent, RedeployCommand, RedeployError,
    RestartCoordinator, RuntimeFailure, ServiceRuntime,
};

fn service_error(code: &str, message: &str) -> UpdateServiceError {
    UpdateServiceError::generic(ErrorMetadata::builder().code(code).message(message).build())
}

// ═══════════════════════════════════════════════════════════════════
// REQUEST SHAPE
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_update_service_sends_forced_redeploy() {
    let rule = mock!(aws_sdk_ecs::Client::update_service)
        .match_requests(|input| {
            input.cluster() == Some("perf-cluster")
                && input.service() == Some("locust-server")
                && input.force_new_deployment() == Some(true)
        })
        .then_output(|| {
            UpdateServiceOutput::builder()
                .service(
                    Service::builder()
                        .service_name("locust-server")
                        .service_arn("arn:aws:ecs:eu-west-1:123456789012:service/perf-cluster/locust-server")
                        .task_definition("arn:aws:ecs:eu-west-1:123456789012:task-definition/locust:7")
                        .desired_count(1)
                        .build(),
                )
                .build()
        });
    let runtime = EcsRuntime::new(mock_client!(aws_sdk_ecs, [&rule]));

    let receipt = runtime
        .update_service(&RedeployCommand::force("perf-cluster", "locust-server"))
        .await
        .unwrap();

    assert_eq!(rule.num_calls(), 1);
    assert_eq!(receipt.service, "locust-server");
    assert_eq!(
        receipt.service_arn.as_deref(),
        Some("arn:aws:ecs:eu-west-1:123456789012:service/perf-cluster/locust-server")
    );
    assert_eq!(
        receipt.task_definition.as_deref(),
        Some("arn:aws:ecs:eu-west-1:123456789012:task-definition/locust:7")
    );
    assert_eq!(receipt.desired_count, Some(1));
}

#[tokio::test]
async fn test_coordinator_over_ecs_redeploys_master_then_workers() {
    let master = mock!(aws_sdk_ecs::Client::update_service)
        .match_requests(|input| {
            input.service() == Some("locust-master") && input.force_new_deployment() == Some(true)
        })
        .then_output(|| UpdateServiceOutput::builder().build());
    let workers = mock!(aws_sdk_ecs::Client::update_service)
        .match_requests(|input| {
            input.service() == Some("locust-workers") && input.force_new_deployment() == Some(true)
        })
        .then_output(|| UpdateServiceOutput::builder().build());
    let runtime = EcsRuntime::new(mock_client!(aws_sdk_ecs, [&master, &workers]));

    let config = CoordinatorConfig::new("perf-cluster")
        .with_service("locust-master")
        .with_service("locust-workers");
    let coordinator = RestartCoordinator::new(&runtime, config).unwrap();

    coordinator
        .handle(&NotificationEvent::for_key("locust-config", "scripts/locustfile.py"))
        .await
        .unwrap();

    assert_eq!(master.num_calls(), 1);
    assert_eq!(workers.num_calls(), 1);
}

// ═══════════════════════════════════════════════════════════════════
// ERROR MAPPING
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_throttling_maps_to_recoverable_runtime_error() {
    let rule = mock!(aws_sdk_ecs::Client::update_service)
        .then_error(|| service_error("ThrottlingException", "Rate exceeded"));
    let runtime = EcsRuntime::new(mock_client!(aws_sdk_ecs, [&rule]));

    let err = runtime
        .update_service(&RedeployCommand::force("perf-cluster", "locust-workers"))
        .await
        .unwrap_err();

    match &err {
        RedeployError::Runtime { service, kind, .. } => {
            assert_eq!(service, "locust-workers");
            assert_eq!(*kind, RuntimeFailure::Throttled);
        }
        other => panic!("expected runtime error, got {:?}", other),
    }
    assert!(err.is_recoverable());
}

#[tokio::test]
async fn test_access_denied_is_not_recoverable() {
    let rule = mock!(aws_sdk_ecs::Client::update_service)
        .then_error(|| {
            service_error("AccessDeniedException", "not authorized to perform ecs:UpdateService")
        });
    let runtime = EcsRuntime::new(mock_client!(aws_sdk_ecs, [&rule]));

    let err = runtime
        .update_service(&RedeployCommand::force("perf-cluster", "locust-server"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RedeployError::Runtime {
            kind: RuntimeFailure::AccessDenied,
            ..
        }
    ));
    assert!(!err.is_recoverable());
}
