//! Locust Redeploy Library
//!
//! Restarts Locust services when a new locustfile lands in the object store.
//!
//! # Design
//!
//! The coordinator is a stateless filter-then-act function. It doesn't
//! know how to talk to a cluster: you implement the [`ServiceRuntime`]
//! trait (or enable `default-client` for the ECS implementation), and the
//! coordinator decides which services to redeploy and in what order.
//!
//! # Usage
//!
//! ```ignore
//! use locust_redeploy_rs::{CoordinatorConfig, NotificationEvent, RestartCoordinator};
//!
//! let runtime = MyRuntime::new();
//! let config = CoordinatorConfig::new("perf-cluster")
//!     .with_service("locust-master")
//!     .with_service("locust-workers");
//! let coordinator = RestartCoordinator::new(&runtime, config)?;
//!
//! let event = NotificationEvent::for_key("locust-config", "scripts/locustfile.py");
//! coordinator.handle(&event).await?; // master, then workers
//! ```

pub mod backend;
pub mod config;
pub mod coordinator;
pub mod dry_run;
pub mod error;
pub mod types;

#[cfg(feature = "default-client")]
pub mod client;

pub use backend::ServiceRuntime;
pub use config::{CoordinatorConfig, DEFAULT_TRIGGER_FILENAME};
pub use coordinator::RestartCoordinator;
pub use dry_run::DryRunRuntime;
pub use error::RedeployError;
pub use types::*;

#[cfg(feature = "default-client")]
pub use client::EcsRuntime;
