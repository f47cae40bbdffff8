//! Coordinator configuration.
//!
//! Target identifiers are read from the environment once, at cold start,
//! and then passed to the coordinator as a plain value.

use crate::error::RedeployError;

/// Filename whose upload triggers a restart.
pub const DEFAULT_TRIGGER_FILENAME: &str = "locustfile.py";

/// Python-style level name, kept compatible with existing deployments.
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

pub const ENV_CLUSTER_NAME: &str = "CLUSTER_NAME";
pub const ENV_SERVICE_NAME: &str = "SERVICE_NAME";
pub const ENV_MASTER_SERVICE_NAME: &str = "MASTER_SERVICE_NAME";
pub const ENV_WORKERS_SERVICE_NAME: &str = "WORKERS_SERVICE_NAME";
pub const ENV_TARGET_SERVICES: &str = "TARGET_SERVICES";
pub const ENV_TRIGGER_FILENAME: &str = "TRIGGER_FILENAME";
pub const ENV_LOG_LEVEL: &str = "LAMBDA_LOG_LEVEL";

/// Which cluster and services to redeploy, and on which upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Cluster that hosts every target service.
    pub cluster: String,
    /// Services to redeploy, in issue order (master before workers).
    pub services: Vec<String>,
    /// Object keys must end with this to trigger a restart.
    pub trigger_filename: String,
    /// Log level name (`DEBUG`, `INFO`, `WARNING`, `ERROR`, `CRITICAL`).
    pub log_level: String,
}

impl CoordinatorConfig {
    /// Config for `cluster` with no services yet.
    pub fn new(cluster: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            services: Vec::new(),
            trigger_filename: DEFAULT_TRIGGER_FILENAME.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Append a target service.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.services.push(service.into());
        self
    }

    /// Append several target services, keeping their order.
    pub fn with_services<I, S>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services.extend(services.into_iter().map(Into::into));
        self
    }

    /// Replace the trigger filename.
    pub fn with_trigger_filename(mut self, filename: impl Into<String>) -> Self {
        self.trigger_filename = filename.into();
        self
    }

    /// Replace the log level name.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Check the config is usable.
    pub fn validate(&self) -> Result<(), RedeployError> {
        if self.cluster.trim().is_empty() {
            return Err(RedeployError::Config("cluster name is empty".into()));
        }
        if self.services.is_empty() {
            return Err(RedeployError::Config("no target services configured".into()));
        }
        if let Some(i) = self.services.iter().position(|s| s.trim().is_empty()) {
            return Err(RedeployError::Config(format!(
                "target service {} has an empty name",
                i
            )));
        }
        if self.trigger_filename.is_empty() {
            return Err(RedeployError::Config("trigger filename is empty".into()));
        }
        if self.trigger_filename.contains('/') {
            return Err(RedeployError::Config(format!(
                "trigger filename must not contain '/': {}",
                self.trigger_filename
            )));
        }
        self.log_directive()?;
        Ok(())
    }

    /// `tracing` filter directive for the configured level name.
    pub fn log_directive(&self) -> Result<&'static str, RedeployError> {
        match self.log_level.trim().to_ascii_uppercase().as_str() {
            "NOTSET" | "TRACE" => Ok("trace"),
            "DEBUG" => Ok("debug"),
            "INFO" => Ok("info"),
            "WARNING" | "WARN" => Ok("warn"),
            "ERROR" | "CRITICAL" | "FATAL" => Ok("error"),
            other => Err(RedeployError::Config(format!("unknown log level: {}", other))),
        }
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, RedeployError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup. Values are trimmed; blank
    /// values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RedeployError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let cluster = get(ENV_CLUSTER_NAME)
            .ok_or_else(|| RedeployError::Config(format!("{} is not set", ENV_CLUSTER_NAME)))?;

        let single = get(ENV_SERVICE_NAME);
        let master = get(ENV_MASTER_SERVICE_NAME);
        let workers = get(ENV_WORKERS_SERVICE_NAME);
        let list = get(ENV_TARGET_SERVICES);

        let layouts = [single.is_some(), master.is_some() || workers.is_some(), list.is_some()]
            .iter()
            .filter(|set| **set)
            .count();
        if layouts > 1 {
            return Err(RedeployError::Config(format!(
                "set only one of {}, {}/{}, {}",
                ENV_SERVICE_NAME, ENV_MASTER_SERVICE_NAME, ENV_WORKERS_SERVICE_NAME, ENV_TARGET_SERVICES
            )));
        }

        let services = match (single, master, workers, list) {
            (Some(service), _, _, _) => vec![service],
            (_, Some(master), Some(workers), _) => vec![master, workers],
            (_, Some(_), None, _) => {
                return Err(RedeployError::Config(format!(
                    "{} is set but {} is not",
                    ENV_MASTER_SERVICE_NAME, ENV_WORKERS_SERVICE_NAME
                )))
            }
            (_, None, Some(_), _) => {
                return Err(RedeployError::Config(format!(
                    "{} is set but {} is not",
                    ENV_WORKERS_SERVICE_NAME, ENV_MASTER_SERVICE_NAME
                )))
            }
            (_, _, _, Some(list)) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            (None, None, None, None) => Vec::new(),
        };

        let mut config = Self::new(cluster).with_services(services);
        if let Some(filename) = get(ENV_TRIGGER_FILENAME) {
            config.trigger_filename = filename;
        }
        if let Some(level) = get(ENV_LOG_LEVEL) {
            config.log_level = level;
        }

        config.validate()?;
        Ok(config)
    }
}
