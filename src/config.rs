// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Probe configuration

use std::time::Duration;

/// Environment variable holding the process-wide default endpoint
pub const ENDPOINT_ENV_VAR: &str = "SCRIPT_DIAG_ENDPOINT";

/// Default user agent for fallback delivery
pub const DEFAULT_USER_AGENT: &str = concat!("loadprobe/", env!("CARGO_PKG_VERSION"));

/// Probe configuration
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Query parameter carrying a delivery endpoint
    pub endpoint_param: String,
    /// Dataset key carrying a delivery endpoint (`data-log-endpoint`)
    pub endpoint_dataset_key: String,
    /// Process-wide fallback endpoint
    pub ambient_endpoint: Option<String>,
    /// Relay reports to a collector when an endpoint resolves
    pub delivery_enabled: bool,
    /// Write the grouped console log to the host console
    pub console_logging: bool,
    /// Timeout for the fallback HTTP POST
    pub delivery_timeout: Duration,
    /// User agent for the fallback HTTP POST
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            endpoint_param: "logEndpoint".to_string(),
            endpoint_dataset_key: "logEndpoint".to_string(),
            ambient_endpoint: None,
            delivery_enabled: true,
            console_logging: true,
            delivery_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ProbeConfig {
    /// Create a new probe config
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config with the ambient endpoint read from `SCRIPT_DIAG_ENDPOINT`
    pub fn from_env() -> Self {
        let ambient = std::env::var(ENDPOINT_ENV_VAR)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Self {
            ambient_endpoint: ambient,
            ..Default::default()
        }
    }

    /// No console output and no delivery
    pub fn silent() -> Self {
        Self {
            delivery_enabled: false,
            console_logging: false,
            ..Default::default()
        }
    }

    /// Set the ambient endpoint
    pub fn ambient_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.ambient_endpoint = Some(endpoint.into());
        self
    }

    /// Set the endpoint query parameter name
    pub fn endpoint_param(mut self, name: impl Into<String>) -> Self {
        self.endpoint_param = name.into();
        self
    }

    /// Set the endpoint dataset key
    pub fn endpoint_dataset_key(mut self, key: impl Into<String>) -> Self {
        self.endpoint_dataset_key = key.into();
        self
    }

    /// Enable/disable delivery
    pub fn delivery_enabled(mut self, enabled: bool) -> Self {
        self.delivery_enabled = enabled;
        self
    }

    /// Enable/disable host console logging
    pub fn console_logging(mut self, enabled: bool) -> Self {
        self.console_logging = enabled;
        self
    }

    /// Set delivery timeout
    pub fn delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
