// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Remote delivery of diagnostic reports
//!
//! Delivery is best effort: the host's beacon primitive first, an HTTP POST
//! spawned on the ambient tokio runtime second, no retries, no
//! acknowledgement. Nothing here ever blocks the caller or fails it.

mod target;
mod transport;

use std::sync::Arc;

use bytes::Bytes;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::ProbeConfig;
use crate::host::HostEnvironment;
use crate::params::resolve;
use crate::report::DiagnosticReport;

pub use target::{DeliveryTarget, TargetOrigin};
pub use transport::{FetchTransport, HttpFetchTransport, REPORT_CONTENT_TYPE};

/// What happened to a report
#[derive(Debug)]
pub enum Dispatch {
    /// Delivery disabled or no endpoint resolved
    Skipped,
    /// Queued through the host's beacon primitive
    Beacon { endpoint: String },
    /// HTTP POST spawned; the handle is only useful to tests and shutdown code
    Fetch {
        endpoint: String,
        task: JoinHandle<()>,
    },
    /// A target existed but nothing could be sent
    Dropped { endpoint: String, reason: String },
}

impl Dispatch {
    /// Endpoint the report went (or would have gone) to
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Dispatch::Skipped => None,
            Dispatch::Beacon { endpoint }
            | Dispatch::Fetch { endpoint, .. }
            | Dispatch::Dropped { endpoint, .. } => Some(endpoint),
        }
    }

    /// Check if delivery was skipped entirely
    pub fn is_skipped(&self) -> bool {
        matches!(self, Dispatch::Skipped)
    }
}

/// Relays reports to a collector
#[derive(Clone)]
pub struct RemoteDelivery {
    fetch: Option<Arc<dyn FetchTransport>>,
}

impl RemoteDelivery {
    /// Beacon first, reqwest fallback
    pub fn new(config: &ProbeConfig) -> Self {
        let fetch = match HttpFetchTransport::new(config) {
            Ok(t) => Some(Arc::new(t) as Arc<dyn FetchTransport>),
            Err(e) => {
                tracing::warn!(error = %e, "HTTP transport unavailable; fallback delivery disabled");
                None
            }
        };
        Self { fetch }
    }

    /// Use a custom fallback transport
    pub fn with_transport(transport: Arc<dyn FetchTransport>) -> Self {
        Self {
            fetch: Some(transport),
        }
    }

    /// Beacon only
    pub fn beacon_only() -> Self {
        Self { fetch: None }
    }

    /// Resolve a target and send the report to it
    ///
    /// The HTTP fallback is spawned on the tokio runtime current at the call
    /// site. Called outside a runtime, a report the beacon did not take is
    /// [`Dispatch::Dropped`]; synchronous embedders whose host has no beacon
    /// must call this from within a runtime to get remote delivery.
    pub fn deliver(
        &self,
        host: &dyn HostEnvironment,
        report: &DiagnosticReport,
        config: &ProbeConfig,
    ) -> Dispatch {
        if !config.delivery_enabled {
            return Dispatch::Skipped;
        }

        let Some(target) = DeliveryTarget::resolve(&report.sources, config) else {
            tracing::debug!("No delivery endpoint configured");
            return Dispatch::Skipped;
        };

        let endpoint = match resolve(&target.endpoint, host.base_url().as_ref()) {
            Some(url) => url.to_string(),
            None => {
                return dropped(target.endpoint, "endpoint is not a valid URL");
            }
        };

        let payload = match report.to_json() {
            Ok(json) => Bytes::from(json),
            Err(e) => return dropped(endpoint, e.to_string()),
        };

        tracing::debug!(endpoint = %endpoint, origin = %target.origin, "Delivering report");

        match host.send_beacon(&endpoint, payload.clone(), REPORT_CONTENT_TYPE) {
            Ok(true) => return Dispatch::Beacon { endpoint },
            Ok(false) => tracing::debug!(endpoint = %endpoint, "Beacon refused; falling back to fetch"),
            Err(e) => tracing::debug!(endpoint = %endpoint, error = %e, "Beacon unavailable; falling back to fetch"),
        }

        let Some(fetch) = self.fetch.clone() else {
            return dropped(endpoint, "no fallback transport");
        };

        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => return dropped(endpoint, "no async runtime for fallback transport"),
        };

        let task_endpoint = endpoint.clone();
        let task = runtime.spawn(async move {
            if let Err(e) = fetch.post(&task_endpoint, payload).await {
                tracing::debug!(endpoint = %task_endpoint, error = %e, "Report delivery failed");
            }
        });

        Dispatch::Fetch { endpoint, task }
    }
}

fn dropped(endpoint: impl Into<String>, reason: impl Into<String>) -> Dispatch {
    let endpoint = endpoint.into();
    let reason = reason.into();
    tracing::warn!(endpoint = %endpoint, reason = %reason, "Report not delivered");
    Dispatch::Dropped { endpoint, reason }
}
