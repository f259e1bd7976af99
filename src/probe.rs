// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Probe entry point
//!
//! One [`Probe::run`] is one load of the diagnostic script: locate, inspect,
//! classify, collect sources, assemble, publish, log, deliver. The run is
//! synchronous and infallible; the only thing left behind is an optional
//! delivery task on the tokio runtime.

use std::sync::Arc;

use chrono::Utc;

use crate::classify::InjectionType;
use crate::config::ProbeConfig;
use crate::delivery::{Dispatch, RemoteDelivery};
use crate::embedding::EmbeddingContext;
use crate::host::HostEnvironment;
use crate::locate::ExecutionLocator;
use crate::report::{self, DiagnosticReport};
use crate::sources::Sources;

/// Result of one probe run
#[derive(Debug)]
pub struct ProbeOutcome {
    /// The published report
    pub report: Arc<DiagnosticReport>,
    /// What happened to remote delivery
    pub dispatch: Dispatch,
}

/// The loader diagnostic
pub struct Probe {
    config: ProbeConfig,
    locator: ExecutionLocator,
    delivery: RemoteDelivery,
}

impl Default for Probe {
    fn default() -> Self {
        Self::new(ProbeConfig::default())
    }
}

impl Probe {
    /// Create a probe with the standard locator and HTTP fallback
    pub fn new(config: ProbeConfig) -> Self {
        let delivery = RemoteDelivery::new(&config);
        Self {
            config,
            locator: ExecutionLocator::new(),
            delivery,
        }
    }

    /// Replace the location strategy chain
    pub fn with_locator(mut self, locator: ExecutionLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Replace the delivery component
    pub fn with_delivery(mut self, delivery: RemoteDelivery) -> Self {
        self.delivery = delivery;
        self
    }

    /// Get probe configuration
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Diagnose without publishing, logging or delivering
    pub fn diagnose(&self, host: &dyn HostEnvironment) -> DiagnosticReport {
        let script = host.current_script();
        let execution = self.locator.resolve(host);
        let embedding = EmbeddingContext::inspect(host);
        let injection_type = InjectionType::classify(
            script.as_ref(),
            execution.as_ref().map(|l| l.url.as_str()),
        );
        let sources = Sources::collect(host, script.as_ref(), execution.as_ref());

        DiagnosticReport::assemble(Utc::now(), embedding, injection_type, sources)
    }

    /// Full run: diagnose, publish, log, deliver
    pub fn run(&self, host: &dyn HostEnvironment) -> ProbeOutcome {
        let report = Arc::new(self.diagnose(host));

        report::publish(report.clone());

        let console = if self.config.console_logging {
            host.console()
        } else {
            None
        };
        report::emit_log(&report, console);

        let dispatch = self.delivery.deliver(host, &report, &self.config);

        ProbeOutcome { report, dispatch }
    }
}
