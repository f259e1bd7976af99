// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # loadprobe - Script Loader Diagnostics
//!
//! Answers three questions from inside a running script, without help from
//! whoever injected it:
//!
//! - How was it loaded? Classic tag, module tag, dynamic import, blob URL,
//!   or nothing recognisable.
//! - Where can caller-supplied parameters come from? The loading tag, the
//!   script's own URL, the hosting document's URL.
//! - Which of those should be trusted?
//!
//! The answer is a [`DiagnosticReport`], published process-wide under
//! [`REPORT_SLOT_NAME`], logged, and optionally relayed to a collector.
//!
//! ## Features
//!
//! - Host abstraction: any document model behind [`HostEnvironment`]
//! - Pluggable execution-location strategies (current script, stack trace)
//! - Cross-origin aware embedding checks (`null` when blocked, never an error)
//! - Beacon-first delivery with a non-blocking HTTP fallback
//! - Page host: build a snapshot from a live HTML page
//!
//! ## Example
//!
//! ```rust
//! use loadprobe::{Probe, ProbeConfig, ScriptElement, SnapshotHost};
//!
//! let host = SnapshotHost::builder("https://app.example/page?theme=dark")
//!     .current_script(ScriptElement::external("https://cdn.example/loader.js?site=42"))
//!     .build();
//!
//! let outcome = Probe::new(ProbeConfig::silent()).run(&host);
//! assert_eq!(
//!     outcome.report.summary.parameters.search_param("site"),
//!     Some("42")
//! );
//! ```

pub mod classify;
pub mod config;
pub mod delivery;
pub mod embedding;
pub mod error;
pub mod host;
pub mod locate;
pub mod page;
pub mod params;
pub mod probe;
pub mod report;
pub mod sources;

// Re-exports for convenience

// Probe
pub use probe::{Probe, ProbeOutcome};
pub use config::{ProbeConfig, ENDPOINT_ENV_VAR};

// Host environment
pub use host::{
    BeaconBehavior, CapturedConsole, Console, ConsoleLevel, ConsoleMessage, FramePosition,
    HostEnvironment, ScriptElement, ScriptKind, SnapshotHost, SnapshotHostBuilder,
};

// Diagnostics
pub use classify::InjectionType;
pub use embedding::EmbeddingContext;
pub use locate::{CurrentScriptStrategy, ExecutionLocator, LocationStrategy, ResolvedLocation, StackTraceStrategy};
pub use params::{parse_params, ParameterSet};
pub use sources::{
    DocumentLocationSource, ExecutingLocationSource, PreferredSourceSelection, ScriptTagSource,
    SourceKind, Sources,
};

// Report
pub use report::{published_report, DiagnosticReport, ReportContext, REPORT_SLOT_NAME};

// Delivery
pub use delivery::{DeliveryTarget, Dispatch, FetchTransport, HttpFetchTransport, RemoteDelivery, TargetOrigin};

// Page host
pub use page::{LoadedPage, PageHostConfig, PageLoader};

// Errors
pub use error::{Error, ErrorContext, HostError, Result};

/// loadprobe version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
