// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Report publishing and logging
//!
//! The published slot holds the latest report for the whole process. There
//! is one writer (the probe) and any number of readers. A later run replaces
//! the earlier report; no history is kept.

use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;

use super::DiagnosticReport;
use crate::error::HostError;
use crate::host::Console;

/// Well-known name of the published report
pub const REPORT_SLOT_NAME: &str = "__loaderDiag";

const FLAT_LABEL: &str = "[Loader diagnostics]";

lazy_static! {
    static ref PUBLISHED: RwLock<Option<Arc<DiagnosticReport>>> = RwLock::new(None);
}

/// Replace the published report
pub fn publish(report: Arc<DiagnosticReport>) {
    *PUBLISHED.write() = Some(report);
}

/// Latest published report
pub fn published_report() -> Option<Arc<DiagnosticReport>> {
    PUBLISHED.read().clone()
}

/// Drop the published report
pub fn clear_published() {
    *PUBLISHED.write() = None;
}

/// Log the report to `tracing` and, when given, to a host console
///
/// Console failures are never propagated. A failed grouped log is retried
/// once as a single flat entry; if that fails too it is dropped.
pub fn emit_log(report: &DiagnosticReport, console: Option<&dyn Console>) {
    let title = title(report);

    tracing::info!(
        slot = REPORT_SLOT_NAME,
        injection_type = %report.context.injection_type,
        chosen_source = %report.summary.chosen_source,
        embedded = report.context.embedding.is_embedded,
        "{}",
        title
    );
    tracing::debug!(context = ?report.context, "Context");
    tracing::debug!(sources = ?report.sources, "Sources");
    tracing::debug!(summary = ?report.summary, "Summary");

    let Some(console) = console else {
        return;
    };

    let grouped = if console.supports_groups() {
        log_grouped(report, &title, console)
    } else {
        log_flat(report, console)
    };

    if let Err(e) = grouped {
        tracing::debug!(error = %e, "Console logging degraded; falling back to a single entry");
        if let Err(e) = log_flat(report, console) {
            tracing::debug!(error = %e, "Console unusable; report not logged to console");
        }
    }
}

fn title(report: &DiagnosticReport) -> String {
    let mut title = format!(
        "Loader diagnostics \u{2192} {}",
        report.context.injection_type.label()
    );
    if let Some((kind, url)) = report.headline_url() {
        title.push_str(&format!(" ({}: {})", kind, url));
    }
    title
}

fn log_grouped(report: &DiagnosticReport, title: &str, console: &dyn Console) -> Result<(), HostError> {
    let context = to_payload(&report.context)?;
    let sources = to_payload(&report.sources)?;
    let summary = to_payload(&report.summary)?;

    console.group_collapsed(title)?;
    console.log("Context:", &context)?;
    console.log("Sources:", &sources)?;
    console.log("Summary:", &summary)?;
    console.group_end()
}

fn log_flat(report: &DiagnosticReport, console: &dyn Console) -> Result<(), HostError> {
    let payload = to_payload(report)?;
    console.log(FLAT_LABEL, &payload)
}

fn to_payload<T: serde::Serialize>(value: &T) -> Result<String, HostError> {
    serde_json::to_string(value).map_err(|e| HostError::failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::classify::InjectionType;
    use crate::embedding::EmbeddingContext;
    use crate::host::{CapturedConsole, ConsoleLevel, ScriptElement, SnapshotHost};
    use crate::sources::Sources;

    fn report() -> DiagnosticReport {
        let host = SnapshotHost::builder("https://app.example/").build();
        let tag = ScriptElement::external("https://cdn.example/l.js");
        DiagnosticReport::assemble(
            Utc::now(),
            EmbeddingContext {
                is_embedded: false,
                same_origin_as_outer: None,
            },
            InjectionType::Classic,
            Sources::collect(&host, Some(&tag), None),
        )
    }

    #[test]
    fn test_grouped_log() {
        let console = CapturedConsole::new();
        emit_log(&report(), Some(&console));

        let messages = console.messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0].level, ConsoleLevel::GroupStart);
        assert_eq!(
            messages[0].message,
            "Loader diagnostics \u{2192} classic <script> (src: https://cdn.example/l.js)"
        );
        assert!(messages[1].message.starts_with("Context: "));
        assert!(messages[2].message.starts_with("Sources: "));
        assert!(messages[3].message.starts_with("Summary: "));
        assert_eq!(messages[4].level, ConsoleLevel::GroupEnd);
    }

    #[test]
    fn test_console_without_groups_logs_flat() {
        let console = CapturedConsole::without_groups();
        emit_log(&report(), Some(&console));

        let messages = console.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].message.starts_with(FLAT_LABEL));
    }

    #[test]
    fn test_broken_groups_fall_back_to_flat() {
        let console = CapturedConsole::broken_groups();
        emit_log(&report(), Some(&console));

        let messages = console.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].message.starts_with(FLAT_LABEL));
    }

    #[test]
    fn test_broken_console_is_swallowed() {
        let console = CapturedConsole::broken();
        emit_log(&report(), Some(&console));
        assert!(console.messages().is_empty());
        emit_log(&report(), None);
    }
}
