// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Diagnostic report
//!
//! A [`DiagnosticReport`] is assembled once per probe run and shared as an
//! `Arc`; nothing mutates it after assembly.

mod emit;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::InjectionType;
use crate::embedding::EmbeddingContext;
use crate::error::Result;
use crate::sources::{PreferredSourceSelection, Sources};

pub use emit::{clear_published, emit_log, publish, published_report, REPORT_SLOT_NAME};

/// When and where the probe ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportContext {
    pub timestamp: DateTime<Utc>,
    pub embedding: EmbeddingContext,
    pub injection_type: InjectionType,
}

/// Complete probe output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub context: ReportContext,
    pub sources: Sources,
    pub summary: PreferredSourceSelection,
}

impl DiagnosticReport {
    /// Assemble a report, resolving the preferred source
    pub fn assemble(
        timestamp: DateTime<Utc>,
        embedding: EmbeddingContext,
        injection_type: InjectionType,
        sources: Sources,
    ) -> Self {
        let summary = PreferredSourceSelection::resolve(&sources);
        Self {
            context: ReportContext {
                timestamp: timestamp.trunc_subsecs(3),
                embedding,
                injection_type,
            },
            sources,
            summary,
        }
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a report back from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The URL most worth showing next to the classification
    pub fn headline_url(&self) -> Option<(&'static str, &str)> {
        if let Some(url) = self.sources.executing_location.url.as_deref() {
            Some(("exec", url))
        } else {
            self.sources.tag.src.as_deref().map(|src| ("src", src))
        }
    }
}
