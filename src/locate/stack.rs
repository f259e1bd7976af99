// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Stack-trace scraping
//!
//! Stack formats differ per engine (`at fn (url:1:2)`, `fn@url:1:2`,
//! `url:1:2`), so the trace is treated as plain text and searched for
//! anything URL-shaped.

use lazy_static::lazy_static;
use regex::Regex;

use super::LocationStrategy;
use crate::error::HostError;
use crate::host::{HostEnvironment, STACK_PROBE_MARKER};

lazy_static! {
    static ref STACK_URL: Regex =
        Regex::new(r"(https?://[^\s\)\]]+|file://[^\s\)\]]+|blob:[^\s\)\]]+|data:[^\s\)\]]+)")
            .unwrap();
    static ref LINE_COL_SUFFIX: Regex = Regex::new(r":\d+(?::\d+)?(?:@\S+)?$").unwrap();
}

/// Remove a trailing `:line(:col)(@token)` suffix
pub fn strip_line_col(url: &str) -> &str {
    match LINE_COL_SUFFIX.find(url) {
        Some(m) => &url[..m.start()],
        None => url,
    }
}

/// Every URL-shaped substring in the trace, suffix-stripped, `data:` removed
pub fn stack_candidates(stack: &str) -> Vec<String> {
    STACK_URL
        .find_iter(stack)
        .map(|m| strip_line_col(m.as_str()))
        .filter(|u| !u.starts_with("data:"))
        .map(String::from)
        .collect()
}

/// Pick the executing unit's URL out of a stack trace
///
/// The first candidate that is not the document itself wins; if every
/// candidate is the document, the first one is returned anyway.
pub fn pick_from_stack(stack: &str, document_location: &str) -> Option<String> {
    let candidates = stack_candidates(stack);
    let document = document_location
        .split('#')
        .next()
        .unwrap_or(document_location);
    let document = strip_line_col(document);

    candidates
        .iter()
        .find(|c| strip_line_col(c) != document)
        .or_else(|| candidates.first())
        .cloned()
}

/// Forces a stack trace through the host and scrapes it
#[derive(Debug, Clone, Default)]
pub struct StackTraceStrategy;

impl LocationStrategy for StackTraceStrategy {
    fn name(&self) -> &'static str {
        "stackTrace"
    }

    fn locate(&self, host: &dyn HostEnvironment) -> Result<Option<String>, HostError> {
        let stack = host.capture_stack_trace(STACK_PROBE_MARKER)?;
        Ok(pick_from_stack(&stack, &host.location()))
    }
}
