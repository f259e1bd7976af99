// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Execution-location resolution
//!
//! Finds the URL of the currently running code unit with an ordered chain
//! of strategies:
//!
//! 1. the current script element's `src`
//! 2. URLs scraped from a forced stack trace
//!
//! The first strategy to produce a location wins. A strategy that errors is
//! skipped, and when none produces anything the location is simply absent.

mod stack;

use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::host::HostEnvironment;

pub use stack::{pick_from_stack, stack_candidates, strip_line_col, StackTraceStrategy};

/// One way of discovering the executing location
pub trait LocationStrategy: Send + Sync {
    /// Short name recorded in the report
    fn name(&self) -> &'static str;

    /// Try to locate the executing unit
    ///
    /// `Ok(None)` means "nothing found", errors mean "could not look".
    fn locate(&self, host: &dyn HostEnvironment) -> Result<Option<String>, HostError>;
}

/// Reads `document.currentScript.src`
#[derive(Debug, Clone, Default)]
pub struct CurrentScriptStrategy;

impl LocationStrategy for CurrentScriptStrategy {
    fn name(&self) -> &'static str {
        "currentScript"
    }

    fn locate(&self, host: &dyn HostEnvironment) -> Result<Option<String>, HostError> {
        Ok(host
            .current_script()
            .and_then(|s| s.location().map(String::from)))
    }
}

/// A resolved execution location and the strategy that found it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub url: String,
    pub strategy: String,
}

/// Ordered chain of location strategies
pub struct ExecutionLocator {
    strategies: Vec<Box<dyn LocationStrategy>>,
}

impl Default for ExecutionLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionLocator {
    /// The standard chain: current script, then stack trace
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(CurrentScriptStrategy),
                Box::new(StackTraceStrategy),
            ],
        }
    }

    /// A chain with no strategies
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Append a strategy to the end of the chain
    pub fn with_strategy(mut self, strategy: impl LocationStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Names of the strategies in order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the chain
    pub fn resolve(&self, host: &dyn HostEnvironment) -> Option<ResolvedLocation> {
        for strategy in &self.strategies {
            match strategy.locate(host) {
                Ok(Some(url)) if !url.is_empty() => {
                    tracing::debug!(strategy = strategy.name(), url = %url, "Execution location resolved");
                    return Some(ResolvedLocation {
                        url,
                        strategy: strategy.name().to_string(),
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(strategy = strategy.name(), error = %e, "Location strategy unavailable");
                }
            }
        }
        None
    }
}
