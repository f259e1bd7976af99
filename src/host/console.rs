// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Console surface of a host environment

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::HostError;

/// Console-style logging surface
///
/// Every call may fail; a degraded or polyfilled console is normal.
pub trait Console {
    /// Whether `group_collapsed`/`group_end` exist at all
    fn supports_groups(&self) -> bool {
        true
    }

    /// Open a collapsed group
    fn group_collapsed(&self, title: &str) -> Result<(), HostError>;

    /// Log a labelled payload
    fn log(&self, label: &str, payload: &str) -> Result<(), HostError>;

    /// Close the current group
    fn group_end(&self) -> Result<(), HostError>;
}

/// Console log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Log,
    GroupStart,
    GroupEnd,
}

/// Console message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
    /// Nesting depth when the message was written
    pub depth: usize,
}

/// In-memory console that records everything written to it
#[derive(Debug, Clone, Default)]
pub struct CapturedConsole {
    messages: Arc<RwLock<Vec<ConsoleMessage>>>,
    depth: Arc<RwLock<usize>>,
    groups: bool,
    fail_groups: bool,
    fail_all: bool,
}

impl CapturedConsole {
    /// Create a fully working console
    pub fn new() -> Self {
        Self {
            groups: true,
            ..Default::default()
        }
    }

    /// Console without group support
    pub fn without_groups() -> Self {
        Self::default()
    }

    /// Console whose group calls throw
    pub fn broken_groups() -> Self {
        Self {
            groups: true,
            fail_groups: true,
            ..Default::default()
        }
    }

    /// Console where every call throws
    pub fn broken() -> Self {
        Self {
            groups: true,
            fail_groups: true,
            fail_all: true,
            ..Default::default()
        }
    }

    /// Messages written so far
    pub fn messages(&self) -> Vec<ConsoleMessage> {
        self.messages.read().clone()
    }

    /// Clear captured messages
    pub fn clear(&self) {
        self.messages.write().clear();
        *self.depth.write() = 0;
    }

    fn push(&self, level: ConsoleLevel, message: String) {
        let depth = *self.depth.read();
        self.messages.write().push(ConsoleMessage {
            level,
            message,
            depth,
        });
    }
}

impl Console for CapturedConsole {
    fn supports_groups(&self) -> bool {
        self.groups
    }

    fn group_collapsed(&self, title: &str) -> Result<(), HostError> {
        if self.fail_groups || !self.groups {
            return Err(HostError::failed("console.groupCollapsed"));
        }
        self.push(ConsoleLevel::GroupStart, title.to_string());
        *self.depth.write() += 1;
        Ok(())
    }

    fn log(&self, label: &str, payload: &str) -> Result<(), HostError> {
        if self.fail_all {
            return Err(HostError::failed("console.log"));
        }
        self.push(ConsoleLevel::Log, format!("{} {}", label, payload));
        Ok(())
    }

    fn group_end(&self) -> Result<(), HostError> {
        if self.fail_groups || !self.groups {
            return Err(HostError::failed("console.groupEnd"));
        }
        {
            let mut depth = self.depth.write();
            *depth = depth.saturating_sub(1);
        }
        self.push(ConsoleLevel::GroupEnd, String::new());
        Ok(())
    }
}
