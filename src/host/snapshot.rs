// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Snapshot host - a frozen description of a document
//!
//! Used by the CLI, by the page loader, and throughout the tests to put the
//! probe into any loading situation without a real browser.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use super::console::{CapturedConsole, Console};
use super::script::ScriptElement;
use super::{origin_of, HostEnvironment};
use crate::error::{HostError, Result};

/// Where the document sits in the frame hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FramePosition {
    /// Not embedded
    #[default]
    TopLevel,
    /// Embedded; `top_location` is `None` when reading it is blocked
    Nested { top_location: Option<String> },
    /// Even the top-level window reference is blocked
    Opaque,
}

/// How the snapshot's beacon primitive behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BeaconBehavior {
    /// `navigator.sendBeacon` does not exist
    #[default]
    Unavailable,
    /// Queues every payload
    Accept,
    /// Returns `false`
    Reject,
    /// Throws
    Fail,
}

/// A beacon the snapshot accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconRecord {
    pub endpoint: String,
    pub content_type: String,
    pub payload: Bytes,
}

/// Frozen host environment
#[derive(Debug, Clone)]
pub struct SnapshotHost {
    location: String,
    base_uri: Option<String>,
    current_script: Option<ScriptElement>,
    stack_trace: Option<String>,
    frame: FramePosition,
    console: Option<CapturedConsole>,
    beacon: BeaconBehavior,
    beacons: Arc<RwLock<Vec<BeaconRecord>>>,
}

impl SnapshotHost {
    /// Start building a snapshot of the document at `location`
    pub fn builder(location: impl Into<String>) -> SnapshotHostBuilder {
        SnapshotHostBuilder::new(location)
    }

    /// Beacons accepted so far
    pub fn beacons(&self) -> Vec<BeaconRecord> {
        self.beacons.read().clone()
    }

    /// The captured console, if one was attached
    pub fn captured_console(&self) -> Option<&CapturedConsole> {
        self.console.as_ref()
    }
}

impl HostEnvironment for SnapshotHost {
    fn current_script(&self) -> Option<ScriptElement> {
        self.current_script.clone()
    }

    fn location(&self) -> String {
        self.location.clone()
    }

    fn base_uri(&self) -> Option<String> {
        self.base_uri.clone()
    }

    fn is_top_level(&self) -> std::result::Result<bool, HostError> {
        match self.frame {
            FramePosition::TopLevel => Ok(true),
            FramePosition::Nested { .. } => Ok(false),
            FramePosition::Opaque => Err(HostError::denied("window.top")),
        }
    }

    fn top_origin(&self) -> std::result::Result<String, HostError> {
        match &self.frame {
            FramePosition::TopLevel => self.origin(),
            FramePosition::Nested {
                top_location: Some(top),
            } => origin_of(top).ok_or_else(|| HostError::failed("top location has no origin")),
            FramePosition::Nested { top_location: None } => {
                Err(HostError::denied("window.top.location"))
            }
            FramePosition::Opaque => Err(HostError::denied("window.top")),
        }
    }

    fn capture_stack_trace(&self, marker: &str) -> std::result::Result<String, HostError> {
        match &self.stack_trace {
            Some(frames) => Ok(format!("Error: {}\n{}", marker, frames)),
            None => Err(HostError::unavailable("Error.prototype.stack")),
        }
    }

    fn console(&self) -> Option<&dyn Console> {
        self.console.as_ref().map(|c| c as &dyn Console)
    }

    fn send_beacon(
        &self,
        endpoint: &str,
        payload: Bytes,
        content_type: &str,
    ) -> std::result::Result<bool, HostError> {
        match self.beacon {
            BeaconBehavior::Unavailable => Err(HostError::unavailable("navigator.sendBeacon")),
            BeaconBehavior::Fail => Err(HostError::failed("navigator.sendBeacon")),
            BeaconBehavior::Reject => Ok(false),
            BeaconBehavior::Accept => {
                self.beacons.write().push(BeaconRecord {
                    endpoint: endpoint.to_string(),
                    content_type: content_type.to_string(),
                    payload,
                });
                Ok(true)
            }
        }
    }
}

/// Builder for [`SnapshotHost`]
#[derive(Debug, Clone)]
pub struct SnapshotHostBuilder {
    host: SnapshotHost,
}

impl SnapshotHostBuilder {
    /// Create a new builder
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            host: SnapshotHost {
                location: location.into(),
                base_uri: None,
                current_script: None,
                stack_trace: None,
                frame: FramePosition::TopLevel,
                console: None,
                beacon: BeaconBehavior::Unavailable,
                beacons: Arc::new(RwLock::new(Vec::new())),
            },
        }
    }

    /// Set the document base URI
    pub fn base_uri(mut self, base: impl Into<String>) -> Self {
        self.host.base_uri = Some(base.into());
        self
    }

    /// Set the current script element
    pub fn current_script(mut self, script: ScriptElement) -> Self {
        self.host.current_script = Some(script);
        self
    }

    /// Set the stack frames returned by a forced trace
    pub fn stack_trace(mut self, frames: impl Into<String>) -> Self {
        self.host.stack_trace = Some(frames.into());
        self
    }

    /// Load the stack frames from a file
    pub fn stack_trace_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let frames = std::fs::read_to_string(path)?;
        Ok(self.stack_trace(frames))
    }

    /// Set the frame position
    pub fn frame(mut self, frame: FramePosition) -> Self {
        self.host.frame = frame;
        self
    }

    /// Embed under a top-level document at `top_location`
    pub fn nested_in(self, top_location: impl Into<String>) -> Self {
        self.frame(FramePosition::Nested {
            top_location: Some(top_location.into()),
        })
    }

    /// Attach a console
    pub fn console(mut self, console: CapturedConsole) -> Self {
        self.host.console = Some(console);
        self
    }

    /// Set beacon behavior
    pub fn beacon(mut self, behavior: BeaconBehavior) -> Self {
        self.host.beacon = behavior;
        self
    }

    /// Finish building
    pub fn build(self) -> SnapshotHost {
        self.host
    }
}
