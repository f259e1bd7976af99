// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Host environment abstraction
//!
//! The probe never touches a document directly. Everything it learns about
//! where it runs comes through [`HostEnvironment`], and every question the
//! host may refuse returns a [`HostError`].

mod console;
mod script;
mod snapshot;

use bytes::Bytes;
use url::Url;

use crate::error::HostError;

pub use console::{CapturedConsole, Console, ConsoleLevel, ConsoleMessage};
pub use script::{ScriptElement, ScriptKind};
pub use snapshot::{BeaconBehavior, BeaconRecord, FramePosition, SnapshotHost, SnapshotHostBuilder};

/// Marker message used when forcing a stack trace
pub const STACK_PROBE_MARKER: &str = "diag_probing_stack";

/// The hosting document as seen from inside a running script
pub trait HostEnvironment {
    /// Element of the synchronously-loaded, parser-inserted script, if any
    fn current_script(&self) -> Option<ScriptElement>;

    /// Full location of the hosting document, fragment included
    fn location(&self) -> String;

    /// Document base URI, when it differs from the location
    fn base_uri(&self) -> Option<String> {
        None
    }

    /// Origin of the current window
    fn origin(&self) -> Result<String, HostError> {
        origin_of(&self.location())
            .ok_or_else(|| HostError::failed("document location has no origin"))
    }

    /// Whether the current window is its own top-level window
    fn is_top_level(&self) -> Result<bool, HostError>;

    /// Origin of the top-level window
    fn top_origin(&self) -> Result<String, HostError>;

    /// Capture the current call stack as unstructured text
    fn capture_stack_trace(&self, marker: &str) -> Result<String, HostError>;

    /// Console surface, absent when the host has none
    fn console(&self) -> Option<&dyn Console> {
        None
    }

    /// Queue a non-blocking, unload-safe POST
    ///
    /// `Ok(false)` means the user agent refused to queue the payload.
    fn send_beacon(&self, endpoint: &str, payload: Bytes, content_type: &str) -> Result<bool, HostError> {
        let _ = (endpoint, payload, content_type);
        Err(HostError::unavailable("sendBeacon"))
    }

    /// Base URL for resolving relative locations
    fn base_url(&self) -> Option<Url> {
        self.base_uri()
            .and_then(|b| Url::parse(&b).ok())
            .or_else(|| Url::parse(&self.location()).ok())
    }
}

/// ASCII serialization of a URL's origin, `None` for opaque origins
pub fn origin_of(location: &str) -> Option<String> {
    let url = Url::parse(location).ok()?;
    let origin = url.origin();
    if origin.is_tuple() {
        Some(origin.ascii_serialization())
    } else {
        None
    }
}
