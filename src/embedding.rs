// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Embedding-context inspection

use serde::{Deserialize, Serialize};

use crate::host::HostEnvironment;

/// Frame nesting of the hosting document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingContext {
    /// Running inside a frame
    pub is_embedded: bool,
    /// `None` when not embedded or when the comparison was blocked
    pub same_origin_as_outer: Option<bool>,
}

impl EmbeddingContext {
    /// Inspect the host
    pub fn inspect(host: &dyn HostEnvironment) -> Self {
        let is_embedded = is_embedded(host);
        let same_origin_as_outer = if is_embedded {
            same_origin_as_outer(host)
        } else {
            None
        };

        Self {
            is_embedded,
            same_origin_as_outer,
        }
    }
}

/// Not top-level, or not allowed to ask
fn is_embedded(host: &dyn HostEnvironment) -> bool {
    match host.is_top_level() {
        Ok(top) => !top,
        Err(e) => {
            tracing::debug!(error = %e, "Top-level window check blocked; assuming embedded");
            true
        }
    }
}

fn same_origin_as_outer(host: &dyn HostEnvironment) -> Option<bool> {
    let top = host.top_origin().ok()?;
    let own = host.origin().ok()?;
    Some(top == own)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FramePosition, SnapshotHost};

    #[test]
    fn test_top_level() {
        let host = SnapshotHost::builder("https://app.example/").build();
        let ctx = EmbeddingContext::inspect(&host);
        assert!(!ctx.is_embedded);
        assert_eq!(ctx.same_origin_as_outer, None);
    }

    #[test]
    fn test_same_origin_frame() {
        let host = SnapshotHost::builder("https://app.example/frame.html")
            .nested_in("https://app.example/outer")
            .build();
        let ctx = EmbeddingContext::inspect(&host);
        assert!(ctx.is_embedded);
        assert_eq!(ctx.same_origin_as_outer, Some(true));
    }

    #[test]
    fn test_cross_origin_frame_readable() {
        let host = SnapshotHost::builder("https://widget.example/frame.html")
            .nested_in("https://app.example/outer")
            .build();
        assert_eq!(EmbeddingContext::inspect(&host).same_origin_as_outer, Some(false));
    }

    #[test]
    fn test_blocked_top_location_is_unknown() {
        let host = SnapshotHost::builder("https://widget.example/frame.html")
            .frame(FramePosition::Nested { top_location: None })
            .build();
        let ctx = EmbeddingContext::inspect(&host);
        assert!(ctx.is_embedded);
        assert_eq!(ctx.same_origin_as_outer, None);
    }

    #[test]
    fn test_blocked_top_reference_means_embedded() {
        let host = SnapshotHost::builder("https://widget.example/frame.html")
            .frame(FramePosition::Opaque)
            .build();
        let ctx = EmbeddingContext::inspect(&host);
        assert!(ctx.is_embedded);
        assert_eq!(ctx.same_origin_as_outer, None);
    }

    #[test]
    fn test_serializes_unknown_as_null() {
        let ctx = EmbeddingContext {
            is_embedded: true,
            same_origin_as_outer: None,
        };
        let json = serde_json::to_value(ctx).unwrap();
        assert_eq!(json["isEmbedded"], true);
        assert!(json["sameOriginAsOuter"].is_null());
    }
}
