// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Delivery target resolution

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ProbeConfig;
use crate::sources::Sources;

/// Where a delivery endpoint came from, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetOrigin {
    /// `data-log-endpoint` on the loading tag
    TagDataset,
    /// `?logEndpoint=` on the tag's `src`
    TagParameter,
    /// `?logEndpoint=` on the execution location
    ExecutionParameter,
    /// Process-wide configuration
    Ambient,
}

impl fmt::Display for TargetOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetOrigin::TagDataset => "tag dataset",
            TargetOrigin::TagParameter => "tag parameter",
            TargetOrigin::ExecutionParameter => "execution parameter",
            TargetOrigin::Ambient => "ambient configuration",
        })
    }
}

/// A resolved collector endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryTarget {
    pub endpoint: String,
    pub origin: TargetOrigin,
}

impl DeliveryTarget {
    /// First non-empty endpoint in priority order, if any
    pub fn resolve(sources: &Sources, config: &ProbeConfig) -> Option<Self> {
        let candidates = [
            (
                TargetOrigin::TagDataset,
                sources.tag.dataset.get(&config.endpoint_dataset_key).map(String::as_str),
            ),
            (
                TargetOrigin::TagParameter,
                sources.tag.params.search_param(&config.endpoint_param),
            ),
            (
                TargetOrigin::ExecutionParameter,
                sources.executing_location.params.search_param(&config.endpoint_param),
            ),
            (TargetOrigin::Ambient, config.ambient_endpoint.as_deref()),
        ];

        candidates.into_iter().find_map(|(origin, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|endpoint| DeliveryTarget {
                    endpoint: endpoint.to_string(),
                    origin,
                })
        })
    }
}
