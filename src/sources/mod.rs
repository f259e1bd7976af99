// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Candidate parameter sources
//!
//! Three places can carry caller-supplied parameters: the loading tag, the
//! executing unit's own URL, and the hosting document's URL. Each is parsed
//! independently; a parse failure in one never affects the others.

mod priority;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::host::{HostEnvironment, ScriptElement};
use crate::locate::ResolvedLocation;
use crate::params::{parse_params, ParameterSet};

pub use priority::{PreferredSourceSelection, SourceKind};

/// Parameters from the loading `<script>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptTagSource {
    /// A handle exists and it has a `src`
    pub present: bool,
    pub src: Option<String>,
    /// Raw `type`, `classic` when unset
    #[serde(rename = "type")]
    pub script_type: String,
    /// Flags are `None` when there is no handle at all
    #[serde(rename = "async")]
    pub is_async: Option<bool>,
    pub defer: Option<bool>,
    pub no_module: Option<bool>,
    pub dataset: BTreeMap<String, String>,
    pub params: ParameterSet,
}

impl ScriptTagSource {
    /// Build from an optional handle
    pub fn from_element(element: Option<&ScriptElement>, base: Option<&Url>) -> Self {
        let Some(el) = element else {
            return Self {
                present: false,
                src: None,
                script_type: "classic".to_string(),
                is_async: None,
                defer: None,
                no_module: None,
                dataset: BTreeMap::new(),
                params: ParameterSet::empty(),
            };
        };

        let src = el.location().map(String::from);
        Self {
            present: src.is_some(),
            params: src
                .as_deref()
                .map(|s| parse_params(s, base))
                .unwrap_or_default(),
            src,
            script_type: el
                .script_type
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "classic".to_string()),
            is_async: Some(el.is_async),
            defer: Some(el.is_defer),
            no_module: Some(el.no_module),
            dataset: el.dataset(),
        }
    }
}

/// Parameters from the resolved execution location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutingLocationSource {
    pub present: bool,
    pub url: Option<String>,
    /// Strategy that found the location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    pub params: ParameterSet,
}

impl ExecutingLocationSource {
    /// Build from the locator's result
    pub fn from_resolved(resolved: Option<&ResolvedLocation>, base: Option<&Url>) -> Self {
        match resolved {
            Some(loc) => Self {
                present: true,
                url: Some(loc.url.clone()),
                resolved_by: Some(loc.strategy.clone()),
                params: parse_params(&loc.url, base),
            },
            None => Self {
                present: false,
                url: None,
                resolved_by: None,
                params: ParameterSet::empty(),
            },
        }
    }
}

/// Parameters from the hosting document's URL; always present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLocationSource {
    pub href: String,
    pub params: ParameterSet,
}

impl DocumentLocationSource {
    pub fn from_location(href: impl Into<String>, base: Option<&Url>) -> Self {
        let href = href.into();
        Self {
            params: parse_params(&href, base),
            href,
        }
    }
}

/// All three candidate sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sources {
    pub tag: ScriptTagSource,
    pub executing_location: ExecutingLocationSource,
    pub document_location: DocumentLocationSource,
}

impl Sources {
    /// Gather every source from the host and the locator's result
    pub fn collect(
        host: &dyn HostEnvironment,
        script: Option<&ScriptElement>,
        execution: Option<&ResolvedLocation>,
    ) -> Self {
        let base = host.base_url();
        Self {
            tag: ScriptTagSource::from_element(script, base.as_ref()),
            executing_location: ExecutingLocationSource::from_resolved(execution, base.as_ref()),
            document_location: DocumentLocationSource::from_location(host.location(), base.as_ref()),
        }
    }

    /// Parameters of one source
    pub fn params(&self, kind: SourceKind) -> &ParameterSet {
        match kind {
            SourceKind::Tag => &self.tag.params,
            SourceKind::ExecutingLocation => &self.executing_location.params,
            SourceKind::DocumentLocation => &self.document_location.params,
        }
    }
}
