// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Preferred-source policy

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Sources;
use crate::params::ParameterSet;

/// One of the three candidate sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    Tag,
    ExecutingLocation,
    DocumentLocation,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Tag => "tag",
            SourceKind::ExecutingLocation => "executingLocation",
            SourceKind::DocumentLocation => "documentLocation",
        })
    }
}

const RATIONALE_EXECUTING: &str = "resolved as module/dynamic import; using execution location.";
const RATIONALE_TAG: &str = "classic script tag with a location; using its URL.";
const RATIONALE_DOCUMENT: &str = "last resort: using hosting document location.";

/// The source chosen for caller-supplied parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferredSourceSelection {
    pub chosen_source: SourceKind,
    pub parameters: ParameterSet,
    pub rationale: String,
}

impl PreferredSourceSelection {
    /// Apply the policy
    ///
    /// Execution location beats the tag, the tag beats the document. The
    /// document is always present, so this always chooses.
    pub fn resolve(sources: &Sources) -> Self {
        let (chosen_source, rationale) = if sources.executing_location.present {
            (SourceKind::ExecutingLocation, RATIONALE_EXECUTING)
        } else if sources.tag.present {
            (SourceKind::Tag, RATIONALE_TAG)
        } else {
            (SourceKind::DocumentLocation, RATIONALE_DOCUMENT)
        };

        Self {
            chosen_source,
            parameters: sources.params(chosen_source).clone(),
            rationale: rationale.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ScriptElement, SnapshotHost};
    use crate::locate::ResolvedLocation;

    const DOC: &str = "https://app.example/page?theme=dark#x=1";

    fn exec(url: &str) -> ResolvedLocation {
        ResolvedLocation {
            url: url.to_string(),
            strategy: "stackTrace".to_string(),
        }
    }

    #[test]
    fn test_execution_location_beats_tag() {
        let host = SnapshotHost::builder(DOC).build();
        let tag = ScriptElement::external("https://cdn.example/a.js?from=tag");
        let loc = exec("https://cdn.example/b.js?from=exec");
        let sources = Sources::collect(&host, Some(&tag), Some(&loc));

        let selection = PreferredSourceSelection::resolve(&sources);
        assert_eq!(selection.chosen_source, SourceKind::ExecutingLocation);
        assert_eq!(selection.parameters.search_param("from"), Some("exec"));
        assert_eq!(selection.rationale, RATIONALE_EXECUTING);
    }

    #[test]
    fn test_tag_when_no_execution_location() {
        let host = SnapshotHost::builder(DOC).build();
        let tag = ScriptElement::external("https://cdn.example/a.js?from=tag");
        let sources = Sources::collect(&host, Some(&tag), None);

        let selection = PreferredSourceSelection::resolve(&sources);
        assert_eq!(selection.chosen_source, SourceKind::Tag);
        assert_eq!(selection.parameters.search_param("from"), Some("tag"));
    }

    #[test]
    fn test_document_last_resort() {
        let host = SnapshotHost::builder(DOC).build();
        let inline = ScriptElement::inline();
        let sources = Sources::collect(&host, Some(&inline), None);

        let selection = PreferredSourceSelection::resolve(&sources);
        assert_eq!(selection.chosen_source, SourceKind::DocumentLocation);
        assert_eq!(selection.parameters.search_param("theme"), Some("dark"));
        assert_eq!(selection.parameters.hash_param("x"), Some("1"));
        assert_eq!(selection.rationale, RATIONALE_DOCUMENT);
    }

    #[test]
    fn test_document_chosen_even_when_unparseable() {
        let host = SnapshotHost::builder("about:blank").build();
        let sources = Sources::collect(&host, None, None);
        let selection = PreferredSourceSelection::resolve(&sources);
        assert_eq!(selection.chosen_source, SourceKind::DocumentLocation);
        assert!(selection.parameters.search.is_empty());
    }

    #[test]
    fn test_source_kind_names() {
        assert_eq!(
            serde_json::to_string(&SourceKind::ExecutingLocation).unwrap(),
            "\"executingLocation\""
        );
        assert_eq!(SourceKind::DocumentLocation.to_string(), "documentLocation");
    }
}
