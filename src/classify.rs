// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Injection-type classification

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::host::ScriptElement;

/// How the running script got into the document
///
/// `ModuleOrDynamic` deliberately covers both ES-module evaluation and plain
/// dynamic injection; nothing observable from inside separates the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InjectionType {
    /// Parser-inserted classic `<script>`
    Classic,
    /// `<script type="module">` with a live handle
    ModuleViaTag,
    /// No handle, but a location was found
    ModuleOrDynamic,
    /// No handle, location is a `blob:` URL
    ModuleOrDynamicOpaque,
    /// Inline eval, bookmarklet, extension...
    Unknown,
}

impl InjectionType {
    /// Classify from the script handle and the resolved execution location
    pub fn classify(script: Option<&ScriptElement>, execution_location: Option<&str>) -> Self {
        match (script, execution_location) {
            (Some(el), _) if el.kind().is_module() => InjectionType::ModuleViaTag,
            (Some(_), _) => InjectionType::Classic,
            (None, Some(url)) if is_blob(url) => InjectionType::ModuleOrDynamicOpaque,
            (None, Some(_)) => InjectionType::ModuleOrDynamic,
            (None, None) => InjectionType::Unknown,
        }
    }

    /// Human-readable label for logs
    pub fn label(&self) -> &'static str {
        match self {
            InjectionType::Classic => "classic <script>",
            InjectionType::ModuleViaTag => "module (via <script type=\"module\">)",
            InjectionType::ModuleOrDynamic => "module or dynamic import()",
            InjectionType::ModuleOrDynamicOpaque => "module/dynamic (blob URL)",
            InjectionType::Unknown => "unknown (inline/eval/extension)",
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            InjectionType::Classic => "classic",
            InjectionType::ModuleViaTag => "module-via-tag",
            InjectionType::ModuleOrDynamic => "module-or-dynamic",
            InjectionType::ModuleOrDynamicOpaque => "module-or-dynamic-opaque",
            InjectionType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InjectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_blob(url: &str) -> bool {
    url.get(..5)
        .map(|scheme| scheme.eq_ignore_ascii_case("blob:"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_tag_ignores_execution_location() {
        let tag = ScriptElement::external("https://cdn.example/m.js").with_type("module");
        assert_eq!(
            InjectionType::classify(Some(&tag), None),
            InjectionType::ModuleViaTag
        );
        assert_eq!(
            InjectionType::classify(Some(&tag), Some("blob:https://cdn.example/1")),
            InjectionType::ModuleViaTag
        );
    }

    #[test]
    fn test_classic_tag() {
        let tag = ScriptElement::external("https://cdn.example/c.js").with_type("text/javascript");
        assert_eq!(
            InjectionType::classify(Some(&tag), Some("https://cdn.example/c.js")),
            InjectionType::Classic
        );
        assert_eq!(
            InjectionType::classify(Some(&ScriptElement::inline()), None),
            InjectionType::Classic
        );
    }

    #[test]
    fn test_no_tag() {
        assert_eq!(
            InjectionType::classify(None, Some("blob:https://app.example/uuid")),
            InjectionType::ModuleOrDynamicOpaque
        );
        assert_eq!(
            InjectionType::classify(None, Some("https://cdn.example/m.js")),
            InjectionType::ModuleOrDynamic
        );
        assert_eq!(InjectionType::classify(None, None), InjectionType::Unknown);
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&InjectionType::ModuleOrDynamicOpaque).unwrap();
        assert_eq!(json, "\"module-or-dynamic-opaque\"");
        assert_eq!(InjectionType::ModuleViaTag.to_string(), "module-via-tag");
    }
}
