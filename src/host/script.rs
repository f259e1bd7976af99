// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Script element handle

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Declared kind of a `<script>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKind {
    /// No type, empty type, or a JavaScript MIME type
    Classic,
    /// `type="module"`
    Module,
    /// Anything else (`importmap`, `text/template`, ...)
    Other(String),
}

impl ScriptKind {
    /// Interpret a `type` attribute value
    pub fn from_type_attr(value: Option<&str>) -> Self {
        let value = match value.map(str::trim) {
            None | Some("") => return ScriptKind::Classic,
            Some(v) => v,
        };

        let lower = value.to_ascii_lowercase();
        if lower == "module" {
            return ScriptKind::Module;
        }

        let essence = lower.split(';').next().unwrap_or("").trim();
        if JS_MIME_TYPES.contains(&essence) {
            ScriptKind::Classic
        } else {
            ScriptKind::Other(value.to_string())
        }
    }

    /// Check if this is a module script
    pub fn is_module(&self) -> bool {
        matches!(self, ScriptKind::Module)
    }

    /// Name as reported in diagnostics
    pub fn as_str(&self) -> &str {
        match self {
            ScriptKind::Classic => "classic",
            ScriptKind::Module => "module",
            ScriptKind::Other(t) => t,
        }
    }
}

const JS_MIME_TYPES: &[&str] = &[
    "text/javascript",
    "application/javascript",
    "application/ecmascript",
    "application/x-ecmascript",
    "application/x-javascript",
    "text/ecmascript",
    "text/jscript",
    "text/livescript",
    "text/x-ecmascript",
    "text/x-javascript",
];

/// The element that synchronously loaded the running script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptElement {
    /// Resolved `src`, absent for inline scripts
    pub src: Option<String>,
    /// Raw `type` attribute
    pub script_type: Option<String>,
    /// `async` attribute present
    pub is_async: bool,
    /// `defer` attribute present
    pub is_defer: bool,
    /// `nomodule` attribute present
    pub no_module: bool,
    /// All attributes as written
    pub attributes: HashMap<String, String>,
}

impl ScriptElement {
    /// Create an external script handle
    pub fn external(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Default::default()
        }
    }

    /// Create an inline script handle
    pub fn inline() -> Self {
        Self::default()
    }

    /// Set the `type` attribute
    pub fn with_type(mut self, script_type: impl Into<String>) -> Self {
        let script_type = script_type.into();
        self.attributes.insert("type".to_string(), script_type.clone());
        self.script_type = Some(script_type);
        self
    }

    /// Set an arbitrary attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match name.as_str() {
            "async" => self.is_async = true,
            "defer" => self.is_defer = true,
            "nomodule" => self.no_module = true,
            "type" => self.script_type = Some(value.clone()),
            _ => {}
        }
        self.attributes.insert(name, value);
        self
    }

    /// Build from a raw attribute map, `src` resolved by the caller
    pub fn from_attributes(attributes: HashMap<String, String>, resolved_src: Option<String>) -> Self {
        let mut element = Self {
            src: resolved_src,
            ..Default::default()
        };
        for (name, value) in attributes {
            element = element.with_attribute(name, value);
        }
        element
    }

    /// Declared kind
    pub fn kind(&self) -> ScriptKind {
        ScriptKind::from_type_attr(self.script_type.as_deref())
    }

    /// Non-empty `src`
    pub fn location(&self) -> Option<&str> {
        self.src.as_deref().filter(|s| !s.is_empty())
    }

    /// `data-*` attributes keyed the way `HTMLElement.dataset` keys them
    pub fn dataset(&self) -> BTreeMap<String, String> {
        self.attributes
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix("data-")
                    .map(|rest| (dataset_key(rest), value.clone()))
            })
            .collect()
    }
}

/// `log-endpoint` -> `logEndpoint`
fn dataset_key(attr: &str) -> String {
    let mut key = String::with_capacity(attr.len());
    let mut upper_next = false;
    for c in attr.chars() {
        if c == '-' {
            if upper_next {
                key.push('-');
            }
            upper_next = true;
        } else if upper_next && c.is_ascii_lowercase() {
            key.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            if upper_next {
                key.push('-');
                upper_next = false;
            }
            key.push(c);
        }
    }
    if upper_next {
        key.push('-');
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_kind() {
        assert_eq!(ScriptKind::from_type_attr(None), ScriptKind::Classic);
        assert_eq!(ScriptKind::from_type_attr(Some("")), ScriptKind::Classic);
        assert_eq!(
            ScriptKind::from_type_attr(Some("text/javascript; charset=utf-8")),
            ScriptKind::Classic
        );
        assert_eq!(ScriptKind::from_type_attr(Some("MODULE")), ScriptKind::Module);
        assert_eq!(
            ScriptKind::from_type_attr(Some("importmap")),
            ScriptKind::Other("importmap".to_string())
        );
    }

    #[test]
    fn test_dataset_keys() {
        let el = ScriptElement::external("https://cdn.example/loader.js")
            .with_attribute("data-log-endpoint", "https://collect.example/diag")
            .with_attribute("data-x", "1")
            .with_attribute("data-foo-1", "a")
            .with_attribute("data-a--b", "2")
            .with_attribute("data-trail-", "3")
            .with_attribute("id", "loader");

        let dataset = el.dataset();
        assert_eq!(
            dataset.get("logEndpoint").map(String::as_str),
            Some("https://collect.example/diag")
        );
        assert_eq!(dataset.get("x").map(String::as_str), Some("1"));
        assert_eq!(dataset.get("foo-1").map(String::as_str), Some("a"));
        assert_eq!(dataset.get("a-B").map(String::as_str), Some("2"));
        assert_eq!(dataset.get("trail-").map(String::as_str), Some("3"));
        assert!(!dataset.contains_key("id"));
    }

    #[test]
    fn test_boolean_attributes() {
        let el = ScriptElement::external("a.js")
            .with_attribute("ASYNC", "")
            .with_attribute("nomodule", "");
        assert!(el.is_async);
        assert!(el.no_module);
        assert!(!el.is_defer);
    }

    #[test]
    fn test_empty_src_has_no_location() {
        let el = ScriptElement {
            src: Some(String::new()),
            ..Default::default()
        };
        assert!(el.location().is_none());
        assert!(ScriptElement::inline().location().is_none());
    }
}
