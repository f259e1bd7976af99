// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTML scanning using html5ever

use std::collections::HashMap;

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::Result;

/// Elements of interest found in a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedDocument {
    /// First `<base href>`, unresolved
    pub base_href: Option<String>,
    /// Attributes of every `<script>`, in document order
    pub scripts: Vec<HashMap<String, String>>,
}

/// Parse HTML and collect `<base>` and `<script>` elements
pub fn scan_html(html: &str) -> Result<ScannedDocument> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            drop_doctype: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())?;

    let mut scanned = ScannedDocument::default();
    walk(&dom.document, &mut scanned);
    Ok(scanned)
}

fn walk(handle: &Handle, scanned: &mut ScannedDocument) {
    if let NodeData::Element {
        ref name,
        ref attrs,
        ..
    } = handle.data
    {
        let tag: &str = &name.local;
        if tag == "script" || (tag == "base" && scanned.base_href.is_none()) {
            let attributes: HashMap<String, String> = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect();

            if tag == "script" {
                scanned.scripts.push(attributes);
            } else {
                scanned.base_href = attributes.get("href").cloned();
            }
        }
    }

    for child in handle.children.borrow().iter() {
        walk(child, scanned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_scripts_in_order() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head>
                <base href="/static/">
                <script src="vendor.js" defer></script>
                <script type="module" src="app.mjs"></script>
            </head>
            <body>
                <script>window.inline = true;</script>
                <script src="loader.js?site=1" data-log-endpoint="/collect"></script>
            </body>
            </html>
        "#;
        let scanned = scan_html(html).unwrap();

        assert_eq!(scanned.base_href.as_deref(), Some("/static/"));
        assert_eq!(scanned.scripts.len(), 4);
        assert_eq!(scanned.scripts[0].get("src").map(String::as_str), Some("vendor.js"));
        assert!(scanned.scripts[0].contains_key("defer"));
        assert_eq!(scanned.scripts[1].get("type").map(String::as_str), Some("module"));
        assert!(scanned.scripts[2].is_empty());
        assert_eq!(
            scanned.scripts[3].get("data-log-endpoint").map(String::as_str),
            Some("/collect")
        );
    }

    #[test]
    fn test_scan_without_scripts() {
        let scanned = scan_html("<p>nothing here</p>").unwrap();
        assert!(scanned.scripts.is_empty());
        assert!(scanned.base_href.is_none());
    }
}
