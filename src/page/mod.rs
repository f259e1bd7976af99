// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Page host - build a host snapshot from a real HTML page
//!
//! Fetches a page, finds its `<script>` elements and turns the one that
//! would have loaded the probe into the current-script handle. Everything
//! else about the host (frames, stack, console) is left to the caller.

mod parser;

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use crate::config::DEFAULT_USER_AGENT;
use crate::error::{Error, ErrorContext, Result};
use crate::host::{ScriptElement, SnapshotHost, SnapshotHostBuilder};

pub use parser::{scan_html, ScannedDocument};

/// Page fetching configuration
#[derive(Debug, Clone)]
pub struct PageHostConfig {
    /// User agent string
    pub user_agent: String,
    /// Request timeout
    pub timeout: Duration,
    /// Accept invalid TLS certificates
    pub ignore_https_errors: bool,
}

impl Default for PageHostConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            ignore_https_errors: false,
        }
    }
}

impl PageHostConfig {
    /// Create a new page config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ignore HTTPS errors
    pub fn ignore_https_errors(mut self, ignore: bool) -> Self {
        self.ignore_https_errors = ignore;
        self
    }
}

/// A fetched and scanned page
#[derive(Debug, Clone)]
pub struct LoadedPage {
    /// Final document URL after redirects
    pub url: Url,
    /// Resolved `<base href>`, when present
    pub base_uri: Option<Url>,
    /// Every `<script>` with `src` resolved against the base
    pub scripts: Vec<ScriptElement>,
}

impl LoadedPage {
    /// Build from HTML already in hand
    pub fn from_html(url: Url, html: &str) -> Result<Self> {
        let scanned = scan_html(html)?;
        let base_uri = scanned
            .base_href
            .as_deref()
            .and_then(|href| url.join(href).ok());
        let base = base_uri.as_ref().unwrap_or(&url);

        let scripts = scanned
            .scripts
            .into_iter()
            .map(|attrs| {
                let src = attrs
                    .get("src")
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .and_then(|s| base.join(s).ok())
                    .map(|u| u.to_string());
                ScriptElement::from_attributes(attrs, src)
            })
            .collect();

        Ok(Self {
            url,
            base_uri,
            scripts,
        })
    }

    /// First external script whose `src` contains `pattern`
    pub fn find_script(&self, pattern: &str) -> Option<&ScriptElement> {
        self.scripts
            .iter()
            .find(|s| s.location().map(|src| src.contains(pattern)).unwrap_or(false))
    }

    /// Start a host snapshot of this page
    ///
    /// With a pattern the matching script becomes the current script; a
    /// pattern that matches nothing is an error. Without one the snapshot
    /// has no current script, as for a dynamically injected probe.
    pub fn host(&self, pattern: Option<&str>) -> Result<SnapshotHostBuilder> {
        let mut builder = SnapshotHost::builder(self.url.as_str());
        if let Some(base) = &self.base_uri {
            builder = builder.base_uri(base.as_str());
        }

        if let Some(pattern) = pattern {
            let script = self
                .find_script(pattern)
                .ok_or_else(|| Error::script_not_found(pattern, self.url.as_str()))?;
            builder = builder.current_script(script.clone());
        }

        Ok(builder)
    }
}

/// Fetches pages over HTTP
#[derive(Debug, Clone)]
pub struct PageLoader {
    client: Client,
}

impl PageLoader {
    /// Create a page loader
    pub fn new(config: &PageHostConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.ignore_https_errors)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch and scan a page
    pub async fn load(&self, url: &str) -> Result<LoadedPage> {
        let parsed = Url::parse(url)?;
        tracing::info!(url = %parsed, "Fetching page");

        let response = self.client.get(parsed.clone()).send().await.with_url(url)?;
        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(Error::page_load(
                final_url.as_str(),
                Some(status.as_u16()),
                status.canonical_reason().unwrap_or("request failed"),
            ));
        }

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.to_ascii_lowercase().contains("html"))
            .unwrap_or(true);
        if !is_html {
            return Err(Error::page_load(
                final_url.as_str(),
                Some(status.as_u16()),
                "content is not HTML",
            ));
        }

        let html = response.text().await.with_url(final_url.as_str())?;
        let page = LoadedPage::from_html(final_url, &html)?;
        tracing::debug!(url = %page.url, scripts = page.scripts.len(), "Page scanned");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::host::{HostEnvironment, ScriptKind};

    const PAGE: &str = r#"
        <html>
        <head>
            <script type="module" src="/js/app.mjs"></script>
        </head>
        <body>
            <script src="https://cdn.example/loader.js?site=9&logEndpoint=/c"
                    data-log-endpoint="https://collect.example/" async></script>
        </body>
        </html>
    "#;

    #[test]
    fn test_from_html_resolves_sources() {
        let url = Url::parse("https://app.example/shop/index.html").unwrap();
        let page = LoadedPage::from_html(url, PAGE).unwrap();

        assert_eq!(page.scripts.len(), 2);
        assert_eq!(
            page.scripts[0].src.as_deref(),
            Some("https://app.example/js/app.mjs")
        );
        assert_eq!(page.scripts[0].kind(), ScriptKind::Module);

        let loader = page.find_script("loader.js").unwrap();
        assert!(loader.is_async);
        assert_eq!(
            loader.dataset().get("logEndpoint").map(String::as_str),
            Some("https://collect.example/")
        );
    }

    #[test]
    fn test_base_href() {
        let html = r#"<head><base href="https://static.example/v2/"></head><script src="a.js"></script>"#;
        let url = Url::parse("https://app.example/").unwrap();
        let page = LoadedPage::from_html(url, html).unwrap();

        assert_eq!(page.scripts[0].src.as_deref(), Some("https://static.example/v2/a.js"));
        let host = page.host(None).unwrap().build();
        assert_eq!(host.base_uri().as_deref(), Some("https://static.example/v2/"));
        assert!(host.current_script().is_none());
    }

    #[test]
    fn test_missing_pattern_is_error() {
        let url = Url::parse("https://app.example/").unwrap();
        let page = LoadedPage::from_html(url, PAGE).unwrap();
        let err = page.host(Some("nope.js")).unwrap_err();
        assert!(matches!(err, Error::ScriptNotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.html"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(PAGE, "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let loader = PageLoader::new(&PageHostConfig::default()).unwrap();
        let page = loader
            .load(&format!("{}/index.html", server.uri()))
            .await
            .unwrap();

        assert_eq!(page.scripts.len(), 2);
        assert_eq!(
            page.scripts[0].src.as_deref(),
            Some(format!("{}/js/app.mjs", server.uri()).as_str())
        );

        let host = page.host(Some("loader.js")).unwrap().build();
        assert_eq!(host.location(), format!("{}/index.html", server.uri()));
        let script = host.current_script().unwrap();
        assert!(script.is_async);
        assert_eq!(
            script.location(),
            Some("https://cdn.example/loader.js?site=9&logEndpoint=/c")
        );
    }

    #[tokio::test]
    async fn test_load_rejects_non_html() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
            )
            .mount(&server)
            .await;

        let loader = PageLoader::new(&PageHostConfig::default()).unwrap();
        let err = loader.load(&server.uri()).await.unwrap_err();
        match err {
            Error::PageLoad { status, reason, .. } => {
                assert_eq!(status, Some(200));
                assert_eq!(reason, "content is not HTML");
            }
            other => panic!("expected page load error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let loader = PageLoader::new(&PageHostConfig::default()).unwrap();
        let err = loader.load(&server.uri()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));
    }
}
