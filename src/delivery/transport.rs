// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Fallback HTTP transport

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::config::ProbeConfig;
use crate::error::Result;

/// Content type of delivered reports
pub const REPORT_CONTENT_TYPE: &str = "application/json";

/// Fire-and-forget POST of a serialized report
///
/// Implementations must not interpret the response beyond transport
/// success; collectors are allowed to be opaque.
#[async_trait]
pub trait FetchTransport: Send + Sync {
    /// Send the payload
    async fn post(&self, endpoint: &str, payload: Bytes) -> Result<()>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpFetchTransport {
    client: Client,
}

impl HttpFetchTransport {
    /// Build a transport from probe configuration
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.delivery_timeout)
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchTransport for HttpFetchTransport {
    async fn post(&self, endpoint: &str, payload: Bytes) -> Result<()> {
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, REPORT_CONTENT_TYPE)
            .body(payload)
            .send()
            .await?;

        tracing::debug!(endpoint, status = %response.status(), "Report delivered");
        Ok(())
    }
}
