// src/mirrors.rs
//! Failover fetch across an ordered list of equivalent endpoints (e.g.
//! self-hosted frontends of the same upstream). The candidate list and the
//! retry ceiling are fixed up front and walked with a plain loop, so failure
//! depth stays bounded and each attempt is observable.

use anyhow::{bail, Context, Result};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 12;

#[derive(Debug, Clone)]
pub struct MirrorClient {
    endpoints: Vec<String>,
    max_attempts: usize,
    client: reqwest::Client,
}

impl MirrorClient {
    /// `endpoints` are base URLs tried in order; at most `max_attempts` of
    /// them are contacted per fetch.
    pub fn new(endpoints: Vec<String>, max_attempts: usize) -> Result<Self> {
        if endpoints.is_empty() {
            bail!("mirror client needs at least one endpoint");
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("building mirror http client")?;
        Ok(Self {
            endpoints,
            max_attempts: max_attempts.max(1),
            client,
        })
    }

    /// Fetch `path` from the first endpoint that answers 200. A 404 is
    /// treated as authoritative (the resource does not exist anywhere) and
    /// stops the walk; other failures move on to the next candidate.
    pub async fn fetch_text(&self, path: &str) -> Result<String> {
        let attempts = self.max_attempts.min(self.endpoints.len());
        let mut last_err: Option<anyhow::Error> = None;

        for base in self.endpoints.iter().take(attempts) {
            let url = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
            match self.client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    return resp.text().await.context("reading mirror response body");
                }
                Ok(resp) if resp.status() == reqwest::StatusCode::NOT_FOUND => {
                    bail!("resource not found: {url}");
                }
                Ok(resp) => {
                    tracing::warn!(target: "mirrors", %url, status = %resp.status(), "mirror rejected request");
                    last_err = Some(anyhow::anyhow!("{url} returned {}", resp.status()));
                }
                Err(e) => {
                    tracing::warn!(target: "mirrors", %url, error = ?e, "mirror unreachable");
                    last_err = Some(anyhow::Error::new(e).context(format!("fetching {url}")));
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| anyhow::anyhow!("no mirror endpoints attempted"))
            .context(format!("all {attempts} mirror attempts failed for {path}")))
    }
}
