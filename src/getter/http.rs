//! HTTP(S) getter built on ureq
//!
//! ureq is blocking, so every request runs on tokio's blocking pool.

use crate::error::{SkegError, SkegResult};
use crate::getter::Getter;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Getter for `http` and `https` URLs
pub struct HttpGetter {
    agent: Agent,
    timeout: Duration,
    max_bytes: u64,
    /// (URL prefix, bearer token), longest prefix wins
    tokens: Vec<(String, String)>,
}

impl HttpGetter {
    /// Create a getter with a per-request deadline and body size limit
    pub fn new(timeout: Duration, max_bytes: u64) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            timeout,
            max_bytes,
            tokens: Vec::new(),
        }
    }

    /// Send `token` as a bearer token to every URL under `url_prefix`.
    ///
    /// Matching is by whole path segments on the same scheme, host and
    /// port: `https://charts.example.com` covers
    /// `https://charts.example.com/stable/a.tgz` but not
    /// `https://charts.example.com.mirror.net/a.tgz`.
    pub fn with_token(mut self, url_prefix: &str, token: &str) -> Self {
        let prefix = url_prefix.trim_end_matches('/');
        if !prefix.contains("://") {
            return self;
        }
        self.tokens.push((prefix.to_string(), token.to_string()));
        self.tokens.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        self
    }

    fn token_for(&self, url: &str) -> Option<&str> {
        self.tokens
            .iter()
            .find(|(prefix, _)| {
                url.strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']))
            })
            .map(|(_, token)| token.as_str())
    }
}

#[async_trait]
impl Getter for HttpGetter {
    fn schemes(&self) -> &'static [&'static str] {
        &["http", "https"]
    }

    async fn get(&self, url: &str) -> SkegResult<Vec<u8>> {
        let agent = self.agent.clone();
        let owned_url = url.to_string();
        let token = self.token_for(url).map(str::to_string);
        let max_bytes = self.max_bytes;
        let timeout_secs = self.timeout.as_secs();

        debug!("GET {} (auth: {})", url, token.is_some());

        tokio::task::spawn_blocking(move || {
            let url = owned_url;
            let mut request = agent.get(&url);
            if let Some(token) = token {
                request = request.header("Authorization", format!("Bearer {}", token));
            }

            let map_err = |e: ureq::Error| match e {
                ureq::Error::StatusCode(code) => SkegError::network(&url, format!("HTTP {}", code)),
                ureq::Error::Timeout(_) => SkegError::FetchTimeout {
                    url: url.clone(),
                    timeout_secs,
                },
                other => SkegError::network(&url, other.to_string()),
            };

            let mut response = request.call().map_err(map_err)?;
            response
                .body_mut()
                .with_config()
                .limit(max_bytes)
                .read_to_vec()
                .map_err(map_err)
        })
        .await
        .map_err(|e| SkegError::Internal(format!("download task failed: {}", e)))?
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
