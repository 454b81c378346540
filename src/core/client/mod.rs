//! Public client surface + builder.
//! Internals are split into `constants` (UA + default endpoints) and `retry` (news retry policy).

mod constants;
mod retry;

pub use retry::RetryConfig;

use crate::core::SgError;
use constants::{DEFAULT_BASE_CHART, DEFAULT_BASE_GDELT, DEFAULT_TIMEOUT_SECS, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Thin wrapper that holds a configured HTTP client, base URLs and the default retry policy.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct SgClient {
    http: Client,
    base_chart: Url,
    base_gdelt: Url,
    retry: RetryConfig,
}

impl Default for SgClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl SgClient {
    /// Create a new builder.
    pub fn builder() -> SgClientBuilder {
        SgClientBuilder::default()
    }

    /// The retry policy news fetches use unless they override it.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
    pub(crate) fn base_chart(&self) -> &Url {
        &self.base_chart
    }
    pub(crate) fn base_gdelt(&self) -> &Url {
        &self.base_gdelt
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct SgClientBuilder {
    user_agent: Option<String>,
    base_chart: Option<Url>,
    base_gdelt: Option<Url>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry: Option<RetryConfig>,
}

impl SgClientBuilder {
    /// Override the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the chart API base (e.g., `https://query1.finance.yahoo.com/v8/finance/chart/`).
    pub fn base_chart(mut self, url: Url) -> Self {
        self.base_chart = Some(url);
        self
    }

    /// Override the GDELT DOC endpoint (e.g., `https://api.gdeltproject.org/api/v2/doc/doc`).
    pub fn base_gdelt(mut self, url: Url) -> Self {
        self.base_gdelt = Some(url);
        self
    }

    /// Set a global request timeout (overall). Default: 15 seconds.
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Set the default retry policy for news fetches.
    pub fn retry_config(mut self, cfg: RetryConfig) -> Self {
        self.retry = Some(cfg);
        self
    }

    pub fn build(self) -> Result<SgClient, SgError> {
        let base_chart = match self.base_chart {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_CHART)?,
        };
        let base_gdelt = match self.base_gdelt {
            Some(u) => u,
            None => Url::parse(DEFAULT_BASE_GDELT)?,
        };

        let mut httpb = reqwest::Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .timeout(
                self.timeout
                    .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            );

        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        let http = httpb.build()?;

        Ok(SgClient {
            http,
            base_chart,
            base_gdelt,
            retry: self.retry.unwrap_or_default(),
        })
    }
}
