//! Remote comic fetcher.
//!
//! [`HttpFetcher`] talks to the xkcd JSON interface:
//!
//! | Target | URL |
//! |--------|-----|
//! | latest comic | `{base}/info.0.json` |
//! | comic `n` | `{base}/{n}/info.0.json` |
//!
//! Each call is a single blocking GET with a fixed timeout and an explicit
//! `User-Agent`. There are no retries here; the index builder decides what
//! to do with a failure.
//!
//! The [`ComicSource`] trait is the seam the builder depends on, so tests
//! can drive a build from an in-memory source.

use std::fmt;
use std::num::NonZeroU32;

use tracing::debug;

use crate::config::RemoteConfig;
use crate::error::FetchError;
use crate::models::Comic;

/// Which comic to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComicId {
    /// The most recently published comic.
    Latest,
    Number(NonZeroU32),
}

impl ComicId {
    /// `None` for `0`, which is not a valid comic number.
    pub fn number(num: u32) -> Option<Self> {
        NonZeroU32::new(num).map(ComicId::Number)
    }
}

impl fmt::Display for ComicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComicId::Latest => write!(f, "latest"),
            ComicId::Number(n) => write!(f, "#{}", n),
        }
    }
}

/// Anything that can produce a comic by ID.
pub trait ComicSource {
    fn fetch(&self, id: ComicId) -> Result<Comic, FetchError>;
}

/// [`ComicSource`] backed by the remote HTTP API.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Build a fetcher from explicit connection settings.
    pub fn new(config: &RemoteConfig) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, id: ComicId) -> String {
        match id {
            ComicId::Latest => format!("{}/info.0.json", self.base_url),
            ComicId::Number(n) => format!("{}/{}/info.0.json", self.base_url, n),
        }
    }
}

impl ComicSource for HttpFetcher {
    fn fetch(&self, id: ComicId) -> Result<Comic, FetchError> {
        let url = self.url_for(id);
        debug!(%url, "fetching comic {}", id);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { url, source })
    }
}
