//! Error types for fetching, persisting and querying the index.

use std::path::PathBuf;

/// Errors from a single request to the remote API.
///
/// None of these abort an index build on their own; the builder logs the
/// failure and moves on to the next comic.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection failure, timeout, or an unreadable response body
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("unexpected status code {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The body was not a comic payload
    #[error("malformed comic payload from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors reading or writing the persisted index snapshot.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read index {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse index {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write index {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize index: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// User-facing lookup failures against the local index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("index is empty. Run 'update' first")]
    EmptyIndex,

    #[error("comic #{0} not found in index")]
    NotFound(u32),
}
