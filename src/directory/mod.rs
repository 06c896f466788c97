pub mod hackerone;
pub mod http;
pub mod schema;

use async_trait::async_trait;
use thiserror::Error;

use crate::directory::schema::Snapshot;

pub use hackerone::HackeroneDirectory;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("GET {url} returned {status}: {preview}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        preview: String,
    },
    #[error("malformed dataset payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A source of program snapshots. One implementation per upstream directory;
/// the monitor only sees this seam.
#[async_trait]
pub trait ProgramDirectory: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_current(&self) -> Result<Snapshot, FetchError>;
}
