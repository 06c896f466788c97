use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::Client;

use crate::directory::FetchError;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const STATUS_PREVIEW_CHARS: usize = 180;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("bounty-watch/0.1")
        .timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .build()
        .expect("failed to build HTTP client")
});

/// GET a URL and return the body text, turning non-2xx responses into a
/// status error that carries a short body preview for the log.
pub async fn fetch_text(url: &str) -> Result<String, FetchError> {
    let response = HTTP_CLIENT.get(url).send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let preview: String = body.chars().take(STATUS_PREVIEW_CHARS).collect();
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
            preview,
        });
    }
    Ok(body)
}
