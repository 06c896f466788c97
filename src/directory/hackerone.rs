use async_trait::async_trait;

use crate::directory::http::fetch_text;
use crate::directory::schema::Snapshot;
use crate::directory::{FetchError, ProgramDirectory};

pub const HACKERONE_DATA_URL: &str =
    "https://raw.githubusercontent.com/arkadiyt/bounty-targets-data/main/data/hackerone_data.json";

/// Fetches the HackerOne dataset published by the bounty-targets-data
/// project: one JSON array of program records.
pub struct HackeroneDirectory {
    url: String,
}

impl HackeroneDirectory {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for HackeroneDirectory {
    fn default() -> Self {
        Self::new(HACKERONE_DATA_URL)
    }
}

#[async_trait]
impl ProgramDirectory for HackeroneDirectory {
    fn name(&self) -> &str {
        "hackerone"
    }

    async fn fetch_current(&self) -> Result<Snapshot, FetchError> {
        let body = fetch_text(&self.url).await?;
        parse_snapshot(&body)
    }
}

/// Decode a dataset payload. Anything that is not a JSON array of program
/// objects is malformed; unknown fields and nulls inside records are fine.
pub fn parse_snapshot(body: &str) -> Result<Snapshot, FetchError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::parse_snapshot;

    #[test]
    fn parses_a_minimal_dataset() {
        let body = r#"[
            {
                "handle": "acme",
                "name": "Acme",
                "url": "https://hackerone.com/acme",
                "offers_bounties": true,
                "submission_state": "open",
                "targets": {"in_scope": [], "out_of_scope": []}
            }
        ]"#;
        let snapshot = parse_snapshot(body).expect("dataset should parse");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].handle, "acme");
    }

    #[test]
    fn empty_array_is_a_valid_snapshot() {
        assert!(parse_snapshot("[]").expect("should parse").is_empty());
    }

    #[test]
    fn non_array_payload_is_malformed() {
        assert!(parse_snapshot(r#"{"programs": []}"#).is_err());
        assert!(parse_snapshot("<!DOCTYPE html>").is_err());
    }
}
