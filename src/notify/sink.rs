use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use thiserror::Error;

/// Discord rejects message content above this length, so reports sent to a
/// Discord webhook are split into chunks below it.
const DISCORD_CONTENT_LIMIT: usize = 2000;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed writing notification log: {0}")]
    Io(#[from] std::io::Error),
    #[error("webhook delivery failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Where a rendered change report goes. Sink failures never abort a check
/// cycle; the monitor logs them and moves on.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn emit(&self, report: &str) -> Result<(), SinkError>;
}

pub struct StdoutSink;

#[async_trait]
impl ReportSink for StdoutSink {
    async fn emit(&self, report: &str) -> Result<(), SinkError> {
        println!("{report}");
        Ok(())
    }
}

/// Appends each report to the notification log as a timestamped entry:
/// a `[YYYY-MM-DD HH:MM:SS]` header line, the report body, a blank line.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_cache_dir(cache_dir: &Path) -> Self {
        Self::new(cache_dir.join("notifications.txt"))
    }
}

#[async_trait]
impl ReportSink for FileSink {
    async fn emit(&self, report: &str) -> Result<(), SinkError> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        write!(file, "[{timestamp}]\n{report}\n\n")?;
        Ok(())
    }
}

pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent("bounty-watch/0.1")
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build webhook HTTP client");
        Self {
            client,
            url: url.into(),
        }
    }

    fn is_discord(&self) -> bool {
        self.url.contains("discord.com/api/webhooks")
            || self.url.contains("discordapp.com/api/webhooks")
    }
}

#[async_trait]
impl ReportSink for WebhookSink {
    async fn emit(&self, report: &str) -> Result<(), SinkError> {
        if self.is_discord() {
            for chunk in chunk_content(report, DISCORD_CONTENT_LIMIT) {
                self.client
                    .post(&self.url)
                    .json(&serde_json::json!({ "content": chunk }))
                    .send()
                    .await?
                    .error_for_status()?;
            }
        } else {
            self.client
                .post(&self.url)
                .json(&serde_json::json!({ "report": report }))
                .send()
                .await?
                .error_for_status()?;
        }
        Ok(())
    }
}

// Splits on line boundaries where possible; a single line longer than the
// limit is split mid-line by chars.
fn chunk_content(content: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for line in content.lines() {
        if line.len() >= limit {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let mut piece = String::new();
            for ch in line.chars() {
                if piece.len() + ch.len_utf8() >= limit {
                    chunks.push(std::mem::take(&mut piece));
                }
                piece.push(ch);
            }
            current = piece;
            current.push('\n');
            continue;
        }
        if current.len() + line.len() + 1 >= limit {
            chunks.push(std::mem::take(&mut current));
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::{chunk_content, FileSink, ReportSink};

    #[tokio::test]
    async fn file_sink_appends_timestamped_entries() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sink = FileSink::in_cache_dir(dir.path());
        sink.emit("first report").await.expect("emit");
        sink.emit("second report").await.expect("emit");

        let log = std::fs::read_to_string(dir.path().join("notifications.txt")).expect("read");
        assert_eq!(log.matches("first report").count(), 1);
        assert_eq!(log.matches("second report").count(), 1);
        assert_eq!(log.matches('[').count(), 2, "one header per entry");
        assert!(log.ends_with("\n\n"));
    }

    #[test]
    fn short_content_is_a_single_chunk() {
        let chunks = chunk_content("one\ntwo\nthree", 2000);
        assert_eq!(chunks, vec!["one\ntwo\nthree\n".to_string()]);
    }

    #[test]
    fn long_content_splits_on_line_boundaries() {
        let content = (0..100)
            .map(|i| format!("line number {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = chunk_content(&content, 200);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() < 200);
            assert!(chunk.ends_with('\n'));
        }
        let rejoined: String = chunks.concat();
        for i in 0..100 {
            assert!(rejoined.contains(&format!("line number {i}")));
        }
    }

    #[test]
    fn oversized_single_line_is_split_by_chars() {
        let content = "x".repeat(4500);
        let chunks = chunk_content(&content, 2000);
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.len() <= 2000);
        }
    }
}
