use std::sync::Arc;

use clap::ValueEnum;
use clipdeck_common::ClipdeckError;
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::history::HistoryStore;

/// How the history feed input is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FeedFormat {
    /// Every line is a newly copied entry.
    #[default]
    Lines,
    /// Every line is a JSON string (new entry) or array of strings (full
    /// history, oldest first).
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonFeedLine {
    Snapshot(Vec<String>),
    Entry(String),
}

/// Apply one input line to the store. Returns true if the history changed.
pub fn apply_line(store: &HistoryStore, format: FeedFormat, line: &str) -> Result<bool, ClipdeckError> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    match format {
        FeedFormat::Lines => Ok(store.append(line.to_string())),
        FeedFormat::Json => {
            if line.trim().is_empty() {
                return Ok(false);
            }
            let parsed: JsonFeedLine = serde_json::from_str(line)
                .map_err(|e| ClipdeckError::Feed(format!("{} (line: {})", e, line)))?;
            match parsed {
                JsonFeedLine::Snapshot(entries) => Ok(store.replace(entries)),
                JsonFeedLine::Entry(text) => Ok(store.append(text)),
            }
        }
    }
}

/// Read the feed until EOF. Every chunk that arrives is applied as a whole
/// and announced with a single publish. Returns the number of lines read.
pub async fn run_feed<R>(mut reader: R, format: FeedFormat, store: Arc<HistoryStore>) -> Result<usize, ClipdeckError>
where
    R: AsyncBufRead + Unpin,
{
    let mut pending: Vec<u8> = Vec::new();
    let mut lines = 0;

    loop {
        let chunk = reader.fill_buf().await?;
        if chunk.is_empty() {
            break;
        }
        pending.extend_from_slice(chunk);
        let len = chunk.len();
        reader.consume(len);

        let mut changed = false;
        while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            lines += 1;
            changed |= apply_or_warn(&store, format, &line);
        }
        if changed {
            store.publish();
        }
    }

    if !pending.is_empty() {
        let line = String::from_utf8_lossy(&pending);
        lines += 1;
        if apply_or_warn(&store, format, &line) {
            store.publish();
        }
    }

    debug!("History feed ended after {} lines", lines);
    Ok(lines)
}

fn apply_or_warn(store: &HistoryStore, format: FeedFormat, line: &str) -> bool {
    match apply_line(store, format, line) {
        Ok(changed) => changed,
        Err(e) => {
            warn!("Skipping feed line: {}", e);
            false
        }
    }
}
