// Stream boundary - the external source of text items and sink for replies
// The live service client lives outside this crate; what ships here is the
// trait plus a JSONL replay implementation and an in-memory one

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// One item pulled from the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamItem {
    pub id: String,
    pub author: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum StreamError {
    /// Transient connectivity problem; the loop retries with backoff.
    #[error("stream connection error: {0}")]
    Connection(String),

    /// Credentials permanently rejected; fatal.
    #[error("stream authentication rejected: {0}")]
    AuthRejected(String),

    /// Posting a reply failed. The item is left unrecorded in the ledger.
    #[error("reply to item {item_id} failed: {reason}")]
    ReplyFailed { item_id: String, reason: String },
}

impl StreamError {
    /// Transient errors are retried with backoff; everything else ends the loop.
    pub fn is_transient(&self) -> bool {
        matches!(self, StreamError::Connection(_))
    }
}

/// The external stream contract: a blocking, in-order sequence of items,
/// plus the reply sink and a permalink for log lines.
pub trait ItemStream {
    /// Next item, or `Ok(None)` at end of stream.
    fn next_item(&mut self) -> Result<Option<StreamItem>, StreamError>;

    /// Post a reply to an item.
    fn reply(&mut self, item_id: &str, body: &str) -> Result<(), StreamError>;

    /// Stable link to an item, for logging only.
    fn permalink(&self, item_id: &str) -> String;
}

// ============================================================================
// JSONL REPLAY STREAM
// ============================================================================

/// Replays items from a JSONL file (one `StreamItem` object per line) and
/// writes replies to a writer. Lines that do not parse are logged and
/// skipped rather than ending the stream.
pub struct JsonlStream<W: Write> {
    lines: Lines<BufReader<File>>,
    out: W,
    path: PathBuf,
}

impl JsonlStream<std::io::Stdout> {
    /// Open a replay stream that prints replies to stdout.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        Self::with_writer(path, std::io::stdout())
    }
}

impl<W: Write> JsonlStream<W> {
    pub fn with_writer(path: &Path, out: W) -> anyhow::Result<Self> {
        use anyhow::Context;
        let file = File::open(path)
            .with_context(|| format!("failed to open item stream {}", path.display()))?;
        Ok(JsonlStream {
            lines: BufReader::new(file).lines(),
            out,
            path: path.to_path_buf(),
        })
    }
}

impl<W: Write> ItemStream for JsonlStream<W> {
    fn next_item(&mut self) -> Result<Option<StreamItem>, StreamError> {
        for line in self.lines.by_ref() {
            let line = line.map_err(|e| StreamError::Connection(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<StreamItem>(&line) {
                Ok(item) => return Ok(Some(item)),
                Err(err) => {
                    warn!(error = %err, "skipping malformed stream line");
                }
            }
        }
        Ok(None)
    }

    fn reply(&mut self, item_id: &str, body: &str) -> Result<(), StreamError> {
        writeln!(self.out, "--- reply to {item_id} ---\n{body}").map_err(|e| {
            StreamError::ReplyFailed {
                item_id: item_id.to_string(),
                reason: e.to_string(),
            }
        })
    }

    fn permalink(&self, item_id: &str) -> String {
        format!("{}#{}", self.path.display(), item_id)
    }
}

// ============================================================================
// IN-MEMORY STREAM
// ============================================================================

/// Queue-backed stream for tests and demos. Events may be items or injected
/// errors; replies are captured, and reply failures can be forced per item.
#[derive(Default)]
pub struct MemoryStream {
    events: VecDeque<Result<StreamItem, StreamError>>,
    replies: Vec<(String, String)>,
    failing_replies: HashSet<String>,
}

impl MemoryStream {
    pub fn new(items: Vec<StreamItem>) -> Self {
        MemoryStream {
            events: items.into_iter().map(Ok).collect(),
            ..Default::default()
        }
    }

    /// Build from an explicit event sequence, interleaving errors with items.
    pub fn from_events(events: Vec<Result<StreamItem, StreamError>>) -> Self {
        MemoryStream {
            events: events.into(),
            ..Default::default()
        }
    }

    /// Make every reply to this item id fail.
    pub fn fail_replies_to(&mut self, item_id: &str) {
        self.failing_replies.insert(item_id.to_string());
    }

    /// Replies captured so far, as (item id, body) pairs.
    pub fn replies(&self) -> &[(String, String)] {
        &self.replies
    }
}

impl ItemStream for MemoryStream {
    fn next_item(&mut self) -> Result<Option<StreamItem>, StreamError> {
        match self.events.pop_front() {
            Some(Ok(item)) => Ok(Some(item)),
            Some(Err(err)) => Err(err),
            None => Ok(None),
        }
    }

    fn reply(&mut self, item_id: &str, body: &str) -> Result<(), StreamError> {
        if self.failing_replies.contains(item_id) {
            return Err(StreamError::ReplyFailed {
                item_id: item_id.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.replies.push((item_id.to_string(), body.to_string()));
        Ok(())
    }

    fn permalink(&self, item_id: &str) -> String {
        format!("memory://{item_id}")
    }
}

// ============================================================================
// TESTS
// ============================================================================
