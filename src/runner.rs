// Stream Loop - drives matcher, resolver, builder, and ledger over the stream
// One item is fully processed before the next is fetched; the only blocking
// point is waiting on the stream itself

use crate::annotation::{build_annotation, REPLY_HEADER};
use crate::dataset::ReferenceDataset;
use crate::ledger::ProcessedLedger;
use crate::stream::{ItemStream, StreamItem};
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub items_seen: u64,
    pub replies_posted: u64,
    pub items_skipped: u64,
}

/// The sequential worker. Owns the ledger connection and the reference
/// dataset; the stream is injected per run.
pub struct AnnotatorLoop {
    dataset: ReferenceDataset,
    ledger: ProcessedLedger,
    bot_username: String,
    shutdown: Arc<AtomicBool>,

    /// First delay after a transient stream error; doubles up to the max and
    /// resets on the next successful fetch.
    pub initial_retry_delay: Duration,
    pub max_retry_delay: Duration,
}

impl AnnotatorLoop {
    pub fn new(
        dataset: ReferenceDataset,
        ledger: ProcessedLedger,
        bot_username: impl Into<String>,
    ) -> Self {
        AnnotatorLoop {
            dataset,
            ledger,
            bot_username: bot_username.into(),
            shutdown: Arc::new(AtomicBool::new(false)),
            initial_retry_delay: Duration::from_secs(5),
            max_retry_delay: Duration::from_secs(60),
        }
    }

    pub fn with_retry_delays(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_retry_delay = initial;
        self.max_retry_delay = max;
        self
    }

    /// Flag to raise for graceful shutdown; checked between items, so no
    /// partially processed item is ever dropped.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Consume the stream until it ends or shutdown is requested; a fatal
    /// stream error also ends the loop. Transient stream errors are retried
    /// in place with backoff.
    pub fn run(&mut self, stream: &mut dyn ItemStream) -> Result<LoopSummary> {
        let mut summary = LoopSummary::default();
        let mut retry_delay = self.initial_retry_delay;

        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                info!("shutdown requested, stopping stream loop");
                break;
            }

            match stream.next_item() {
                Ok(Some(item)) => {
                    retry_delay = self.initial_retry_delay;
                    summary.items_seen += 1;
                    self.process_item(stream, &item, &mut summary)?;
                }
                Ok(None) => {
                    info!("stream ended");
                    break;
                }
                Err(err) if err.is_transient() => {
                    warn!(error = %err, delay = ?retry_delay, "transient stream error, retrying");
                    std::thread::sleep(retry_delay);
                    retry_delay = (retry_delay * 2).min(self.max_retry_delay);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(summary)
    }

    /// Skip → Annotate → Reply → RecordProcessed for one item. Ledger errors
    /// are fatal; a failed reply is logged and leaves the item unrecorded.
    fn process_item(
        &self,
        stream: &mut dyn ItemStream,
        item: &StreamItem,
        summary: &mut LoopSummary,
    ) -> Result<()> {
        info!(item = %item.id, link = %stream.permalink(&item.id), "processing item");

        if self.ledger.has_processed(&item.id)? {
            info!(item = %item.id, "already processed, skipping");
            summary.items_skipped += 1;
            return Ok(());
        }

        if item.author == self.bot_username {
            info!(item = %item.id, "own item, skipping");
            summary.items_skipped += 1;
            return Ok(());
        }

        let annotation = build_annotation(&item.body, &self.dataset);
        if annotation.is_empty() {
            // No recognizable codes: no reply and no ledger write
            return Ok(());
        }

        info!(
            item = %item.id,
            author = %item.author,
            codes = ?annotation.codes,
            "replying with code annotations"
        );

        let reply = format!("{}{}", REPLY_HEADER, annotation.body);
        match stream.reply(&item.id, &reply) {
            Ok(()) => {
                self.ledger.mark_processed(&item.id)?;
                summary.replies_posted += 1;
            }
            Err(err) => {
                // Item stays unrecorded; a replayed item would be retried
                error!(item = %item.id, error = %err, "reply failed, item left unrecorded");
            }
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
