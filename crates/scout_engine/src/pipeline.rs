use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

use scout_core::normalize_url;

use crate::extract::Extractor;
use crate::fetch::Fetcher;
use crate::redact::keyed_email_digest;
use crate::types::{FailureKind, PageRecord, PipelineEvent};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Minimum spacing between consecutive outbound requests.
    pub request_spacing: Duration,
    /// Delay before a failed URL re-enters the queue for its one retry.
    pub retry_delay: Duration,
    /// Keyed-hash secret for email redaction; emails are only reported
    /// when a secret is configured.
    pub redaction_secret: Option<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            request_spacing: Duration::from_millis(1000),
            retry_delay: Duration::from_secs(60),
            redaction_secret: None,
        }
    }
}

/// Receives pipeline output. Implementations decide where the success and
/// diagnostic streams go; emission order per event variant is FIFO.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PipelineEvent);
}

enum Command {
    Submit { raw_url: String },
    Retry { raw_url: String },
    InputFinished,
}

/// Owner side of a running pipeline.
///
/// Submissions are fire-and-forget; call [`PipelineHandle::finish_input`]
/// once all input has been read, then [`PipelineHandle::wait`] to block
/// until every queued, in-flight, and retry-pending URL has resolved.
pub struct PipelineHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
    worker: JoinHandle<()>,
}

impl PipelineHandle {
    pub fn spawn(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        sink: Arc<dyn EventSink>,
        settings: PipelineSettings,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let pipeline = Pipeline {
            fetcher,
            extractor,
            sink,
            settings,
            retry_tx: cmd_tx.clone(),
            visited: HashSet::new(),
            queue: VecDeque::new(),
            pending: 0,
            input_finished: false,
            last_request: None,
        };
        let worker = tokio::spawn(pipeline.run(cmd_rx));
        Self { cmd_tx, worker }
    }

    /// Enqueues a raw URL for its first attempt. Duplicates (by normalized
    /// form) are dropped silently.
    pub fn submit(&self, raw_url: impl Into<String>) {
        let _ = self.cmd_tx.send(Command::Submit {
            raw_url: raw_url.into(),
        });
    }

    /// Marks the input as fully consumed. Without this call the pipeline
    /// idles forever waiting for more submissions.
    pub fn finish_input(&self) {
        let _ = self.cmd_tx.send(Command::InputFinished);
    }

    /// Resolves once the pipeline has drained: input finished, queue empty,
    /// and no attempt in flight or sleeping before its retry.
    pub async fn wait(self) {
        let PipelineHandle { cmd_tx, worker } = self;
        drop(cmd_tx);
        if let Err(err) = worker.await {
            log::error!("pipeline worker failed: {err}");
        }
    }
}

struct WorkItem {
    raw_url: String,
    normalized: String,
    attempt: u8,
}

/// All pipeline state, owned by a single task. Only this task dispatches,
/// so the re-entrancy guard of a callback-driven design is unnecessary and
/// no locking discipline applies to `visited`, `queue`, or `pending`.
struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    sink: Arc<dyn EventSink>,
    settings: PipelineSettings,
    retry_tx: mpsc::UnboundedSender<Command>,
    visited: HashSet<String>,
    queue: VecDeque<WorkItem>,
    pending: usize,
    input_finished: bool,
    last_request: Option<Instant>,
}

impl Pipeline {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
        loop {
            // Absorb everything already submitted so queue order matches
            // submission order before the next dispatch.
            while let Ok(cmd) = cmd_rx.try_recv() {
                self.apply(cmd);
            }

            if let Some(item) = self.queue.pop_front() {
                self.dispatch(item).await;
                continue;
            }

            if self.drained() {
                log::debug!("pipeline drained");
                return;
            }

            // Idle: pending retries or unfinished input. Block until the
            // next command arrives.
            match cmd_rx.recv().await {
                Some(cmd) => self.apply(cmd),
                None => return,
            }
        }
    }

    fn drained(&self) -> bool {
        self.input_finished && self.pending == 0 && self.queue.is_empty()
    }

    fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::Submit { raw_url } => self.admit(raw_url, 1, false),
            Command::Retry { raw_url } => self.admit(raw_url, 2, true),
            Command::InputFinished => self.input_finished = true,
        }
    }

    /// Mirrors enqueue(rawUrl, attempt, scheduled): first attempts dedup
    /// against the visited set; scheduled retries already hold a pending
    /// slot from the moment they were scheduled.
    fn admit(&mut self, raw_url: String, attempt: u8, scheduled: bool) {
        let normalized = normalize_url(&raw_url);
        if attempt == 1 && !self.visited.insert(normalized.clone()) {
            log::debug!("duplicate url skipped: {normalized}");
            return;
        }
        if !scheduled {
            self.pending += 1;
        }
        self.queue.push_back(WorkItem {
            raw_url,
            normalized,
            attempt,
        });
    }

    async fn dispatch(&mut self, item: WorkItem) {
        self.pace().await;

        let result = self.fetcher.fetch(&item.normalized).await;
        match result {
            Ok(output) => {
                let page = self.extractor.extract(&output.body).await;
                let email = match (page.email, &self.settings.redaction_secret) {
                    (Some(address), Some(secret)) => {
                        Some(keyed_email_digest(secret, &address))
                    }
                    _ => None,
                };
                self.sink.emit(PipelineEvent::Page(PageRecord {
                    url: item.raw_url,
                    title: page.title,
                    email,
                }));
            }
            Err(err) if item.attempt == 1 => {
                log::debug!(
                    "attempt 1 failed for {} ({err}), retrying in {:?}",
                    item.normalized,
                    self.settings.retry_delay
                );
                self.schedule_retry(item.raw_url);
            }
            Err(err) => {
                let event = match err.kind {
                    FailureKind::HttpStatus(status) => PipelineEvent::FailedAfterRetry {
                        url: item.normalized,
                        status,
                    },
                    _ => PipelineEvent::FetchErrored {
                        url: item.normalized,
                        detail: err.message,
                    },
                };
                self.sink.emit(event);
            }
        }

        // The attempt has resolved either way; completion is re-checked at
        // the top of the run loop.
        self.pending -= 1;
    }

    /// One shared clock for first attempts and retries alike: at most one
    /// outbound request per `request_spacing`.
    async fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.settings.request_spacing {
                sleep(self.settings.request_spacing - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    /// The pending slot is taken immediately; the URL itself re-enters the
    /// queue through the command channel once the delay elapses.
    fn schedule_retry(&mut self, raw_url: String) {
        self.pending += 1;
        let tx = self.retry_tx.clone();
        let delay = self.settings.retry_delay;
        tokio::spawn(async move {
            sleep(delay).await;
            let _ = tx.send(Command::Retry { raw_url });
        });
    }
}
