use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use engagement_common::EngagementRecord;

use crate::aggregate::aggregate_at;
use crate::flatten::flatten;
use crate::ledger::Ledger;
use crate::sink::EngagementSink;
use crate::sources::SnapshotSource;
use crate::trigger::{fire_and_forget, BackendTrigger};
use crate::types::{CycleKind, CycleOutcome, CycleReport, WatchState};

/// Drives snapshot polling: an immediate cycle on `start()`, then one cycle
/// per interval until `stop()`.
///
/// Cycles never overlap. They serialise on the ledger lock, and a scheduled
/// tick that finds the lock held is skipped. `stop()` cancels future ticks
/// and invalidates any cycle still fetching, which then drops its snapshot
/// without touching the ledger or the sink.
pub struct Watcher {
    shared: Arc<Shared>,
    trigger: Option<Arc<dyn BackendTrigger>>,
    task: Mutex<Option<PollTask>>,
}

struct PollTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

struct Shared {
    source: Arc<dyn SnapshotSource>,
    sink: Arc<dyn EngagementSink>,
    interval: Duration,
    ledger: Mutex<Ledger>,
    /// Mirror of the ledger size, readable without contending with ticks.
    seen: AtomicUsize,
    /// Bumped on every start and stop. A cycle only delivers if the
    /// generation it started under is still current.
    generation: AtomicU64,
}

impl Watcher {
    pub fn new(
        source: Arc<dyn SnapshotSource>,
        sink: Arc<dyn EngagementSink>,
        interval: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                sink,
                interval,
                ledger: Mutex::new(Ledger::new()),
                seen: AtomicUsize::new(0),
                generation: AtomicU64::new(0),
            }),
            trigger: None,
            task: Mutex::new(None),
        }
    }

    /// Fire this trigger (without waiting on it) every time polling starts.
    pub fn with_trigger(mut self, trigger: Arc<dyn BackendTrigger>) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Idle → Polling. Runs one cycle immediately and returns its report.
    /// Returns `None` if already polling.
    pub async fn start(&self) -> Option<CycleReport> {
        let generation = {
            let mut task = self.task.lock().await;
            if task.is_some() {
                info!("Watcher already polling, ignoring start");
                return None;
            }

            let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
            let cancel = CancellationToken::new();
            let handle = tokio::spawn(poll_loop(self.shared.clone(), cancel.clone(), generation));
            *task = Some(PollTask { cancel, handle });
            generation
        };

        info!(
            interval_secs = self.shared.interval.as_secs_f64(),
            "Watcher started"
        );

        if let Some(trigger) = &self.trigger {
            fire_and_forget(trigger.clone());
        }

        Some(self.shared.run_cycle(CycleKind::Initial, generation).await)
    }

    /// Polling → Idle. Scheduled ticks are cancelled; a cycle already fetching
    /// is allowed to finish but its results are dropped. The ledger is kept,
    /// so a later `start()` keeps suppressing records already delivered.
    ///
    /// Returns `false` if the watcher was not polling.
    pub async fn stop(&self) -> bool {
        match self.halt().await {
            Some(_) => {
                info!("Watcher stopped");
                true
            }
            None => false,
        }
    }

    /// Like `stop()`, but also waits for the poll task to wind down.
    pub async fn shutdown(&self) {
        if let Some(task) = self.halt().await {
            if let Err(e) = task.handle.await {
                warn!(error = %e, "Poll task ended abnormally");
            }
            info!("Watcher shut down");
        }
    }

    async fn halt(&self) -> Option<PollTask> {
        let task = self.task.lock().await.take()?;
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        task.cancel.cancel();
        Some(task)
    }

    /// Clear the ledger and re-emit every record in the current snapshot.
    /// Works whether or not the watcher is polling. If the fetch fails the
    /// ledger and the sink are left as they were.
    pub async fn reload(&self) -> CycleReport {
        info!("Reloading engagement view from scratch");
        let generation = self.shared.generation.load(Ordering::SeqCst);
        self.shared.run_cycle(CycleKind::Reload, generation).await
    }

    pub async fn state(&self) -> WatchState {
        if self.task.lock().await.is_some() {
            WatchState::Polling
        } else {
            WatchState::Idle
        }
    }

    /// Number of (post, user) keys delivered since the last reload.
    pub fn seen(&self) -> usize {
        self.shared.seen.load(Ordering::SeqCst)
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            self.shared.generation.fetch_add(1, Ordering::SeqCst);
            task.cancel.cancel();
        }
    }
}

async fn poll_loop(shared: Arc<Shared>, cancel: CancellationToken, generation: u64) {
    let mut timer = interval_at(Instant::now() + shared.interval, shared.interval);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = timer.tick() => {}
        }

        let report = shared.run_cycle(CycleKind::Tick, generation).await;
        debug!(%report, "Poll tick finished");
    }

    debug!("Poll loop exited");
}

impl Shared {
    async fn run_cycle(&self, kind: CycleKind, generation: u64) -> CycleReport {
        let mut ledger = match kind {
            CycleKind::Tick => match self.ledger.try_lock() {
                Ok(guard) => guard,
                Err(_) => {
                    debug!("Previous cycle still in flight, skipping tick");
                    return CycleReport::new(kind, CycleOutcome::Skipped);
                }
            },
            CycleKind::Initial | CycleKind::Reload => self.ledger.lock().await,
        };

        let snapshot = match self.source.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, %kind, "Snapshot fetch failed, retrying next tick");
                return CycleReport::new(kind, CycleOutcome::FetchFailed);
            }
        };

        if kind != CycleKind::Reload && self.generation.load(Ordering::SeqCst) != generation {
            info!(%kind, "Watcher stopped during fetch, discarding snapshot");
            return CycleReport::new(kind, CycleOutcome::Discarded);
        }

        if kind == CycleKind::Reload {
            ledger.reset();
            self.seen.store(0, Ordering::SeqCst);
            if let Err(e) = self.sink.on_reset().await {
                warn!(error = %e, "Sink failed to reset");
            }
        }

        let now = Utc::now();
        let posts = flatten(&snapshot);
        let records: Vec<EngagementRecord> = posts
            .iter()
            .flat_map(|post| aggregate_at(post, now))
            .collect();

        let mut report = CycleReport::new(kind, CycleOutcome::Completed);
        report.posts = posts.len();
        report.derived = records.len();

        let fresh = ledger.filter_new(records);
        self.seen.store(ledger.len(), Ordering::SeqCst);
        report.emitted = fresh.len();

        if report.derived == 0 && kind != CycleKind::Tick {
            if let Err(e) = self.sink.on_empty().await {
                warn!(error = %e, "Sink failed to accept empty signal");
            }
        }

        for record in &fresh {
            if let Err(e) = self.sink.on_new_record(record).await {
                warn!(
                    error = %e,
                    post_id = record.post_id.as_str(),
                    user_id = record.user_id.as_str(),
                    "Sink failed to accept record"
                );
            }
        }

        if report.emitted > 0 {
            info!(
                %kind,
                posts = report.posts,
                new_records = report.emitted,
                seen = ledger.len(),
                "New engagement delivered"
            );
        } else {
            debug!(%kind, posts = report.posts, "No new engagement");
        }

        report
    }
}
