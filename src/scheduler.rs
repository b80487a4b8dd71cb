//! Drives when the engine runs.
//!
//! One spawned task owns the debounce timer and the optional fixed interval;
//! every external stimulus — a local mutation, a manual `sync_now`, a network
//! "online" event — is a message to that task, so there is no shared timer
//! state to race on. The actor awaits each cycle inline, which makes
//! at-most-one-in-flight structural: triggers landing while a cycle runs are
//! buffered in the channel and coalesce into a later debounced run.
//!
//! Errors never escape the actor. A failed cycle lands in
//! [`SyncState::last_error`] and the pending rows simply wait for the next
//! trigger; there is no backoff beyond the debounce itself.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};

use crate::store::now_ms;
use crate::sync::SyncEngine;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Quiet period after the last mutation trigger before a cycle runs.
    pub debounce: Duration,
    /// Optional fixed-interval sync on top of the event-driven triggers.
    pub interval: Option<Duration>,
    /// Run one cycle immediately when the scheduler starts.
    pub sync_on_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(2000),
            interval: None,
            sync_on_start: true,
        }
    }
}

/// Snapshot of the scheduler's run state, for a sync indicator in a UI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    pub is_syncing: bool,
    /// Human-readable message from the most recent failed cycle; cleared by
    /// the next success.
    pub last_error: Option<String>,
    /// Epoch millis of the last successful cycle; survives later failures.
    pub last_run: Option<i64>,
}

#[derive(Debug)]
enum Trigger {
    /// Debounced: a local mutation or a manual `sync_now`.
    Debounced,
    /// Immediate: connectivity came back.
    Online,
}

/// Cloneable handle to the scheduler actor.
#[derive(Clone)]
pub struct SchedulerHandle {
    tx: mpsc::Sender<Trigger>,
    state_rx: watch::Receiver<SyncState>,
}

impl SchedulerHandle {
    /// Enqueue a debounced run. Safe to call at any rate; calls inside one
    /// debounce window coalesce into a single cycle.
    pub fn sync_now(&self) {
        let _ = self.tx.try_send(Trigger::Debounced);
    }

    /// Call after every local write. Same debounce as [`sync_now`](Self::sync_now).
    pub fn notify_mutation(&self) {
        let _ = self.tx.try_send(Trigger::Debounced);
    }

    /// Call on a platform "online" event; runs a cycle without debouncing.
    pub fn notify_online(&self) {
        let _ = self.tx.try_send(Trigger::Online);
    }

    pub fn state(&self) -> SyncState {
        self.state_rx.borrow().clone()
    }

    /// Watch the state for changes (e.g. to drive an indicator).
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state_rx.clone()
    }
}

pub struct SyncScheduler {
    engine: SyncEngine,
    config: SchedulerConfig,
    rx: mpsc::Receiver<Trigger>,
    state_tx: watch::Sender<SyncState>,
}

impl SyncScheduler {
    /// Spawn the scheduler actor and return its handle. The actor runs until
    /// every handle is dropped.
    pub fn spawn(engine: SyncEngine, config: SchedulerConfig) -> SchedulerHandle {
        let (tx, rx) = mpsc::channel(64);
        let (state_tx, state_rx) = watch::channel(SyncState::default());
        let actor = SyncScheduler {
            engine,
            config,
            rx,
            state_tx,
        };
        tokio::spawn(actor.run());
        SchedulerHandle { tx, state_rx }
    }

    async fn run(mut self) {
        if self.config.sync_on_start {
            self.run_cycle().await;
        }

        let mut interval = self.config.interval.map(|period| {
            let mut ticker = tokio::time::interval(period);
            // The first tick fires immediately; the startup cycle covers that.
            ticker.reset();
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });
        let mut deadline: Option<Instant> = None;

        loop {
            let debounce = async {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };
            let interval_tick = async {
                match interval.as_mut() {
                    Some(ticker) => {
                        ticker.tick().await;
                    }
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                message = self.rx.recv() => match message {
                    None => break,
                    Some(Trigger::Online) => {
                        deadline = None;
                        self.run_cycle().await;
                    }
                    Some(Trigger::Debounced) => {
                        // Every new trigger restarts the quiet period.
                        deadline = Some(Instant::now() + self.config.debounce);
                    }
                },
                _ = debounce => {
                    deadline = None;
                    self.run_cycle().await;
                }
                _ = interval_tick => {
                    self.run_cycle().await;
                }
            }
        }
        log::debug!("scheduler: all handles dropped, stopping");
    }

    async fn run_cycle(&self) {
        self.state_tx.send_modify(|state| state.is_syncing = true);
        match self.engine.sync_once().await {
            Ok(report) => {
                log::debug!(
                    "scheduler: cycle ok (uploaded {}, downloaded {})",
                    report.uploaded,
                    report.downloaded
                );
                self.state_tx.send_modify(|state| {
                    state.is_syncing = false;
                    state.last_error = None;
                    state.last_run = Some(now_ms());
                });
            }
            Err(err) => {
                log::warn!("scheduler: sync cycle failed: {err}");
                self.state_tx.send_modify(|state| {
                    state.is_syncing = false;
                    state.last_error = Some(err.to_string());
                });
            }
        }
    }
}
