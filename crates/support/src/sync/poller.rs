//! Adaptive poller
//!
//! Periodically fetches a snapshot, compares its fingerprint with the
//! previous one and adapts its own delay: fast right after activity,
//! backing off linearly while nothing changes, bounded by the configured
//! minimum and maximum intervals.
//!
//! The poller must be started from inside a tokio runtime. Its ticks are
//! spawned tasks that never overlap: a tick is only scheduled after the
//! previous tick's fetch has settled, and `start`/`bump_fast` only replace
//! the pending timer, they never fetch directly.

use anyhow::Result;
use log::{debug, error, info, warn};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::{Activity, Cadence, Fingerprint};
use crate::config::{PollConfig, PollConfigError};

/// Future returned by a poll fetch. `Ok(None)` means "no data this time".
pub type FetchFuture<S> = Pin<Box<dyn Future<Output = Result<Option<S>>> + Send>>;

type FetchFn<S> = Box<dyn Fn() -> FetchFuture<S> + Send + Sync>;
type GateFn = Box<dyn Fn() -> bool + Send + Sync>;
type SnapshotHook<S> = Box<dyn Fn(S, Activity) + Send + Sync>;
type ErrorHook = Box<dyn Fn(&anyhow::Error) + Send + Sync>;

/// Builder for [`Poller`]
pub struct PollerBuilder<S> {
    name: String,
    config: PollConfig,
    fetch: FetchFn<S>,
    gate: Option<GateFn>,
    on_snapshot: Option<SnapshotHook<S>>,
    on_error: Option<ErrorHook>,
}

impl<S: Serialize + Send + 'static> PollerBuilder<S> {
    /// Name used in log lines
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Predicate deciding whether a tick should fetch at all.
    ///
    /// Re-evaluated on every tick. While it returns false the poller only
    /// re-checks it at the maximum interval.
    pub fn gate<G>(mut self, gate: G) -> Self
    where
        G: Fn() -> bool + Send + Sync + 'static,
    {
        self.gate = Some(Box::new(gate));
        self
    }

    /// Receives every snapshot fetched while the poller is running
    pub fn on_snapshot<H>(mut self, hook: H) -> Self
    where
        H: Fn(S, Activity) + Send + Sync + 'static,
    {
        self.on_snapshot = Some(Box::new(hook));
        self
    }

    /// Receives fetch failures. They are also logged.
    pub fn on_error<H>(mut self, hook: H) -> Self
    where
        H: Fn(&anyhow::Error) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(hook));
        self
    }

    /// Validate the cadence and build a stopped poller
    pub fn build(self) -> Result<Poller<S>, PollConfigError> {
        self.config.validate()?;
        Ok(Poller {
            inner: Arc::new(Inner {
                name: self.name,
                fetch: self.fetch,
                gate: self.gate.unwrap_or_else(|| Box::new(|| true) as GateFn),
                on_snapshot: self.on_snapshot,
                on_error: self.on_error,
                state: Mutex::new(PollerState::new(self.config)),
            }),
        })
    }
}

/// Self-tuning repeating fetch
///
/// Cloning yields another handle to the same poller.
pub struct Poller<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Poller<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S> {
    name: String,
    fetch: FetchFn<S>,
    gate: GateFn,
    on_snapshot: Option<SnapshotHook<S>>,
    on_error: Option<ErrorHook>,
    state: Mutex<PollerState>,
}

struct PollerState {
    running: bool,
    cadence: Cadence,
    /// Pending tick. Replaced only after aborting the previous one.
    timer: Option<JoinHandle<()>>,
    /// Identifies the most recently scheduled tick
    generation: u64,
    /// Identifies the current start..stop run
    run: u64,
    in_flight: bool,
    /// `start` arrived while a fetch from an earlier run was pending
    resume_after_fetch: bool,
    /// `bump_fast` arrived while a fetch was pending
    reset_after_fetch: bool,
}

impl PollerState {
    fn new(config: PollConfig) -> Self {
        Self {
            running: false,
            cadence: Cadence::new(config),
            timer: None,
            generation: 0,
            run: 0,
            in_flight: false,
            resume_after_fetch: false,
            reset_after_fetch: false,
        }
    }

    fn cancel_timer(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

/// What a settled fetch hands back to the caller-supplied hooks
enum Delivery<S> {
    Snapshot(S, Activity),
    Failure(anyhow::Error),
    Nothing,
}

impl<S: Serialize + Send + 'static> Poller<S> {
    /// Start building a poller around a fetch operation
    pub fn builder<F, Fut>(config: PollConfig, fetch: F) -> PollerBuilder<S>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<S>>> + Send + 'static,
    {
        PollerBuilder {
            name: "poller".to_string(),
            config,
            fetch: Box::new(move || Box::pin(fetch()) as FetchFuture<S>),
            gate: None,
            on_snapshot: None,
            on_error: None,
        }
    }

    /// Begin polling with an immediate tick. No-op if already running.
    pub fn start(&self) {
        let mut state = self.inner.lock();
        if state.running {
            return;
        }
        state.running = true;
        state.run = state.run.wrapping_add(1);
        state.cadence.reset();
        state.reset_after_fetch = false;

        if state.in_flight {
            // A fetch from the previous run is still out; tick once it lands.
            state.resume_after_fetch = true;
        } else {
            Inner::schedule(&self.inner, &mut state, Duration::ZERO);
        }
        info!("{} started", self.inner.name);
    }

    /// Stop polling and cancel the pending tick. Idempotent.
    ///
    /// A fetch already in flight completes, but its result is dropped.
    pub fn stop(&self) {
        let mut state = self.inner.lock();
        let was_running = state.running;
        state.running = false;
        state.resume_after_fetch = false;
        state.reset_after_fetch = false;
        state.cancel_timer();
        if was_running {
            info!("{} stopped", self.inner.name);
        }
    }

    /// Go back to the fastest cadence and poll again after the minimum
    /// interval, replacing whatever tick was pending. No-op when stopped.
    pub fn bump_fast(&self) {
        let mut state = self.inner.lock();
        if !state.running {
            return;
        }
        state.cadence.reset();
        if state.in_flight {
            state.reset_after_fetch = true;
        } else {
            let delay = state.cadence.interval();
            Inner::schedule(&self.inner, &mut state, delay);
        }
        debug!("{} bumped to fast cadence", self.inner.name);
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock().running
    }

    /// Delay the poller will use after the next settled fetch
    pub fn current_interval(&self) -> Duration {
        self.inner.lock().cadence.interval()
    }
}

impl<S: Serialize + Send + 'static> Inner<S> {
    fn lock(&self) -> MutexGuard<'_, PollerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn schedule(inner: &Arc<Self>, state: &mut PollerState, delay: Duration) {
        state.cancel_timer();
        let generation = state.generation;
        let task_inner = Arc::clone(inner);
        state.timer = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Self::tick(task_inner, generation).await;
        }));
    }

    async fn tick(inner: Arc<Self>, generation: u64) {
        {
            let mut state = inner.lock();
            if state.generation != generation {
                return;
            }
            // Dropping our own handle detaches the task; it can no longer be
            // aborted mid-fetch by a later reschedule.
            state.timer = None;
            if !state.running {
                return;
            }
        }

        let open = (inner.gate)();

        let run = {
            let mut state = inner.lock();
            if state.generation != generation || !state.running {
                return;
            }
            if !open {
                let delay = state.cadence.config().max_interval();
                debug!("{} gated off, re-checking in {:?}", inner.name, delay);
                Self::schedule(&inner, &mut state, delay);
                return;
            }
            state.in_flight = true;
            state.run
        };

        let result = (inner.fetch)().await;

        let delivery = {
            let mut state = inner.lock();
            state.in_flight = false;

            if !state.running || state.run != run {
                debug!("{} dropped a poll result that arrived after stop", inner.name);
                if state.running && state.resume_after_fetch {
                    state.resume_after_fetch = false;
                    state.reset_after_fetch = false;
                    Self::schedule(&inner, &mut state, Duration::ZERO);
                }
                return;
            }

            match result {
                Ok(Some(snapshot)) => match Fingerprint::of(&snapshot) {
                    Ok(fingerprint) => {
                        let activity = state.cadence.observe(fingerprint);
                        Delivery::Snapshot(snapshot, activity)
                    }
                    Err(e) => {
                        state.running = false;
                        state.cancel_timer();
                        drop(state);
                        error!("{} stopped: snapshot cannot be fingerprinted: {:#}", inner.name, e);
                        inner.report(&e);
                        return;
                    }
                },
                Ok(None) => Delivery::Nothing,
                Err(e) => {
                    state.cadence.observe_failure();
                    warn!(
                        "{} fetch failed, next attempt in {:?}: {:#}",
                        inner.name,
                        state.cadence.interval(),
                        e
                    );
                    Delivery::Failure(e)
                }
            }
        };

        match delivery {
            Delivery::Snapshot(snapshot, activity) => {
                if let Some(hook) = &inner.on_snapshot {
                    hook(snapshot, activity);
                }
            }
            Delivery::Failure(e) => inner.report(&e),
            Delivery::Nothing => {}
        }

        let mut state = inner.lock();
        // Hooks may have stopped, restarted or bumped the poller already.
        if !state.running || state.run != run || state.timer.is_some() {
            return;
        }
        if state.reset_after_fetch {
            state.reset_after_fetch = false;
            state.cadence.reset();
        }
        let delay = state.cadence.interval();
        Self::schedule(&inner, &mut state, delay);
    }

    fn report(&self, e: &anyhow::Error) {
        if let Some(hook) = &self.on_error {
            hook(e);
        }
    }
}
