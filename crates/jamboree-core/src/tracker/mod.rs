//! Skill roll tracker
//!
//! Correlates chat messages produced by the host's own dice roller with rolls
//! a caller is waiting on.
//!
//! # Flow
//! 1. `queue_roll()` registers a PendingRoll, mirrors it to the flag store and arms its timeout
//! 2. the host posts a chat message, which arrives at `handle_event()`
//! 3. the correlator turns it into a `RollReport`; the engine picks the roll and a verdict
//! 4. Resolve fires the continuation once; Hold waits for a retry or the timeout
//! 5. `sweep_stale()` periodically clears out old rolls
//!
//! # Locking
//! State sits behind one `tokio::sync::Mutex`. Continuations are always
//! called after the guard is dropped, so they may call back into the tracker.

pub mod engine;
pub mod mirror;
pub mod store;
mod timeout;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use self::engine::Verdict;
use self::mirror::FlagMirror;
use self::store::PendingRollStore;
use crate::config::TrackerConfig;
use crate::correlator::classify;
use crate::domain::{
    ChatEvent, Continuation, PendingRoll, RollId, RollMetadata, RollPhase, RollReport, RollTopic,
};
use crate::ports::{Clock, FlagStore, IdGenerator, Notifier};

struct TrackerState {
    store: PendingRollStore,
    timers: HashMap<RollId, JoinHandle<()>>,

    /// False after `shutdown()`; events and new rolls are ignored.
    active: bool,
}

impl TrackerState {
    /// Remove a roll and hand back its continuation, if it still had one.
    fn take(&mut self, id: RollId, abort_timer: bool) -> Option<(PendingRoll, Continuation)> {
        let timer = self.timers.remove(&id);
        if abort_timer && let Some(timer) = timer {
            timer.abort();
        }
        let mut roll = self.store.remove(id)?;
        let continuation = roll.take_continuation()?;
        Some((roll, continuation))
    }
}

pub(crate) struct Shared {
    state: Mutex<TrackerState>,
    config: TrackerConfig,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    notifier: Arc<dyn Notifier>,
    flags: Arc<dyn FlagStore>,
    mirror: FlagMirror,
}

/// Cheap-to-clone handle; all clones share one store.
#[derive(Clone)]
pub struct SkillRollTracker {
    shared: Arc<Shared>,
}

impl SkillRollTracker {
    /// Use `app::TrackerBuilder` unless you are wiring ports by hand.
    ///
    /// Must be called inside a tokio runtime (spawns the flag writer).
    pub fn new(
        config: TrackerConfig,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        flags: Arc<dyn FlagStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let mirror = FlagMirror::spawn(flags.clone(), config.flag_namespace.clone());
        let store = PendingRollStore::new(mirror.clone());
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(TrackerState {
                    store,
                    timers: HashMap::new(),
                    active: true,
                }),
                config,
                clock,
                ids,
                notifier,
                flags,
                mirror,
            }),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.shared.config
    }

    /// Start tracking a roll. The continuation fires exactly once, with the
    /// outcome, or with `false` when the timeout wins.
    ///
    /// After `shutdown()` the roll is not tracked and the continuation is
    /// dropped unfired.
    pub async fn queue_roll(
        &self,
        subject_id: impl Into<String>,
        skill: impl Into<String>,
        topic: RollTopic,
        continuation: Continuation,
        retry_eligible: bool,
    ) -> RollId {
        let id = self.shared.ids.generate_roll_id();
        let roll = PendingRoll::new(
            id,
            subject_id,
            skill,
            topic,
            self.shared.clock.now(),
            retry_eligible,
            continuation,
        );

        let mut state = self.shared.state.lock().await;
        if !state.active {
            warn!(roll_id = %id, "tracker is shut down, roll not tracked");
            return id;
        }

        debug!(
            roll_id = %id,
            subject = %roll.subject_id,
            skill = %roll.skill,
            topic = %topic,
            retry_eligible,
            "queued skill roll"
        );
        state.store.insert(roll);
        let timer = timeout::spawn(
            Arc::downgrade(&self.shared),
            id,
            self.shared.config.roll_timeout(),
        );
        state.timers.insert(id, timer);
        id
    }

    /// Feed one host chat message through the correlator.
    pub async fn handle_event(&self, event: &ChatEvent) {
        if let Some(report) = classify(event, &self.shared.config.labels) {
            self.handle_report(report).await;
        }
    }

    /// Apply an already-classified report.
    pub async fn handle_report(&self, report: RollReport) {
        let fired = {
            let mut state = self.shared.state.lock().await;
            if !state.active {
                return;
            }

            let strict = self.shared.config.strict_subject_match;
            match engine::select(state.store.iter(), &report, strict) {
                None => {
                    debug!(actor = %report.actor_id, "no pending roll for this actor");
                    None
                }
                Some((id, Verdict::Hold)) => {
                    if let Some(roll) = state.store.get_mut(id) {
                        roll.await_retry();
                    }
                    debug!(roll_id = %id, actor = %report.actor_id, "failed roll can be pushed, waiting");
                    None
                }
                Some((id, Verdict::Resolve(success))) => state
                    .take(id, true)
                    .map(|(roll, continuation)| (roll, continuation, success)),
                // select never yields Skip
                Some((_, Verdict::Skip)) => None,
            }
        };

        if let Some((roll, continuation, success)) = fired {
            info!(
                roll_id = %roll.id,
                subject = %roll.subject_id,
                topic = %roll.topic,
                success,
                retry = report.is_retry_outcome,
                "skill roll resolved"
            );
            continuation(success);
        }
    }

    /// Resolve a roll directly. No-op if it is already gone.
    pub async fn resolve(&self, id: RollId, success: bool) {
        let fired = self.shared.state.lock().await.take(id, true);
        if let Some((_, continuation)) = fired {
            debug!(roll_id = %id, success, "skill roll resolved by caller");
            continuation(success);
        }
    }

    /// Timeout path: fail the roll and tell the user.
    pub(crate) async fn expire(&self, id: RollId) {
        let fired = self.shared.state.lock().await.take(id, false);
        let Some((roll, continuation)) = fired else {
            return;
        };

        warn!(
            roll_id = %id,
            subject = %roll.subject_id,
            skill = %roll.skill,
            phase = ?roll.phase,
            "skill roll timed out"
        );
        self.shared.notifier.warn(&format!(
            "No result seen for the {} roll within {} seconds; counting it as a failure.",
            roll.skill, self.shared.config.roll_timeout_secs
        ));
        continuation(false);
    }

    /// Drop rolls older than the staleness window, plus persisted entries no
    /// live roll backs. Returns how many entries went.
    ///
    /// A swept roll whose continuation hasn't fired yet is failed here, so
    /// every continuation still fires exactly once.
    pub async fn sweep_stale(&self) -> usize {
        let now = self.shared.clock.now();
        let Some(cutoff) = self
            .shared
            .config
            .stale_after()
            .and_then(|window| now.checked_sub_signed(window))
        else {
            warn!(
                stale_after_secs = self.shared.config.stale_after_secs,
                "staleness window out of range, skipping sweep"
            );
            return 0;
        };

        let (swept, unfired) = {
            let mut state = self.shared.state.lock().await;
            let stale = state.store.created_before(cutoff);
            let unfired: Vec<_> = stale
                .iter()
                .filter_map(|id| state.take(*id, true))
                .collect();
            (stale.len(), unfired)
        };

        for (roll, continuation) in unfired {
            warn!(
                roll_id = %roll.id,
                subject = %roll.subject_id,
                skill = %roll.skill,
                "stale skill roll swept before resolving"
            );
            continuation(false);
        }

        let orphans = self.sweep_orphaned_flags(cutoff).await;
        let removed = swept + orphans;
        if removed > 0 {
            debug!(rolls = swept, flags = orphans, "swept stale pending rolls");
        }
        removed
    }

    /// Persisted entries from earlier sessions. Listing happens outside the lock.
    async fn sweep_orphaned_flags(&self, cutoff: DateTime<Utc>) -> usize {
        // rolls removed above must not show up as orphans
        self.shared.mirror.flush().await;
        let entries = match self.shared.flags.entries(&self.shared.config.flag_namespace).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "could not list pending roll flags");
                return 0;
            }
        };

        let state = self.shared.state.lock().await;
        let orphans = store::orphaned_keys(entries, cutoff, |id| state.store.contains(id));
        let count = orphans.len();
        for key in orphans {
            state.store.unset_flag(key);
        }
        count
    }

    /// Wait until every persisted-flag write issued so far has been applied.
    pub async fn flush_flags(&self) {
        self.shared.mirror.flush().await;
    }

    /// Stop tracking: clear in-memory rolls, cancel timers, ignore further events.
    pub async fn shutdown(&self) {
        let mut state = self.shared.state.lock().await;
        state.active = false;
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
        let dropped = state.store.clear();
        debug!(dropped = dropped.len(), "skill roll tracker shut down");
    }

    pub async fn is_active(&self) -> bool {
        self.shared.state.lock().await.active
    }

    pub async fn pending_count(&self) -> usize {
        self.shared.state.lock().await.store.len()
    }

    pub async fn phase(&self, id: RollId) -> Option<RollPhase> {
        self.shared.state.lock().await.store.get(id).map(|r| r.phase)
    }

    /// Metadata of every in-flight roll, in queue order.
    pub async fn snapshot(&self) -> Vec<RollMetadata> {
        let state = self.shared.state.lock().await;
        state.store.iter().map(PendingRoll::metadata).collect()
    }
}
