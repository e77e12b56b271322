//! SkillCheckService - "roll this skill and tell me if it worked"
//!
//! Opens the host's roll dialog through the ruleset's provider and waits
//! on the tracker for the outcome. Callers just `await` a bool.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::domain::{Actor, RollTopic};
use crate::ports::{Notifier, RollHost, SkillProvider, is_no_skill};
use crate::tracker::SkillRollTracker;

pub struct SkillCheckService {
    tracker: SkillRollTracker,
    provider: Arc<dyn SkillProvider>,
    host: Arc<dyn RollHost>,
    notifier: Arc<dyn Notifier>,
}

impl SkillCheckService {
    pub fn new(
        tracker: SkillRollTracker,
        provider: Arc<dyn SkillProvider>,
        host: Arc<dyn RollHost>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            tracker,
            provider,
            host,
            notifier,
        }
    }

    pub fn tracker(&self) -> &SkillRollTracker {
        &self.tracker
    }

    /// Roll `skill` for `actor` and wait for the host's answer.
    ///
    /// Returns `false` without rolling when the skill is "none" or the actor
    /// doesn't have it. A host that can't open the dialog also counts as a
    /// failure, as does a tracker that was shut down while waiting.
    pub async fn roll_with_tracking(
        &self,
        actor: &Actor,
        skill: &str,
        topic: RollTopic,
        retry_eligible: bool,
    ) -> bool {
        self.begin(actor, skill, topic, retry_eligible)
            .await
            .outcome()
            .await
    }

    /// Queue the roll and open the dialog, without waiting for the result.
    ///
    /// Once this returns the roll is pending in the tracker (or already
    /// settled), so chat messages handled afterwards can match it.
    pub async fn begin(
        &self,
        actor: &Actor,
        skill: &str,
        topic: RollTopic,
        retry_eligible: bool,
    ) -> TrackedRoll {
        if is_no_skill(skill) {
            debug!(actor = %actor.name, %topic, "no skill configured, counting as failure");
            return TrackedRoll::failed();
        }
        if !self.provider.has_skill(actor, skill) {
            warn!(actor = %actor.name, skill, system = self.provider.system_id(), "actor lacks skill");
            self.notifier
                .warn(&format!("{} doesn't have the {} skill.", actor.name, skill));
            return TrackedRoll::failed();
        }

        let (tx, rx) = oneshot::channel();
        let id = self
            .tracker
            .queue_roll(
                actor.subject_id(),
                skill,
                topic,
                Box::new(move |success| {
                    // receiver gone means nobody is waiting any more
                    let _ = tx.send(success);
                }),
                retry_eligible,
            )
            .await;

        self.notifier
            .info(&format!("Waiting for {}'s {} roll...", actor.name, skill));

        if let Err(err) = self
            .provider
            .trigger_check(actor, skill, self.host.as_ref())
            .await
        {
            warn!(roll_id = %id, error = %err, "could not start skill check");
            self.tracker.resolve(id, false).await;
        }

        TrackedRoll { rx: Some(rx) }
    }
}

/// A roll handed to the tracker by `SkillCheckService::begin`.
#[must_use = "a tracked roll does nothing unless its outcome is awaited"]
pub struct TrackedRoll {
    rx: Option<oneshot::Receiver<bool>>,
}

impl TrackedRoll {
    fn failed() -> Self {
        Self { rx: None }
    }

    /// `false` when the roll failed, timed out, or the tracker went away.
    pub async fn outcome(self) -> bool {
        match self.rx {
            Some(rx) => rx.await.unwrap_or(false),
            None => false,
        }
    }
}
