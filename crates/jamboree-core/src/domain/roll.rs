//! Pending roll record: correlation metadata + continuation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::RollId;
use super::topic::RollTopic;

/// Single-use callback receiving the boolean outcome of a tracked roll.
pub type Continuation = Box<dyn FnOnce(bool) + Send + 'static>;

/// Where a pending roll is in its life.
///
/// State transitions:
/// - Pending -> (resolved, removed)
/// - Pending -> AwaitingRetry -> (resolved, removed)
///
/// "Resolved" is not a variant: a resolved roll no longer exists in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollPhase {
    /// Waiting for the first correlating chat event.
    Pending,

    /// A retryable failure was seen; waiting for the retry outcome or the timeout.
    AwaitingRetry,
}

/// In-memory record of one tracked roll.
///
/// Design:
/// - The store owns these; everything else holds `RollId` only.
/// - The continuation is an `Option` so it can be taken exactly once.
pub struct PendingRoll {
    pub id: RollId,

    /// Actor the event is expected from (short id or fully-qualified path).
    pub subject_id: String,

    /// Skill label as the caller asked for it.
    pub skill: String,

    pub topic: RollTopic,
    pub created_at: DateTime<Utc>,

    /// If false the roll never enters `AwaitingRetry`.
    pub retry_eligible: bool,

    pub phase: RollPhase,

    continuation: Option<Continuation>,
}

impl PendingRoll {
    pub fn new(
        id: RollId,
        subject_id: impl Into<String>,
        skill: impl Into<String>,
        topic: RollTopic,
        created_at: DateTime<Utc>,
        retry_eligible: bool,
        continuation: Continuation,
    ) -> Self {
        Self {
            id,
            subject_id: subject_id.into(),
            skill: skill.into(),
            topic,
            created_at,
            retry_eligible,
            phase: RollPhase::Pending,
            continuation: Some(continuation),
        }
    }

    /// Hold the roll open for a possible retry.
    pub fn await_retry(&mut self) {
        self.phase = RollPhase::AwaitingRetry;
    }

    /// Take the continuation out. Returns `None` on every call after the first.
    pub fn take_continuation(&mut self) -> Option<Continuation> {
        self.continuation.take()
    }

    pub fn is_resolved(&self) -> bool {
        self.continuation.is_none()
    }

    /// Serializable copy for the persisted flag area.
    pub fn metadata(&self) -> RollMetadata {
        RollMetadata {
            id: self.id.to_string(),
            subject_id: self.subject_id.clone(),
            skill: self.skill.clone(),
            topic: self.topic,
            created_at: self.created_at,
        }
    }
}

impl fmt::Debug for PendingRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRoll")
            .field("id", &self.id)
            .field("subject_id", &self.subject_id)
            .field("skill", &self.skill)
            .field("topic", &self.topic)
            .field("created_at", &self.created_at)
            .field("retry_eligible", &self.retry_eligible)
            .field("phase", &self.phase)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// What gets mirrored into the per-user flag area. Never the continuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollMetadata {
    pub id: String,
    pub subject_id: String,
    pub skill: String,
    pub topic: RollTopic,
    pub created_at: DateTime<Utc>,
}
