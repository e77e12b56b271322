//! Resolution engine: which pending roll does a report belong to, and what happens to it.
//!
//! Pure functions. The tracker applies the verdict.

use crate::domain::{PendingRoll, RollId, RollPhase, RollReport};

/// What to do with one pending roll given one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Fire the continuation with this outcome and drop the roll.
    Resolve(bool),

    /// Retryable failure: keep the roll open for the retry outcome.
    Hold,

    /// Report is not for this roll in its current phase; try the next one.
    Skip,
}

/// Does an event actor id refer to the roll's subject?
///
/// Ids come as short ids (`actor123`) or fully-qualified paths
/// (`Scene.s1.Token.t1.Actor.actor123`), so containment in either direction
/// counts unless `strict` is set.
pub fn subject_matches(subject_id: &str, actor_id: &str, strict: bool) -> bool {
    if subject_id.is_empty() || actor_id.is_empty() {
        return false;
    }
    if strict {
        return subject_id == actor_id;
    }
    subject_id == actor_id || subject_id.contains(actor_id) || actor_id.contains(subject_id)
}

/// Transition for one roll whose subject already matched.
pub fn decide(phase: RollPhase, retry_eligible: bool, report: &RollReport) -> Verdict {
    match phase {
        RollPhase::AwaitingRetry if report.is_retry_outcome => Verdict::Resolve(report.success),
        RollPhase::AwaitingRetry => Verdict::Skip,
        RollPhase::Pending if report.success => Verdict::Resolve(true),
        RollPhase::Pending if report.retry_available && retry_eligible => Verdict::Hold,
        RollPhase::Pending => Verdict::Resolve(false),
    }
}

/// First roll in queue order that the report applies to.
///
/// Loose heuristic: no disambiguation by skill or topic.
pub fn select<'a>(
    rolls: impl IntoIterator<Item = &'a PendingRoll>,
    report: &RollReport,
    strict: bool,
) -> Option<(RollId, Verdict)> {
    rolls
        .into_iter()
        .filter(|roll| !roll.is_resolved())
        .filter(|roll| subject_matches(&roll.subject_id, &report.actor_id, strict))
        .map(|roll| (roll.id, decide(roll.phase, roll.retry_eligible, report)))
        .find(|(_, verdict)| *verdict != Verdict::Skip)
}
