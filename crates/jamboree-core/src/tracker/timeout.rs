//! Timeout guard: one sleeping task per roll.
//!
//! Races the event path. Whoever takes the roll out of the store first fires
//! the continuation; the loser finds nothing and returns.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::{Shared, SkillRollTracker};
use crate::domain::RollId;

pub(crate) fn spawn(shared: Weak<Shared>, id: RollId, after: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        // tracker dropped while we slept: nothing left to resolve
        let Some(shared) = shared.upgrade() else {
            return;
        };
        SkillRollTracker { shared }.expire(id).await;
    })
}
