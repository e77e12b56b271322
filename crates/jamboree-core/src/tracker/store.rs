//! Pending-roll store: in-memory records + persisted metadata mirror.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use super::mirror::FlagMirror;
use crate::domain::{PendingRoll, RollId, RollMetadata};

/// Flag key prefix every mirrored roll lives under.
pub const FLAG_PREFIX: &str = "pendingRolls.";

pub fn flag_key(id: RollId) -> String {
    format!("{FLAG_PREFIX}{id}")
}

/// Single source of truth for in-flight rolls.
///
/// Design:
/// - `records` owns the rolls, `order` keeps queue order for first-match correlation.
/// - Every insert / remove is queued onto the flag mirror; nothing here does I/O.
/// - Invariant: `order` and `records` hold exactly the same ids.
pub struct PendingRollStore {
    records: HashMap<RollId, PendingRoll>,
    order: VecDeque<RollId>,
    mirror: FlagMirror,
}

impl PendingRollStore {
    pub fn new(mirror: FlagMirror) -> Self {
        Self {
            records: HashMap::new(),
            order: VecDeque::new(),
            mirror,
        }
    }

    pub fn insert(&mut self, roll: PendingRoll) {
        let id = roll.id;
        self.mirror_insert(&roll.metadata());
        self.records.insert(id, roll);
        self.order.push_back(id);
    }

    /// Take a roll out of both stores. `None` if it was already gone.
    pub fn remove(&mut self, id: RollId) -> Option<PendingRoll> {
        let roll = self.records.remove(&id)?;
        self.order.retain(|x| *x != id);
        self.mirror.unset(flag_key(id));
        Some(roll)
    }

    pub fn get(&self, id: RollId) -> Option<&PendingRoll> {
        self.records.get(&id)
    }

    pub fn get_mut(&mut self, id: RollId) -> Option<&mut PendingRoll> {
        self.records.get_mut(&id)
    }

    /// Rolls in queue order.
    pub fn iter(&self) -> impl Iterator<Item = &PendingRoll> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: RollId) -> bool {
        self.records.contains_key(&id)
    }

    /// Ids of rolls created strictly before `cutoff`.
    pub fn created_before(&self, cutoff: DateTime<Utc>) -> Vec<RollId> {
        self.iter()
            .filter(|r| r.created_at < cutoff)
            .map(|r| r.id)
            .collect()
    }

    /// Drop every in-memory record. The persisted mirror is left alone.
    pub fn clear(&mut self) -> Vec<PendingRoll> {
        self.order.clear();
        self.records.drain().map(|(_, r)| r).collect()
    }

    pub fn unset_flag(&self, key: String) {
        self.mirror.unset(key);
    }

    fn mirror_insert(&self, meta: &RollMetadata) {
        match serde_json::to_value(meta) {
            Ok(value) => self.mirror.set(format!("{FLAG_PREFIX}{}", meta.id), value),
            Err(err) => warn!(roll_id = %meta.id, error = %err, "failed to encode roll metadata"),
        }
    }
}

/// Persisted roll entries older than `cutoff` that `is_live` doesn't know,
/// e.g. leftovers from a previous session. Unreadable entries count as garbage.
pub fn orphaned_keys(
    entries: Vec<(String, Value)>,
    cutoff: DateTime<Utc>,
    is_live: impl Fn(RollId) -> bool,
) -> Vec<String> {
    entries
        .into_iter()
        .filter(|(key, _)| key.starts_with(FLAG_PREFIX))
        .filter(|(key, _)| {
            !key[FLAG_PREFIX.len()..]
                .parse::<RollId>()
                .is_ok_and(&is_live)
        })
        .filter(|(_, value)| {
            serde_json::from_value::<RollMetadata>(value.clone())
                .map(|meta| meta.created_at < cutoff)
                .unwrap_or(true)
        })
        .map(|(key, _)| key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RollTopic;
    use crate::impls::InMemoryFlagStore;
    use crate::ports::FlagStore;
    use chrono::Duration;
    use std::sync::Arc;
    use ulid::Ulid;

    const NS: &str = "journeys-and-jamborees";

    fn roll(subject: &str, created_at: DateTime<Utc>) -> PendingRoll {
        PendingRoll::new(
            RollId::from_ulid(Ulid::new()),
            subject,
            "bushcraft",
            RollTopic::Gather,
            created_at,
            true,
            Box::new(|_| {}),
        )
    }

    fn store() -> (PendingRollStore, FlagMirror, Arc<InMemoryFlagStore>) {
        let flags = Arc::new(InMemoryFlagStore::new());
        let mirror = FlagMirror::spawn(flags.clone(), NS);
        (PendingRollStore::new(mirror.clone()), mirror, flags)
    }

    #[tokio::test]
    async fn insert_and_remove_mirror_flags() {
        let (mut store, mirror, flags) = store();
        let r = roll("actor123", Utc::now());
        let id = r.id;

        store.insert(r);
        mirror.flush().await;
        let stored = flags.get(NS, &flag_key(id)).await.unwrap().unwrap();
        assert_eq!(stored["subjectId"], "actor123");

        assert!(store.remove(id).is_some());
        mirror.flush().await;
        assert!(flags.get(NS, &flag_key(id)).await.unwrap().is_none());
        assert!(store.remove(id).is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn iter_keeps_queue_order() {
        let (mut store, _, _) = store();
        let now = Utc::now();
        let subjects = ["a", "b", "c"];
        for s in subjects {
            store.insert(roll(s, now));
        }
        let seen: Vec<_> = store.iter().map(|r| r.subject_id.as_str()).collect();
        assert_eq!(seen, subjects);
    }

    #[tokio::test]
    async fn created_before_is_strict() {
        let (mut store, _, _) = store();
        let now = Utc::now();
        let old = roll("old", now - Duration::minutes(6));
        let old_id = old.id;
        store.insert(old);
        store.insert(roll("edge", now - Duration::minutes(5)));

        assert_eq!(store.created_before(now - Duration::minutes(5)), vec![old_id]);
    }

    #[test]
    fn orphaned_keys_skip_live_and_fresh_entries() {
        let now = Utc::now();
        let cutoff = now - Duration::minutes(5);
        let live = roll("live", now - Duration::minutes(10));
        let ghost = roll("ghost", now - Duration::minutes(10));
        let fresh = roll("fresh", now);
        let entry = |r: &PendingRoll| {
            (flag_key(r.id), serde_json::to_value(r.metadata()).unwrap())
        };

        let entries = vec![
            entry(&live),
            entry(&ghost),
            entry(&fresh),
            ("pendingRolls.garbled".to_string(), serde_json::json!("???")),
            ("somethingElse".to_string(), serde_json::json!(1)),
        ];
        let live_id = live.id;
        let mut orphans = orphaned_keys(entries, cutoff, |id| id == live_id);
        orphans.sort();

        let mut expected = vec![flag_key(ghost.id), "pendingRolls.garbled".to_string()];
        expected.sort();
        assert_eq!(orphans, expected);
    }
}
