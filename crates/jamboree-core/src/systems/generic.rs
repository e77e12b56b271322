//! Fallback for rulesets without a dedicated provider.
//!
//! Looks the skill up under `system.skills`, `system.abilities` and
//! `system.attributes` (first hit wins) and rolls d20 + value against the DC.

use rand::{Rng, RngCore};
use serde_json::Value;

use super::{DEFAULT_DC, as_int, as_speed, field, first_int};
use crate::config::MovementDefaults;
use crate::domain::Actor;
use crate::ports::{CheckHandle, CheckResult, SkillProvider};

const SKILL_BLOCKS: [&str; 3] = ["skills", "abilities", "attributes"];

pub struct GenericProvider {
    movement: MovementDefaults,
}

impl GenericProvider {
    pub fn new(movement: MovementDefaults) -> Self {
        Self { movement }
    }

    fn skill<'a>(&self, actor: &'a Actor, skill: &str) -> Option<&'a Value> {
        SKILL_BLOCKS
            .iter()
            .find_map(|block| field(field(&actor.system, block)?, skill))
    }
}

impl SkillProvider for GenericProvider {
    fn system_id(&self) -> &'static str {
        "generic"
    }

    fn read_skill_value(&self, actor: &Actor, skill: &str) -> Option<i64> {
        let entry = self.skill(actor, skill)?;
        as_int(entry).or_else(|| first_int(entry, &["value", "total", "mod"]))
    }

    fn roll_check(&self, actor: &Actor, skill: &str, rng: &mut dyn RngCore) -> CheckResult {
        let natural: i64 = rng.gen_range(1..=20);
        let total = natural + self.skill_value(actor, skill).unwrap_or(0);
        CheckResult {
            total,
            success: total >= DEFAULT_DC,
            critical_success: natural == 20,
            critical_failure: natural == 1,
        }
    }

    fn has_skill(&self, actor: &Actor, skill: &str) -> bool {
        self.read_skill_value(actor, skill).is_some()
    }

    fn check_handle(&self, actor: &Actor, skill: &str) -> Option<CheckHandle> {
        self.has_skill(actor, skill)
            .then(|| CheckHandle::Name(skill.to_string()))
    }

    fn speed(&self, actor: &Actor, mounted: bool) -> u32 {
        let system = &actor.system;
        let from_actor = field(system, "attributes")
            .and_then(|a| field(a, "speed"))
            .or_else(|| field(system, "movement").and_then(|m| field(m, "speed")))
            .or_else(|| field(system, "speed"))
            .and_then(|v| as_int(v).or_else(|| first_int(v, &["value", "total"])))
            .and_then(as_speed);

        match from_actor {
            Some(speed) => speed,
            None if mounted => self.movement.mounted,
            None => self.movement.on_foot,
        }
    }
}
