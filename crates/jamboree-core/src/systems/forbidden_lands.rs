//! Forbidden Lands: roll a pool of d6 (skill + base attribute dice), every six is a success.

use rand::{Rng, RngCore};

use super::{field, first_int};
use crate::config::MovementDefaults;
use crate::domain::Actor;
use crate::ports::{CheckHandle, CheckResult, SkillProvider};

/// Attribute dice added to every pool. Attributes aren't read per actor.
const BASE_DICE: i64 = 3;

/// Sixes needed for a critical success.
const CRITICAL_SIXES: i64 = 3;

pub struct ForbiddenLandsProvider {
    movement: MovementDefaults,
}

impl ForbiddenLandsProvider {
    pub fn new(movement: MovementDefaults) -> Self {
        Self { movement }
    }

    fn skill<'a>(&self, actor: &'a Actor, skill: &str) -> Option<&'a serde_json::Value> {
        field(field(&actor.system, "skill")?, &skill.to_lowercase())
    }
}

impl SkillProvider for ForbiddenLandsProvider {
    fn system_id(&self) -> &'static str {
        "forbidden-lands"
    }

    fn read_skill_value(&self, actor: &Actor, skill: &str) -> Option<i64> {
        first_int(self.skill(actor, skill)?, &["value"])
    }

    fn roll_check(&self, actor: &Actor, skill: &str, rng: &mut dyn RngCore) -> CheckResult {
        let dice = (self.skill_value(actor, skill).unwrap_or(0) + BASE_DICE).max(1);
        let mut sixes = 0;
        let mut ones = 0;
        for _ in 0..dice {
            match rng.gen_range(1..=6) {
                6 => sixes += 1,
                1 => ones += 1,
                _ => {}
            }
        }
        CheckResult {
            total: sixes,
            success: sixes > 0,
            critical_success: sixes >= CRITICAL_SIXES,
            critical_failure: sixes == 0 && ones > 0,
        }
    }

    fn has_skill(&self, actor: &Actor, skill: &str) -> bool {
        self.skill(actor, skill).is_some()
    }

    fn check_handle(&self, actor: &Actor, skill: &str) -> Option<CheckHandle> {
        self.has_skill(actor, skill)
            .then(|| CheckHandle::SkillKey(skill.to_lowercase()))
    }

    fn speed(&self, _actor: &Actor, mounted: bool) -> u32 {
        if mounted {
            self.movement.mounted
        } else {
            self.movement.on_foot
        }
    }
}
