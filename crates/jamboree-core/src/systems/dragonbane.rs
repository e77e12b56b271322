//! Dragonbane: skills are items, checks roll a d20 under the skill value.
//!
//! A 1 ("dragon") always succeeds, a 20 ("demon") always fails.

use rand::{Rng, RngCore};

use super::as_int;
use crate::config::MovementDefaults;
use crate::domain::{Actor, ActorItem};
use crate::ports::{CheckHandle, CheckResult, SkillProvider};

const SKILL_ITEM: &str = "skill";

pub struct DragonbaneProvider {
    movement: MovementDefaults,
}

impl DragonbaneProvider {
    pub fn new(movement: MovementDefaults) -> Self {
        Self { movement }
    }

    fn skill_item<'a>(&self, actor: &'a Actor, skill: &str) -> Option<&'a ActorItem> {
        actor.find_item(SKILL_ITEM, skill)
    }
}

impl SkillProvider for DragonbaneProvider {
    fn system_id(&self) -> &'static str {
        "dragonbane"
    }

    fn read_skill_value(&self, actor: &Actor, skill: &str) -> Option<i64> {
        let item = self.skill_item(actor, skill)?;
        super::field(&item.system, "value").and_then(as_int)
    }

    fn roll_check(&self, actor: &Actor, skill: &str, rng: &mut dyn RngCore) -> CheckResult {
        let target = self.skill_value(actor, skill).unwrap_or(0);
        let roll: i64 = rng.gen_range(1..=20);
        let dragon = roll == 1;
        let demon = roll == 20;
        CheckResult {
            total: roll,
            success: dragon || (!demon && roll <= target),
            critical_success: dragon,
            critical_failure: demon,
        }
    }

    fn has_skill(&self, actor: &Actor, skill: &str) -> bool {
        self.skill_item(actor, skill).is_some()
    }

    fn check_handle(&self, actor: &Actor, skill: &str) -> Option<CheckHandle> {
        self.skill_item(actor, skill)
            .map(|item| CheckHandle::Item(item.id.clone()))
    }

    fn speed(&self, _actor: &Actor, mounted: bool) -> u32 {
        // not tracked per actor
        if mounted {
            self.movement.mounted
        } else {
            self.movement.on_foot
        }
    }
}
