//! D&D 5e: `system.skills.<key>` with `total` / `mod`; d20 + modifier vs DC.

use rand::{Rng, RngCore};

use super::{DEFAULT_DC, as_speed, field, first_int};
use crate::domain::Actor;
use crate::ports::{CheckHandle, CheckResult, SkillProvider};

const DEFAULT_WALK: u32 = 30;

#[derive(Debug, Default, Clone, Copy)]
pub struct Dnd5eProvider;

impl Dnd5eProvider {
    pub fn new() -> Self {
        Self
    }

    fn skill<'a>(&self, actor: &'a Actor, skill: &str) -> Option<&'a serde_json::Value> {
        field(field(&actor.system, "skills")?, &skill.to_lowercase())
    }
}

impl SkillProvider for Dnd5eProvider {
    fn system_id(&self) -> &'static str {
        "dnd5e"
    }

    fn read_skill_value(&self, actor: &Actor, skill: &str) -> Option<i64> {
        first_int(self.skill(actor, skill)?, &["total", "mod"])
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
        self.skill(actor, skill).is_some()
    }

    fn check_handle(&self, actor: &Actor, skill: &str) -> Option<CheckHandle> {
        self.has_skill(actor, skill)
            .then(|| CheckHandle::SkillKey(skill.to_lowercase()))
    }

    fn speed(&self, actor: &Actor, _mounted: bool) -> u32 {
        field(&actor.system, "attributes")
            .and_then(|a| field(a, "movement"))
            .and_then(|m| first_int(m, &["walk"]))
            .and_then(as_speed)
            .unwrap_or(DEFAULT_WALK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn ranger() -> Actor {
        Actor::new("a1", "Ranger").with_system(json!({
            "skills": {
                "sur": {"total": 6, "mod": 2},
                "prc": {"mod": 3}
            },
            "attributes": {"movement": {"walk": 35}}
        }))
    }

    #[test]
    fn total_wins_over_mod() {
        let p = Dnd5eProvider::new();
        assert_eq!(p.skill_value(&ranger(), "SUR"), Some(6));
        assert_eq!(p.skill_value(&ranger(), "prc"), Some(3));
        assert_eq!(p.skill_value(&ranger(), "ath"), None);
    }

    #[test]
    fn check_handle_is_lowercase_key() {
        let p = Dnd5eProvider::new();
        assert_eq!(
            p.check_handle(&ranger(), "Sur"),
            Some(CheckHandle::SkillKey("sur".to_string()))
        );
        assert!(p.check_handle(&ranger(), "ath").is_none());
    }

    #[test]
    fn checks_add_modifier_against_dc() {
        let p = Dnd5eProvider::new();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let r = p.perform_check(&ranger(), "sur", &mut rng);
            assert!((7..=26).contains(&r.total));
            assert_eq!(r.success, r.total >= DEFAULT_DC);
            assert_eq!(r.critical_success, r.total == 26);
            assert_eq!(r.critical_failure, r.total == 7);
        }
    }

    #[test]
    fn speed_reads_walk_or_defaults() {
        let p = Dnd5eProvider::new();
        assert_eq!(p.speed(&ranger(), false), 35);
        assert_eq!(p.speed(&Actor::new("a2", "Nobody"), true), 30);
    }
}
