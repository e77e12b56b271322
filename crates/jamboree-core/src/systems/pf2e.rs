//! Pathfinder 2e: `system.skills.<key>.totalModifier`; degrees of success at DC ± 10.

use rand::{Rng, RngCore};

use super::{DEFAULT_DC, as_speed, field, first_int};
use crate::domain::Actor;
use crate::ports::{CheckHandle, CheckResult, SkillProvider};

const DEFAULT_SPEED: u32 = 25;

#[derive(Debug, Default, Clone, Copy)]
pub struct Pf2eProvider;

impl Pf2eProvider {
    pub fn new() -> Self {
        Self
    }

    fn skill<'a>(&self, actor: &'a Actor, skill: &str) -> Option<&'a serde_json::Value> {
        field(field(&actor.system, "skills")?, &skill.to_lowercase())
    }
}

impl SkillProvider for Pf2eProvider {
    fn system_id(&self) -> &'static str {
        "pf2e"
    }

    fn read_skill_value(&self, actor: &Actor, skill: &str) -> Option<i64> {
        first_int(self.skill(actor, skill)?, &["totalModifier", "value"])
    }

    fn roll_check(&self, actor: &Actor, skill: &str, rng: &mut dyn RngCore) -> CheckResult {
        if !self.has_skill(actor, skill) {
            return CheckResult::failed();
        }
        let total = rng.gen_range(1..=20) + self.skill_value(actor, skill).unwrap_or(0);
        CheckResult {
            total,
            success: total >= DEFAULT_DC,
            critical_success: total >= DEFAULT_DC + 10,
            critical_failure: total <= DEFAULT_DC - 10,
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
            .and_then(|a| field(a, "speed"))
            .and_then(|s| first_int(s, &["total", "value"]))
            .and_then(as_speed)
            .unwrap_or(DEFAULT_SPEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn scout() -> Actor {
        Actor::new("p1", "Scout").with_system(json!({
            "skills": {"survival": {"totalModifier": 9, "value": 4}},
            "attributes": {"speed": {"value": 30}}
        }))
    }

    #[test]
    fn total_modifier_wins() {
        let p = Pf2eProvider::new();
        assert_eq!(p.skill_value(&scout(), "Survival"), Some(9));
    }

    #[test]
    fn missing_skill_fails_without_rolling() {
        let p = Pf2eProvider::new();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(p.perform_check(&scout(), "arcana", &mut rng), CheckResult::failed());
    }

    #[test]
    fn degrees_of_success() {
        let p = Pf2eProvider::new();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let r = p.perform_check(&scout(), "survival", &mut rng);
            assert!((10..=29).contains(&r.total));
            assert_eq!(r.success, r.total >= 15);
            assert_eq!(r.critical_success, r.total >= 25);
            assert!(!r.critical_failure);
        }
    }

    #[test]
    fn speed_prefers_total_then_value() {
        let p = Pf2eProvider::new();
        assert_eq!(p.speed(&scout(), false), 30);
        assert_eq!(p.speed(&Actor::new("x", "X"), false), 25);
    }
}
