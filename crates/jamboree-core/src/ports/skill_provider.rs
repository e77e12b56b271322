//! SkillProvider port - per-ruleset skill capability
//!
//! One implementation per supported game system, picked once through
//! `systems::SystemRegistry`. Callers never branch on the system id.

use async_trait::async_trait;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::domain::{Actor, TrackerError};
use crate::ports::roll_host::{CheckHandle, RollHost};

/// Skill label meaning "no skill configured for this activity".
pub const NO_SKILL: &str = "none";

pub fn is_no_skill(skill: &str) -> bool {
    skill.is_empty() || skill == NO_SKILL
}

/// Result of a check rolled locally (no host dialog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub total: i64,
    pub success: bool,
    pub critical_success: bool,
    pub critical_failure: bool,
}

impl CheckResult {
    pub fn failed() -> Self {
        Self {
            total: 0,
            success: false,
            critical_success: false,
            critical_failure: false,
        }
    }
}

#[async_trait]
pub trait SkillProvider: Send + Sync {
    /// Host system id this provider was built for ("dragonbane", "dnd5e", ...).
    fn system_id(&self) -> &'static str;

    fn read_skill_value(&self, actor: &Actor, skill: &str) -> Option<i64>;

    fn roll_check(&self, actor: &Actor, skill: &str, rng: &mut dyn RngCore) -> CheckResult;

    fn has_skill(&self, actor: &Actor, skill: &str) -> bool;

    /// How the host should be told to roll `skill`, or `None` if the actor lacks it.
    fn check_handle(&self, actor: &Actor, skill: &str) -> Option<CheckHandle>;

    /// Travel speed, falling back to the configured movement defaults.
    fn speed(&self, actor: &Actor, mounted: bool) -> u32;

    fn skill_value(&self, actor: &Actor, skill: &str) -> Option<i64> {
        if is_no_skill(skill) {
            return None;
        }
        self.read_skill_value(actor, skill)
    }

    fn perform_check(&self, actor: &Actor, skill: &str, rng: &mut dyn RngCore) -> CheckResult {
        if is_no_skill(skill) {
            return CheckResult::failed();
        }
        self.roll_check(actor, skill, rng)
    }

    /// Open the host's roll dialog for `skill` without waiting for the outcome.
    async fn trigger_check(
        &self,
        actor: &Actor,
        skill: &str,
        host: &dyn RollHost,
    ) -> Result<(), TrackerError> {
        let handle = self
            .check_handle(actor, skill)
            .ok_or_else(|| TrackerError::UnknownSkill {
                actor: actor.name.clone(),
                skill: skill.to_string(),
            })?;
        host.open_skill_check(actor, handle).await
    }
}
