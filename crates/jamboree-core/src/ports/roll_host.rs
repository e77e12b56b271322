//! RollHost port - ask the host UI to run a skill check
//!
//! The host rolls on its own schedule and reports back through a chat
//! message, so this call only starts the roll.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Actor, TrackerError};

/// How the host addresses the check, which differs per ruleset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum CheckHandle {
    /// Skill lives on the actor as an item (Dragonbane).
    Item(String),

    /// Skill is a key under the actor's system data (dnd5e, pf2e, Forbidden Lands).
    SkillKey(String),

    /// Unknown ruleset: hand the raw name over and let the host figure it out.
    Name(String),
}

#[async_trait]
pub trait RollHost: Send + Sync {
    async fn open_skill_check(&self, actor: &Actor, check: CheckHandle) -> Result<(), TrackerError>;
}
