//! RollTopic - what a tracked roll is for.
//!
//! Caller bookkeeping only. Correlation never looks at the topic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollTopic {
    /// First check of an activity (tracking prey, finding a path).
    PrimaryCheck,
    /// Check that only happens after a successful primary (the kill shot).
    FollowupCheck,
    /// Fishing / foraging.
    Gather,
    /// Turning raw food into rations.
    Process,
}

impl RollTopic {
    pub fn as_str(self) -> &'static str {
        match self {
            RollTopic::PrimaryCheck => "primary-check",
            RollTopic::FollowupCheck => "followup-check",
            RollTopic::Gather => "gather",
            RollTopic::Process => "process",
        }
    }
}

impl fmt::Display for RollTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown roll topic: {0}")]
pub struct UnknownTopic(pub String);

impl FromStr for RollTopic {
    type Err = UnknownTopic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary-check" => Ok(RollTopic::PrimaryCheck),
            "followup-check" => Ok(RollTopic::FollowupCheck),
            "gather" => Ok(RollTopic::Gather),
            "process" => Ok(RollTopic::Process),
            other => Err(UnknownTopic(other.to_string())),
        }
    }
}
