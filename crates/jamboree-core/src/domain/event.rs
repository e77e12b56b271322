//! Chat events coming from the host and their classified form.

use serde::{Deserialize, Serialize};

/// Who the host says posted a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

/// Side-channel flags attached to a message by the ruleset, not visible in its markup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFlags {
    /// The message is the outcome of a pushed / retried roll.
    #[serde(default)]
    pub is_retry_outcome: bool,
}

/// A "chat message created" notification as the host delivers it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    /// Free-form markup rendered by the ruleset's dice roller.
    pub content: String,

    #[serde(default)]
    pub speaker: Speaker,

    #[serde(default)]
    pub flags: EventFlags,
}

impl ChatEvent {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_speaker(mut self, actor: impl Into<String>) -> Self {
        self.speaker.actor = Some(actor.into());
        self
    }

    pub fn as_retry_outcome(mut self) -> Self {
        self.flags.is_retry_outcome = true;
        self
    }
}

/// Typed outcome of one roll message. The resolution engine only ever sees this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollReport {
    pub actor_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_id: Option<String>,

    pub success: bool,
    pub retry_available: bool,
    pub is_retry_outcome: bool,
}

impl RollReport {
    pub fn success(actor_id: impl Into<String>) -> Self {
        Self {
            actor_id: actor_id.into(),
            skill_id: None,
            success: true,
            retry_available: false,
            is_retry_outcome: false,
        }
    }

    pub fn failure(actor_id: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::success(actor_id)
        }
    }

    pub fn retryable(mut self) -> Self {
        self.retry_available = true;
        self
    }

    pub fn from_retry(mut self) -> Self {
        self.is_retry_outcome = true;
        self
    }
}
