//! Actor snapshot handed to skill providers.
//!
//! Rulesets shape `system` very differently, so it stays raw JSON here and
//! each provider reads the paths it knows about.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorItem {
    pub id: String,
    pub name: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub system: Value,
}

impl ActorItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            system: Value::Null,
        }
    }

    pub fn with_system(mut self, system: Value) -> Self {
        self.system = system;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,

    /// Fully-qualified path (`Scene.x.Token.y.Actor.z`) for synthetic token actors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    pub name: String,

    #[serde(default)]
    pub system: Value,

    #[serde(default)]
    pub items: Vec<ActorItem>,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uuid: None,
            name: name.into(),
            system: Value::Null,
            items: Vec::new(),
        }
    }

    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn with_system(mut self, system: Value) -> Self {
        self.system = system;
        self
    }

    pub fn with_item(mut self, item: ActorItem) -> Self {
        self.items.push(item);
        self
    }

    /// Identifier a roll for this actor is tracked under.
    pub fn subject_id(&self) -> &str {
        self.uuid.as_deref().unwrap_or(&self.id)
    }

    /// First item of `kind` whose name matches `name` case-insensitively.
    pub fn find_item(&self, kind: &str, name: &str) -> Option<&ActorItem> {
        self.items
            .iter()
            .find(|item| item.kind == kind && item.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_id_prefers_uuid() {
        let plain = Actor::new("actor123", "Ylva");
        assert_eq!(plain.subject_id(), "actor123");

        let token = plain.with_uuid("Scene.s1.Token.t1.Actor.actor123");
        assert_eq!(token.subject_id(), "Scene.s1.Token.t1.Actor.actor123");
    }

    #[test]
    fn find_item_ignores_case_but_not_kind() {
        let actor = Actor::new("a", "Ylva")
            .with_item(ActorItem::new("i1", "Bushcraft", "skill"))
            .with_item(ActorItem::new("i2", "Awareness", "weapon"));

        assert_eq!(actor.find_item("skill", "bushcraft").unwrap().id, "i1");
        assert!(actor.find_item("skill", "awareness").is_none());
    }
}
