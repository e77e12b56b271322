//! Markup boundary: the only place that knows what roll messages look like.
//!
//! The ruleset's dice roller renders something like
//!
//! ```text
//! <div class="skill-roll" data-actor-id="actor123" data-skill-id="bushcraft"
//!      data-target="15" data-result="10">DoD.roll.success</div>
//! ```
//!
//! We do not build a DOM. The first opening tag that is either a
//! `.skill-roll` or carries `data-actor-id` is the roll element, and its
//! attributes are read with a regex.

use std::sync::LazyLock;

use regex_lite::Regex;

// quoted attribute values may contain '>'
static OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[A-Za-z][A-Za-z0-9-]*(?:\s(?:[^>"']|"[^"]*"|'[^']*')*)?>"#)
        .expect("static regex")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("static regex")
});

/// Attributes and text of one roll message, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollMarkup<'a> {
    pub actor_id: Option<String>,
    pub skill_id: Option<String>,
    pub result: Option<i64>,
    pub target: Option<i64>,

    /// Whole message, for marker searches.
    pub content: &'a str,
}

/// Quick filter: only messages the dice roller produced are worth parsing.
pub fn looks_like_roll(content: &str) -> bool {
    content.contains("skill-roll") || content.contains("data-skill-id")
}

/// Read the roll element out of `content`.
///
/// `None` means "not a roll message we understand". That is never an error.
pub fn parse_roll_markup(content: &str) -> Option<RollMarkup<'_>> {
    if !looks_like_roll(content) {
        return None;
    }

    let attrs = OPEN_TAG
        .find_iter(content)
        .map(|tag| attributes(tag.as_str()))
        .find(|attrs| is_roll_element(attrs))?;

    let lookup = |name: &str| {
        attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    };

    Some(RollMarkup {
        actor_id: lookup("data-actor-id").filter(|v| !v.is_empty()),
        skill_id: lookup("data-skill-id").filter(|v| !v.is_empty()),
        result: lookup("data-result").and_then(|v| v.trim().parse().ok()),
        target: lookup("data-target").and_then(|v| v.trim().parse().ok()),
        content,
    })
}

fn attributes(tag: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(tag)
        .map(|c| {
            let value = c.get(2).or_else(|| c.get(3)).map_or("", |m| m.as_str());
            (c[1].to_string(), value.to_string())
        })
        .collect()
}

fn is_roll_element(attrs: &[(String, String)]) -> bool {
    attrs.iter().any(|(k, v)| {
        (k.eq_ignore_ascii_case("class") && v.split_whitespace().any(|c| c == "skill-roll"))
            || k.eq_ignore_ascii_case("data-actor-id")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_attributes_of_roll_element() {
        let content = r#"
          <div class="skill-roll"
               data-actor-id="actor123"
               data-skill-id="bushcraft"
               data-target="15"
               data-result="10">
            DoD.roll.success
          </div>"#;
        let markup = parse_roll_markup(content).unwrap();

        assert_eq!(markup.actor_id.as_deref(), Some("actor123"));
        assert_eq!(markup.skill_id.as_deref(), Some("bushcraft"));
        assert_eq!(markup.result, Some(10));
        assert_eq!(markup.target, Some(15));
    }

    #[test]
    fn skips_wrapper_elements() {
        let content = r#"<section class="message"><div class='roll skill-roll' data-result="3"></div></section>"#;
        let markup = parse_roll_markup(content).unwrap();

        assert_eq!(markup.actor_id, None);
        assert_eq!(markup.result, Some(3));
    }

    #[test]
    fn ignores_plain_chat() {
        assert!(parse_roll_markup("<div>Just a regular chat message</div>").is_none());
    }

    #[test]
    fn roll_hint_without_element_is_ignored() {
        // mentions skill-roll in text only
        assert!(parse_roll_markup("<p>no skill-roll here</p>").is_none());
    }

    #[test]
    fn malformed_numbers_are_absent() {
        let content = r#"<div class="skill-roll" data-actor-id="a" data-result="x" data-target=""></div>"#;
        let markup = parse_roll_markup(content).unwrap();
        assert_eq!(markup.result, None);
        assert_eq!(markup.target, None);
    }

    #[test]
    fn angle_bracket_inside_quoted_value() {
        let content = r#"<div class="skill-roll" data-tooltip="a > b" title='x>y' data-actor-id="actor123" data-result="10"></div>"#;
        let markup = parse_roll_markup(content).unwrap();

        assert_eq!(markup.actor_id.as_deref(), Some("actor123"));
        assert_eq!(markup.result, Some(10));
    }
}
