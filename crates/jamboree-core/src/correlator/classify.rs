//! Classification of roll markup into a `RollReport`.
//!
//! Pure: no tracker state is read or written here.
//!
//! Order of rules:
//! 1. explicit success / critical-success marker → success
//! 2. result and target both present → success iff result <= target (roll-under)
//! 3. otherwise failure
//!
//! Independently, `retry_available` and `is_retry_outcome` are derived.

use tracing::debug;

use super::markup::{RollMarkup, parse_roll_markup};
use crate::config::MarkupLabels;
use crate::domain::{ChatEvent, RollReport};

pub fn is_success(markup: &RollMarkup<'_>, labels: &MarkupLabels) -> bool {
    if labels
        .success_markers
        .iter()
        .any(|m| !m.is_empty() && markup.content.contains(m.as_str()))
    {
        return true;
    }
    match (markup.result, markup.target) {
        (Some(result), Some(target)) if result > 0 && target > 0 => result <= target,
        _ => false,
    }
}

/// Retry control present: its class, an actor attribute, and its label.
pub fn has_retry_control(content: &str, labels: &MarkupLabels) -> bool {
    content.contains(labels.retry_control_class.as_str())
        && content.contains("data-actor-id=")
        && labels
            .retry_labels
            .iter()
            .any(|l| !l.is_empty() && content.contains(l.as_str()))
}

/// Turn one chat event into a report, or `None` if it can't be correlated.
pub fn classify(event: &ChatEvent, labels: &MarkupLabels) -> Option<RollReport> {
    let Some(markup) = parse_roll_markup(&event.content) else {
        debug!("chat message is not a skill roll, ignoring");
        return None;
    };

    let Some(actor_id) = markup
        .actor_id
        .clone()
        .or_else(|| event.speaker.actor.clone())
    else {
        debug!("skill roll message carries no actor, ignoring");
        return None;
    };

    let is_retry_outcome = event.flags.is_retry_outcome;
    let success = is_success(&markup, labels);
    let retry_available =
        !success && !is_retry_outcome && has_retry_control(markup.content, labels);

    Some(RollReport {
        actor_id,
        skill_id: markup.skill_id.clone(),
        success,
        retry_available,
        is_retry_outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn roll_div(result: i64, target: i64, body: &str) -> String {
        format!(
            r#"<div class="skill-roll" data-actor-id="actor123" data-skill-id="bushcraft" data-target="{target}" data-result="{result}">{body}</div>"#
        )
    }

    const PUSH_BUTTON: &str =
        r#"<button class="chat-button push-roll" data-actor-id="actor123">DoD.roll.pushButtonLabel</button>"#;

    #[rstest]
    #[case::success_marker(18, 15, "DoD.roll.success", true)]
    #[case::dragon_marker(1, 15, "DoD.roll.dragon", true)]
    #[case::under_target(10, 15, "", true)]
    #[case::equal_target(15, 15, "", true)]
    #[case::over_target(18, 15, "", false)]
    #[case::demon(20, 15, "DoD.roll.demon", false)]
    #[case::failure_marker(18, 15, "DoD.roll.failure", false)]
    fn success_classification(
        #[case] result: i64,
        #[case] target: i64,
        #[case] body: &str,
        #[case] expected: bool,
    ) {
        let event = ChatEvent::new(roll_div(result, target, body));
        let report = classify(&event, &MarkupLabels::default()).unwrap();
        assert_eq!(report.success, expected);
        assert_eq!(report.actor_id, "actor123");
        assert_eq!(report.skill_id.as_deref(), Some("bushcraft"));
    }

    #[test]
    fn missing_numbers_fall_back_to_failure() {
        let event = ChatEvent::new(r#"<div class="skill-roll" data-actor-id="a"></div>"#);
        let report = classify(&event, &MarkupLabels::default()).unwrap();
        assert!(!report.success);
    }

    #[test]
    fn zero_values_are_not_well_formed() {
        let event = ChatEvent::new(
            r#"<div class="skill-roll" data-actor-id="a" data-result="0" data-target="15"></div>"#,
        );
        assert!(!classify(&event, &MarkupLabels::default()).unwrap().success);
    }

    #[test]
    fn failed_roll_with_push_button_is_retryable() {
        let event = ChatEvent::new(roll_div(18, 15, &format!("DoD.roll.failure {PUSH_BUTTON}")));
        let report = classify(&event, &MarkupLabels::default()).unwrap();
        assert!(!report.success);
        assert!(report.retry_available);
        assert!(!report.is_retry_outcome);
    }

    #[test]
    fn retry_outcome_is_never_retryable_again() {
        let event = ChatEvent::new(roll_div(18, 15, PUSH_BUTTON)).as_retry_outcome();
        let report = classify(&event, &MarkupLabels::default()).unwrap();
        assert!(report.is_retry_outcome);
        assert!(!report.retry_available);
    }

    #[test]
    fn localized_retry_label_is_recognized() {
        let labels = MarkupLabels::default().with_localized(&["Success"], "Push");
        let button = r#"<button class="push-roll" data-actor-id="actor123">Push</button>"#;
        let event = ChatEvent::new(roll_div(18, 15, button));
        assert!(classify(&event, &labels).unwrap().retry_available);
        assert!(!classify(&event, &MarkupLabels::default()).unwrap().retry_available);
    }

    #[test]
    fn retry_control_without_label_is_not_enough() {
        let button = r#"<button class="push-roll" data-actor-id="actor123"></button>"#;
        let event = ChatEvent::new(roll_div(18, 15, button));
        assert!(!classify(&event, &MarkupLabels::default()).unwrap().retry_available);
    }

    #[test]
    fn speaker_fills_in_missing_actor() {
        let event = ChatEvent::new(r#"<div class="skill-roll" data-result="3" data-target="10"></div>"#)
            .with_speaker("actor9");
        let report = classify(&event, &MarkupLabels::default()).unwrap();
        assert_eq!(report.actor_id, "actor9");
        assert!(report.success);
    }

    #[test]
    fn no_actor_anywhere_is_ignored() {
        let event = ChatEvent::new(r#"<div class="skill-roll" data-result="3" data-target="10"></div>"#);
        assert!(classify(&event, &MarkupLabels::default()).is_none());
    }
}
