//! Chat replies for calendar outcomes

use famcal_domain::constants::UNTITLED_EVENT;
use famcal_domain::{CalendarEvent, CalendarOutcome};

/// Render an outcome as a short Japanese chat reply.
pub fn format_outcome(outcome: &CalendarOutcome) -> String {
    match outcome {
        CalendarOutcome::Listed { events } if events.is_empty() => {
            "該当する予定は見つからなかったよ。".to_string()
        }
        CalendarOutcome::Listed { events } => {
            let mut lines = vec![format!("予定を見つけたよ ({}件)", events.len())];
            lines.extend(events.iter().map(event_line));
            lines.join("\n")
        }
        CalendarOutcome::Created { event } => with_link("予定を追加したよ", event),
        CalendarOutcome::Updated { event } => with_link("予定を更新したよ", event),
        CalendarOutcome::Deleted { event_id } => format!("予定を削除したよ (ID: {event_id})"),
    }
}

fn event_line(event: &CalendarEvent) -> String {
    let summary = if event.summary.is_empty() { UNTITLED_EVENT } else { &event.summary };
    let when = match (&event.start, &event.end) {
        (Some(start), Some(end)) => format!("{start} 〜 {end}"),
        (Some(start), None) => start.clone(),
        _ => "日時不明".to_string(),
    };
    let id = event.id.as_deref().unwrap_or("-");
    format!("- {summary} | {when} | ID: {id}")
}

fn with_link(headline: &str, event: &CalendarEvent) -> String {
    let mut text = format!("{headline}\n{}", event_line(event));
    if let Some(link) = &event.html_link {
        text.push('\n');
        text.push_str(link);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_reply_names_each_event() {
        let outcome = CalendarOutcome::Listed {
            events: vec![CalendarEvent::new("abc123", "定例会")
                .with_times("2026-02-12T10:00:00+09:00", "2026-02-12T11:00:00+09:00")],
        };
        let text = format_outcome(&outcome);

        assert!(text.contains("予定を見つけたよ"));
        assert!(text.contains("定例会"));
        assert!(text.contains("abc123"));
        assert!(text.contains("2026-02-12T10:00:00+09:00 〜 2026-02-12T11:00:00+09:00"));
    }

    #[test]
    fn empty_list_has_its_own_reply() {
        let text = format_outcome(&CalendarOutcome::Listed { events: vec![] });
        assert!(!text.contains("予定を見つけたよ"));
    }

    #[test]
    fn created_reply_includes_link() {
        let mut event = CalendarEvent::new("e1", "歯医者");
        event.html_link = Some("https://calendar.example/e1".into());
        let text = format_outcome(&CalendarOutcome::Created { event });

        assert!(text.starts_with("予定を追加したよ"));
        assert!(text.ends_with("https://calendar.example/e1"));
    }

    #[test]
    fn deleted_reply_names_id() {
        let text = format_outcome(&CalendarOutcome::Deleted { event_id: "gone".into() });
        assert_eq!(text, "予定を削除したよ (ID: gone)");
    }
}
