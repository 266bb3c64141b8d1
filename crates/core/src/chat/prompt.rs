//! Prompt and reply text for a chat turn

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, SecondsFormat};

/// Family map first, then the account's global name, then the username.
pub fn resolve_display_name<'a>(
    family: &'a HashMap<String, String>,
    user_id: &str,
    global_name: Option<&'a str>,
    username: &'a str,
) -> &'a str {
    family
        .get(user_id)
        .map(String::as_str)
        .filter(|name| !name.is_empty())
        .or(global_name.filter(|name| !name.is_empty()))
        .unwrap_or(username)
}

/// Prompt sent to the generator and stored in history.
pub fn build_user_prompt(display_name: &str, message: &str) -> String {
    format!("送信者: {display_name}\n内容: {message}")
}

/// Reply body: the original message quoted above the answer.
pub fn quote_reply(message: &str, answer: &str) -> String {
    format!("> {message}\n{answer}")
}

/// Instructions that let the model answer with a calendar intent.
///
/// Prepended to the user prompt only when calendar access is configured.
pub fn calendar_protocol(now: DateTime<FixedOffset>, timezone: &str) -> String {
    let now = now.to_rfc3339_opts(SecondsFormat::Secs, false);
    format!(
        "[カレンダー操作]\n\
現在日時: {now} ({timezone})\n\
予定の確認・追加・変更・削除を頼まれたときは、説明文を付けずに次の形式の JSON だけを返してください。\n\
{{\"action\": \"list\" | \"create\" | \"update\" | \"delete\", \"args\": {{...}}}}\n\
args に使えるキー: event_id, query, time_min, time_max, max_results, summary, start, end, description, location, timezone\n\
- list: time_min, time_max, query, max_results (1〜20)\n\
- create: summary と start は必須。end を省略すると1時間の予定になります。\n\
- update / delete: event_id か query のどちらかで対象を指定します。\n\
日時は \"2026-02-20T19:30:00+09:00\" のような ISO8601 か、\"明日19時\" のような表現で書いてください。\n\
カレンダーと関係のない質問には普段どおり文章で答えてください。\n\
[/カレンダー操作]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_family_map() {
        let mut family = HashMap::new();
        family.insert("111".to_string(), "お母さん".to_string());

        assert_eq!(resolve_display_name(&family, "111", Some("Mom"), "mom_99"), "お母さん");
        assert_eq!(resolve_display_name(&family, "222", Some("Dad"), "dad_42"), "Dad");
        assert_eq!(resolve_display_name(&family, "222", None, "dad_42"), "dad_42");
        assert_eq!(resolve_display_name(&family, "222", Some(""), "dad_42"), "dad_42");
    }

    #[test]
    fn prompt_and_reply_shapes() {
        assert_eq!(build_user_prompt("Alice", "こんにちは"), "送信者: Alice\n内容: こんにちは");
        assert_eq!(quote_reply("質問", "回答"), "> 質問\n回答");
    }

    #[test]
    fn protocol_mentions_current_time_and_contract() {
        let now = DateTime::parse_from_rfc3339("2026-02-11T10:00:00+09:00").unwrap();
        let text = calendar_protocol(now, "Asia/Tokyo");

        assert!(text.contains("2026-02-11T10:00:00+09:00 (Asia/Tokyo)"));
        assert!(text.contains("\"action\""));
        assert!(text.contains("event_id"));
    }
}
