//! Pure string helpers for chat replies and model output.

use serde_json::{Map, Value};

use crate::constants::MESSAGE_TRUNCATE_SUFFIX;

/// Cap `content` at `limit` characters, replacing the tail with `...`.
///
/// Counts Unicode scalar values, not bytes.
///
/// # Examples
///
/// ```
/// use famcal_domain::utils::text::fit_message;
///
/// assert_eq!(fit_message("short", 10), "short");
/// assert_eq!(fit_message("abcdefghij", 6), "abc...");
/// ```
#[must_use]
pub fn fit_message(content: &str, limit: usize) -> String {
    if content.chars().count() <= limit {
        return content.to_string();
    }
    let keep = limit.saturating_sub(MESSAGE_TRUNCATE_SUFFIX.chars().count());
    let mut truncated: String = content.chars().take(keep).collect();
    truncated.push_str(MESSAGE_TRUNCATE_SUFFIX);
    truncated
}

/// Find a JSON object in free text, e.g. a model reply that wraps the
/// object in prose or a Markdown code fence.
///
/// Tries the whole text first, then the span from the first `{` to the
/// last `}`. Only objects are returned.
///
/// # Examples
///
/// ```
/// use famcal_domain::utils::text::extract_json_object;
///
/// let found = extract_json_object("結果です\n{\"action\":\"list\"}\nよろしく").unwrap();
/// assert_eq!(found["action"], "list");
/// assert!(extract_json_object("no json here").is_none());
/// ```
#[must_use]
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let trimmed = strip_code_fence(text.trim());

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return Some(map);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Fold full-width digits and date punctuation (`１９：３０`, `２／２０`) to
/// their ASCII forms. Everything else passes through untouched.
///
/// # Examples
///
/// ```
/// use famcal_domain::utils::text::fold_fullwidth;
///
/// assert_eq!(fold_fullwidth("明日１９：３０"), "明日19:30");
/// assert_eq!(fold_fullwidth("２０２６／２／２０"), "2026/2/20");
/// ```
#[must_use]
pub fn fold_fullwidth(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(u32::from(c) - FULLWIDTH_OFFSET).unwrap_or(c),
            '：' => ':',
            '／' => '/',
            '－' | '−' => '-',
            '　' => ' ',
            other => other,
        })
        .collect()
}

/// Distance from a full-width ASCII variant to its ASCII form.
const FULLWIDTH_OFFSET: u32 = 0xFEE0;

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
