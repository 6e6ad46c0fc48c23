use chrono::{NaiveDate, SecondsFormat, Utc};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Current UTC time as an ISO-8601 string (`2026-03-08T17:04:05.123Z`)
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Today's calendar date in UTC.
///
/// Every date-only comparison in the service (event upcoming/past split,
/// membership expiration) uses this one clock.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// Generate a short record id: base36 milliseconds followed by five random
/// base36 characters (`mbx3k2a1q7f9z`).
///
/// With a prefix the id reads `task_mbx3k2a1q7f9z`.
pub fn record_id(prefix: Option<&str>) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let mut id = to_base36(now_millis().max(0) as u64);
    for _ in 0..5 {
        id.push(BASE36[rng.gen_range(0..36)] as char);
    }
    match prefix {
        Some(p) => format!("{p}_{id}"),
        None => id,
    }
}

/// Parse a stored calendar date.
///
/// Accepts `YYYY-MM-DD` and anything that starts with it (an ISO datetime
/// such as `2026-12-31T00:00:00Z`). Returns `None` for anything else.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let head = value.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Trim a value and drop it when blank
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
