//! Roster CSV parsing
//!
//! Two layouts are accepted:
//! - standard: `name,email,memberType,joinDate,expirationDate`
//! - Google Form export: `Timestamp,Email,First Name,Last Name,<Membership column>`
//!
//! The dialect is deliberately small: one record per line, `"` toggles
//! quoting, commas split fields outside quotes, every field is trimmed.

use chrono::{DateTime, Datelike, NaiveDate};
use shared::models::MemberTier;
use shared::util::parse_calendar_date;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("CSV must have header row and at least one data row")]
    TooShort,

    #[error(
        "Unrecognized CSV format. Expected either Google Form export (Timestamp, Email, First Name, Last Name, Membership) or standard format (name, email, memberType, joinDate, expirationDate)"
    )]
    UnrecognizedFormat,

    #[error("No valid member rows found in CSV")]
    NoRows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
    Standard,
    /// Membership expires at the end of `membership_year`
    GoogleForm { membership_year: i32 },
}

/// One usable roster line, normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    pub name: String,
    pub email: String,
    pub member_type: MemberTier,
    pub join_date: String,
    pub expiration_date: String,
}

/// Split one CSV line into trimmed fields
pub fn parse_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    values.push(current.trim().to_string());
    values
}

/// First `20xx` in a header, e.g. "Annual Membership 2026"
fn year_in_header(header: &str) -> Option<i32> {
    let bytes = header.as_bytes();
    bytes.windows(4).find_map(|w| {
        if w[0] == b'2' && w[1] == b'0' && w[2].is_ascii_digit() && w[3].is_ascii_digit() {
            std::str::from_utf8(w).ok()?.parse().ok()
        } else {
            None
        }
    })
}

fn is_membership_header(header: &str) -> bool {
    header.contains("membership") || header.contains("annual")
}

/// Detect the layout from lowercased headers
pub fn detect_format(raw_headers: &[String], today: NaiveDate) -> Result<RosterFormat, RosterError> {
    let headers: Vec<String> = raw_headers.iter().map(|h| h.to_lowercase()).collect();

    let google = headers.iter().any(|h| h.contains("first name"))
        && headers.iter().any(|h| h.contains("last name"));
    if google {
        let membership_year = headers
            .iter()
            .find(|h| is_membership_header(h))
            .and_then(|h| year_in_header(h))
            .unwrap_or_else(|| today.year());
        return Ok(RosterFormat::GoogleForm { membership_year });
    }

    if headers.iter().any(|h| h == "name") && headers.iter().any(|h| h == "membertype") {
        return Ok(RosterFormat::Standard);
    }

    Err(RosterError::UnrecognizedFormat)
}

/// Parse a form timestamp into `YYYY-MM-DD`.
///
/// Accepts ISO dates/datetimes and `M/D/Y` (optionally followed by a time,
/// two-digit years are 20xx). Anything else is kept verbatim; blank is `None`.
pub fn parse_join_date(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive().to_string());
    }
    if let Some(date) = parse_calendar_date(value) {
        return Some(date.to_string());
    }

    let date_part = value.split_whitespace().next().unwrap_or(value);
    let parts: Vec<&str> = date_part.split(['/', '-']).collect();
    if let [m, d, y] = parts.as_slice()
        && let (Ok(month), Ok(day), Ok(mut year)) =
            (m.parse::<u32>(), d.parse::<u32>(), y.parse::<i32>())
    {
        if year < 100 {
            year += 2000;
        }
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date.to_string());
        }
    }

    Some(value.to_string())
}

fn field<'a>(headers: &[String], values: &'a [String], name: &str) -> &'a str {
    headers
        .iter()
        .position(|h| h == name)
        .and_then(|i| values.get(i))
        .map(String::as_str)
        .unwrap_or("")
}

fn first_present<'a>(headers: &[String], values: &'a [String], names: &[&str]) -> &'a str {
    names
        .iter()
        .map(|n| field(headers, values, n))
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

/// Parse a whole roster. Rows without a name or email are dropped.
pub fn parse_roster(text: &str, today: NaiveDate) -> Result<Vec<RosterRow>, RosterError> {
    let lines: Vec<&str> = text.trim().split('\n').collect();
    if lines.len() < 2 {
        return Err(RosterError::TooShort);
    }

    let raw_headers = parse_line(lines[0]);
    let format = detect_format(&raw_headers, today)?;
    let headers: Vec<String> = raw_headers.iter().map(|h| h.to_lowercase()).collect();
    let today_str = today.to_string();

    let mut rows = Vec::new();
    for line in lines[1..].iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
        let values = parse_line(line);

        let row = match format {
            RosterFormat::GoogleForm { membership_year } => {
                let first = field(&headers, &values, "first name");
                let last = field(&headers, &values, "last name");
                let answer = headers
                    .iter()
                    .position(|h| is_membership_header(h))
                    .and_then(|i| values.get(i))
                    .map(String::as_str)
                    .unwrap_or("");
                let timestamp = first_present(&headers, &values, &["timestamp", "submitted"]);

                RosterRow {
                    name: format!("{first} {last}").trim().to_string(),
                    email: first_present(&headers, &values, &["email", "email address"])
                        .to_string(),
                    member_type: MemberTier::from_form_answer(answer),
                    join_date: parse_join_date(timestamp).unwrap_or_else(|| today_str.clone()),
                    expiration_date: format!("{membership_year}-12-31"),
                }
            }
            RosterFormat::Standard => {
                let or_default = |name: &str, default: String| {
                    let v = field(&headers, &values, name);
                    if v.is_empty() { default } else { v.to_string() }
                };
                RosterRow {
                    name: field(&headers, &values, "name").to_string(),
                    email: field(&headers, &values, "email").to_string(),
                    member_type: MemberTier::from(or_default("membertype", "Individual".into())),
                    join_date: or_default("joindate", today_str.clone()),
                    expiration_date: or_default(
                        "expirationdate",
                        format!("{}-12-31", today.year()),
                    ),
                }
            }
        };

        if row.name.is_empty() || row.email.is_empty() {
            continue;
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(RosterError::NoRows);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_parse_line_quotes() {
        assert_eq!(
            parse_line(r#"  "Murphy, John" , john@example.com,Family"#),
            vec!["Murphy, John", "john@example.com", "Family"]
        );
        assert_eq!(parse_line("a,,b,"), vec!["a", "", "b", ""]);
    }

    #[test]
    fn test_standard_roster_with_defaults() {
        let csv = "Name,Email,MemberType,JoinDate,ExpirationDate\r\n\
                   Jane Doe,JANE@example.com,Family,2025-01-02,2025-12-31\r\n\
                   No Email,,Individual,,\r\n\
                   Sam Lee,sam@example.com,,,\r\n";
        let rows = parse_roster(csv, today()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].member_type, MemberTier::Family);
        assert_eq!(rows[0].email, "JANE@example.com");
        assert_eq!(rows[1].member_type, MemberTier::Individual);
        assert_eq!(rows[1].join_date, "2025-06-15");
        assert_eq!(rows[1].expiration_date, "2025-12-31");
    }

    #[test]
    fn test_google_form_roster() {
        let csv = "Timestamp,Email Address,First Name,Last Name,Annual Membership 2026 (choose one)\n\
                   3/5/2026 14:02:11,ana@example.com,Ana,Ruiz,Student - $10\n\
                   ,bo@example.com,Bo,,Family of four\n";
        let rows = parse_roster(csv, today()).unwrap();
        assert_eq!(rows[0].name, "Ana Ruiz");
        assert_eq!(rows[0].email, "ana@example.com");
        assert_eq!(rows[0].member_type, MemberTier::Student);
        assert_eq!(rows[0].join_date, "2026-03-05");
        assert_eq!(rows[0].expiration_date, "2026-12-31");
        assert_eq!(rows[1].name, "Bo");
        assert_eq!(rows[1].member_type, MemberTier::Family);
        assert_eq!(rows[1].join_date, "2025-06-15");
    }

    #[test]
    fn test_google_form_year_defaults_to_current() {
        let headers = parse_line("First Name,Last Name,Email,Membership");
        assert_eq!(
            detect_format(&headers, today()).unwrap(),
            RosterFormat::GoogleForm { membership_year: 2025 }
        );
    }

    #[test]
    fn test_roster_errors() {
        assert_eq!(parse_roster("name,email", today()), Err(RosterError::TooShort));
        assert_eq!(
            parse_roster("foo,bar\n1,2", today()),
            Err(RosterError::UnrecognizedFormat)
        );
        assert_eq!(
            parse_roster("name,email,memberType\n,,", today()),
            Err(RosterError::NoRows)
        );
    }

    #[test]
    fn test_parse_join_date() {
        assert_eq!(parse_join_date("2025-02-03T10:00:00Z").as_deref(), Some("2025-02-03"));
        assert_eq!(parse_join_date("2025-02-03").as_deref(), Some("2025-02-03"));
        assert_eq!(parse_join_date("12/31/24").as_deref(), Some("2024-12-31"));
        assert_eq!(parse_join_date("sometime").as_deref(), Some("sometime"));
        assert_eq!(parse_join_date("  "), None);
    }
}
