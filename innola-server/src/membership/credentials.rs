//! Member id, username and PIN generation

use rand::Rng;
use shared::util::now_millis;
use std::collections::HashSet;

/// First initial + last name, letters only, with a numeric suffix on
/// collision (`jmurphy`, `jmurphy1`, ...). A name with no letters gets
/// `member<millis>`.
pub fn generate_username(name: &str, taken: &HashSet<String>) -> String {
    let cleaned: String = name
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();
    let parts: Vec<&str> = cleaned.split_whitespace().collect();

    let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
        return format!("member{}", now_millis());
    };
    let base: String = first.chars().take(1).chain(last.chars()).collect();

    let mut username = base.clone();
    let mut counter = 1;
    while taken.contains(&username) {
        username = format!("{base}{counter}");
        counter += 1;
    }
    username
}

/// Random 6-digit PIN
pub fn generate_pin() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

/// First free `MEM-<year>-<seq>` id, seq zero-padded to 3 digits
pub fn next_member_id(year: i32, taken: &HashSet<String>) -> String {
    (1..)
        .map(|n| format!("MEM-{year}-{n:03}"))
        .find(|id| !taken.contains(id))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_username_disambiguation() {
        assert_eq!(generate_username("John Murphy", &set(&[])), "jmurphy");
        assert_eq!(
            generate_username("Jane  Q. Murphy", &set(&["jmurphy", "jmurphy1"])),
            "jmurphy2"
        );
        assert_eq!(generate_username("Cher", &set(&[])), "ccher");
        assert_eq!(generate_username("O'Brien-Smith", &set(&[])), "oobriensmith");
    }

    #[test]
    fn test_username_without_letters() {
        assert!(generate_username("42 !!", &set(&[])).starts_with("member"));
    }

    #[test]
    fn test_pin_is_six_digits() {
        for _ in 0..50 {
            let pin = generate_pin();
            assert_eq!(pin.len(), 6);
            assert!(pin.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(pin.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn test_member_id_first_free() {
        assert_eq!(next_member_id(2025, &set(&[])), "MEM-2025-001");
        assert_eq!(
            next_member_id(2025, &set(&["MEM-2025-001", "MEM-2025-003"])),
            "MEM-2025-002"
        );
        assert_eq!(next_member_id(2026, &set(&["MEM-2025-001"])), "MEM-2026-001");
    }
}
