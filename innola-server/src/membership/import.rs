//! Merge a parsed roster into the members document

use super::credentials::{generate_pin, generate_username, next_member_id};
use super::csv::RosterRow;
use member_cert::MemberSecret;
use serde::Serialize;
use shared::models::{Member, MembersDocument};
use shared::util::now_iso;
use std::collections::HashSet;

/// Credentials handed back to the admin for a newly created member
#[derive(Debug, Clone, Serialize)]
pub struct ImportedMember {
    pub name: String,
    pub email: String,
    pub username: String,
    pub pin: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    pub name: String,
    pub email: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported: Vec<ImportedMember>,
    pub skipped: Vec<SkippedRow>,
    pub total_members: usize,
}

/// Append every roster row whose email is new.
///
/// Emails are compared case-insensitively against existing members and
/// against rows earlier in the same roster.
pub fn import_rows(
    doc: &mut MembersDocument,
    rows: Vec<RosterRow>,
    secret: &MemberSecret,
    year: i32,
) -> member_cert::Result<ImportReport> {
    let mut usernames: HashSet<String> = doc.members.iter().map(|m| m.username.clone()).collect();
    let mut ids: HashSet<String> = doc.members.iter().map(|m| m.id.clone()).collect();
    let mut emails: HashSet<String> = doc.members.iter().map(|m| m.email.to_lowercase()).collect();

    let created_at = now_iso();
    let mut report = ImportReport::default();

    for row in rows {
        let email = row.email.trim().to_lowercase();
        if emails.contains(&email) {
            report.skipped.push(SkippedRow {
                name: row.name,
                email,
                reason: "Email already exists".to_string(),
            });
            continue;
        }

        let id = next_member_id(year, &ids);
        let username = generate_username(&row.name, &usernames);
        let member = Member {
            qr_signature: member_cert::sign(&id, secret)?,
            id,
            username,
            pin: generate_pin(),
            name: row.name.trim().to_string(),
            email,
            member_type: row.member_type,
            join_date: row.join_date.trim().to_string(),
            expiration_date: row.expiration_date.trim().to_string(),
            created_at: created_at.clone(),
            updated_at: None,
        };

        usernames.insert(member.username.clone());
        ids.insert(member.id.clone());
        emails.insert(member.email.clone());
        report.imported.push(ImportedMember {
            name: member.name.clone(),
            email: member.email.clone(),
            username: member.username.clone(),
            pin: member.pin.clone(),
            id: member.id.clone(),
        });
        tracing::debug!(member_id = %member.id, "Member imported");
        doc.members.push(member);
    }

    report.total_members = doc.members.len();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::MemberTier;

    fn row(name: &str, email: &str) -> RosterRow {
        RosterRow {
            name: name.to_string(),
            email: email.to_string(),
            member_type: MemberTier::Individual,
            join_date: "2025-01-01".to_string(),
            expiration_date: "2025-12-31".to_string(),
        }
    }

    #[test]
    fn test_import_assigns_credentials_and_skips_duplicates() {
        let secret = MemberSecret::new("test-secret-32-bytes-minimum-xx").unwrap();
        let mut doc = MembersDocument::default();

        let report = import_rows(
            &mut doc,
            vec![
                row("John Murphy", "John@Example.com"),
                row("Jill Murphy", "jill@example.com"),
                row("John Again", "JOHN@example.com"),
            ],
            &secret,
            2025,
        )
        .unwrap();

        assert_eq!(report.imported.len(), 2);
        assert_eq!(report.imported[0].id, "MEM-2025-001");
        assert_eq!(report.imported[0].username, "jmurphy");
        assert_eq!(report.imported[0].email, "john@example.com");
        assert_eq!(report.imported[1].username, "jmurphy1");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, "Email already exists");
        assert_eq!(report.total_members, 2);
        assert_eq!(doc.members[0].qr_signature, "4dfadc7ec768");

        // second import continues the sequence and sees stored emails
        let report = import_rows(
            &mut doc,
            vec![row("Ann Lee", "ann@example.com"), row("J M", "jill@EXAMPLE.com")],
            &secret,
            2025,
        )
        .unwrap();
        assert_eq!(report.imported[0].id, "MEM-2025-003");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.total_members, 3);
    }
}
