//! Member roster: CSV import, credentials, QR verification

pub mod credentials;
pub mod csv;
pub mod import;
pub mod verification;

pub use csv::{RosterError, RosterRow, parse_roster};
pub use import::{ImportReport, import_rows};
pub use verification::{Verification, verify_membership, verify_scan};
