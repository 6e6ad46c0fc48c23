//! Admin portal accounts stored in `admin_users`

use crate::config::BootstrapUser;
use shared::models::{AdminRole, AdminUser};
use shared::util::now_iso;

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hash the configured bootstrap accounts into stored users.
///
/// Entries with an unknown role are skipped.
pub fn seed_users(
    bootstrap: &[BootstrapUser],
) -> Result<Vec<AdminUser>, argon2::password_hash::Error> {
    let created_at = now_iso();
    let mut users = Vec::with_capacity(bootstrap.len());
    for entry in bootstrap {
        let Some(role) = AdminRole::parse(&entry.role) else {
            tracing::warn!(username = %entry.username, role = %entry.role, "Skipping bootstrap user with unknown role");
            continue;
        };
        users.push(AdminUser {
            username: entry.username.trim().to_lowercase(),
            password_hash: hash_password(&entry.password)?,
            role,
            created_at: created_at.clone(),
        });
    }
    Ok(users)
}

/// Find the user and check the password. Unknown users and wrong passwords
/// are indistinguishable to the caller.
pub fn authenticate<'a>(
    users: &'a [AdminUser],
    username: &str,
    password: &str,
) -> Option<&'a AdminUser> {
    let username = username.trim().to_lowercase();
    let password = password.trim();
    users
        .iter()
        .find(|u| u.username == username)
        .filter(|u| verify_password(password, &u.password_hash))
}
