//! Authentication primitives.
//!
//! - Password hashing with Argon2id
//! - The [`CredentialHasher`] seam used by account workflows
//! - Login outcome snapshots for the audit trail

mod password;

pub use password::{
    Argon2Hasher, CredentialHasher, PasswordError, hash_password, verify_password,
};

/// Logical entity name recorded for login and logout audit entries.
pub const AUTH_ENTITY: &str = "auth_login";

/// Normalizes a login email: trimmed and lower-cased.
#[must_use]
pub fn normalize_login_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_login_email() {
        assert_eq!(
            normalize_login_email("  Ana.Perez@Carlot.MX "),
            "ana.perez@carlot.mx"
        );
    }
}
