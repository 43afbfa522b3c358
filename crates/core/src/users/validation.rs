//! Field rules for accounts and user profiles.
//!
//! All checks run before any I/O and fail with `WorkflowError::Validation`.

use crate::error::WorkflowError;
use crate::users::types::{AccountInput, UserInput};

/// Maximum username length.
pub const USERNAME_MAX_LENGTH: usize = 10;
/// Maximum full name length.
pub const FULL_NAME_MAX_LENGTH: usize = 225;
/// Maximum email length.
pub const EMAIL_MAX_LENGTH: usize = 120;
/// Fixed area prefix every phone number carries.
pub const PHONE_PREFIX: &str = "228";
/// Digits in a normalized phone number.
pub const PHONE_LENGTH: usize = 10;
/// Minimum password length.
pub const PASSWORD_MIN_LENGTH: usize = 8;
/// Maximum password length.
pub const PASSWORD_MAX_LENGTH: usize = 30;

fn require_not_blank(value: &str, field: &str) -> Result<(), WorkflowError> {
    if value.trim().is_empty() {
        Err(WorkflowError::Validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn require_max_len(value: &str, max: usize, field: &str) -> Result<(), WorkflowError> {
    if value.trim().chars().count() > max {
        Err(WorkflowError::Validation(format!(
            "{field} must not exceed {max} characters"
        )))
    } else {
        Ok(())
    }
}

/// Checks `local@domain` where local is `[A-Za-z0-9+_.-]+` and domain is `[A-Za-z0-9.-]+`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let local_ok = |c: char| c.is_ascii_alphanumeric() || matches!(c, '+' | '_' | '.' | '-');
    let domain_ok = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-');

    !local.is_empty()
        && !domain.is_empty()
        && local.chars().all(local_ok)
        && domain.chars().all(domain_ok)
}

/// Strips non-digits and prepends the fixed prefix when missing.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.starts_with(PHONE_PREFIX) {
        digits
    } else {
        format!("{PHONE_PREFIX}{digits}")
    }
}

/// Normalizes a phone and checks it is the prefix plus seven digits.
pub fn validate_phone(raw: &str) -> Result<String, WorkflowError> {
    let normalized = normalize_phone(raw);
    if normalized.len() == PHONE_LENGTH {
        Ok(normalized)
    } else {
        Err(WorkflowError::Validation(format!(
            "phone must have {PHONE_LENGTH} digits starting with {PHONE_PREFIX}"
        )))
    }
}

/// Requires 8-30 characters with a lowercase, uppercase, digit and symbol.
pub fn validate_password_strength(password: &str) -> Result<(), WorkflowError> {
    require_not_blank(password, "password")?;

    let len = password.chars().count();
    if len < PASSWORD_MIN_LENGTH {
        return Err(WorkflowError::Validation(format!(
            "password must have at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }
    if len > PASSWORD_MAX_LENGTH {
        return Err(WorkflowError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    if has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(WorkflowError::validation(
            "password needs a lowercase letter, an uppercase letter, a digit and a symbol",
        ))
    }
}

/// Validated, normalized account and profile fields ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProfile {
    /// Trimmed, lower-cased email.
    pub email: String,
    /// Trimmed username.
    pub username: String,
    /// Trimmed full name.
    pub full_name: String,
    /// Normalized phone.
    pub phone: String,
}

/// Validates the account and user fields shared by create and update.
pub fn validate_profile(
    account: &AccountInput,
    user: &UserInput,
) -> Result<ValidatedProfile, WorkflowError> {
    require_not_blank(&user.username, "username")?;
    require_not_blank(&user.full_name, "full name")?;
    require_not_blank(&account.email, "email")?;

    require_max_len(&user.username, USERNAME_MAX_LENGTH, "username")?;
    require_max_len(&user.full_name, FULL_NAME_MAX_LENGTH, "full name")?;
    require_max_len(&account.email, EMAIL_MAX_LENGTH, "email")?;

    let email = account.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(WorkflowError::validation("email format is invalid"));
    }

    let phone = validate_phone(&user.phone)?;

    Ok(ValidatedProfile {
        email,
        username: user.username.trim().to_string(),
        full_name: user.full_name.trim().to_string(),
        phone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::types::AccountRole;
    use rstest::rstest;

    fn account(email: &str) -> AccountInput {
        AccountInput {
            email: email.to_string(),
            role: AccountRole::Employee,
            is_active: true,
        }
    }

    fn user(username: &str, phone: &str) -> UserInput {
        UserInput {
            username: username.to_string(),
            full_name: "Lucia Hernandez".to_string(),
            phone: phone.to_string(),
        }
    }

    #[rstest]
    #[case("ana@carlot.mx", true)]
    #[case("first.last+tag@mail-server.example.com", true)]
    #[case("no-at-sign", false)]
    #[case("@carlot.mx", false)]
    #[case("ana@", false)]
    #[case("ana maria@carlot.mx", false)]
    #[case("ana@car_lot.mx", false)]
    fn test_is_valid_email(#[case] email: &str, #[case] valid: bool) {
        assert_eq!(is_valid_email(email), valid);
    }

    #[rstest]
    #[case("228-123-4567", "2281234567")]
    #[case("1234567", "2281234567")]
    #[case("(228) 555 0101", "2285550101")]
    #[case("", "228")]
    fn test_normalize_phone(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_phone(raw), expected);
    }

    #[rstest]
    #[case("")]
    #[case("12345")]
    #[case("22812345678")]
    fn test_validate_phone_rejects(#[case] raw: &str) {
        assert!(validate_phone(raw).is_err());
    }

    #[rstest]
    #[case("Dealer#2024", true)]
    #[case("abc123", false)]
    #[case("alllowercase1!", false)]
    #[case("ALLUPPERCASE1!", false)]
    #[case("NoDigits!!", false)]
    #[case("NoSymbol123", false)]
    #[case("Aa1!Aa1!Aa1!Aa1!Aa1!Aa1!Aa1!Aa1!", false)]
    fn test_validate_password_strength(#[case] password: &str, #[case] ok: bool) {
        assert_eq!(validate_password_strength(password).is_ok(), ok);
    }

    #[test]
    fn test_validate_profile_normalizes() {
        let profile =
            validate_profile(&account("  Lucia@Carlot.MX "), &user(" lhernan ", "5550101"))
                .unwrap();

        assert_eq!(profile.email, "lucia@carlot.mx");
        assert_eq!(profile.username, "lhernan");
        assert_eq!(profile.phone, "2285550101");
    }

    #[test]
    fn test_validate_profile_rejects_long_username() {
        let err = validate_profile(&account("a@b.mx"), &user("averylongname", "5550101"))
            .unwrap_err();
        assert!(err.to_string().contains("username"));
    }

    #[test]
    fn test_validate_profile_rejects_blank_full_name() {
        let mut profile_user = user("lhernan", "5550101");
        profile_user.full_name = "   ".to_string();
        assert!(validate_profile(&account("a@b.mx"), &profile_user).is_err());
    }
}
