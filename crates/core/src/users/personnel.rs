//! Sequential personnel numbers.
//!
//! A personnel number is the role prefix followed by nine zero-padded
//! digits, e.g. `A000000003` or `V000000120`.

use crate::error::WorkflowError;
use crate::users::types::AccountRole;

/// Digits after the prefix.
pub const PERSONNEL_DIGITS: usize = 9;

/// Total length of a personnel number.
pub const PERSONNEL_NUMBER_LENGTH: usize = PERSONNEL_DIGITS + 1;

/// Returns the `LIKE` pattern matching every number issued for a role.
#[must_use]
pub fn prefix_pattern(role: AccountRole) -> String {
    format!("{}%", role.personnel_prefix())
}

/// Computes the number following the highest one issued for the role.
///
/// A missing or malformed maximum restarts the sequence at zero.
pub fn next_personnel_number(
    role: AccountRole,
    current_max: Option<&str>,
) -> Result<String, WorkflowError> {
    let prefix = role.personnel_prefix();

    let next = match current_max.and_then(|max| parse_sequence(max, prefix)) {
        Some(seq) => seq
            .checked_add(1)
            .filter(|n| *n < 10u64.pow(9))
            .ok_or_else(|| {
                WorkflowError::IllegalState(format!("personnel numbers exhausted for {role}"))
            })?,
        None => 0,
    };

    Ok(format!("{prefix}{next:0width$}", width = PERSONNEL_DIGITS))
}

fn parse_sequence(number: &str, prefix: char) -> Option<u64> {
    let digits = number.strip_prefix(prefix)?;
    if number.len() != PERSONNEL_NUMBER_LENGTH || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
