//! Field-level validation rules shared by the request forms.
//!
//! Each rule reports a typed violation rather than a generic failure, so the
//! handler layer can surface a precise, user-facing message.

use chrono::NaiveDate;
use thiserror::Error;

/// Symbol set the password rule accepts.
pub const PASSWORD_SYMBOLS: &[char] = &['$', '!', '?', '%', '#', '@', '&'];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("must not be blank")]
    Blank,

    #[error("must be at least {min} characters long")]
    TooShort { min: usize },

    #[error("must be at most {max} characters long")]
    TooLong { max: usize },

    #[error("must contain an uppercase letter")]
    MissingUppercase,

    #[error("must contain a lowercase letter")]
    MissingLowercase,

    #[error("must contain a digit")]
    MissingDigit,

    #[error("must contain one of $ ! ? % # @ &")]
    MissingSymbol,

    #[error("{field} must not be before {reference}")]
    DateBefore {
        field: &'static str,
        reference: &'static str,
    },
}

/// Inclusive length bounds; `None` max means unlimited.
pub fn length(value: &str, min: usize, max: Option<usize>) -> Result<(), RuleViolation> {
    let len = value.chars().count();
    if len < min {
        return Err(RuleViolation::TooShort { min });
    }
    if let Some(max) = max {
        if len > max {
            return Err(RuleViolation::TooLong { max });
        }
    }
    Ok(())
}

pub fn required(value: &str) -> Result<(), RuleViolation> {
    if value.trim().is_empty() {
        Err(RuleViolation::Blank)
    } else {
        Ok(())
    }
}

/// A password must carry an uppercase letter, a lowercase letter, a digit,
/// and one symbol from [`PASSWORD_SYMBOLS`].
pub fn password_complexity(value: &str) -> Result<(), RuleViolation> {
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(RuleViolation::MissingUppercase);
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(RuleViolation::MissingLowercase);
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(RuleViolation::MissingDigit);
    }
    if !value.chars().any(|c| PASSWORD_SYMBOLS.contains(&c)) {
        return Err(RuleViolation::MissingSymbol);
    }
    Ok(())
}

/// `value` must be on or after `reference`.
pub fn date_not_before(
    field: &'static str,
    value: NaiveDate,
    reference_name: &'static str,
    reference: NaiveDate,
) -> Result<(), RuleViolation> {
    if value < reference {
        return Err(RuleViolation::DateBefore {
            field,
            reference: reference_name,
        });
    }
    Ok(())
}

/// The reservation date-ordering invariant: both dates on or after `today`,
/// and the return date on or after the pickup date.
pub fn reservation_dates(
    from_date: NaiveDate,
    to_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), RuleViolation> {
    date_not_before("from_date", from_date, "today", today)?;
    date_not_before("to_date", to_date, "from_date", from_date)?;
    date_not_before("to_date", to_date, "today", today)
}
