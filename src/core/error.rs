//! Error types for subscription tracking
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! # Error Categories
//!
//! - **Validation** ([`SubscriptionError::Validation`]): bad user input, rejected before any write
//! - **Not found** ([`SubscriptionError::NotFound`]): id missing or owned by someone else
//! - **Data integrity** ([`SubscriptionError::DataIntegrity`]): a stored row that cannot be read back
//! - **Dispatch** ([`SubscriptionError::Dispatch`]): reminder delivery failed, retried next tick
//! - **Storage** ([`SubscriptionError::Storage`]): the SQLite layer failed
//!
//! Validation and not-found errors go straight back to the caller. Dispatch and
//! integrity errors are contained to a single record by the scheduler.

use chrono::NaiveDate;
use thiserror::Error;

/// Result alias used by the store and the subscription service
pub type Result<T> = std::result::Result<T, SubscriptionError>;

/// Errors raised by subscription operations
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// Input rejected before any mutation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The subscription does not exist or belongs to another owner
    #[error("subscription #{id} not found")]
    NotFound { id: i64 },

    /// A stored row holds a value that violates the table invariants
    #[error("subscription #{id} has an unreadable {field}: {value:?}")]
    DataIntegrity {
        id: i64,
        field: &'static str,
        value: String,
    },

    /// The reminder could not be delivered
    #[error("reminder delivery failed: {0}")]
    Dispatch(String),

    /// The row kept changing underneath a payment
    #[error("subscription #{id} changed concurrently, try again")]
    Contention { id: i64 },

    #[error("storage error: {0}")]
    Storage(#[from] sqlite::Error),
}

/// Reasons a new subscription is rejected
///
/// The `Display` text is shown to users verbatim, so it reads as a correction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("The service name can't be empty.")]
    EmptyLabel,

    #[error("The service name is too long (at most {max} characters).")]
    LabelTooLong { max: usize },

    #[error("`{0}` doesn't look like a number. Enter the amount in digits, e.g. `9.99`.")]
    InvalidAmount(String),

    #[error("The amount can't be negative.")]
    NegativeAmount,

    #[error("`{0}` isn't a valid date. Use the YYYY-MM-DD format, e.g. `2025-07-15`.")]
    InvalidDate(String),

    #[error("The payment date {date} is in the past (today is {today}).")]
    DateInPast { date: NaiveDate, today: NaiveDate },
}

impl SubscriptionError {
    /// Whether the error is the caller's to fix (as opposed to an internal failure)
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            SubscriptionError::Validation(_) | SubscriptionError::NotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_converts_into_subscription_error() {
        let err: SubscriptionError = ValidationError::NegativeAmount.into();
        assert!(matches!(
            err,
            SubscriptionError::Validation(ValidationError::NegativeAmount)
        ));
        assert_eq!(err.to_string(), "The amount can't be negative.");
    }

    #[test]
    fn test_user_facing_classification() {
        assert!(SubscriptionError::NotFound { id: 3 }.is_user_facing());
        assert!(SubscriptionError::from(ValidationError::EmptyLabel).is_user_facing());
        assert!(!SubscriptionError::Dispatch("timeout".into()).is_user_facing());
        assert!(!SubscriptionError::DataIntegrity {
            id: 1,
            field: "due_date",
            value: "garbage".into()
        }
        .is_user_facing());
    }

    #[test]
    fn test_date_in_past_message() {
        let err = ValidationError::DateInPast {
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            today: NaiveDate::from_ymd_opt(2025, 7, 10).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "The payment date 2025-07-01 is in the past (today is 2025-07-10)."
        );
    }
}
