//! Subscription record and reminder tiers

use chrono::NaiveDate;
use std::fmt;

/// Storage format of `due_date`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reminder escalation level of a subscription within one payment cycle
///
/// The ordering is meaningful: a tier only ever moves forward until a payment
/// resets it to [`ReminderTier::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReminderTier {
    /// Nothing sent yet this cycle
    None,
    /// The 3-day reminder went out
    DueSoon,
    /// The 1-day reminder went out
    DueTomorrow,
    /// The overdue notice went out
    Overdue,
}

impl ReminderTier {
    /// Persisted representation (0–3)
    pub fn as_i64(self) -> i64 {
        match self {
            ReminderTier::None => 0,
            ReminderTier::DueSoon => 1,
            ReminderTier::DueTomorrow => 2,
            ReminderTier::Overdue => 3,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(ReminderTier::None),
            1 => Some(ReminderTier::DueSoon),
            2 => Some(ReminderTier::DueTomorrow),
            3 => Some(ReminderTier::Overdue),
            _ => None,
        }
    }
}

impl fmt::Display for ReminderTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReminderTier::None => write!(f, "none"),
            ReminderTier::DueSoon => write!(f, "due_soon"),
            ReminderTier::DueTomorrow => write!(f, "due_tomorrow"),
            ReminderTier::Overdue => write!(f, "overdue"),
        }
    }
}

/// One recurring payment obligation
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: i64,
    /// Opaque id of the user who owns the record (the Discord user id)
    pub owner_id: String,
    pub label: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub reminder_status: ReminderTier,
}

/// A validated subscription that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub owner_id: String,
    pub label: String,
    pub amount: f64,
    pub due_date: NaiveDate,
}

/// Result of marking a subscription as paid
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub label: String,
    pub previous_due_date: NaiveDate,
    pub new_due_date: NaiveDate,
}

/// Format a date the way it is stored and shown
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a strict zero-padded `YYYY-MM-DD` date
///
/// chrono on its own also accepts unpadded fields such as `2025-7-1`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(ReminderTier::None < ReminderTier::DueSoon);
        assert!(ReminderTier::DueSoon < ReminderTier::DueTomorrow);
        assert!(ReminderTier::DueTomorrow < ReminderTier::Overdue);
    }

    #[test]
    fn test_tier_persisted_values() {
        for tier in [
            ReminderTier::None,
            ReminderTier::DueSoon,
            ReminderTier::DueTomorrow,
            ReminderTier::Overdue,
        ] {
            assert_eq!(ReminderTier::from_i64(tier.as_i64()), Some(tier));
        }
        assert_eq!(ReminderTier::Overdue.as_i64(), 3);
        assert_eq!(ReminderTier::from_i64(4), None);
        assert_eq!(ReminderTier::from_i64(-1), None);
    }

    #[test]
    fn test_parse_date_is_strict() {
        assert_eq!(
            parse_date("2025-07-15"),
            NaiveDate::from_ymd_opt(2025, 7, 15)
        );
        assert_eq!(parse_date("2025-7-15"), None);
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("15.07.2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_format_date_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 5).unwrap();
        assert_eq!(format_date(date), "2025-07-05");
    }
}
