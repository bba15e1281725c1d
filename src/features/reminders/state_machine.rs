//! Reminder escalation rules
//!
//! Per subscription and cycle the status walks `None → DueSoon → DueTomorrow →
//! Overdue`; only a payment moves it back to `None`. A tick decides, for a
//! given `today`, which single reminder a record is owed:
//!
//! | due date          | allowed from                   | reminder  | new status    |
//! |-------------------|--------------------------------|-----------|---------------|
//! | `today + 3 days`  | `None`                         | 3-day     | `DueSoon`     |
//! | `today + 1 day`   | `None`, `DueSoon`              | 1-day     | `DueTomorrow` |
//! | before `today`    | anything below `Overdue`       | overdue   | `Overdue`     |
//!
//! The three due-date conditions are disjoint, so a record never qualifies for
//! two reminders in the same tick. A record that already reached `Overdue`
//! stays silent until it is paid.

use chrono::{Days, NaiveDate};
use log::{debug, error, info};

use crate::core::format_amount;
use crate::features::subscriptions::model::{format_date, ReminderTier, Subscription};
use crate::features::subscriptions::store::SubscriptionStore;

/// Lead time of the first reminder
pub const DUE_SOON_DAYS: u64 = 3;
/// Lead time of the last reminder before the due date
pub const DUE_TOMORROW_DAYS: u64 = 1;

/// The reminders a subscription can receive in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reminder {
    ThreeDay,
    OneDay,
    Overdue,
}

impl Reminder {
    /// Status the record moves to once this reminder has been delivered
    pub fn target_tier(self) -> ReminderTier {
        match self {
            Reminder::ThreeDay => ReminderTier::DueSoon,
            Reminder::OneDay => ReminderTier::DueTomorrow,
            Reminder::Overdue => ReminderTier::Overdue,
        }
    }

    /// Render the DM text for `subscription`
    pub fn message(self, subscription: &Subscription) -> String {
        let label = &subscription.label;
        let amount = format_amount(subscription.amount);
        let date = format_date(subscription.due_date);
        let id = subscription.id;

        match self {
            Reminder::ThreeDay => format!(
                "⏰ **Payment reminder!** ⏰\n\n\
                 Service: **{label}**\n\
                 Amount: **{amount}**\n\
                 Next payment date: **{date}** (in 3 days)\n\n\
                 To mark it as paid, use: `/paid {id}`"
            ),
            Reminder::OneDay => format!(
                "❗ **Last reminder!** ❗\n\n\
                 Tomorrow, **{date}**, this payment is due:\n\
                 Service: **{label}**\n\
                 Amount: **{amount}**\n\n\
                 To mark it as paid, use: `/paid {id}`"
            ),
            Reminder::Overdue => format!(
                "🚨 **Subscription overdue!** 🚨\n\n\
                 The payment for **{label}** of **{amount}** was due on **{date}**.\n\n\
                 To mark it as paid and reset reminders, use: `/paid {id}`"
            ),
        }
    }
}

impl std::fmt::Display for Reminder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reminder::ThreeDay => write!(f, "3-day"),
            Reminder::OneDay => write!(f, "1-day"),
            Reminder::Overdue => write!(f, "overdue"),
        }
    }
}

/// A reminder that is owed and ready for dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderNotice {
    pub subscription: Subscription,
    pub reminder: Reminder,
    pub message: String,
}

impl ReminderNotice {
    pub fn new(subscription: Subscription, reminder: Reminder) -> Self {
        let message = reminder.message(&subscription);
        Self {
            subscription,
            reminder,
            message,
        }
    }
}

/// `today` shifted forward by `days`, `None` past the end of the calendar
pub fn days_after(today: NaiveDate, days: u64) -> Option<NaiveDate> {
    today.checked_add_days(Days::new(days))
}

/// The reminder `subscription` is owed on `today`, if any
pub fn reminder_owed(subscription: &Subscription, today: NaiveDate) -> Option<Reminder> {
    let due = subscription.due_date;
    let status = subscription.reminder_status;

    if due < today {
        return (status < ReminderTier::Overdue).then_some(Reminder::Overdue);
    }
    if Some(due) == days_after(today, DUE_TOMORROW_DAYS) {
        return (status < ReminderTier::DueTomorrow).then_some(Reminder::OneDay);
    }
    if Some(due) == days_after(today, DUE_SOON_DAYS) {
        return (status == ReminderTier::None).then_some(Reminder::ThreeDay);
    }
    None
}

fn select(
    subscriptions: &[Subscription],
    today: NaiveDate,
    reminder: Reminder,
) -> Vec<&Subscription> {
    subscriptions
        .iter()
        .filter(|s| reminder_owed(s, today) == Some(reminder))
        .collect()
}

/// Subscriptions due in exactly three days that have not been reminded yet
pub fn select_due_soon(subscriptions: &[Subscription], today: NaiveDate) -> Vec<&Subscription> {
    select(subscriptions, today, Reminder::ThreeDay)
}

/// Subscriptions due tomorrow whose 1-day reminder is still outstanding
///
/// A record that never got the 3-day reminder (added with only two days'
/// notice) still qualifies.
pub fn select_due_tomorrow(
    subscriptions: &[Subscription],
    today: NaiveDate,
) -> Vec<&Subscription> {
    select(subscriptions, today, Reminder::OneDay)
}

/// Subscriptions past their due date that have not been told so yet
pub fn select_overdue(subscriptions: &[Subscription], today: NaiveDate) -> Vec<&Subscription> {
    select(subscriptions, today, Reminder::Overdue)
}

/// Collect every reminder owed on `today`
///
/// Candidates come from the store's indexed queries and are re-checked
/// against [`reminder_owed`], so a store that returns extra rows cannot cause
/// a reminder to fire out of order. A failing query is logged and the other
/// tiers are still evaluated.
pub async fn evaluate_tick(store: &dyn SubscriptionStore, today: NaiveDate) -> Vec<ReminderNotice> {
    let mut notices = Vec::new();

    for reminder in [Reminder::ThreeDay, Reminder::OneDay, Reminder::Overdue] {
        let candidates = match reminder {
            Reminder::ThreeDay => store.find_due_soon(today).await,
            Reminder::OneDay => store.find_due_tomorrow(today).await,
            Reminder::Overdue => store.find_overdue(today).await,
        };

        let candidates = match candidates {
            Ok(candidates) => candidates,
            Err(e) => {
                error!("Failed to load {reminder} reminder candidates for {today}: {e}");
                continue;
            }
        };

        let before = candidates.len();
        let owed: Vec<ReminderNotice> = candidates
            .into_iter()
            .filter(|s| reminder_owed(s, today) == Some(reminder))
            .map(|s| ReminderNotice::new(s, reminder))
            .collect();

        if owed.len() != before {
            debug!(
                "Dropped {} {reminder} candidates that are not owed a reminder on {today}",
                before - owed.len()
            );
        }
        if owed.is_empty() {
            debug!("No subscriptions need a {reminder} reminder");
        } else {
            info!("Found {} subscriptions for the {reminder} reminder", owed.len());
        }

        notices.extend(owed);
    }

    notices
}
