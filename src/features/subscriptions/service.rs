//! Subscription operations exposed to the chat transport
//!
//! Validation happens here, before the store is touched. The store handle is
//! passed in at construction; there is no global connection.

use chrono::NaiveDate;
use log::{debug, info, warn};
use std::sync::Arc;

use super::model::{parse_date, Payment, Subscription};
use super::recurrence::advance_one_month;
use super::store::SubscriptionStore;
use crate::core::error::{Result, SubscriptionError, ValidationError};
use crate::features::reminders::state_machine::{evaluate_tick, ReminderNotice};

/// Longest accepted service name; keeps every reminder DM under the message limit
pub const MAX_LABEL_CHARS: usize = 100;

/// How often mark-paid re-reads a row that changed between read and write
const PAYMENT_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn SubscriptionStore>,
}

impl SubscriptionService {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn SubscriptionStore> {
        &self.store
    }

    /// Create a subscription after validating every field
    ///
    /// The due date may be today but not earlier.
    pub async fn add(
        &self,
        owner_id: &str,
        label: &str,
        amount: f64,
        due_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<i64> {
        let label = validate_label(label)?;
        let amount = validate_amount(amount)?;
        let due_date = validate_due_date(due_date, today)?;

        let id = self.store.insert(owner_id, &label, amount, due_date).await?;
        info!("Added subscription {id} for owner {owner_id}: {label} ({amount:.2}, due {due_date})");
        Ok(id)
    }

    /// All subscriptions of `owner_id`, soonest first
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Subscription>> {
        self.store.find_by_owner(owner_id).await
    }

    /// Record a payment: move the due date one month ahead and reset reminders
    ///
    /// The write is conditioned on the due date that was read, so a concurrent
    /// payment or delete is detected and the row is read again.
    pub async fn mark_paid(&self, owner_id: &str, id: i64, today: NaiveDate) -> Result<Payment> {
        for attempt in 1..=PAYMENT_ATTEMPTS {
            let subscription = self
                .store
                .find_by_id(owner_id, id)
                .await?
                .ok_or(SubscriptionError::NotFound { id })?;

            let previous_due_date = subscription.due_date;
            let new_due_date = advance_one_month(previous_due_date);

            if self
                .store
                .conditional_advance_payment(owner_id, id, previous_due_date, new_due_date)
                .await?
            {
                let days_late = (today - previous_due_date).num_days();
                if days_late > 0 {
                    info!("Subscription {id} paid {days_late} day(s) late (was due {previous_due_date})");
                }
                info!("Subscription {id} of owner {owner_id} paid, next payment {new_due_date}");

                return Ok(Payment {
                    id,
                    label: subscription.label,
                    previous_due_date,
                    new_due_date,
                });
            }

            debug!("Subscription {id} changed during payment (attempt {attempt}), re-reading");
        }

        warn!("Giving up on payment for subscription {id} after {PAYMENT_ATTEMPTS} attempts");
        Err(SubscriptionError::Contention { id })
    }

    /// Delete a subscription owned by `owner_id`
    pub async fn delete(&self, owner_id: &str, id: i64) -> Result<()> {
        if self.store.delete(owner_id, id).await? {
            info!("Deleted subscription {id} of owner {owner_id}");
            Ok(())
        } else {
            Err(SubscriptionError::NotFound { id })
        }
    }

    /// Every reminder owed on `today`
    pub async fn evaluate_tick(&self, today: NaiveDate) -> Vec<ReminderNotice> {
        evaluate_tick(self.store.as_ref(), today).await
    }
}

pub fn validate_label(label: &str) -> std::result::Result<String, ValidationError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(ValidationError::EmptyLabel);
    }
    if label.chars().count() > MAX_LABEL_CHARS {
        return Err(ValidationError::LabelTooLong {
            max: MAX_LABEL_CHARS,
        });
    }
    Ok(label.to_string())
}

pub fn validate_amount(amount: f64) -> std::result::Result<f64, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::InvalidAmount(amount.to_string()));
    }
    if amount < 0.0 {
        return Err(ValidationError::NegativeAmount);
    }
    Ok(amount)
}

/// Parse user input such as `9.99` or `9,99`
pub fn parse_amount(input: &str) -> std::result::Result<f64, ValidationError> {
    let trimmed = input.trim();
    let amount: f64 = trimmed
        .replace(',', ".")
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))?;
    validate_amount(amount)
}

/// Parse a strict `YYYY-MM-DD` date from user input
pub fn parse_due_date(input: &str) -> std::result::Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    parse_date(trimmed).ok_or_else(|| ValidationError::InvalidDate(trimmed.to_string()))
}

pub fn validate_due_date(
    due_date: NaiveDate,
    today: NaiveDate,
) -> std::result::Result<NaiveDate, ValidationError> {
    if due_date < today {
        return Err(ValidationError::DateInPast {
            date: due_date,
            today,
        });
    }
    Ok(due_date)
}
