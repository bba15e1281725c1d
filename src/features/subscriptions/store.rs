//! Record store contract for subscriptions
//!
//! The store is a single flat table. Every mutating call is one conditional
//! write: it either applies completely against the state the caller observed,
//! or it reports `false` and changes nothing. Readers never lock rows, so a
//! reminder tick and a payment racing on the same record resolve at the write.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{ReminderTier, Subscription};
use crate::core::error::Result;

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Store a new subscription with status [`ReminderTier::None`] and return its id
    async fn insert(
        &self,
        owner_id: &str,
        label: &str,
        amount: f64,
        due_date: NaiveDate,
    ) -> Result<i64>;

    /// All subscriptions of one owner, ordered by due date
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Subscription>>;

    /// One subscription, only if `owner_id` owns it
    async fn find_by_id(&self, owner_id: &str, id: i64) -> Result<Option<Subscription>>;

    /// Due exactly three days after `today` with nothing sent yet
    async fn find_due_soon(&self, today: NaiveDate) -> Result<Vec<Subscription>>;

    /// Due the day after `today` and the 1-day reminder not sent yet
    async fn find_due_tomorrow(&self, today: NaiveDate) -> Result<Vec<Subscription>>;

    /// Due before `today` and no overdue notice sent yet
    async fn find_overdue(&self, today: NaiveDate) -> Result<Vec<Subscription>>;

    /// Raise the status to `new_status`
    ///
    /// Applies only while the stored status is still below `new_status` and the
    /// due date is still `observed_due_date`, so a payment that lands first
    /// turns this into a no-op.
    async fn conditional_update_status(
        &self,
        id: i64,
        observed_due_date: NaiveDate,
        new_status: ReminderTier,
    ) -> Result<bool>;

    /// Move the due date to `new_due_date` and reset the status in one write
    ///
    /// Applies only while `(owner_id, id)` exists and its due date is still
    /// `observed_due_date`.
    async fn conditional_advance_payment(
        &self,
        owner_id: &str,
        id: i64,
        observed_due_date: NaiveDate,
        new_due_date: NaiveDate,
    ) -> Result<bool>;

    /// Delete a subscription owned by `owner_id`; `false` if nothing matched
    async fn delete(&self, owner_id: &str, id: i64) -> Result<bool>;
}
