//! # SQLite Storage
//!
//! Single-table persistence for subscriptions. The connection lives behind an
//! async mutex and every public call runs exactly one mutating statement, so a
//! conditional `UPDATE ... WHERE` is the unit of atomicity.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! Table layout (kept compatible with older deployments):
//!
//! | column            | type    | notes                         |
//! |-------------------|---------|-------------------------------|
//! | `id`              | INTEGER | primary key                   |
//! | `owner_id`        | TEXT    | Discord user id               |
//! | `label`           | TEXT    | service name                  |
//! | `amount`          | REAL    | non-negative                  |
//! | `due_date`        | TEXT    | `YYYY-MM-DD`                  |
//! | `reminder_status` | INTEGER | 0 none, 1 3-day, 2 1-day, 3 overdue |

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, error, info};
use sqlite::{Connection, State, Statement};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::error::{Result, SubscriptionError};
use crate::features::reminders::state_machine::{days_after, DUE_SOON_DAYS, DUE_TOMORROW_DAYS};
use crate::features::subscriptions::model::{format_date, parse_date, ReminderTier, Subscription};
use crate::features::subscriptions::store::SubscriptionStore;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS subscriptions (
        id INTEGER PRIMARY KEY,
        owner_id TEXT NOT NULL,
        label TEXT NOT NULL,
        amount REAL NOT NULL DEFAULT 0,
        due_date TEXT NOT NULL,
        reminder_status INTEGER NOT NULL DEFAULT 0
    );
    CREATE INDEX IF NOT EXISTS idx_subscriptions_owner ON subscriptions (owner_id);
    CREATE INDEX IF NOT EXISTS idx_subscriptions_due ON subscriptions (due_date);
";

const COLUMNS: &str = "id, owner_id, label, amount, due_date, reminder_status";

#[derive(Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

/// A row as stored, before the date and status are checked
struct RawRow {
    id: i64,
    owner_id: String,
    label: String,
    amount: f64,
    due_date: String,
    reminder_status: i64,
}

impl RawRow {
    fn read(statement: &Statement) -> Result<Self> {
        Ok(RawRow {
            id: statement.read::<i64, _>("id")?,
            owner_id: statement.read::<String, _>("owner_id")?,
            label: statement.read::<String, _>("label")?,
            amount: statement.read::<f64, _>("amount")?,
            due_date: statement.read::<String, _>("due_date")?,
            reminder_status: statement.read::<i64, _>("reminder_status")?,
        })
    }

    fn into_subscription(self) -> Result<Subscription> {
        let due_date = parse_date(&self.due_date).ok_or_else(|| {
            SubscriptionError::DataIntegrity {
                id: self.id,
                field: "due_date",
                value: self.due_date.clone(),
            }
        })?;
        let reminder_status = ReminderTier::from_i64(self.reminder_status).ok_or_else(|| {
            SubscriptionError::DataIntegrity {
                id: self.id,
                field: "reminder_status",
                value: self.reminder_status.to_string(),
            }
        })?;

        Ok(Subscription {
            id: self.id,
            owner_id: self.owner_id,
            label: self.label,
            amount: self.amount,
            due_date,
            reminder_status,
        })
    }
}

/// Drain a prepared SELECT, skipping rows that fail integrity checks
fn collect_rows(statement: &mut Statement) -> Result<Vec<Subscription>> {
    let mut rows = Vec::new();
    while let State::Row = statement.next()? {
        match RawRow::read(statement)?.into_subscription() {
            Ok(subscription) => rows.push(subscription),
            Err(e) => error!("Skipping subscription row: {e}"),
        }
    }
    Ok(rows)
}

impl Database {
    /// Open (or create) the database at `database_path`
    ///
    /// `":memory:"` gives a private in-memory database, which the tests use.
    pub async fn new(database_path: &str) -> Result<Self> {
        let connection = sqlite::open(database_path)?;
        connection.execute(SCHEMA)?;
        info!("📦 Subscription database ready at {database_path}");

        Ok(Database {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Run a SELECT bound to a due date and a status ceiling
    async fn query_by_date(
        &self,
        query: &str,
        date: NaiveDate,
        below: ReminderTier,
    ) -> Result<Vec<Subscription>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(query)?;
        statement.bind((1, format_date(date).as_str()))?;
        statement.bind((2, below.as_i64()))?;
        collect_rows(&mut statement)
    }

    /// Subscriptions due on exactly `due` whose status is below `below`
    async fn find_due_on(
        &self,
        due: Option<NaiveDate>,
        below: ReminderTier,
    ) -> Result<Vec<Subscription>> {
        let Some(due) = due else {
            return Ok(Vec::new());
        };
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions \
             WHERE due_date = ? AND reminder_status < ? ORDER BY due_date, id"
        );
        self.query_by_date(&query, due, below).await
    }
}

#[async_trait]
impl SubscriptionStore for Database {
    async fn insert(
        &self,
        owner_id: &str,
        label: &str,
        amount: f64,
        due_date: NaiveDate,
    ) -> Result<i64> {
        let connection = self.connection.lock().await;

        let mut statement = connection.prepare(
            "INSERT INTO subscriptions (owner_id, label, amount, due_date, reminder_status) \
             VALUES (?, ?, ?, ?, 0)",
        )?;
        statement.bind((1, owner_id))?;
        statement.bind((2, label))?;
        statement.bind((3, amount))?;
        statement.bind((4, format_date(due_date).as_str()))?;
        statement.next()?;

        let mut rowid = connection.prepare("SELECT last_insert_rowid() AS id")?;
        rowid.next()?;
        let id = rowid.read::<i64, _>("id")?;

        debug!("Inserted subscription {id} for owner {owner_id}: {label}");
        Ok(id)
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Subscription>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE owner_id = ? ORDER BY due_date, id"
        ))?;
        statement.bind((1, owner_id))?;
        collect_rows(&mut statement)
    }

    async fn find_by_id(&self, owner_id: &str, id: i64) -> Result<Option<Subscription>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE owner_id = ? AND id = ?"
        ))?;
        statement.bind((1, owner_id))?;
        statement.bind((2, id))?;

        match statement.next()? {
            State::Row => RawRow::read(&statement)?.into_subscription().map(Some),
            State::Done => Ok(None),
        }
    }

    async fn find_due_soon(&self, today: NaiveDate) -> Result<Vec<Subscription>> {
        self.find_due_on(days_after(today, DUE_SOON_DAYS), ReminderTier::DueSoon)
            .await
    }

    async fn find_due_tomorrow(&self, today: NaiveDate) -> Result<Vec<Subscription>> {
        self.find_due_on(days_after(today, DUE_TOMORROW_DAYS), ReminderTier::DueTomorrow)
            .await
    }

    async fn find_overdue(&self, today: NaiveDate) -> Result<Vec<Subscription>> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions \
             WHERE due_date < ? AND reminder_status < ? ORDER BY due_date, id"
        );
        self.query_by_date(&query, today, ReminderTier::Overdue).await
    }

    async fn conditional_update_status(
        &self,
        id: i64,
        observed_due_date: NaiveDate,
        new_status: ReminderTier,
    ) -> Result<bool> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "UPDATE subscriptions SET reminder_status = ?1 \
             WHERE id = ?2 AND due_date = ?3 AND reminder_status < ?1",
        )?;
        statement.bind((1, new_status.as_i64()))?;
        statement.bind((2, id))?;
        statement.bind((3, format_date(observed_due_date).as_str()))?;
        statement.next()?;

        let applied = connection.change_count() > 0;
        debug!("Status of subscription {id} -> {new_status}: applied={applied}");
        Ok(applied)
    }

    async fn conditional_advance_payment(
        &self,
        owner_id: &str,
        id: i64,
        observed_due_date: NaiveDate,
        new_due_date: NaiveDate,
    ) -> Result<bool> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "UPDATE subscriptions SET due_date = ?, reminder_status = 0 \
             WHERE owner_id = ? AND id = ? AND due_date = ?",
        )?;
        statement.bind((1, format_date(new_due_date).as_str()))?;
        statement.bind((2, owner_id))?;
        statement.bind((3, id))?;
        statement.bind((4, format_date(observed_due_date).as_str()))?;
        statement.next()?;

        Ok(connection.change_count() > 0)
    }

    async fn delete(&self, owner_id: &str, id: i64) -> Result<bool> {
        let connection = self.connection.lock().await;
        let mut statement =
            connection.prepare("DELETE FROM subscriptions WHERE owner_id = ? AND id = ?")?;
        statement.bind((1, owner_id))?;
        statement.bind((2, id))?;
        statement.next()?;

        Ok(connection.change_count() > 0)
    }
}
