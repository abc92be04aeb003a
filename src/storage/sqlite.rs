//! SQLite storage implementation.
//!
//! Every method takes the owning `user_id` and folds it into the WHERE
//! clause; nothing here can read or write another user's rows. Writes go
//! through [`SqliteStorage::mutate`] so each statement runs in its own
//! IMMEDIATE transaction.

use crate::error::{Error, Result};
use crate::model::{
    Alert, AlertFilter, BillingCycle, Budget, BudgetUpdate, Plan, Profile, ProfileUpdate,
    SavingsGoal, SavingsGoalUpdate, Subscription, SubscriptionStatus, Transaction,
    TransactionQuery, now_millis,
};
use crate::storage::schema::apply_schema;
use chrono::{DateTime, Utc};
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, OptionalExtension, Row, Transaction as SqlTransaction};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

const PROFILE_COLUMNS: &str =
    "id, display_name, business_type, monthly_income, financial_goals, created_at, updated_at";
const BUDGET_COLUMNS: &str = "id, user_id, category, amount, spent, period, created_at, updated_at";
const TRANSACTION_COLUMNS: &str =
    "id, user_id, category, amount, type, description, transaction_date, created_at";
const GOAL_COLUMNS: &str =
    "id, user_id, name, target_amount, current_amount, deadline, created_at, updated_at";
const SUBSCRIPTION_COLUMNS: &str = "id, user_id, plan, billing_cycle, status, current_period_start, current_period_end, created_at, updated_at";
const ALERT_COLUMNS: &str = "id, user_id, title, message, type, category, is_read, created_at";

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a database with an optional busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open_with_timeout(path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_millis(timeout_ms.unwrap_or(5000)))?;
        apply_schema(&conn)?;
        debug!(path = %path.display(), "Opened dashboard database");
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run a write inside an IMMEDIATE transaction.
    ///
    /// Commits when the closure succeeds, rolls back (on drop) when it fails.
    ///
    /// # Errors
    ///
    /// Returns the closure's error or any transaction error.
    pub fn mutate<F, R>(&mut self, op: &str, user_id: &str, f: F) -> Result<R>
    where
        F: FnOnce(&SqlTransaction) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        let result = f(&tx)?;
        tx.commit()?;
        debug!(op, user_id, "Committed");
        Ok(result)
    }

    // ==================
    // Profile Operations
    // ==================

    /// Insert a profile together with its starting subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile already exists or an insert fails.
    pub fn create_profile(&mut self, profile: &Profile, subscription: &Subscription) -> Result<()> {
        let goals = serde_json::to_string(&profile.financial_goals)?;

        self.mutate("create_profile", &profile.id, |tx| {
            tx.execute(
                "INSERT INTO profiles (id, display_name, business_type, monthly_income, financial_goals, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    profile.id,
                    profile.display_name,
                    profile.business_type,
                    profile.monthly_income,
                    goals,
                    profile.created_at,
                    profile.updated_at,
                ],
            )?;
            insert_subscription(tx, subscription)?;
            Ok(())
        })
    }

    /// Get the caller's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let profile = self
            .conn
            .query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"),
                [user_id],
                map_profile_row,
            )
            .optional()?;
        Ok(profile)
    }

    /// Apply a partial update to the caller's profile.
    ///
    /// Returns `None` when the caller has no profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_profile(&mut self, user_id: &str, update: &ProfileUpdate) -> Result<Option<Profile>> {
        let mut set = SetClause::new();
        set.push("display_name", update.display_name.clone());
        set.push("business_type", update.business_type.clone());
        set.push("monthly_income", update.monthly_income);
        if let Some(goals) = &update.financial_goals {
            set.push("financial_goals", Some(serde_json::to_string(goals)?));
        }

        self.mutate("update_profile", user_id, |tx| {
            set.execute_returning(
                tx,
                "profiles",
                "id = ?{u}",
                &[&user_id],
                PROFILE_COLUMNS,
                map_profile_row,
            )
        })
    }

    // =================
    // Budget Operations
    // =================

    /// List the caller's budgets, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BUDGET_COLUMNS} FROM budgets WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let budgets = stmt
            .query_map([user_id], map_budget_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(budgets)
    }

    /// Insert a budget.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_budget(&mut self, budget: &Budget) -> Result<()> {
        self.mutate("insert_budget", &budget.user_id, |tx| {
            tx.execute(
                &format!("INSERT INTO budgets ({BUDGET_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                rusqlite::params![
                    budget.id,
                    budget.user_id,
                    budget.category,
                    budget.amount,
                    budget.spent,
                    budget.period,
                    budget.created_at,
                    budget.updated_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Find the budget for a category.
    ///
    /// Uniqueness of (user, category) is not enforced; the oldest match wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_budget_by_category(&self, user_id: &str, category: &str) -> Result<Option<Budget>> {
        let budget = self
            .conn
            .query_row(
                &format!(
                    "SELECT {BUDGET_COLUMNS} FROM budgets WHERE user_id = ?1 AND category = ?2
                     ORDER BY created_at ASC, rowid ASC LIMIT 1"
                ),
                [user_id, category],
                map_budget_row,
            )
            .optional()?;
        Ok(budget)
    }

    /// Apply a partial update to one of the caller's budgets.
    ///
    /// Returns `None` when no such budget belongs to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_budget(&mut self, user_id: &str, id: &str, update: &BudgetUpdate) -> Result<Option<Budget>> {
        let mut set = SetClause::new();
        set.push("category", update.category.clone());
        set.push("amount", update.amount);
        set.push("spent", update.spent);

        self.mutate("update_budget", user_id, |tx| {
            set.execute_returning(
                tx,
                "budgets",
                "id = ?{i} AND user_id = ?{u}",
                &[&id, &user_id],
                BUDGET_COLUMNS,
                map_budget_row,
            )
        })
    }

    /// Add `amount` to a budget's spent total.
    ///
    /// Returns `None` when the budget no longer exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn add_budget_spent(&mut self, user_id: &str, id: &str, amount: f64) -> Result<Option<Budget>> {
        let now = now_millis();
        self.mutate("add_budget_spent", user_id, |tx| {
            let budget = tx
                .query_row(
                    &format!(
                        "UPDATE budgets SET spent = spent + ?1, updated_at = ?2
                         WHERE id = ?3 AND user_id = ?4
                         RETURNING {BUDGET_COLUMNS}"
                    ),
                    rusqlite::params![amount, now, id, user_id],
                    map_budget_row,
                )
                .optional()?;
            Ok(budget)
        })
    }

    /// Delete one of the caller's budgets. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_budget(&mut self, user_id: &str, id: &str) -> Result<usize> {
        self.delete_owned("budgets", user_id, id)
    }

    // ======================
    // Transaction Operations
    // ======================

    /// List the caller's transactions, most recent `transaction_date` first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_transactions(&self, user_id: &str, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let kind = query.kind.map(|k| k.as_str());
        // SQLite treats a negative LIMIT as unbounded
        let limit = query.limit.map_or(-1, i64::from);

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions
             WHERE user_id = ?1 AND (?2 IS NULL OR type = ?2)
             ORDER BY transaction_date DESC, created_at DESC, rowid DESC
             LIMIT ?3"
        ))?;
        let transactions = stmt
            .query_map(rusqlite::params![user_id, kind, limit], map_transaction_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(transactions)
    }

    /// Insert a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_transaction(&mut self, txn: &Transaction) -> Result<()> {
        self.mutate("insert_transaction", &txn.user_id, |tx| {
            tx.execute(
                &format!(
                    "INSERT INTO transactions ({TRANSACTION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"
                ),
                rusqlite::params![
                    txn.id,
                    txn.user_id,
                    txn.category,
                    txn.amount,
                    txn.kind.as_str(),
                    txn.description,
                    txn.transaction_date,
                    txn.created_at,
                ],
            )?;
            Ok(())
        })
    }

    // =======================
    // Savings Goal Operations
    // =======================

    /// List the caller's savings goals, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_savings_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM savings_goals WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let goals = stmt
            .query_map([user_id], map_goal_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    /// Insert a savings goal.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_savings_goal(&mut self, goal: &SavingsGoal) -> Result<()> {
        self.mutate("insert_savings_goal", &goal.user_id, |tx| {
            tx.execute(
                &format!("INSERT INTO savings_goals ({GOAL_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                rusqlite::params![
                    goal.id,
                    goal.user_id,
                    goal.name,
                    goal.target_amount,
                    goal.current_amount,
                    goal.deadline,
                    goal.created_at,
                    goal.updated_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Apply a partial update to one of the caller's goals.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_savings_goal(
        &mut self,
        user_id: &str,
        id: &str,
        update: &SavingsGoalUpdate,
    ) -> Result<Option<SavingsGoal>> {
        let mut set = SetClause::new();
        set.push("name", update.name.clone());
        set.push("target_amount", update.target_amount);
        set.push("current_amount", update.current_amount);
        set.push("deadline", update.deadline);

        self.mutate("update_savings_goal", user_id, |tx| {
            set.execute_returning(
                tx,
                "savings_goals",
                "id = ?{i} AND user_id = ?{u}",
                &[&id, &user_id],
                GOAL_COLUMNS,
                map_goal_row,
            )
        })
    }

    /// Delete one of the caller's goals. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_savings_goal(&mut self, user_id: &str, id: &str) -> Result<usize> {
        self.delete_owned("savings_goals", user_id, id)
    }

    // =======================
    // Subscription Operations
    // =======================

    /// Get the caller's subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_subscription(&self, user_id: &str) -> Result<Option<Subscription>> {
        let subscription = self
            .conn
            .query_row(
                &format!("SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE user_id = ?1"),
                [user_id],
                map_subscription_row,
            )
            .optional()?;
        Ok(subscription)
    }

    /// Switch the caller's plan and restart the billing period.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_subscription(
        &mut self,
        user_id: &str,
        plan: Plan,
        billing_cycle: BillingCycle,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Result<Option<Subscription>> {
        let now = now_millis();
        self.mutate("update_subscription", user_id, |tx| {
            let subscription = tx
                .query_row(
                    &format!(
                        "UPDATE subscriptions
                         SET plan = ?1, billing_cycle = ?2, status = ?3,
                             current_period_start = ?4, current_period_end = ?5, updated_at = ?6
                         WHERE user_id = ?7
                         RETURNING {SUBSCRIPTION_COLUMNS}"
                    ),
                    rusqlite::params![
                        plan.as_str(),
                        billing_cycle.as_str(),
                        SubscriptionStatus::Active.as_str(),
                        period_start,
                        period_end,
                        now,
                        user_id,
                    ],
                    map_subscription_row,
                )
                .optional()?;
            Ok(subscription)
        })
    }

    // ================
    // Alert Operations
    // ================

    /// List the caller's alerts matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_alerts(&self, user_id: &str, filter: AlertFilter) -> Result<Vec<Alert>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ALERT_COLUMNS} FROM alerts
             WHERE user_id = ?1 AND (?2 IS NULL OR type = ?2) AND (?3 = 0 OR is_read = 0)
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let alerts = stmt
            .query_map(
                rusqlite::params![
                    user_id,
                    filter.kind().map(|k| k.as_str()),
                    filter.unread_only()
                ],
                map_alert_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(alerts)
    }

    /// Count the caller's unread alerts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_unread_alerts(&self, user_id: &str) -> Result<u32> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM alerts WHERE user_id = ?1 AND is_read = 0",
            [user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Insert an alert.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_alert(&mut self, alert: &Alert) -> Result<()> {
        self.mutate("insert_alert", &alert.user_id, |tx| {
            tx.execute(
                &format!("INSERT INTO alerts ({ALERT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
                rusqlite::params![
                    alert.id,
                    alert.user_id,
                    alert.title,
                    alert.message,
                    alert.kind.as_str(),
                    alert.category,
                    alert.is_read,
                    alert.created_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Flag one of the caller's alerts as read. Returns the rows matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_alert_read(&mut self, user_id: &str, id: &str) -> Result<usize> {
        self.mutate("mark_alert_read", user_id, |tx| {
            let rows = tx.execute(
                "UPDATE alerts SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
            )?;
            Ok(rows)
        })
    }

    /// Flag every one of the caller's alerts as read. Returns the rows matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_all_alerts_read(&mut self, user_id: &str) -> Result<usize> {
        self.mutate("mark_all_alerts_read", user_id, |tx| {
            let rows = tx.execute("UPDATE alerts SET is_read = 1 WHERE user_id = ?1", [user_id])?;
            Ok(rows)
        })
    }

    /// Delete one of the caller's alerts. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_alert(&mut self, user_id: &str, id: &str) -> Result<usize> {
        self.delete_owned("alerts", user_id, id)
    }

    fn delete_owned(&mut self, table: &'static str, user_id: &str, id: &str) -> Result<usize> {
        self.mutate(&format!("delete_{table}"), user_id, |tx| {
            let rows = tx.execute(
                &format!("DELETE FROM {table} WHERE id = ?1 AND user_id = ?2"),
                [id, user_id],
            )?;
            Ok(rows)
        })
    }
}

fn insert_subscription(tx: &SqlTransaction, subscription: &Subscription) -> Result<()> {
    tx.execute(
        &format!(
            "INSERT INTO subscriptions ({SUBSCRIPTION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        rusqlite::params![
            subscription.id,
            subscription.user_id,
            subscription.plan.as_str(),
            subscription.billing_cycle.as_str(),
            subscription.status.as_str(),
            subscription.current_period_start,
            subscription.current_period_end,
            subscription.created_at,
            subscription.updated_at,
        ],
    )?;
    Ok(())
}

/// Builder for `UPDATE ... SET` with only the provided columns.
///
/// `updated_at` is always set. The WHERE template refers to its own
/// parameters as `?{i}` (row id) and `?{u}` (user id); they are numbered
/// after the SET parameters.
struct SetClause {
    columns: Vec<&'static str>,
    values: Vec<Box<dyn ToSql>>,
}

impl SetClause {
    fn new() -> Self {
        Self {
            columns: vec!["updated_at"],
            values: vec![Box::new(now_millis())],
        }
    }

    fn push<T: ToSql + 'static>(&mut self, column: &'static str, value: Option<T>) {
        if let Some(v) = value {
            self.columns.push(column);
            self.values.push(Box::new(v));
        }
    }

    fn execute_returning<T>(
        &self,
        tx: &SqlTransaction,
        table: &str,
        filter: &str,
        filter_params: &[&dyn ToSql],
        returning: &str,
        map_row: fn(&Row) -> rusqlite::Result<T>,
    ) -> Result<Option<T>> {
        let assignments = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| format!("{col} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");

        // Filter parameters follow the SET parameters, in template order
        let base = self.columns.len();
        let filter = if filter_params.len() == 2 {
            filter
                .replace("{i}", &(base + 1).to_string())
                .replace("{u}", &(base + 2).to_string())
        } else {
            filter.replace("{u}", &(base + 1).to_string())
        };

        let sql = format!("UPDATE {table} SET {assignments} WHERE {filter} RETURNING {returning}");

        let mut params: Vec<&dyn ToSql> = Vec::with_capacity(self.values.len() + filter_params.len());
        for value in &self.values {
            params.push(value.as_ref());
        }
        for value in filter_params {
            params.push(*value);
        }

        let row = tx.query_row(&sql, params.as_slice(), map_row).optional()?;
        Ok(row)
    }
}

fn parse_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = Error>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

// Helper to map profile rows
fn map_profile_row(row: &Row) -> rusqlite::Result<Profile> {
    let goals: String = row.get(4)?;
    let financial_goals = serde_json::from_str(&goals)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    Ok(Profile {
        id: row.get(0)?,
        display_name: row.get(1)?,
        business_type: row.get(2)?,
        monthly_income: row.get(3)?,
        financial_goals,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// Helper to map budget rows
fn map_budget_row(row: &Row) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        spent: row.get(4)?,
        period: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

// Helper to map transaction rows
fn map_transaction_row(row: &Row) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        amount: row.get(3)?,
        kind: parse_column(row, 4)?,
        description: row.get(5)?,
        transaction_date: row.get(6)?,
        created_at: row.get(7)?,
    })
}

// Helper to map savings goal rows
fn map_goal_row(row: &Row) -> rusqlite::Result<SavingsGoal> {
    Ok(SavingsGoal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        target_amount: row.get(3)?,
        current_amount: row.get(4)?,
        deadline: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

// Helper to map subscription rows
fn map_subscription_row(row: &Row) -> rusqlite::Result<Subscription> {
    Ok(Subscription {
        id: row.get(0)?,
        user_id: row.get(1)?,
        plan: parse_column(row, 2)?,
        billing_cycle: parse_column(row, 3)?,
        status: parse_column(row, 4)?,
        current_period_start: row.get(5)?,
        current_period_end: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

// Helper to map alert rows
fn map_alert_row(row: &Row) -> rusqlite::Result<Alert> {
    Ok(Alert {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        message: row.get(3)?,
        kind: parse_column(row, 4)?,
        category: row.get(5)?,
        is_read: row.get(6)?,
        created_at: row.get(7)?,
    })
}
