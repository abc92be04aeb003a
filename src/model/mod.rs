//! Data models for the finance dashboard.
//!
//! Every record is owned by exactly one user:
//! - Profile (keyed by the user id itself)
//! - Budget
//! - Transaction
//! - SavingsGoal
//! - Subscription
//! - Alert

pub mod alert;
pub mod budget;
pub mod profile;
pub mod savings_goal;
pub mod subscription;
pub mod transaction;

pub use alert::{Alert, AlertFilter, AlertType, NewAlert};
pub use budget::{Budget, BudgetUpdate, NewBudget};
pub use profile::{NewProfile, Profile, ProfileUpdate};
pub use savings_goal::{NewSavingsGoal, SavingsGoal, SavingsGoalUpdate};
pub use subscription::{BillingCycle, Plan, Subscription, SubscriptionStatus, billing_period_end};
pub use transaction::{NewTransaction, Transaction, TransactionQuery, TransactionType};

/// Generate a row id: entity prefix plus 12 uuid characters.
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", &uuid::Uuid::new_v4().to_string()[..12])
}

/// Current time as Unix milliseconds.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
