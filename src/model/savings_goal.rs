//! Savings goal model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A target amount the user is saving towards.
///
/// `current_amount` may exceed `target_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    /// Unique identifier (`goal_` prefix)
    pub id: String,

    pub user_id: String,

    pub name: String,

    pub target_amount: f64,

    pub current_amount: f64,

    pub deadline: Option<NaiveDate>,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

/// Input for creating a savings goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: f64,
    /// Defaults to 0
    pub current_amount: Option<f64>,
    pub deadline: Option<NaiveDate>,
}

/// Partial goal update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavingsGoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub deadline: Option<NaiveDate>,
}

impl SavingsGoalUpdate {
    /// True when the update would not change any column.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.target_amount.is_none()
            && self.current_amount.is_none()
            && self.deadline.is_none()
    }
}

impl SavingsGoal {
    /// Create a new goal owned by `user_id`.
    pub fn new(user_id: &str, input: NewSavingsGoal) -> Self {
        let now = super::now_millis();
        Self {
            id: super::new_id("goal"),
            user_id: user_id.to_string(),
            name: input.name,
            target_amount: input.target_amount,
            current_amount: input.current_amount.unwrap_or(0.0),
            deadline: input.deadline,
            created_at: now,
            updated_at: now,
        }
    }
}
