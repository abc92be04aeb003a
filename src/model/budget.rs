//! Budget model.
//!
//! A spending limit for one category. `spent` is bumped by expense
//! transactions in the same category.

use serde::{Deserialize, Serialize};

/// A category budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// Unique identifier (`bud_` prefix)
    pub id: String,

    pub user_id: String,

    /// Matched against `Transaction::category` for sync
    pub category: String,

    /// Budgeted amount for the period
    pub amount: f64,

    /// Amount spent so far
    pub spent: f64,

    /// Free text period label, e.g. "monthly"
    pub period: String,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

/// Input for creating a budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBudget {
    pub category: String,
    pub amount: f64,
    pub period: String,
}

/// Partial budget update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetUpdate {
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub spent: Option<f64>,
}

impl BudgetUpdate {
    /// True when the update would not change any column.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none() && self.amount.is_none() && self.spent.is_none()
    }
}

impl Budget {
    /// Create a new budget with nothing spent.
    pub fn new(user_id: &str, input: NewBudget) -> Self {
        let now = super::now_millis();
        Self {
            id: super::new_id("bud"),
            user_id: user_id.to_string(),
            category: input.category,
            amount: input.amount,
            spent: 0.0,
            period: input.period,
            created_at: now,
            updated_at: now,
        }
    }

    /// Amount left before the budget is exhausted (negative when over).
    #[must_use]
    pub fn remaining(&self) -> f64 {
        self.amount - self.spent
    }
}
