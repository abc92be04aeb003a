//! Subscription model and plan pricing.

use crate::error::{Error, Result};
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
    Business,
}

impl Plan {
    pub const ALL: [Self; 3] = [Self::Free, Self::Pro, Self::Business];

    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Business => "business",
        }
    }

    /// List price in dollars for one billing period.
    #[must_use]
    pub const fn price(&self, cycle: BillingCycle) -> u32 {
        match (self, cycle) {
            (Self::Free, _) => 0,
            (Self::Pro, BillingCycle::Monthly) => 12,
            (Self::Pro, BillingCycle::Annual) => 120,
            (Self::Business, BillingCycle::Monthly) => 29,
            (Self::Business, BillingCycle::Annual) => 290,
        }
    }
}

impl FromStr for Plan {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "business" => Ok(Self::Business),
            other => Err(Error::InvalidArgument(format!(
                "plan must be free, pro or business, got '{other}'"
            ))),
        }
    }
}

/// How often a subscription renews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Annual,
}

impl BillingCycle {
    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }

    #[must_use]
    pub const fn months(&self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Annual => 12,
        }
    }
}

impl FromStr for BillingCycle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "annual" | "yearly" => Ok(Self::Annual),
            other => Err(Error::InvalidArgument(format!(
                "billing cycle must be monthly or annual, got '{other}'"
            ))),
        }
    }
}

/// Subscription lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    PastDue,
}

impl SubscriptionStatus {
    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::PastDue => "past_due",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(Self::Active),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            "past_due" => Ok(Self::PastDue),
            other => Err(Error::InvalidArgument(format!(
                "unknown subscription status '{other}'"
            ))),
        }
    }
}

/// A user's subscription. One row per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier (`sub_` prefix)
    pub id: String,

    pub user_id: String,

    pub plan: Plan,

    pub billing_cycle: BillingCycle,

    pub status: SubscriptionStatus,

    pub current_period_start: DateTime<Utc>,

    /// Derived from `billing_cycle` whenever the plan changes
    pub current_period_end: DateTime<Utc>,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

impl Subscription {
    /// The free monthly subscription every new account starts on.
    ///
    /// # Errors
    ///
    /// Returns an error if the period end is out of range.
    pub fn free(user_id: &str) -> Result<Self> {
        let start = Utc::now();
        let now = super::now_millis();
        Ok(Self {
            id: super::new_id("sub"),
            user_id: user_id.to_string(),
            plan: Plan::Free,
            billing_cycle: BillingCycle::Monthly,
            status: SubscriptionStatus::Active,
            current_period_start: start,
            current_period_end: billing_period_end(start, BillingCycle::Monthly)?,
            created_at: now,
            updated_at: now,
        })
    }
}

/// End of the billing period that starts at `start`.
///
/// Calendar arithmetic: Jan 31 + 1 month clamps to the last day of February.
///
/// # Errors
///
/// Returns an error if the result is out of chrono's range.
pub fn billing_period_end(start: DateTime<Utc>, cycle: BillingCycle) -> Result<DateTime<Utc>> {
    start
        .checked_add_months(Months::new(cycle.months()))
        .ok_or_else(|| Error::InvalidArgument(format!("billing period overflows from {start}")))
}
