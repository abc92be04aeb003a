//! Subscription actions.

use super::Dashboard;
use crate::error::{Error, Result};
use crate::model::{BillingCycle, Plan, Subscription, billing_period_end};
use crate::views;
use chrono::Utc;
use tracing::info;

impl Dashboard<'_> {
    /// Fetch the caller's subscription.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, `RowNotFound` if the caller never onboarded, or
    /// `Persistence`.
    pub fn get_subscription(&self) -> Result<Subscription> {
        let user_id = self.require_user()?;
        self.storage
            .get_subscription(&user_id)?
            .ok_or(Error::RowNotFound {
                table: "subscriptions",
                id: user_id,
            })
    }

    /// Switch plan and billing cycle, restarting the period now.
    ///
    /// The status becomes active and the period ends one month or one
    /// calendar year after it starts, depending on the cycle.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, `RowNotFound`, or `Persistence`.
    pub fn update_subscription(&mut self, plan: Plan, billing_cycle: BillingCycle) -> Result<Subscription> {
        let user_id = self.require_user()?;

        let start = Utc::now();
        let end = billing_period_end(start, billing_cycle)?;

        let subscription = self
            .storage
            .update_subscription(&user_id, plan, billing_cycle, start, end)?
            .ok_or_else(|| Error::RowNotFound {
                table: "subscriptions",
                id: user_id.clone(),
            })?;
        info!(
            user_id = %user_id,
            plan = plan.as_str(),
            cycle = billing_cycle.as_str(),
            "Updated subscription"
        );

        self.invalidate(&[views::SUBSCRIPTION]);
        Ok(subscription)
    }
}
