//! Profile actions.

use super::Dashboard;
use crate::error::{Error, Result};
use crate::model::{NewProfile, Profile, ProfileUpdate, Subscription};
use crate::views;
use tracing::info;

impl Dashboard<'_> {
    /// Fetch the caller's profile.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, `RowNotFound` if the caller has not onboarded, or
    /// `Persistence`.
    pub fn get_profile(&self) -> Result<Profile> {
        let user_id = self.require_user()?;
        self.storage
            .get_profile(&user_id)?
            .ok_or(Error::RowNotFound {
                table: "profiles",
                id: user_id,
            })
    }

    /// Onboard the caller: create the profile and a free monthly subscription.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, or `Persistence` (including when the profile
    /// already exists).
    pub fn create_profile(&mut self, input: NewProfile) -> Result<Profile> {
        let user_id = self.require_user()?;
        let profile = Profile::new(&user_id, input);
        let subscription = Subscription::free(&user_id)?;

        self.storage.create_profile(&profile, &subscription)?;
        info!(user_id = %user_id, "Created profile");

        self.invalidate(&[views::DASHBOARD]);
        Ok(profile)
    }

    /// Apply a partial update to the caller's profile.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, `RowNotFound` if there is no profile, or
    /// `Persistence`.
    pub fn update_profile(&mut self, update: &ProfileUpdate) -> Result<Profile> {
        let user_id = self.require_user()?;

        let mut update = update.clone();
        if let Some(goals) = update.financial_goals.as_mut() {
            goals.sort();
            goals.dedup();
        }

        let profile = self
            .storage
            .update_profile(&user_id, &update)?
            .ok_or_else(|| Error::RowNotFound {
                table: "profiles",
                id: user_id.clone(),
            })?;
        info!(user_id = %user_id, "Updated profile");

        self.invalidate(&[views::DASHBOARD]);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use crate::actions::test_support::Fixture;
    use crate::error::Error;
    use crate::model::{BillingCycle, NewProfile, Plan, ProfileUpdate, SubscriptionStatus};
    use crate::views;

    #[test]
    fn test_create_profile_seeds_free_subscription() {
        let mut fx = Fixture::user("u1");
        let mut dash = fx.dashboard();

        let profile = dash
            .create_profile(NewProfile {
                display_name: Some("Ada".to_string()),
                business_type: Some("consultant".to_string()),
                monthly_income: Some(8000.0),
                financial_goals: vec!["retire early".to_string()],
            })
            .unwrap();
        assert_eq!(profile.id, "u1");

        let sub = dash.get_subscription().unwrap();
        assert_eq!(sub.plan, Plan::Free);
        assert_eq!(sub.billing_cycle, BillingCycle::Monthly);
        assert_eq!(sub.status, SubscriptionStatus::Active);

        assert_eq!(fx.views.paths(), vec![views::DASHBOARD]);
    }

    #[test]
    fn test_get_profile_missing_is_row_not_found() {
        let mut fx = Fixture::user("u1");
        let dash = fx.dashboard();
        assert!(matches!(
            dash.get_profile(),
            Err(Error::RowNotFound { table: "profiles", .. })
        ));
    }

    #[test]
    fn test_update_profile() {
        let mut fx = Fixture::user("u1");
        let mut dash = fx.dashboard();
        dash.create_profile(NewProfile::default()).unwrap();

        let updated = dash
            .update_profile(&ProfileUpdate {
                monthly_income: Some(6100.5),
                financial_goals: Some(vec!["b".to_string(), "a".to_string(), "b".to_string()]),
                ..ProfileUpdate::default()
            })
            .unwrap();

        assert_eq!(updated.monthly_income, Some(6100.5));
        assert_eq!(updated.financial_goals, vec!["a", "b"]);
        assert_eq!(dash.get_profile().unwrap(), updated);
    }

    #[test]
    fn test_update_missing_profile_does_not_invalidate() {
        let mut fx = Fixture::user("u1");
        {
            let mut dash = fx.dashboard();
            let result = dash.update_profile(&ProfileUpdate {
                display_name: Some("x".to_string()),
                ..ProfileUpdate::default()
            });
            assert!(matches!(result, Err(Error::RowNotFound { .. })));
        }
        assert!(fx.views.paths().is_empty());
    }
}
