//! Profile model.
//!
//! One profile per user; its id is the user id. The profile feeds the
//! advice prompt (business type, income, goals).

use serde::{Deserialize, Serialize};

/// A user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Same as the owning user id
    pub id: String,

    pub display_name: Option<String>,

    /// Free text, e.g. "freelance designer"
    pub business_type: Option<String>,

    pub monthly_income: Option<f64>,

    /// Goals picked during onboarding
    #[serde(default)]
    pub financial_goals: Vec<String>,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,

    /// Last update timestamp (Unix milliseconds)
    pub updated_at: i64,
}

/// Onboarding input for a new profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProfile {
    pub display_name: Option<String>,
    pub business_type: Option<String>,
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub financial_goals: Vec<String>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub business_type: Option<String>,
    pub monthly_income: Option<f64>,
    pub financial_goals: Option<Vec<String>>,
}

impl ProfileUpdate {
    /// True when the update would not change any column.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.business_type.is_none()
            && self.monthly_income.is_none()
            && self.financial_goals.is_none()
    }
}

impl Profile {
    /// Build a profile for `user_id` from onboarding input.
    pub fn new(user_id: &str, input: NewProfile) -> Self {
        let now = super::now_millis();
        let mut goals = input.financial_goals;
        goals.sort();
        goals.dedup();

        Self {
            id: user_id.to_string(),
            display_name: input.display_name,
            business_type: input.business_type,
            monthly_income: input.monthly_income,
            financial_goals: goals,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_profile_dedups_goals() {
        let profile = Profile::new(
            "user_1",
            NewProfile {
                financial_goals: vec![
                    "save".to_string(),
                    "invest".to_string(),
                    "save".to_string(),
                ],
                ..NewProfile::default()
            },
        );

        assert_eq!(profile.id, "user_1");
        assert_eq!(profile.financial_goals, vec!["invest", "save"]);
    }

    #[test]
    fn test_empty_update() {
        assert!(ProfileUpdate::default().is_empty());
        let update = ProfileUpdate {
            monthly_income: Some(4000.0),
            ..ProfileUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
