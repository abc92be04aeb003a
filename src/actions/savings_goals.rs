//! Savings goal actions.

use super::Dashboard;
use crate::error::{Error, Result, Success};
use crate::model::{NewSavingsGoal, SavingsGoal, SavingsGoalUpdate};
use crate::summary::{self, GoalsOverview};
use crate::views;
use tracing::info;

impl Dashboard<'_> {
    /// List the caller's savings goals, newest first.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn get_savings_goals(&self) -> Result<Vec<SavingsGoal>> {
        let user_id = self.require_user()?;
        self.storage.list_savings_goals(&user_id)
    }

    /// Create a savings goal; `current_amount` defaults to 0.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn create_savings_goal(&mut self, input: NewSavingsGoal) -> Result<SavingsGoal> {
        let user_id = self.require_user()?;
        let goal = SavingsGoal::new(&user_id, input);

        self.storage.insert_savings_goal(&goal)?;
        info!(id = %goal.id, name = %goal.name, "Created savings goal");

        self.invalidate(&[views::GOALS]);
        Ok(goal)
    }

    /// Patch one of the caller's savings goals.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, `RowNotFound`, or `Persistence`.
    pub fn update_savings_goal(&mut self, id: &str, update: &SavingsGoalUpdate) -> Result<SavingsGoal> {
        let user_id = self.require_user()?;
        let goal = self
            .storage
            .update_savings_goal(&user_id, id, update)?
            .ok_or_else(|| Error::RowNotFound {
                table: "savings_goals",
                id: id.to_string(),
            })?;
        info!(id, "Updated savings goal");

        self.invalidate(&[views::GOALS]);
        Ok(goal)
    }

    /// Delete one of the caller's savings goals. Unknown ids are not an error.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn delete_savings_goal(&mut self, id: &str) -> Result<Success> {
        let user_id = self.require_user()?;
        let deleted = self.storage.delete_savings_goal(&user_id, id)?;
        info!(id, deleted, "Deleted savings goal");

        self.invalidate(&[views::GOALS]);
        Ok(Success::OK)
    }

    /// Progress across the caller's goals as of today.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn get_goals_overview(&self) -> Result<GoalsOverview> {
        let goals = self.get_savings_goals()?;
        Ok(summary::goals_overview(&goals, chrono::Local::now().date_naive()))
    }
}

#[cfg(test)]
mod tests {
    use crate::actions::test_support::Fixture;
    use crate::error::Error;
    use crate::model::{NewSavingsGoal, SavingsGoalUpdate};
    use crate::views;

    fn goal(name: &str, target: f64) -> NewSavingsGoal {
        NewSavingsGoal {
            name: name.to_string(),
            target_amount: target,
            current_amount: None,
            deadline: None,
        }
    }

    #[test]
    fn test_goal_lifecycle() {
        let mut fx = Fixture::user("u1");
        {
            let mut dash = fx.dashboard();

            let created = dash.create_savings_goal(goal("Emergency fund", 5000.0)).unwrap();
            assert!(created.current_amount.abs() < f64::EPSILON);

            // Overshooting the target is allowed.
            let updated = dash
                .update_savings_goal(
                    &created.id,
                    &SavingsGoalUpdate {
                        current_amount: Some(5500.0),
                        ..SavingsGoalUpdate::default()
                    },
                )
                .unwrap();
            assert!((updated.current_amount - 5500.0).abs() < f64::EPSILON);

            let overview = dash.get_goals_overview().unwrap();
            assert_eq!(overview.goals[0].percent_complete, 110);

            dash.delete_savings_goal(&created.id).unwrap();
            assert!(dash.get_savings_goals().unwrap().is_empty());
        }

        assert_eq!(fx.views.paths(), vec![views::GOALS, views::GOALS, views::GOALS]);
    }

    #[test]
    fn test_goals_listed_newest_first() {
        let mut fx = Fixture::user("u1");
        let mut dash = fx.dashboard();
        dash.create_savings_goal(goal("first", 1.0)).unwrap();
        dash.create_savings_goal(goal("second", 1.0)).unwrap();

        let names: Vec<_> = dash
            .get_savings_goals()
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[test]
    fn test_update_unknown_goal() {
        let mut fx = Fixture::user("u1");
        let mut dash = fx.dashboard();
        let result = dash.update_savings_goal(
            "goal_missing",
            &SavingsGoalUpdate {
                name: Some("x".to_string()),
                ..SavingsGoalUpdate::default()
            },
        );
        assert!(matches!(
            result,
            Err(Error::RowNotFound { table: "savings_goals", .. })
        ));
    }
}
