//! Budget actions.

use super::Dashboard;
use crate::error::{Error, Result, Success};
use crate::model::{Budget, BudgetUpdate, NewBudget};
use crate::summary::{self, BudgetOverview};
use crate::views;
use tracing::info;

impl Dashboard<'_> {
    /// List the caller's budgets, newest first.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn get_budgets(&self) -> Result<Vec<Budget>> {
        let user_id = self.require_user()?;
        self.storage.list_budgets(&user_id)
    }

    /// Create a budget with nothing spent yet.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn create_budget(&mut self, input: NewBudget) -> Result<Budget> {
        let user_id = self.require_user()?;
        let budget = Budget::new(&user_id, input);

        self.storage.insert_budget(&budget)?;
        info!(id = %budget.id, category = %budget.category, "Created budget");

        self.invalidate(&[views::BUDGET]);
        Ok(budget)
    }

    /// Patch one of the caller's budgets.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, `RowNotFound` if the caller owns no such budget,
    /// or `Persistence`.
    pub fn update_budget(&mut self, id: &str, update: &BudgetUpdate) -> Result<Budget> {
        let user_id = self.require_user()?;
        let budget = self
            .storage
            .update_budget(&user_id, id, update)?
            .ok_or_else(|| Error::RowNotFound {
                table: "budgets",
                id: id.to_string(),
            })?;
        info!(id, "Updated budget");

        self.invalidate(&[views::BUDGET]);
        Ok(budget)
    }

    /// Delete one of the caller's budgets. Unknown ids are not an error.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn delete_budget(&mut self, id: &str) -> Result<Success> {
        let user_id = self.require_user()?;
        let deleted = self.storage.delete_budget(&user_id, id)?;
        info!(id, deleted, "Deleted budget");

        self.invalidate(&[views::BUDGET]);
        Ok(Success::OK)
    }

    /// Totals and per-budget status for the budget page.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn get_budget_overview(&self) -> Result<BudgetOverview> {
        let budgets = self.get_budgets()?;
        Ok(summary::budget_overview(&budgets))
    }
}

#[cfg(test)]
mod tests {
    use crate::actions::test_support::Fixture;
    use crate::error::Error;
    use crate::model::{BudgetUpdate, NewBudget};
    use crate::summary::BudgetStatus;
    use crate::views;

    fn tools(amount: f64) -> NewBudget {
        NewBudget {
            category: "Tools".to_string(),
            amount,
            period: "monthly".to_string(),
        }
    }

    #[test]
    fn test_budget_lifecycle() {
        let mut fx = Fixture::user("u1");
        {
            let mut dash = fx.dashboard();

            let budget = dash.create_budget(tools(500.0)).unwrap();
            assert!(budget.spent.abs() < f64::EPSILON);
            assert!(budget.id.starts_with("bud_"));

            let updated = dash
                .update_budget(
                    &budget.id,
                    &BudgetUpdate {
                        amount: Some(650.0),
                        ..BudgetUpdate::default()
                    },
                )
                .unwrap();
            assert!((updated.amount - 650.0).abs() < f64::EPSILON);
            assert_eq!(updated.category, "Tools");

            dash.delete_budget(&budget.id).unwrap();
            assert!(dash.get_budgets().unwrap().is_empty());
        }

        assert_eq!(
            fx.views.paths(),
            vec![views::BUDGET, views::BUDGET, views::BUDGET]
        );
    }

    #[test]
    fn test_update_other_users_budget_is_not_found() {
        let mut owner = Fixture::user("owner");
        let budget = owner.dashboard().create_budget(tools(100.0)).unwrap();

        // Same store, different caller.
        let intruder = crate::session::StaticSession::user("intruder");
        let views = crate::views::RecordingInvalidator::new();
        let mut dash = crate::actions::Dashboard::new(&mut owner.storage, &intruder, &views);

        let result = dash.update_budget(
            &budget.id,
            &BudgetUpdate {
                spent: Some(1.0),
                ..BudgetUpdate::default()
            },
        );
        assert!(matches!(result, Err(Error::RowNotFound { table: "budgets", .. })));

        // Deleting someone else's row silently affects nothing.
        dash.delete_budget(&budget.id).unwrap();
        assert!(dash.get_budgets().unwrap().is_empty());

        let owner_budgets = owner.storage.list_budgets("owner").unwrap();
        assert_eq!(owner_budgets.len(), 1);
    }

    #[test]
    fn test_delete_unknown_budget_succeeds() {
        let mut fx = Fixture::user("u1");
        let mut dash = fx.dashboard();
        assert!(dash.delete_budget("bud_missing").is_ok());
    }

    #[test]
    fn test_budget_overview() {
        let mut fx = Fixture::user("u1");
        let mut dash = fx.dashboard();
        let budget = dash.create_budget(tools(200.0)).unwrap();
        dash.update_budget(
            &budget.id,
            &BudgetUpdate {
                spent: Some(180.0),
                ..BudgetUpdate::default()
            },
        )
        .unwrap();

        let overview = dash.get_budget_overview().unwrap();
        assert_eq!(overview.percent_spent, 90);
        assert_eq!(overview.lines[0].status, BudgetStatus::NearLimit);
    }
}
