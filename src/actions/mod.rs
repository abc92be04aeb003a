//! Dashboard actions.
//!
//! One method per (entity, operation). Every action follows the same
//! contract:
//! 1. Resolve the caller from the session; fail with
//!    `Error::Unauthenticated` before touching the store if there is none
//! 2. Run one store operation scoped to the caller's id
//! 3. On a successful mutation, invalidate the affected views
//!
//! Store failures surface as `Error::Persistence` with the backend message.
//! Nothing is retried.

mod advice;
mod alerts;
mod budgets;
mod profile;
mod savings_goals;
mod subscription;
mod transactions;

use crate::error::{Error, Result};
use crate::session::SessionProvider;
use crate::storage::SqliteStorage;
use crate::views::ViewInvalidator;

/// Per-request handle bundling the store with the injected collaborators.
pub struct Dashboard<'a> {
    storage: &'a mut SqliteStorage,
    session: &'a dyn SessionProvider,
    views: &'a dyn ViewInvalidator,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        storage: &'a mut SqliteStorage,
        session: &'a dyn SessionProvider,
        views: &'a dyn ViewInvalidator,
    ) -> Self {
        Self {
            storage,
            session,
            views,
        }
    }

    /// Read-only access to the underlying store.
    #[must_use]
    pub fn storage(&self) -> &SqliteStorage {
        &*self.storage
    }

    /// The caller's user id, or `Error::Unauthenticated`.
    fn require_user(&self) -> Result<String> {
        self.session.current_user().ok_or(Error::Unauthenticated)
    }

    fn invalidate(&self, paths: &[&str]) {
        self.views.invalidate(paths);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Dashboard;
    use crate::session::StaticSession;
    use crate::storage::SqliteStorage;
    use crate::views::RecordingInvalidator;

    /// Everything a `Dashboard` borrows, owned in one place.
    pub struct Fixture {
        pub storage: SqliteStorage,
        pub session: StaticSession,
        pub views: RecordingInvalidator,
    }

    impl Fixture {
        pub fn user(user_id: &str) -> Self {
            Self {
                storage: SqliteStorage::open_memory().unwrap(),
                session: StaticSession::user(user_id),
                views: RecordingInvalidator::new(),
            }
        }

        pub fn anonymous() -> Self {
            Self {
                storage: SqliteStorage::open_memory().unwrap(),
                session: StaticSession::anonymous(),
                views: RecordingInvalidator::new(),
            }
        }

        pub fn dashboard(&mut self) -> Dashboard<'_> {
            Dashboard::new(&mut self.storage, &self.session, &self.views)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Fixture;
    use crate::error::{ActionResult, Error};
    use crate::model::{
        AlertFilter, AlertType, BillingCycle, BudgetUpdate, NewAlert, NewBudget, NewSavingsGoal,
        NewTransaction, Plan, ProfileUpdate, SavingsGoalUpdate, TransactionQuery, TransactionType,
    };

    fn is_unauthenticated<T>(result: crate::Result<T>) -> bool {
        let envelope = ActionResult::from(result);
        matches!(envelope, ActionResult::Error(ref msg) if msg == "Not authenticated")
    }

    #[test]
    fn test_unauthenticated_calls_write_nothing() {
        let mut fx = Fixture::anonymous();
        {
            let mut dash = fx.dashboard();

            assert!(is_unauthenticated(dash.get_profile()));
            assert!(is_unauthenticated(dash.update_profile(&ProfileUpdate::default())));
            assert!(is_unauthenticated(dash.get_budgets()));
            assert!(is_unauthenticated(dash.create_budget(NewBudget {
                category: "Tools".to_string(),
                amount: 100.0,
                period: "monthly".to_string(),
            })));
            assert!(is_unauthenticated(dash.update_budget("bud_x", &BudgetUpdate::default())));
            assert!(is_unauthenticated(dash.delete_budget("bud_x")));
            assert!(is_unauthenticated(dash.get_transactions(TransactionQuery::default())));
            assert!(is_unauthenticated(dash.create_transaction(NewTransaction {
                category: "Tools".to_string(),
                amount: 10.0,
                kind: TransactionType::Expense,
                description: None,
                transaction_date: None,
            })));
            assert!(is_unauthenticated(dash.get_spending_by_category()));
            assert!(is_unauthenticated(dash.get_savings_goals()));
            assert!(is_unauthenticated(dash.create_savings_goal(NewSavingsGoal {
                name: "Fund".to_string(),
                target_amount: 1.0,
                current_amount: None,
                deadline: None,
            })));
            assert!(is_unauthenticated(
                dash.update_savings_goal("goal_x", &SavingsGoalUpdate::default())
            ));
            assert!(is_unauthenticated(dash.delete_savings_goal("goal_x")));
            assert!(is_unauthenticated(dash.get_subscription()));
            assert!(is_unauthenticated(dash.update_subscription(Plan::Pro, BillingCycle::Monthly)));
            assert!(is_unauthenticated(dash.get_alerts(AlertFilter::All)));
            assert!(is_unauthenticated(dash.get_unread_alert_count()));
            assert!(is_unauthenticated(dash.create_alert(NewAlert {
                title: "t".to_string(),
                message: "m".to_string(),
                kind: AlertType::Info,
                category: "c".to_string(),
            })));
            assert!(is_unauthenticated(dash.mark_alert_as_read("alert_x")));
            assert!(is_unauthenticated(dash.mark_all_alerts_as_read()));
            assert!(is_unauthenticated(dash.delete_alert("alert_x")));
        }

        assert!(fx.views.paths().is_empty());

        let rows: i64 = fx
            .storage
            .conn()
            .query_row(
                "SELECT (SELECT COUNT(*) FROM budgets) + (SELECT COUNT(*) FROM transactions)
                      + (SELECT COUNT(*) FROM savings_goals) + (SELECT COUNT(*) FROM alerts)
                      + (SELECT COUNT(*) FROM profiles) + (SELECT COUNT(*) FROM subscriptions)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_unauthenticated_error_variant() {
        let mut fx = Fixture::anonymous();
        let dash = fx.dashboard();
        assert!(matches!(dash.get_budgets(), Err(Error::Unauthenticated)));
    }
}
