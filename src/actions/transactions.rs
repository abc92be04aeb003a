//! Transaction actions and the budget-sync side effect.

use super::Dashboard;
use crate::error::Result;
use crate::model::{NewTransaction, Transaction, TransactionQuery};
use crate::summary;
use crate::views;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

impl Dashboard<'_> {
    /// List the caller's transactions, newest `transaction_date` first.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn get_transactions(&self, query: TransactionQuery) -> Result<Vec<Transaction>> {
        let user_id = self.require_user()?;
        self.storage.list_transactions(&user_id, &query)
    }

    /// Record a transaction; expenses also count against the matching budget.
    ///
    /// The budget update is best-effort: it runs after the transaction has
    /// been committed, and a failure there is logged, not returned.
    ///
    /// # Errors
    ///
    /// `Unauthenticated`, or `Persistence` if the transaction insert fails.
    pub fn create_transaction(&mut self, input: NewTransaction) -> Result<Transaction> {
        let user_id = self.require_user()?;
        let txn = Transaction::new(&user_id, input);

        self.storage.insert_transaction(&txn)?;
        info!(
            id = %txn.id,
            kind = txn.kind.as_str(),
            category = %txn.category,
            amount = txn.amount,
            "Created transaction"
        );

        if txn.is_expense() {
            if let Err(e) = self.sync_budget(&txn) {
                warn!(id = %txn.id, error = %e, "Budget sync failed; transaction kept");
            }
        }

        self.invalidate(&[views::DASHBOARD, views::BUDGET]);
        Ok(txn)
    }

    /// Add an expense to the budget for its category, if there is one.
    fn sync_budget(&mut self, txn: &Transaction) -> Result<()> {
        let Some(budget) = self
            .storage
            .find_budget_by_category(&txn.user_id, &txn.category)?
        else {
            debug!(category = %txn.category, "No budget for category");
            return Ok(());
        };

        if let Some(updated) = self
            .storage
            .add_budget_spent(&txn.user_id, &budget.id, txn.amount)?
        {
            debug!(budget = %updated.id, spent = updated.spent, "Budget synced");
        }
        Ok(())
    }

    /// Sum of the caller's expenses per category.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` or `Persistence`.
    pub fn get_spending_by_category(&self) -> Result<BTreeMap<String, f64>> {
        let expenses = self.get_transactions(TransactionQuery::expenses())?;
        Ok(summary::spending_by_category(&expenses))
    }
}

#[cfg(test)]
mod tests {
    use crate::actions::test_support::Fixture;
    use crate::model::{NewBudget, NewTransaction, TransactionQuery, TransactionType};
    use crate::views;
    use chrono::NaiveDate;

    fn budget(category: &str) -> NewBudget {
        NewBudget {
            category: category.to_string(),
            amount: 1000.0,
            period: "monthly".to_string(),
        }
    }

    fn txn(category: &str, amount: f64, kind: TransactionType) -> NewTransaction {
        NewTransaction {
            category: category.to_string(),
            amount,
            kind,
            description: None,
            transaction_date: None,
        }
    }

    #[test]
    fn test_expense_syncs_matching_budget() {
        let mut fx = Fixture::user("u1");
        {
            let mut dash = fx.dashboard();
            dash.create_budget(budget("Tools")).unwrap();
            dash.create_transaction(txn("Tools", 100.0, TransactionType::Expense))
                .unwrap();
            dash.create_transaction(txn("Tools", 50.0, TransactionType::Expense))
                .unwrap();

            let budgets = dash.get_budgets().unwrap();
            assert!((budgets[0].spent - 150.0).abs() < f64::EPSILON);
        }

        assert_eq!(
            fx.views.paths(),
            vec![
                views::BUDGET,
                views::DASHBOARD,
                views::BUDGET,
                views::DASHBOARD,
                views::BUDGET
            ]
        );
    }

    #[test]
    fn test_no_matching_budget_leaves_budgets_untouched() {
        let mut fx = Fixture::user("u1");
        let mut dash = fx.dashboard();
        let before = dash.create_budget(budget("Travel")).unwrap();

        let created = dash
            .create_transaction(txn("Tools", 75.0, TransactionType::Expense))
            .unwrap();
        assert_eq!(created.category, "Tools");

        let after = dash.get_budgets().unwrap();
        assert_eq!(after.len(), 1);
        assert!((after[0].spent - before.spent).abs() < f64::EPSILON);
        assert_eq!(after[0].updated_at, before.updated_at);
    }

    #[test]
    fn test_income_never_syncs() {
        let mut fx = Fixture::user("u1");
        let mut dash = fx.dashboard();
        dash.create_budget(budget("Consulting")).unwrap();
        dash.create_transaction(txn("Consulting", 4000.0, TransactionType::Income))
            .unwrap();

        assert!(dash.get_budgets().unwrap()[0].spent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_sync_is_user_scoped() {
        let mut other = Fixture::user("other");
        other.dashboard().create_budget(budget("Tools")).unwrap();

        let session = crate::session::StaticSession::user("u1");
        let views = crate::views::RecordingInvalidator::new();
        let mut dash = crate::actions::Dashboard::new(&mut other.storage, &session, &views);
        dash.create_transaction(txn("Tools", 20.0, TransactionType::Expense))
            .unwrap();

        let theirs = other.storage.list_budgets("other").unwrap();
        assert!(theirs[0].spent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_sync_failure_keeps_transaction() {
        let mut fx = Fixture::user("u1");
        fx.dashboard().create_budget(budget("Tools")).unwrap();

        // Make every budget write fail.
        fx.storage
            .conn()
            .execute_batch(
                "CREATE TRIGGER no_budget_updates BEFORE UPDATE ON budgets
                 BEGIN SELECT RAISE(ABORT, 'budgets are read-only'); END;",
            )
            .unwrap();

        let mut dash = fx.dashboard();
        let created = dash
            .create_transaction(txn("Tools", 30.0, TransactionType::Expense))
            .unwrap();

        let stored = dash.get_transactions(TransactionQuery::default()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, created.id);
        assert!(dash.get_budgets().unwrap()[0].spent.abs() < f64::EPSILON);
    }

    #[test]
    fn test_transaction_date_and_listing() {
        let mut fx = Fixture::user("u1");
        let mut dash = fx.dashboard();

        let today = dash
            .create_transaction(txn("Food", 12.0, TransactionType::Expense))
            .unwrap();
        assert_eq!(today.transaction_date, chrono::Local::now().date_naive());

        let mut old = txn("Rent", 900.0, TransactionType::Expense);
        old.transaction_date = NaiveDate::from_ymd_opt(2020, 1, 1);
        dash.create_transaction(old).unwrap();
        dash.create_transaction(txn("Client", 3000.0, TransactionType::Income))
            .unwrap();

        let all = dash.get_transactions(TransactionQuery::default()).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.last().unwrap().category, "Rent");

        let latest = dash.get_transactions(TransactionQuery::latest(1)).unwrap();
        assert_eq!(latest.len(), 1);

        let expenses = dash.get_transactions(TransactionQuery::expenses()).unwrap();
        assert!(expenses.iter().all(|t| t.kind == TransactionType::Expense));
        assert_eq!(expenses.len(), 2);
    }

    #[test]
    fn test_spending_by_category() {
        let mut fx = Fixture::user("u1");
        let mut dash = fx.dashboard();
        assert!(dash.get_spending_by_category().unwrap().is_empty());

        for (category, amount) in [("A", 10.0), ("A", 5.0), ("B", 3.0)] {
            dash.create_transaction(txn(category, amount, TransactionType::Expense))
                .unwrap();
        }
        dash.create_transaction(txn("A", 500.0, TransactionType::Income))
            .unwrap();

        let totals = dash.get_spending_by_category().unwrap();
        assert_eq!(totals.len(), 2);
        assert!((totals["A"] - 15.0).abs() < f64::EPSILON);
        assert!((totals["B"] - 3.0).abs() < f64::EPSILON);
    }
}
