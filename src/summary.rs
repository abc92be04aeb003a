//! Derived figures over fetched rows.
//!
//! Pure functions: category aggregation, the budget overview and savings
//! goal progress. Nothing here touches the store.

use crate::model::{Budget, SavingsGoal, Transaction};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Above this share of the budget a category is "near the limit".
pub const NEAR_LIMIT_PERCENT: i64 = 85;

/// Sum expense amounts per category.
///
/// Income rows are skipped, so callers may pass an unfiltered list. An
/// empty input yields an empty map.
#[must_use]
pub fn spending_by_category(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    transactions
        .iter()
        .filter(|t| t.is_expense())
        .fold(BTreeMap::new(), |mut totals, t| {
            *totals.entry(t.category.clone()).or_insert(0.0) += t.amount;
            totals
        })
}

/// Where a budget stands relative to its limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    NearLimit,
    OverBudget,
}

impl BudgetStatus {
    #[must_use]
    pub const fn from_percent(percent: i64) -> Self {
        if percent > 100 {
            Self::OverBudget
        } else if percent > NEAR_LIMIT_PERCENT {
            Self::NearLimit
        } else {
            Self::OnTrack
        }
    }
}

/// One row of the budget overview.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetLine {
    pub id: String,
    pub category: String,
    pub amount: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percent_spent: i64,
    pub status: BudgetStatus,
}

/// Totals across all of a user's budgets.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetOverview {
    pub total_budgeted: f64,
    pub total_spent: f64,
    pub remaining: f64,
    pub percent_spent: i64,
    pub lines: Vec<BudgetLine>,
}

impl BudgetOverview {
    /// Budgets that have gone past their limit.
    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetLine> {
        self.lines
            .iter()
            .filter(|l| l.status == BudgetStatus::OverBudget)
    }
}

/// Build the budget overview shown at the top of the budget page.
#[must_use]
pub fn budget_overview(budgets: &[Budget]) -> BudgetOverview {
    let total_budgeted: f64 = budgets.iter().map(|b| b.amount).sum();
    let total_spent: f64 = budgets.iter().map(|b| b.spent).sum();

    let lines = budgets
        .iter()
        .map(|b| {
            let percent_spent = percent(b.spent, b.amount);
            BudgetLine {
                id: b.id.clone(),
                category: b.category.clone(),
                amount: b.amount,
                spent: b.spent,
                remaining: b.remaining(),
                percent_spent,
                status: BudgetStatus::from_percent(percent_spent),
            }
        })
        .collect();

    BudgetOverview {
        total_budgeted,
        total_spent,
        remaining: total_budgeted - total_spent,
        percent_spent: percent(total_spent, total_budgeted),
        lines,
    }
}

/// Progress towards one savings goal.
#[derive(Debug, Clone, Serialize)]
pub struct GoalProgress {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub percent_complete: i64,
    pub months_remaining: Option<u32>,
    /// Half-way there, or more than six months left
    pub on_track: bool,
    /// Whole dollars per month to hit the deadline
    pub monthly_savings_needed: f64,
}

/// Progress across all goals.
#[derive(Debug, Clone, Serialize)]
pub struct GoalsOverview {
    pub total_target: f64,
    pub total_saved: f64,
    pub percent_complete: i64,
    pub goals: Vec<GoalProgress>,
}

/// Progress at or above this percentage is on track regardless of deadline.
pub const ON_TRACK_PERCENT: i64 = 50;

/// More months than this left is on track regardless of progress.
pub const ON_TRACK_MONTHS: u32 = 6;

/// Whole calendar months from `today` until `deadline`, never negative.
#[must_use]
pub fn months_until(today: NaiveDate, deadline: NaiveDate) -> u32 {
    let months = (deadline.year() - today.year()) * 12
        + (i32::try_from(deadline.month()).unwrap_or(0) - i32::try_from(today.month()).unwrap_or(0));
    u32::try_from(months.max(0)).unwrap_or(0)
}

/// Compute goal progress as of `today`.
///
/// Monthly savings needed is the remainder spread over the months left,
/// rounded up; with no months left (or no deadline) it is the whole
/// remainder. Overshooting a target needs nothing more.
#[must_use]
pub fn goals_overview(goals: &[SavingsGoal], today: NaiveDate) -> GoalsOverview {
    let total_target: f64 = goals.iter().map(|g| g.target_amount).sum();
    let total_saved: f64 = goals.iter().map(|g| g.current_amount).sum();

    let goals = goals
        .iter()
        .map(|g| {
            let remaining = (g.target_amount - g.current_amount).max(0.0);
            let months_remaining = g.deadline.map(|d| months_until(today, d));
            let monthly_savings_needed = match months_remaining {
                Some(months) if months > 0 => (remaining / f64::from(months)).ceil(),
                _ => remaining,
            };

            let percent_complete = percent(g.current_amount, g.target_amount);
            // No deadline means no time pressure.
            let on_track = percent_complete >= ON_TRACK_PERCENT
                || months_remaining.is_none_or(|m| m > ON_TRACK_MONTHS);

            GoalProgress {
                id: g.id.clone(),
                name: g.name.clone(),
                target_amount: g.target_amount,
                current_amount: g.current_amount,
                percent_complete,
                months_remaining,
                on_track,
                monthly_savings_needed,
            }
        })
        .collect();

    GoalsOverview {
        total_target,
        total_saved,
        percent_complete: percent(total_saved, total_target),
        goals,
    }
}

/// Rounded percentage of `part` in `whole`; 0 when `whole` is not positive.
#[allow(clippy::cast_possible_truncation)]
fn percent(part: f64, whole: f64) -> i64 {
    if whole <= 0.0 {
        return 0;
    }
    (part / whole * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewBudget, NewSavingsGoal, NewTransaction, TransactionType};

    fn txn(category: &str, amount: f64, kind: TransactionType) -> Transaction {
        Transaction::new(
            "u1",
            NewTransaction {
                category: category.to_string(),
                amount,
                kind,
                description: None,
                transaction_date: None,
            },
        )
    }

    fn budget(category: &str, amount: f64, spent: f64) -> Budget {
        let mut b = Budget::new(
            "u1",
            NewBudget {
                category: category.to_string(),
                amount,
                period: "monthly".to_string(),
            },
        );
        b.spent = spent;
        b
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_spending_by_category_empty() {
        assert!(spending_by_category(&[]).is_empty());
    }

    #[test]
    fn test_spending_by_category_sums() {
        let totals = spending_by_category(&[
            txn("A", 10.0, TransactionType::Expense),
            txn("A", 5.0, TransactionType::Expense),
            txn("B", 3.0, TransactionType::Expense),
            txn("A", 1000.0, TransactionType::Income),
        ]);

        let expected: BTreeMap<String, f64> =
            [("A".to_string(), 15.0), ("B".to_string(), 3.0)].into_iter().collect();
        assert_eq!(totals, expected);
    }

    #[test]
    fn test_budget_status_thresholds() {
        assert_eq!(BudgetStatus::from_percent(85), BudgetStatus::OnTrack);
        assert_eq!(BudgetStatus::from_percent(86), BudgetStatus::NearLimit);
        assert_eq!(BudgetStatus::from_percent(100), BudgetStatus::NearLimit);
        assert_eq!(BudgetStatus::from_percent(101), BudgetStatus::OverBudget);
    }

    #[test]
    fn test_budget_overview() {
        let overview = budget_overview(&[
            budget("Business Tools", 1500.0, 1240.0),
            budget("Marketing", 1200.0, 1300.0),
            budget("Travel", 500.0, 320.0),
        ]);

        assert!((overview.total_budgeted - 3200.0).abs() < f64::EPSILON);
        assert!((overview.total_spent - 2860.0).abs() < f64::EPSILON);
        assert_eq!(overview.percent_spent, 89);
        assert_eq!(overview.lines[0].percent_spent, 83);
        assert_eq!(overview.lines[0].status, BudgetStatus::OnTrack);

        let over: Vec<_> = overview.over_budget().map(|l| l.category.as_str()).collect();
        assert_eq!(over, vec!["Marketing"]);
    }

    #[test]
    fn test_budget_overview_empty() {
        let overview = budget_overview(&[]);
        assert_eq!(overview.percent_spent, 0);
        assert!(overview.lines.is_empty());
    }

    #[test]
    fn test_months_until() {
        assert_eq!(months_until(date(2024, 3, 20), date(2024, 12, 1)), 9);
        assert_eq!(months_until(date(2024, 3, 20), date(2025, 1, 1)), 10);
        assert_eq!(months_until(date(2024, 3, 20), date(2023, 1, 1)), 0);
    }

    #[test]
    fn test_goals_overview() {
        let goals = [
            SavingsGoal::new(
                "u1",
                NewSavingsGoal {
                    name: "Emergency fund".to_string(),
                    target_amount: 10_000.0,
                    current_amount: Some(6_500.0),
                    deadline: Some(date(2024, 12, 31)),
                },
            ),
            SavingsGoal::new(
                "u1",
                NewSavingsGoal {
                    name: "Conference".to_string(),
                    target_amount: 1_000.0,
                    current_amount: Some(1_200.0),
                    deadline: None,
                },
            ),
        ];

        let overview = goals_overview(&goals, date(2024, 3, 1));
        assert_eq!(overview.percent_complete, 70);

        let fund = &overview.goals[0];
        assert_eq!(fund.percent_complete, 65);
        assert_eq!(fund.months_remaining, Some(9));
        // 3500 over 9 months, rounded up
        assert!((fund.monthly_savings_needed - 389.0).abs() < f64::EPSILON);

        let conference = &overview.goals[1];
        assert_eq!(conference.percent_complete, 120);
        assert!(conference.monthly_savings_needed.abs() < f64::EPSILON);
    }

    #[test]
    fn test_goal_on_track() {
        let goal = |name: &str, current: f64, deadline: Option<NaiveDate>| {
            SavingsGoal::new(
                "u1",
                NewSavingsGoal {
                    name: name.to_string(),
                    target_amount: 1_000.0,
                    current_amount: Some(current),
                    deadline,
                },
            )
        };
        let goals = [
            goal("half way, due soon", 500.0, Some(date(2024, 4, 1))),
            goal("behind, due soon", 100.0, Some(date(2024, 6, 1))),
            goal("behind, six months left", 100.0, Some(date(2024, 9, 1))),
            goal("behind, seven months left", 100.0, Some(date(2024, 10, 1))),
            goal("behind, no deadline", 100.0, None),
        ];

        let overview = goals_overview(&goals, date(2024, 3, 1));
        let flags: Vec<bool> = overview.goals.iter().map(|g| g.on_track).collect();
        assert_eq!(flags, vec![true, false, false, true, true]);
    }
}
