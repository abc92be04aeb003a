//! Prompt rendering.
//!
//! Amounts are rendered with `f64`'s `Display`, so whole numbers print
//! without a fractional part (`1500`, not `1500.0`).

use crate::model::{Budget, Profile, SavingsGoal, Transaction};

const NOT_SPECIFIED: &str = "Not specified";
const NO_GOALS: &str = "None";
const NO_BUDGETS: &str = "No budgets set";
const NO_TRANSACTIONS: &str = "No transactions";
const NO_SAVINGS_GOALS: &str = "No goals set";
const DEFAULT_BUSINESS: &str = "business owner";

/// The JSON shape the model is told to reply with.
const ADVICE_FORMAT: &str = r#"{
  "recommendations": [
    {
      "category": "budgeting|savings|spending|income|investment",
      "title": "Brief title",
      "description": "Detailed recommendation",
      "priority": "high|medium|low",
      "impact": "Brief impact statement"
    }
  ],
  "financialHealthScore": 0-100
}"#;

/// Everything the full-advice prompt draws on.
#[derive(Debug, Clone, Copy)]
pub struct AdviceContext<'a> {
    pub profile: Option<&'a Profile>,
    pub budgets: &'a [Budget],
    pub transactions: &'a [Transaction],
    pub goals: &'a [SavingsGoal],
}

/// Render the full financial-advice prompt.
#[must_use]
pub fn advice_prompt(ctx: &AdviceContext<'_>) -> String {
    let business_type = business_type(ctx.profile).unwrap_or(NOT_SPECIFIED);
    let income = monthly_income(ctx.profile);
    let goals = ctx
        .profile
        .map(|p| p.financial_goals.join(", "))
        .filter(|g| !g.is_empty())
        .unwrap_or_else(|| NO_GOALS.to_string());

    let budgets = bullet_list(ctx.budgets, NO_BUDGETS, |b| {
        format!("{}: ${} (spent: ${})", b.category, b.amount, b.spent)
    });
    let transactions = bullet_list(ctx.transactions, NO_TRANSACTIONS, |t| {
        format!("{}: ${} in {}", t.kind.as_str(), t.amount, t.category)
    });
    let savings = bullet_list(ctx.goals, NO_SAVINGS_GOALS, |g| {
        format!("{}: ${}/${}", g.name, g.current_amount, g.target_amount)
    });

    format!(
        "You are a financial advisor AI. Analyze the following financial data and provide 5-7 personalized recommendations:

Profile:
- Business Type: {business_type}
- Monthly Income: ${income}
- Financial Goals: {goals}

Budgets:
{budgets}

Recent Transactions (last 20):
{transactions}

Savings Goals:
{savings}

Provide advice in the following JSON format:
{ADVICE_FORMAT}"
    )
}

/// Render the short prompt for a free-form question.
#[must_use]
pub fn question_prompt(profile: Option<&Profile>, question: &str) -> String {
    let business_type = business_type(profile).unwrap_or(DEFAULT_BUSINESS);
    let income = monthly_income(profile);

    format!(
        "You are a financial advisor AI helping a {business_type} with monthly income of ${income}.

User question: {question}

Provide a helpful, personalized answer based on their financial situation. Keep it concise and actionable."
    )
}

fn business_type(profile: Option<&Profile>) -> Option<&str> {
    profile
        .and_then(|p| p.business_type.as_deref())
        .filter(|b| !b.is_empty())
}

fn monthly_income(profile: Option<&Profile>) -> f64 {
    profile.and_then(|p| p.monthly_income).unwrap_or(0.0)
}

/// One `- item` line per row, or `fallback` when there are none.
fn bullet_list<T>(items: &[T], fallback: &str, line: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return fallback.to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", line(item)))
        .collect::<Vec<_>>()
        .join("\n")
}
