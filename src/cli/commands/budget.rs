//! Budget command implementations.

use super::{Request, emit, money};
use crate::cli::BudgetCommands;
use crate::error::{Error, Result};
use crate::model::{Budget, BudgetUpdate, NewBudget};
use crate::summary::{BudgetOverview, BudgetStatus};
use colored::{ColoredString, Colorize};
use std::path::PathBuf;

/// Execute budget commands.
///
/// # Errors
///
/// Returns an error if the user is unauthenticated or the database operation fails.
pub fn execute(
    command: &BudgetCommands,
    db_path: Option<&PathBuf>,
    user: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut request = Request::open(db_path, user)?;
    let mut dash = request.dashboard();

    match command {
        BudgetCommands::List => emit(dash.get_budgets()?, json, |budgets| {
            if budgets.is_empty() {
                println!("No budgets.");
                return;
            }
            for budget in budgets {
                print_budget(budget);
            }
        }),
        BudgetCommands::Create {
            category,
            amount,
            period,
        } => {
            let budget = dash.create_budget(NewBudget {
                category: category.clone(),
                amount: *amount,
                period: period.clone(),
            })?;
            emit(budget, json, |b| {
                println!("{} Created budget {}", "✓".green(), b.id.dimmed());
                print_budget(b);
            })
        }
        BudgetCommands::Update {
            id,
            category,
            amount,
            spent,
        } => {
            let update = BudgetUpdate {
                category: category.clone(),
                amount: *amount,
                spent: *spent,
            };
            if update.is_empty() {
                return Err(Error::InvalidArgument(
                    "Nothing to update: pass --category, --amount or --spent".to_string(),
                ));
            }
            let budget = dash.update_budget(id, &update)?;
            emit(budget, json, |b| {
                println!("{} Updated budget", "✓".green());
                print_budget(b);
            })
        }
        BudgetCommands::Delete { id } => emit(dash.delete_budget(id)?, json, |_| {
            println!("{} Deleted budget {id}", "✓".green());
        }),
        BudgetCommands::Summary => emit(dash.get_budget_overview()?, json, print_overview),
    }
}

fn print_budget(budget: &Budget) {
    println!(
        "  {:<20} {} / {} ({}) {}",
        budget.category,
        money(budget.spent),
        money(budget.amount),
        budget.period,
        budget.id.dimmed()
    );
}

fn status_label(status: BudgetStatus) -> ColoredString {
    match status {
        BudgetStatus::OnTrack => "on track".green(),
        BudgetStatus::NearLimit => "near limit".yellow(),
        BudgetStatus::OverBudget => "over budget".red().bold(),
    }
}

fn print_overview(overview: &BudgetOverview) {
    println!(
        "Budgeted {}  Spent {}  Remaining {}  ({}%)",
        money(overview.total_budgeted),
        money(overview.total_spent),
        money(overview.remaining),
        overview.percent_spent
    );
    for line in &overview.lines {
        println!(
            "  {:<20} {:>4}%  {} left  {}",
            line.category,
            line.percent_spent,
            money(line.remaining),
            status_label(line.status)
        );
    }

    let over: Vec<&str> = overview.over_budget().map(|l| l.category.as_str()).collect();
    if !over.is_empty() {
        println!();
        println!("{} Over budget: {}", "!".red().bold(), over.join(", "));
    }
}
