//! Savings goal command implementations.

use super::{Request, emit, money};
use crate::cli::GoalCommands;
use crate::error::{Error, Result};
use crate::model::{NewSavingsGoal, SavingsGoal, SavingsGoalUpdate};
use crate::summary::GoalsOverview;
use colored::Colorize;
use std::path::PathBuf;

/// Execute savings goal commands.
///
/// # Errors
///
/// Returns an error if the user is unauthenticated or the database operation fails.
pub fn execute(
    command: &GoalCommands,
    db_path: Option<&PathBuf>,
    user: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut request = Request::open(db_path, user)?;
    let mut dash = request.dashboard();

    match command {
        GoalCommands::List => emit(dash.get_savings_goals()?, json, |goals| {
            if goals.is_empty() {
                println!("No savings goals.");
                return;
            }
            for goal in goals {
                print_goal(goal);
            }
        }),
        GoalCommands::Create {
            name,
            target,
            current,
            deadline,
        } => {
            let goal = dash.create_savings_goal(NewSavingsGoal {
                name: name.clone(),
                target_amount: *target,
                current_amount: *current,
                deadline: *deadline,
            })?;
            emit(goal, json, |g| {
                println!("{} Created goal {}", "✓".green(), g.id.dimmed());
                print_goal(g);
            })
        }
        GoalCommands::Update {
            id,
            name,
            target,
            current,
            deadline,
        } => {
            let update = SavingsGoalUpdate {
                name: name.clone(),
                target_amount: *target,
                current_amount: *current,
                deadline: *deadline,
            };
            if update.is_empty() {
                return Err(Error::InvalidArgument(
                    "Nothing to update: pass --name, --target, --current or --deadline".to_string(),
                ));
            }
            let goal = dash.update_savings_goal(id, &update)?;
            emit(goal, json, |g| {
                println!("{} Updated goal", "✓".green());
                print_goal(g);
            })
        }
        GoalCommands::Delete { id } => emit(dash.delete_savings_goal(id)?, json, |_| {
            println!("{} Deleted goal {id}", "✓".green());
        }),
        GoalCommands::Progress => emit(dash.get_goals_overview()?, json, print_progress),
    }
}

fn print_goal(goal: &SavingsGoal) {
    let deadline = goal
        .deadline
        .map_or_else(|| "no deadline".to_string(), |d| format!("by {d}"));
    println!(
        "  {:<24} {} / {} {} {}",
        goal.name,
        money(goal.current_amount),
        money(goal.target_amount),
        deadline.dimmed(),
        goal.id.dimmed()
    );
}

fn print_progress(overview: &GoalsOverview) {
    println!(
        "Saved {} of {} ({}%)",
        money(overview.total_saved),
        money(overview.total_target),
        overview.percent_complete
    );
    for goal in &overview.goals {
        let pace = match goal.months_remaining {
            _ if goal.monthly_savings_needed <= 0.0 => "reached".green().to_string(),
            Some(months) if months > 0 => format!(
                "{}/mo for {months} mo",
                money(goal.monthly_savings_needed)
            ),
            _ => format!("{} to go", money(goal.monthly_savings_needed)),
        };
        let status = if goal.on_track {
            "on track".green()
        } else {
            "behind".yellow()
        };
        println!(
            "  {:<24} {:>4}%  {pace}  {status}",
            goal.name, goal.percent_complete
        );
    }
}
