//! Subscription command implementations.

use super::{Request, emit};
use crate::cli::SubscriptionCommands;
use crate::error::Result;
use crate::model::{BillingCycle, Plan, Subscription};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// One row of the plan price list.
#[derive(Debug, Serialize)]
struct PlanPrice {
    plan: Plan,
    monthly: u32,
    annual: u32,
}

fn price_list() -> Vec<PlanPrice> {
    Plan::ALL
        .iter()
        .map(|&plan| PlanPrice {
            plan,
            monthly: plan.price(BillingCycle::Monthly),
            annual: plan.price(BillingCycle::Annual),
        })
        .collect()
}

/// Execute subscription commands.
///
/// # Errors
///
/// Returns an error if the user is unauthenticated or the database operation fails.
pub fn execute(
    command: &SubscriptionCommands,
    db_path: Option<&PathBuf>,
    user: Option<&str>,
    json: bool,
) -> Result<()> {
    if let SubscriptionCommands::Plans = command {
        return emit(price_list(), json, |plans| {
            for p in plans {
                println!(
                    "  {:<10} ${}/month  ${}/year",
                    p.plan.as_str(),
                    p.monthly,
                    p.annual
                );
            }
        });
    }

    let mut request = Request::open(db_path, user)?;
    let mut dash = request.dashboard();

    match command {
        SubscriptionCommands::Show => emit(dash.get_subscription()?, json, print_subscription),
        SubscriptionCommands::Update { plan, cycle } => {
            let sub = dash.update_subscription(*plan, *cycle)?;
            emit(sub, json, |s| {
                println!("{} Switched plan", "✓".green());
                print_subscription(s);
            })
        }
        SubscriptionCommands::Plans => Ok(()),
    }
}

fn print_subscription(sub: &Subscription) {
    println!(
        "  Plan:   {} ({}, ${} per period)",
        sub.plan.as_str().bold(),
        sub.billing_cycle.as_str(),
        sub.plan.price(sub.billing_cycle)
    );
    println!("  Status: {}", sub.status.as_str());
    println!(
        "  Period: {} to {}",
        sub.current_period_start.format("%Y-%m-%d"),
        sub.current_period_end.format("%Y-%m-%d")
    );
}
