//! Profile command implementations.

use super::{Request, emit, money};
use crate::cli::{ProfileArgs, ProfileCommands};
use crate::error::{Error, Result};
use crate::model::{NewProfile, Profile, ProfileUpdate};
use colored::Colorize;
use std::path::PathBuf;

/// Execute profile commands.
///
/// # Errors
///
/// Returns an error if the user is unauthenticated or the database operation fails.
pub fn execute(
    command: &ProfileCommands,
    db_path: Option<&PathBuf>,
    user: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut request = Request::open(db_path, user)?;
    let mut dash = request.dashboard();

    match command {
        ProfileCommands::Show => emit(dash.get_profile()?, json, print_profile),
        ProfileCommands::Create(args) => {
            let profile = dash.create_profile(NewProfile {
                display_name: args.name.clone(),
                business_type: args.business_type.clone(),
                monthly_income: args.income,
                financial_goals: args.goals.clone(),
            })?;
            emit(profile, json, |p| {
                println!("{} Created profile for {}", "✓".green(), p.id);
                print_profile(p);
            })
        }
        ProfileCommands::Update(args) => {
            let update = to_update(args);
            if update.is_empty() {
                return Err(Error::InvalidArgument(
                    "Nothing to update: pass --name, --business-type, --income or --goal".to_string(),
                ));
            }
            let profile = dash.update_profile(&update)?;
            emit(profile, json, |p| {
                println!("{} Updated profile", "✓".green());
                print_profile(p);
            })
        }
    }
}

fn to_update(args: &ProfileArgs) -> ProfileUpdate {
    ProfileUpdate {
        display_name: args.name.clone(),
        business_type: args.business_type.clone(),
        monthly_income: args.income,
        financial_goals: (!args.goals.is_empty()).then(|| args.goals.clone()),
    }
}

fn print_profile(profile: &Profile) {
    let unset = || "-".dimmed().to_string();
    println!(
        "  Name:     {}",
        profile.display_name.clone().unwrap_or_else(unset)
    );
    println!(
        "  Business: {}",
        profile.business_type.clone().unwrap_or_else(unset)
    );
    println!(
        "  Income:   {}",
        profile.monthly_income.map_or_else(unset, money)
    );
    if profile.financial_goals.is_empty() {
        println!("  Goals:    {}", unset());
    } else {
        println!("  Goals:    {}", profile.financial_goals.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_without_goals_leaves_them_alone() {
        let update = to_update(&ProfileArgs {
            income: Some(4200.0),
            ..ProfileArgs::default()
        });
        assert!(update.financial_goals.is_none());
        assert!(!update.is_empty());
        assert!(to_update(&ProfileArgs::default()).is_empty());
    }
}
