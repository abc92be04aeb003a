//! Alert command implementations.

use super::{Request, emit};
use crate::cli::AlertCommands;
use crate::error::Result;
use crate::model::{Alert, AlertType, NewAlert};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct UnreadCount {
    unread: u32,
}

/// Execute alert commands.
///
/// # Errors
///
/// Returns an error if the user is unauthenticated or the database
/// operation fails.
pub fn execute(
    command: &AlertCommands,
    db_path: Option<&PathBuf>,
    user: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut request = Request::open(db_path, user)?;
    let mut dash = request.dashboard();

    match command {
        AlertCommands::List { filter } => {
            let alerts = dash.get_alerts(*filter)?;
            let unread = alerts.iter().filter(|a| !a.is_read).count();
            emit(alerts, json, |alerts| {
                if alerts.is_empty() {
                    if filter.unread_only() {
                        println!("All caught up!");
                    } else {
                        println!("No alerts.");
                    }
                    return;
                }
                for alert in alerts {
                    print_alert(alert);
                }
                if unread > 0 {
                    println!();
                    println!("{unread} unread");
                }
            })
        }
        AlertCommands::Count => emit(
            UnreadCount {
                unread: dash.get_unread_alert_count()?,
            },
            json,
            |c| println!("{} unread", c.unread),
        ),
        AlertCommands::Create {
            title,
            message,
            kind,
            category,
        } => {
            let alert = dash.create_alert(NewAlert {
                title: title.clone(),
                message: message.clone(),
                kind: *kind,
                category: category.clone(),
            })?;
            emit(alert, json, |a| {
                println!("{} Created alert {}", "✓".green(), a.id.dimmed());
            })
        }
        AlertCommands::Read { id: Some(id), .. } => {
            emit(dash.mark_alert_as_read(id)?, json, |_| {
                println!("{} Marked {id} read", "✓".green());
            })
        }
        AlertCommands::Read { id: None, .. } => {
            emit(dash.mark_all_alerts_as_read()?, json, |_| {
                println!("{} Marked all alerts read", "✓".green());
            })
        }
        AlertCommands::Delete { id } => emit(dash.delete_alert(id)?, json, |_| {
            println!("{} Deleted alert {id}", "✓".green());
        }),
    }
}

fn badge(kind: AlertType) -> ColoredString {
    match kind {
        AlertType::Critical => "critical".red().bold(),
        AlertType::Warning => "warning".yellow(),
        AlertType::Info => "info".blue(),
        AlertType::Success => "success".green(),
    }
}

fn print_alert(alert: &Alert) {
    let marker = if alert.is_read { " " } else { "•" };
    println!(
        "{marker} [{}] {} {}",
        badge(alert.kind),
        alert.title.bold(),
        alert.id.dimmed()
    );
    println!("    {} ({})", alert.message, alert.category);
}
