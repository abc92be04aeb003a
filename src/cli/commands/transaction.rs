//! Transaction command implementations.

use super::{Request, emit, money};
use crate::cli::TxCommands;
use crate::error::Result;
use crate::model::{NewTransaction, Transaction, TransactionQuery, TransactionType};
use colored::Colorize;
use std::path::PathBuf;

/// Execute transaction commands.
///
/// # Errors
///
/// Returns an error if the user is unauthenticated or the database operation fails.
pub fn execute(
    command: &TxCommands,
    db_path: Option<&PathBuf>,
    user: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut request = Request::open(db_path, user)?;
    let mut dash = request.dashboard();

    match command {
        TxCommands::List { limit, kind } => {
            let query = TransactionQuery {
                limit: *limit,
                kind: *kind,
            };
            emit(dash.get_transactions(query)?, json, |txns| {
                if txns.is_empty() {
                    println!("No transactions.");
                    return;
                }
                for txn in txns {
                    print_transaction(txn);
                }
            })
        }
        TxCommands::Add {
            category,
            amount,
            kind,
            description,
            date,
        } => {
            let txn = dash.create_transaction(NewTransaction {
                category: category.clone(),
                amount: *amount,
                kind: *kind,
                description: description.clone(),
                transaction_date: *date,
            })?;
            emit(txn, json, |t| {
                println!("{} Recorded {}", "✓".green(), t.id.dimmed());
                print_transaction(t);
            })
        }
        TxCommands::ByCategory => emit(dash.get_spending_by_category()?, json, |totals| {
            if totals.is_empty() {
                println!("No expenses.");
                return;
            }
            for (category, total) in totals {
                println!("  {category:<20} {}", money(*total));
            }
        }),
    }
}

fn print_transaction(txn: &Transaction) {
    let amount = match txn.kind {
        TransactionType::Income => format!("+{}", money(txn.amount)).green(),
        TransactionType::Expense => format!("-{}", money(txn.amount)).red(),
    };
    println!(
        "  {}  {:<20} {:>12}  {}",
        txn.transaction_date,
        txn.category,
        amount,
        txn.description.as_deref().unwrap_or("").dimmed()
    );
}
