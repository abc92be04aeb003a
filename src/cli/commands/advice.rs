//! AI advice command implementations.

use super::{Request, emit};
use crate::advice::{AnyProvider, CompletionProvider, FinancialAdvice, Priority, create_provider};
use crate::cli::AdviceCommands;
use crate::config::{load_config, resolve_ai_config};
use crate::error::{Error, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

/// Execute advice commands.
///
/// # Errors
///
/// Returns an error if the user is unauthenticated, no provider is
/// configured, or generation fails.
pub fn execute(
    command: &AdviceCommands,
    db_path: Option<&PathBuf>,
    user: Option<&str>,
    json: bool,
) -> Result<()> {
    let mut request = Request::open(db_path, user)?;
    if !request.is_authenticated() {
        return Err(Error::Unauthenticated);
    }
    let dash = request.dashboard();

    if let AdviceCommands::Generate { dry_run: true } = command {
        return emit(dash.build_advice_prompt()?, json, |prompt| println!("{prompt}"));
    }

    let provider = provider()?;
    let rt = tokio::runtime::Runtime::new()?;

    match command {
        AdviceCommands::Generate { .. } => {
            let advice = rt.block_on(dash.generate_financial_advice(&provider))?;
            emit(advice, json, print_advice)
        }
        AdviceCommands::Ask { question } => {
            let answer = rt.block_on(dash.ask_question(&provider, question))?;
            emit(answer, json, |a| println!("{a}"))
        }
    }
}

fn provider() -> Result<AnyProvider> {
    let ai = resolve_ai_config(&load_config()?)?;
    let provider = create_provider(&ai)?;
    let info = provider.info();
    debug!(provider = %info.name, model = %info.model, "Using completion provider");
    Ok(provider)
}

fn print_advice(advice: &FinancialAdvice) {
    println!(
        "Financial health score: {}/100",
        advice.financial_health_score.to_string().bold()
    );
    for (i, rec) in advice.recommendations.iter().enumerate() {
        let priority = match rec.priority {
            Priority::High => "high".red(),
            Priority::Medium => "medium".yellow(),
            Priority::Low => "low".green(),
        };
        println!();
        println!("{}. {} [{priority}]", i + 1, rec.title.bold());
        println!("   {}", rec.description);
        println!("   {} {}", "Impact:".dimmed(), rec.impact);
    }
}
