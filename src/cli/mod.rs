//! CLI definitions using clap.

use crate::model::{AlertFilter, AlertType, BillingCycle, Plan, TransactionType};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Personal finance dashboard: budgets, transactions, goals and AI advice
#[derive(Parser, Debug)]
#[command(name = "fin", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.fin-dashboard/data/dashboard.db)
    #[arg(long, global = true, env = "FIN_DB")]
    pub db: Option<PathBuf>,

    /// Acting user id (default: `user_id` from the config file)
    #[arg(long, global = true, env = "FIN_USER")]
    pub user: Option<String>,

    /// Output as JSON ({"data": ...} / {"error": ...})
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the dashboard database
    Init {
        /// Overwrite an existing database
        #[arg(long)]
        force: bool,
    },

    /// Print version information
    Version,

    /// Profile (onboarding data used for advice)
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Budgets per spending category
    Budget {
        #[command(subcommand)]
        command: BudgetCommands,
    },

    /// Income and expense transactions
    Tx {
        #[command(subcommand)]
        command: TxCommands,
    },

    /// Savings goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// Subscription plan and billing
    Subscription {
        #[command(subcommand)]
        command: SubscriptionCommands,
    },

    /// Alerts and notifications
    Alert {
        #[command(subcommand)]
        command: AlertCommands,
    },

    /// AI financial advice
    Advice {
        #[command(subcommand)]
        command: AdviceCommands,
    },

    /// Show or change settings in ~/.fin-dashboard/config.json
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Profile Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the profile
    Show,

    /// Create the profile (also starts a free subscription)
    Create(ProfileArgs),

    /// Update profile fields
    Update(ProfileArgs),
}

#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    /// Display name
    #[arg(long)]
    pub name: Option<String>,

    /// Kind of business, e.g. "freelance designer"
    #[arg(long)]
    pub business_type: Option<String>,

    /// Monthly income
    #[arg(long)]
    pub income: Option<f64>,

    /// Financial goal (repeatable)
    #[arg(long = "goal")]
    pub goals: Vec<String>,
}

// ============================================================================
// Budget Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// List budgets
    List,

    /// Create a budget
    Create {
        /// Spending category (matched against transaction categories)
        category: String,

        /// Budgeted amount
        amount: f64,

        /// Budget period
        #[arg(long, default_value = "monthly")]
        period: String,
    },

    /// Update a budget
    Update {
        /// Budget ID
        id: String,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        amount: Option<f64>,

        /// Overwrite the amount spent so far
        #[arg(long)]
        spent: Option<f64>,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: String,
    },

    /// Totals and per-budget status
    Summary,
}

// ============================================================================
// Transaction Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum TxCommands {
    /// List transactions, newest first
    List {
        /// Maximum number to show
        #[arg(long, short = 'n')]
        limit: Option<u32>,

        /// Only income or only expense
        #[arg(long = "type")]
        kind: Option<TransactionType>,
    },

    /// Record a transaction
    Add {
        category: String,

        amount: f64,

        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        kind: TransactionType,

        #[arg(long)]
        description: Option<String>,

        /// Transaction date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Total expenses per category
    ByCategory,
}

// ============================================================================
// Savings Goal Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// List savings goals
    List,

    /// Create a savings goal
    Create {
        name: String,

        /// Target amount
        target: f64,

        /// Amount already saved
        #[arg(long)]
        current: Option<f64>,

        /// Deadline, YYYY-MM-DD
        #[arg(long)]
        deadline: Option<NaiveDate>,
    },

    /// Update a savings goal
    Update {
        /// Goal ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        target: Option<f64>,

        #[arg(long)]
        current: Option<f64>,

        #[arg(long)]
        deadline: Option<NaiveDate>,
    },

    /// Delete a savings goal
    Delete {
        /// Goal ID
        id: String,
    },

    /// Progress and monthly savings needed
    Progress,
}

// ============================================================================
// Subscription Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum SubscriptionCommands {
    /// Show the current plan
    Show,

    /// Change plan and billing cycle
    Update {
        /// free, pro or business
        plan: Plan,

        /// monthly or annual
        #[arg(long, default_value = "monthly")]
        cycle: BillingCycle,
    },

    /// List plans and prices
    Plans,
}

// ============================================================================
// Alert Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum AlertCommands {
    /// List alerts, newest first
    List {
        /// all, unread, critical, warning, info or success
        #[arg(long, default_value = "all")]
        filter: AlertFilter,
    },

    /// Count unread alerts
    Count,

    /// Create an alert
    Create {
        title: String,

        message: String,

        /// critical, warning, info or success
        #[arg(long = "type", default_value = "info")]
        kind: AlertType,

        #[arg(long, default_value = "general")]
        category: String,
    },

    /// Mark an alert read, or all of them with --all
    Read {
        /// Alert ID
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<String>,

        /// Mark every alert read
        #[arg(long)]
        all: bool,
    },

    /// Delete an alert
    Delete {
        /// Alert ID
        id: String,
    },
}

// ============================================================================
// Advice Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum AdviceCommands {
    /// Generate personalized recommendations and a health score
    Generate {
        /// Print the prompt without calling the model
        #[arg(long)]
        dry_run: bool,
    },

    /// Ask a free-form question
    Ask {
        question: String,
    },
}

// ============================================================================
// Config Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the config file and resolved AI settings
    Show,

    /// Set a key: user_id, ai.provider, ai.model, ai.endpoint, ai.api_key
    Set {
        key: String,

        /// New value (empty clears the key)
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_tx_add() {
        let cli = Cli::try_parse_from([
            "fin", "--user", "u1", "tx", "add", "Tools", "49.5", "--type", "expense", "--date",
            "2024-02-29",
        ])
        .unwrap();

        match cli.command {
            Commands::Tx {
                command: TxCommands::Add {
                    category,
                    amount,
                    kind,
                    date,
                    ..
                },
            } => {
                assert_eq!(category, "Tools");
                assert!((amount - 49.5).abs() < f64::EPSILON);
                assert_eq!(kind, TransactionType::Expense);
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.user.as_deref(), Some("u1"));
    }

    #[test]
    fn test_parse_alert_read_all_and_unread_filter() {
        let cli = Cli::try_parse_from(["fin", "alert", "read", "--all"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Alert {
                command: AlertCommands::Read { id: None, all: true }
            }
        ));

        let cli = Cli::try_parse_from(["fin", "alert", "list", "--filter", "unread"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Alert {
                command: AlertCommands::List {
                    filter: AlertFilter::Unread
                }
            }
        ));

        assert!(Cli::try_parse_from(["fin", "alert", "read"]).is_err());
        assert!(Cli::try_parse_from(["fin", "alert", "read", "alert_1", "--all"]).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_enum() {
        assert!(Cli::try_parse_from(["fin", "subscription", "update", "platinum"]).is_err());
        assert!(Cli::try_parse_from(["fin", "tx", "list", "--type", "refund"]).is_err());
        assert!(Cli::try_parse_from(["fin", "alert", "list", "--filter", "urgent"]).is_err());
    }
}
