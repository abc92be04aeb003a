//! Transaction model.

use crate::error::Error;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(Error::InvalidArgument(format!(
                "transaction type must be income or expense, got '{other}'"
            ))),
        }
    }
}

/// A recorded income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier (`txn_` prefix)
    pub id: String,

    pub user_id: String,

    pub category: String,

    /// Assumed positive; not validated
    pub amount: f64,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    pub description: Option<String>,

    /// Calendar date the money moved
    pub transaction_date: NaiveDate,

    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
}

/// Input for recording a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub category: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub description: Option<String>,
    /// Defaults to today
    pub transaction_date: Option<NaiveDate>,
}

/// Filters for listing transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionQuery {
    pub limit: Option<u32>,
    pub kind: Option<TransactionType>,
}

impl TransactionQuery {
    /// The `n` most recent transactions.
    #[must_use]
    pub const fn latest(n: u32) -> Self {
        Self {
            limit: Some(n),
            kind: None,
        }
    }

    /// Every expense, unbounded.
    #[must_use]
    pub const fn expenses() -> Self {
        Self {
            limit: None,
            kind: Some(TransactionType::Expense),
        }
    }
}

impl Transaction {
    /// Create a new transaction owned by `user_id`.
    pub fn new(user_id: &str, input: NewTransaction) -> Self {
        Self {
            id: super::new_id("txn"),
            user_id: user_id.to_string(),
            category: input.category,
            amount: input.amount,
            kind: input.kind,
            description: input.description,
            transaction_date: input
                .transaction_date
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
            created_at: super::now_millis(),
        }
    }

    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parsing() {
        assert_eq!("expense".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert_eq!("Income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_new_transaction_defaults_date() {
        let txn = Transaction::new(
            "user_1",
            NewTransaction {
                category: "Travel".to_string(),
                amount: 42.0,
                kind: TransactionType::Expense,
                description: None,
                transaction_date: None,
            },
        );

        assert!(txn.id.starts_with("txn_"));
        assert!(txn.is_expense());
        assert_eq!(txn.transaction_date, chrono::Local::now().date_naive());
    }

    #[test]
    fn test_type_serializes_as_type_field() {
        let txn = Transaction::new(
            "user_1",
            NewTransaction {
                category: "Sales".to_string(),
                amount: 10.0,
                kind: TransactionType::Income,
                description: Some("invoice".to_string()),
                transaction_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            },
        );
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["transaction_date"], "2024-05-01");
    }
}
