//! Expense Model (egresos)
//!
//! Daily expense ledger. Cancelled entries stay on file but are excluded
//! from every aggregate; the daily summary feeds the cut's expense figure
//! and the desync check.

use serde::{Deserialize, Serialize};

use super::serde_helpers;

/// Expense entry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Active,
    Cancelled,
}

impl Default for ExpenseStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Expense entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Expense {
    pub id: i64,
    /// Calendar day the expense belongs to (YYYY-MM-DD)
    pub expense_date: String,
    /// Moment it was registered (Unix millis)
    pub expense_time: i64,
    /// Free-form category: nomina, servicios, mantenimiento, otros, ...
    pub expense_type: String,
    pub description: String,
    pub amount: f64,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ExpenseStatus,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create expense payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCreate {
    pub expense_date: String,
    pub expense_type: String,
    pub description: String,
    #[serde(default, deserialize_with = "serde_helpers::lenient_amount")]
    pub amount: f64,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<i64>,
}

/// Update expense payload (partial).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    pub expense_type: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "serde_helpers::lenient_opt_amount")]
    pub amount: Option<f64>,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
    pub status: Option<ExpenseStatus>,
}

/// Sum and count of the day's active expenses - the authoritative figure
/// the sync checker compares a cut against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyExpenseSummary {
    pub date: String,
    pub total_amount: f64,
    pub total_expenses: i64,
}

/// Per-category slice of a day's expenses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ExpenseTypeBreakdown {
    pub expense_type: String,
    pub count: i64,
    pub total: f64,
}
