use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::ExpenseId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Description cannot be empty")]
    EmptyDescription,

    #[error("Invalid amount '{0}'. Please enter a positive number")]
    InvalidAmount(String),

    #[error("Invalid date '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Start date {start} cannot be after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid ID '{0}'")]
    InvalidId(String),

    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    #[error("No expense id left to assign (highest id {0} is in use)")]
    IdsExhausted(ExpenseId),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}
