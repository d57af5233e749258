// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use outlay::application::{ExpenseService, LoadPolicy};
use outlay::domain::{Cents, Expense};
use tempfile::TempDir;

/// Helper to create a service backed by a file in a temporary directory
pub fn test_service() -> Result<(ExpenseService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = ExpenseService::open(data_file(&temp_dir), LoadPolicy::Lenient)?;
    Ok((service, temp_dir))
}

/// Path of the data file used by `test_service`
pub fn data_file(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("expenses.json")
}

/// Reopen the data file, as a new run would
pub fn reopen(temp_dir: &TempDir) -> Result<ExpenseService> {
    Ok(ExpenseService::open(data_file(temp_dir), LoadPolicy::Lenient)?)
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Build an unsaved expense
pub fn expense(description: &str, amount: Cents, category: &str, date: &str) -> Expense {
    Expense::new(description, amount, parse_date(date)).with_category(category)
}
