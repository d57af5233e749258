use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::ExpenseService;
use crate::domain::{Cents, Expense, format_cents};

/// Snapshot written by the JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportSnapshot<'a> {
    pub version: &'static str,
    pub exported_at: DateTime<Utc>,
    pub total: Cents,
    pub expenses: Vec<&'a Expense>,
}

/// Writes the ledger out in formats other tools can read.
pub struct Exporter<'a> {
    service: &'a ExpenseService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a ExpenseService) -> Self {
        Self { service }
    }

    /// Export all expenses, most recent first, as CSV. Returns the row count.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let expenses = self.service.list();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "date", "description", "category", "amount"])?;

        for expense in &expenses {
            csv_writer.write_record([
                expense.id.to_string(),
                expense.date.format("%Y-%m-%d").to_string(),
                expense.description.clone(),
                expense.category.clone(),
                format_cents(expense.amount),
            ])?;
        }

        csv_writer.flush()?;
        Ok(expenses.len())
    }

    /// Export all expenses, most recent first, as a pretty JSON snapshot.
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let snapshot = ExportSnapshot {
            version: env!("CARGO_PKG_VERSION"),
            exported_at: Utc::now(),
            total: self.service.total(),
            expenses: self.service.list(),
        };

        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        writer.flush()?;

        Ok(snapshot.expenses.len())
    }
}
