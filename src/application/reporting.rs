use serde::{Deserialize, Serialize};

use crate::domain::{Cents, Ledger};

/// Overall spending with a per-category breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub total: Cents,
    pub count: usize,
    pub categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: Cents,
    pub count: usize,
    /// Share of the overall total, 0-100. Zero when nothing was spent.
    pub percentage: f64,
}

impl SummaryReport {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let total = ledger.total();
        let summary = ledger.category_summary();
        let categories = ledger
            .categories()
            .into_iter()
            .map(|category| {
                let category_total = summary[&category];
                let count = ledger
                    .expenses()
                    .iter()
                    .filter(|e| e.category == category)
                    .count();
                CategoryShare {
                    percentage: percentage_of(category_total, total),
                    category,
                    total: category_total,
                    count,
                }
            })
            .collect();

        Self {
            total,
            count: ledger.len(),
            categories,
        }
    }
}

fn percentage_of(part: Cents, whole: Cents) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}
