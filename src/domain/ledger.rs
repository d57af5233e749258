use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{Cents, Expense, ExpenseId};

/// In-memory collection of expenses and the queries over it.
///
/// Insertion order carries no meaning: every listing is re-sorted by date,
/// most recent first, keeping the stored order between expenses on the same
/// date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    expenses: Vec<Expense>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already persisted collection, ids included.
    pub fn from_expenses(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }

    /// Stored expenses in storage order.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Id the next added expense will receive: one past the highest id in
    /// use, or 1 for an empty ledger. `None` once the highest possible id is taken.
    pub fn next_id(&self) -> Option<ExpenseId> {
        match self.expenses.iter().map(|e| e.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Add an expense, overwriting whatever id it carries. Returns the id
    /// assigned, or `None` (leaving the ledger unchanged) when no id is left.
    pub fn add(&mut self, mut expense: Expense) -> Option<ExpenseId> {
        let id = self.next_id()?;
        expense.id = id;
        self.expenses.push(expense);
        Some(id)
    }

    pub fn all(&self) -> Vec<&Expense> {
        sorted_by_date_desc(self.expenses.iter())
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Replace every mutable field of an expense. Returns false if no expense has `id`.
    pub fn update(
        &mut self,
        id: ExpenseId,
        description: String,
        amount: Cents,
        category: String,
        date: NaiveDate,
    ) -> bool {
        match self.expenses.iter_mut().find(|e| e.id == id) {
            Some(expense) => {
                expense.description = description;
                expense.amount = amount;
                expense.category = category;
                expense.date = date;
                true
            }
            None => false,
        }
    }

    /// Remove an expense. Returns false if no expense has `id`.
    pub fn delete(&mut self, id: ExpenseId) -> bool {
        match self.expenses.iter().position(|e| e.id == id) {
            Some(index) => {
                self.expenses.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn by_category(&self, category: &str) -> Vec<&Expense> {
        sorted_by_date_desc(self.expenses.iter().filter(|e| e.in_category(category)))
    }

    /// Expenses dated within `start..=end`. An inverted range matches nothing.
    pub fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Expense> {
        sorted_by_date_desc(
            self.expenses
                .iter()
                .filter(|e| e.date >= start && e.date <= end),
        )
    }

    pub fn total(&self) -> Cents {
        self.expenses.iter().map(|e| e.amount).sum()
    }

    pub fn total_for_category(&self, category: &str) -> Cents {
        self.expenses
            .iter()
            .filter(|e| e.in_category(category))
            .map(|e| e.amount)
            .sum()
    }

    /// Total per category, keyed by the exact stored category name. Map
    /// iteration is byte order; use [`categories`](Self::categories) for display order.
    pub fn category_summary(&self) -> BTreeMap<String, Cents> {
        let mut summary = BTreeMap::new();
        for expense in &self.expenses {
            *summary.entry(expense.category.clone()).or_insert(0) += expense.amount;
        }
        summary
    }

    /// Distinct category names in alphabetical order, ignoring case. Names
    /// differing only in case are ordered by their exact bytes.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.category_summary().into_keys().collect();
        categories.sort_by(|a, b| compare_categories(a, b));
        categories
    }
}

/// Alphabetical order used for category listings.
pub fn compare_categories(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn sorted_by_date_desc<'a>(expenses: impl Iterator<Item = &'a Expense>) -> Vec<&'a Expense> {
    let mut sorted: Vec<&Expense> = expenses.collect();
    // sort_by is stable, so same-day expenses keep their stored order
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}
