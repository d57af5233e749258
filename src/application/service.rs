use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{Cents, Expense, ExpenseId, Ledger};
use crate::storage::Store;

use super::{AppError, SummaryReport};

/// What to do when the backing file exists but cannot be read or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Log a warning and start with an empty ledger. The next save
    /// overwrites the unreadable file.
    #[default]
    Lenient,
    /// Refuse to start.
    Strict,
}

/// Application service providing the expense operations to every client
/// (interactive shell, subcommands, export).
///
/// The in-memory ledger is authoritative for the whole run. Every mutation is
/// mirrored to the backing file; a failed write is logged and otherwise
/// ignored, so the next successful write is the one that sticks.
pub struct ExpenseService {
    ledger: Ledger,
    store: Store,
}

impl ExpenseService {
    /// Open the ledger stored at `path`.
    pub fn open(path: impl AsRef<Path>, policy: LoadPolicy) -> Result<Self, AppError> {
        Self::with_store(Store::new(path.as_ref()), policy)
    }

    pub fn with_store(store: Store, policy: LoadPolicy) -> Result<Self, AppError> {
        let expenses = match store.load() {
            Ok(expenses) => expenses,
            Err(err) if policy == LoadPolicy::Lenient => {
                warn!("Error loading expenses, starting empty: {:#}", err);
                Vec::new()
            }
            Err(err) => return Err(AppError::Storage(err)),
        };

        Ok(Self {
            ledger: Ledger::from_expenses(expenses),
            store,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    // ========================
    // Mutations
    // ========================

    /// Record a new expense and return the id it was given. Fails without
    /// touching the ledger once the highest possible id is in use.
    pub fn add(&mut self, expense: Expense) -> Result<ExpenseId, AppError> {
        let id = self
            .ledger
            .add(expense)
            .ok_or(AppError::IdsExhausted(ExpenseId::MAX))?;
        self.persist();
        Ok(id)
    }

    /// Replace every mutable field of an expense. Returns false if it does not exist.
    pub fn update(
        &mut self,
        id: ExpenseId,
        description: String,
        amount: Cents,
        category: String,
        date: NaiveDate,
    ) -> bool {
        let found = self.ledger.update(id, description, amount, category, date);
        if found {
            self.persist();
        }
        found
    }

    /// Remove an expense. Returns false if it does not exist.
    pub fn delete(&mut self, id: ExpenseId) -> bool {
        let found = self.ledger.delete(id);
        if found {
            self.persist();
        }
        found
    }

    // ========================
    // Queries
    // ========================

    /// All expenses, most recent first.
    pub fn list(&self) -> Vec<&Expense> {
        self.ledger.all()
    }

    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.ledger.get(id)
    }

    /// Like [`get`](Self::get), for callers that treat a missing id as an error.
    pub fn require(&self, id: ExpenseId) -> Result<&Expense, AppError> {
        self.ledger.get(id).ok_or(AppError::ExpenseNotFound(id))
    }

    pub fn by_category(&self, category: &str) -> Vec<&Expense> {
        self.ledger.by_category(category)
    }

    pub fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&Expense> {
        self.ledger.by_date_range(start, end)
    }

    pub fn total(&self) -> Cents {
        self.ledger.total()
    }

    pub fn total_for_category(&self, category: &str) -> Cents {
        self.ledger.total_for_category(category)
    }

    pub fn category_summary(&self) -> BTreeMap<String, Cents> {
        self.ledger.category_summary()
    }

    pub fn categories(&self) -> Vec<String> {
        self.ledger.categories()
    }

    pub fn summary(&self) -> SummaryReport {
        SummaryReport::from_ledger(&self.ledger)
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(self.ledger.expenses()) {
            warn!("Error saving expenses: {:#}", err);
        }
    }
}
