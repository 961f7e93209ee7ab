//! Expense collection and per-itinerary aggregation.

use crate::error::Result;
use crate::ids::IdGenerator;
use crate::repository::{JsonFileRepository, LoadReport, Repository};
use crate::store::RecordStore;
use crate::types::{parse_date, require_text, validate_amount, Expense, NewExpense, DATE_FORMAT};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Owns the expense collection file
pub struct ExpenseStore {
    records: RecordStore<Expense>,
    ids: IdGenerator,
}

impl ExpenseStore {
    pub fn new(repo: impl Repository<Expense> + 'static, ids: IdGenerator) -> Self {
        Self {
            records: RecordStore::new(repo),
            ids,
        }
    }

    /// Store backed by the JSON file at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonFileRepository::new(path), IdGenerator::default())
    }

    pub fn load_all(&self) -> Result<Vec<Expense>> {
        self.records.load_all()
    }

    pub fn load_report(&self) -> Result<LoadReport<Expense>> {
        self.records.load_report()
    }

    pub fn save_all(&self, expenses: &[Expense]) -> Result<()> {
        self.records.save_all(expenses)
    }

    /// Record an expense; the date defaults to today
    pub fn add_expense(&self, new: NewExpense) -> Result<Expense> {
        let itinerary_id = require_text("Itinerary ID", &new.itinerary_id)?;
        validate_amount(new.amount)?;
        let category = require_text("Category", &new.category)?;

        let date = match new.date.as_deref().map(str::trim) {
            Some(date) if !date.is_empty() => {
                parse_date("Date", date)?;
                date.to_string()
            }
            _ => self.ids.today().format(DATE_FORMAT).to_string(),
        };

        let expense = Expense {
            id: self.ids.expense_id(),
            itinerary_id,
            amount: new.amount,
            category,
            date,
            description: new.description.trim().to_string(),
        };

        let expense = self.records.append(expense)?;
        tracing::info!(
            "Added expense {} ({:.2} {}) to itinerary {}",
            expense.id,
            expense.amount,
            expense.category,
            expense.itinerary_id
        );
        Ok(expense)
    }

    pub fn find(&self, expense_id: &str) -> Result<Expense> {
        self.records.find(expense_id)
    }

    /// Expenses for one itinerary, in storage order
    pub fn list_expenses(&self, itinerary_id: &str) -> Result<Vec<Expense>> {
        self.records.filter(|e| e.itinerary_id == itinerary_id)
    }

    /// Totals per category, keyed in sorted order
    pub fn summary(&self, itinerary_id: &str) -> Result<BTreeMap<String, f64>> {
        Ok(summarize(&self.list_expenses(itinerary_id)?))
    }

    pub fn total(&self, itinerary_id: &str) -> Result<f64> {
        Ok(self
            .list_expenses(itinerary_id)?
            .iter()
            .map(|e| e.amount)
            .sum())
    }

    pub fn remove_expense(&self, expense_id: &str) -> Result<Expense> {
        let removed = self.records.remove(expense_id)?;
        tracing::info!("Removed expense {} ({})", removed.id, removed.category);
        Ok(removed)
    }
}

/// Sum amounts by category
pub fn summarize(expenses: &[Expense]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    totals
}
