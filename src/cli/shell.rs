//! Menu-driven interactive front end.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::{Local, NaiveDate};

use crate::application::ExpenseService;
use crate::domain::{Cents, Expense, category_or_default, format_cents};

use super::input::{parse_amount, parse_date, parse_description, parse_id};

const MENU: &str = "\
Main Menu:
1. Add Expense
2. View All Expenses
3. Edit Expense
4. Delete Expense
5. View Summary
6. View Expenses by Category
7. View Expenses by Date Range
8. Exit";

/// Interactive session over any line-oriented input and output.
///
/// End of input behaves like choosing Exit; a prompt left unanswered at end
/// of input abandons the current action.
pub struct Shell<'a, R, W> {
    service: &'a mut ExpenseService,
    input: R,
    output: W,
    today: NaiveDate,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(service: &'a mut ExpenseService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
            today: Local::now().date_naive(),
        }
    }

    /// Fix the date used for "today" defaults.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "=== Personal Expense Tracker ===\n")?;

        loop {
            writeln!(self.output, "{}", MENU)?;
            let Some(choice) = self.prompt("\nEnter your choice: ")? else {
                writeln!(self.output)?;
                break;
            };

            match choice.trim() {
                "1" => self.add_expense()?,
                "2" => self.view_all_expenses()?,
                "3" => self.edit_expense()?,
                "4" => self.delete_expense()?,
                "5" => self.view_summary()?,
                "6" => self.view_by_category()?,
                "7" => self.view_by_date_range()?,
                "8" => {
                    writeln!(self.output, "Thank you for using Personal Expense Tracker!")?;
                    return Ok(());
                }
                _ => writeln!(self.output, "Invalid choice. Please try again.")?,
            }

            writeln!(self.output)?;
        }

        Ok(())
    }

    fn add_expense(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Add New Expense ---")?;

        let Some(description) = self.prompt("Description: ")? else {
            return Ok(());
        };
        let description = match parse_description(&description) {
            Ok(description) => description,
            Err(err) => {
                writeln!(self.output, "{}.", err)?;
                return Ok(());
            }
        };

        let Some(amount) = self.prompt("Amount: $")? else {
            return Ok(());
        };
        let Ok(amount) = parse_amount(&amount) else {
            writeln!(self.output, "Invalid amount. Please enter a positive number.")?;
            return Ok(());
        };

        let Some(category) = self.prompt("Category: ")? else {
            return Ok(());
        };

        let Some(date) = self.prompt("Date (yyyy-mm-dd) or press Enter for today: ")? else {
            return Ok(());
        };
        let date = if date.trim().is_empty() {
            self.today
        } else {
            match parse_date(&date) {
                Ok(date) => date,
                Err(_) => {
                    writeln!(self.output, "Invalid date format. Using today's date.")?;
                    self.today
                }
            }
        };

        let expense = Expense::new(description, amount, date).with_category(category);
        match self.service.add(expense) {
            Ok(id) => writeln!(self.output, "\nExpense added successfully! (ID {})", id)?,
            Err(err) => writeln!(self.output, "\n{}", err)?,
        }
        Ok(())
    }

    fn view_all_expenses(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- All Expenses ---")?;
        let expenses = self.service.list();

        if expenses.is_empty() {
            writeln!(self.output, "No expenses found.")?;
            return Ok(());
        }

        writeln!(self.output, "\nTotal Expenses: {}\n", expenses.len())?;
        for expense in &expenses {
            writeln!(self.output, "{}", expense)?;
        }
        writeln!(
            self.output,
            "\nTotal Amount: ${}",
            format_cents(self.service.total())
        )?;
        Ok(())
    }

    fn edit_expense(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Edit Expense ---")?;
        self.view_all_expenses()?;

        let Some(current) = self.select_expense("\nEnter Expense ID to edit: ")? else {
            return Ok(());
        };
        writeln!(self.output, "\nCurrent Expense: {}\n", current)?;

        let Some(description) = self.prompt("New Description (or press Enter to keep current): ")?
        else {
            return Ok(());
        };
        let description = match parse_description(&description) {
            Ok(description) => description,
            Err(_) => current.description.clone(),
        };

        let Some(amount) = self.prompt("New Amount (or press Enter to keep current): ")? else {
            return Ok(());
        };
        let amount = if amount.trim().is_empty() {
            current.amount
        } else {
            match parse_amount(&amount) {
                Ok(amount) => amount,
                Err(_) => {
                    writeln!(self.output, "Invalid amount. Keeping current amount.")?;
                    current.amount
                }
            }
        };

        let Some(category) = self.prompt("New Category (or press Enter to keep current): ")? else {
            return Ok(());
        };
        let category = if category.trim().is_empty() {
            current.category.clone()
        } else {
            category_or_default(&category)
        };

        let Some(date) = self.prompt("New Date (yyyy-mm-dd) or press Enter to keep current: ")?
        else {
            return Ok(());
        };
        let date = if date.trim().is_empty() {
            current.date
        } else {
            match parse_date(&date) {
                Ok(date) => date,
                Err(_) => {
                    writeln!(self.output, "Invalid date format. Keeping current date.")?;
                    current.date
                }
            }
        };

        if self
            .service
            .update(current.id, description, amount, category, date)
        {
            writeln!(self.output, "\nExpense updated successfully!")?;
        } else {
            writeln!(self.output, "\nFailed to update expense.")?;
        }
        Ok(())
    }

    fn delete_expense(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Delete Expense ---")?;
        self.view_all_expenses()?;

        let Some(expense) = self.select_expense("\nEnter Expense ID to delete: ")? else {
            return Ok(());
        };
        writeln!(self.output, "\nExpense to delete: {}", expense)?;

        let Some(confirm) = self.prompt("Are you sure you want to delete this expense? (y/n): ")?
        else {
            return Ok(());
        };

        if !confirm.trim().eq_ignore_ascii_case("y") {
            writeln!(self.output, "Deletion cancelled.")?;
        } else if self.service.delete(expense.id) {
            writeln!(self.output, "\nExpense deleted successfully!")?;
        } else {
            writeln!(self.output, "\nFailed to delete expense.")?;
        }
        Ok(())
    }

    fn view_summary(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Expense Summary ---")?;
        let report = self.service.summary();

        writeln!(self.output, "\nTotal Expenses: ${}", format_cents(report.total))?;
        writeln!(self.output, "Number of Expenses: {}", report.count)?;

        if !report.categories.is_empty() {
            writeln!(self.output, "\nExpenses by Category:")?;
            for share in &report.categories {
                writeln!(
                    self.output,
                    "  {}: ${} ({:.1}%)",
                    share.category,
                    format_cents(share.total),
                    share.percentage
                )?;
            }
        }
        Ok(())
    }

    fn view_by_category(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Expenses by Category ---")?;

        let categories = self.service.categories();
        if categories.is_empty() {
            writeln!(self.output, "No categories found.")?;
            return Ok(());
        }

        writeln!(self.output, "\nAvailable Categories:")?;
        for (index, category) in categories.iter().enumerate() {
            writeln!(self.output, "{}. {}", index + 1, category)?;
        }

        let Some(input) = self.prompt("\nEnter category name or number: ")? else {
            return Ok(());
        };
        let input = input.trim();
        let category = match input.parse::<usize>() {
            Ok(index) if (1..=categories.len()).contains(&index) => categories[index - 1].clone(),
            _ => input.to_string(),
        };

        let expenses = self.service.by_category(&category);
        if expenses.is_empty() {
            writeln!(self.output, "\nNo expenses found for category: {}", category)?;
            return Ok(());
        }

        writeln!(self.output, "\nExpenses in '{}':", category)?;
        for expense in &expenses {
            writeln!(self.output, "{}", expense)?;
        }
        writeln!(
            self.output,
            "\nTotal for '{}': ${}",
            category,
            format_cents(self.service.total_for_category(&category))
        )?;
        Ok(())
    }

    fn view_by_date_range(&mut self) -> Result<()> {
        writeln!(self.output, "\n--- Expenses by Date Range ---")?;

        let Some(start) = self.prompt("Start Date (yyyy-mm-dd): ")? else {
            return Ok(());
        };
        let Ok(start) = parse_date(&start) else {
            writeln!(self.output, "Invalid start date format.")?;
            return Ok(());
        };

        let Some(end) = self.prompt("End Date (yyyy-mm-dd): ")? else {
            return Ok(());
        };
        let Ok(end) = parse_date(&end) else {
            writeln!(self.output, "Invalid end date format.")?;
            return Ok(());
        };

        if start > end {
            writeln!(self.output, "Start date cannot be after end date.")?;
            return Ok(());
        }

        let expenses = self.service.by_date_range(start, end);
        let (start, end) = (start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));
        if expenses.is_empty() {
            writeln!(
                self.output,
                "\nNo expenses found between {} and {}",
                start, end
            )?;
            return Ok(());
        }

        writeln!(self.output, "\nExpenses from {} to {}:", start, end)?;
        for expense in &expenses {
            writeln!(self.output, "{}", expense)?;
        }
        let total: Cents = expenses.iter().map(|e| e.amount).sum();
        writeln!(self.output, "\nTotal: ${}", format_cents(total))?;
        Ok(())
    }

    /// Ask for an id and look it up, reporting bad or unknown ids.
    fn select_expense(&mut self, prompt: &str) -> Result<Option<Expense>> {
        let Some(input) = self.prompt(prompt)? else {
            return Ok(None);
        };
        let Ok(id) = parse_id(&input) else {
            writeln!(self.output, "Invalid ID.")?;
            return Ok(None);
        };

        match self.service.get(id) {
            Some(expense) => Ok(Some(expense.clone())),
            None => {
                writeln!(self.output, "Expense not found.")?;
                Ok(None)
            }
        }
    }

    /// Print `text` and read one line. `None` at end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
