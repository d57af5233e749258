use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{AppError, ExpenseService, LoadPolicy};
use crate::domain::{Cents, Expense, ExpenseId, category_or_default, format_cents};
use crate::io::Exporter;
use crate::storage::DEFAULT_DATA_FILE;

pub mod input;
pub mod shell;

use input::{parse_amount, parse_date, parse_date_range, parse_description};
pub use shell::Shell;

/// Outlay - Personal Expense Tracker
#[derive(Parser)]
#[command(name = "outlay")]
#[command(about = "A local-first personal expense tracker. Runs an interactive menu when no command is given.")]
#[command(version)]
pub struct Cli {
    /// Data file path
    #[arg(short, long, global = true, default_value = DEFAULT_DATA_FILE)]
    pub file: PathBuf,

    /// Refuse to start if the data file exists but cannot be parsed
    #[arg(long, global = true)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a new expense
    Add {
        /// Description of the expense
        description: String,

        /// Amount spent (e.g., "4.50" or "4")
        amount: String,

        /// Category (defaults to "Uncategorized")
        #[arg(short, long)]
        category: Option<String>,

        /// Date of the expense (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List all expenses, most recent first
    List,

    /// Show a single expense
    Show {
        /// Expense ID
        id: ExpenseId,
    },

    /// Edit an expense; omitted fields keep their current value
    Edit {
        /// Expense ID
        id: ExpenseId,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New amount
        #[arg(short, long)]
        amount: Option<String>,

        /// New category
        #[arg(short, long)]
        category: Option<String>,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: ExpenseId,
    },

    /// Show totals per category
    Summary {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List the categories in use
    Categories,

    /// List expenses in a category (case-insensitive)
    Category {
        /// Category name
        name: String,
    },

    /// List expenses between two dates, both inclusive
    Range {
        /// Start date (YYYY-MM-DD)
        from: String,

        /// End date (YYYY-MM-DD)
        to: String,
    },

    /// Export all expenses to CSV or JSON
    Export {
        /// Format
        #[arg(short = 'F', long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl Cli {
    fn load_policy(&self) -> LoadPolicy {
        if self.strict {
            LoadPolicy::Strict
        } else {
            LoadPolicy::Lenient
        }
    }

    pub fn run(self) -> Result<()> {
        let mut service = ExpenseService::open(&self.file, self.load_policy())
            .with_context(|| format!("Failed to open {}", self.file.display()))?;

        match self.command {
            None => {
                let stdin = io::stdin();
                let stdout = io::stdout();
                Shell::new(&mut service, stdin.lock(), stdout.lock()).run()?;
            }
            Some(command) => run_command(&mut service, command)?,
        }

        Ok(())
    }
}

/// Run one non-interactive command against an open service.
pub fn run_command(service: &mut ExpenseService, command: Commands) -> Result<()> {
    match command {
        Commands::Add {
            description,
            amount,
            category,
            date,
        } => {
            let description = parse_description(&description)?;
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => Local::now().date_naive(),
            };

            let expense = Expense::new(description, amount, date)
                .with_category(category.unwrap_or_default());
            let id = service.add(expense)?;
            println!("Added expense: {}", service.require(id)?);
        }

        Commands::List => {
            let expenses = service.list();
            print_expenses(&expenses, "No expenses found.");
            if !expenses.is_empty() {
                println!("\nTotal: ${}", format_cents(service.total()));
            }
        }

        Commands::Show { id } => {
            println!("{}", service.require(id)?);
        }

        Commands::Edit {
            id,
            description,
            amount,
            category,
            date,
        } => {
            let current = service.require(id)?.clone();

            let description = description
                .map(|d| parse_description(&d))
                .transpose()?
                .unwrap_or(current.description);
            let amount = amount
                .map(|a| parse_amount(&a))
                .transpose()?
                .unwrap_or(current.amount);
            let category = category
                .map(|c| category_or_default(&c))
                .unwrap_or(current.category);
            let date = date
                .map(|d| parse_date(&d))
                .transpose()?
                .unwrap_or(current.date);

            if !service.update(id, description, amount, category, date) {
                return Err(AppError::ExpenseNotFound(id).into());
            }
            println!("Updated expense: {}", service.require(id)?);
        }

        Commands::Delete { id } => {
            let expense = service.require(id)?.clone();
            if !service.delete(id) {
                return Err(AppError::ExpenseNotFound(id).into());
            }
            println!("Deleted expense: {}", expense);
        }

        Commands::Summary { format } => {
            let report = service.summary();
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Table => {
                    println!("{:<20} {:>6} {:>12} {:>7}", "CATEGORY", "COUNT", "TOTAL", "SHARE");
                    println!("{}", "-".repeat(48));
                    for share in &report.categories {
                        println!(
                            "{:<20} {:>6} {:>12} {:>6.1}%",
                            truncate(&share.category, 20),
                            share.count,
                            format_cents(share.total),
                            share.percentage
                        );
                    }
                    println!("{}", "-".repeat(48));
                    println!(
                        "{:<20} {:>6} {:>12}",
                        "TOTAL",
                        report.count,
                        format_cents(report.total)
                    );
                }
            }
        }

        Commands::Categories => {
            let categories = service.categories();
            if categories.is_empty() {
                println!("No categories found.");
            }
            for category in categories {
                println!("{}", category);
            }
        }

        Commands::Category { name } => {
            let expenses = service.by_category(&name);
            print_expenses(
                &expenses,
                &format!("No expenses found for category: {}", name),
            );
            if !expenses.is_empty() {
                println!(
                    "\nTotal for '{}': ${}",
                    name,
                    format_cents(service.total_for_category(&name))
                );
            }
        }

        Commands::Range { from, to } => {
            let (start, end) = parse_date_range(&from, &to)?;
            let expenses = service.by_date_range(start, end);
            print_expenses(
                &expenses,
                &format!("No expenses found between {} and {}", start, end),
            );
            if !expenses.is_empty() {
                let total: Cents = expenses.iter().map(|e| e.amount).sum();
                println!("\nTotal: ${}", format_cents(total));
            }
        }

        Commands::Export { format, output } => {
            run_export_command(service, format, output)?;
        }
    }

    Ok(())
}

fn run_export_command(
    service: &ExpenseService,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(io::stdout()),
    };

    let count = match format {
        ExportFormat::Csv => exporter.export_csv(writer)?,
        ExportFormat::Json => exporter.export_json(writer)?,
    };

    if output.is_some() {
        eprintln!("Exported {} expenses", count);
    }
    Ok(())
}

fn print_expenses(expenses: &[&Expense], empty_message: &str) {
    if expenses.is_empty() {
        println!("{}", empty_message);
        return;
    }

    println!(
        "{:>5}  {:<10}  {:>10}  {:<15}  DESCRIPTION",
        "ID", "DATE", "AMOUNT", "CATEGORY"
    );
    println!("{}", "-".repeat(70));
    for expense in expenses {
        println!(
            "{:>5}  {:<10}  {:>10}  {:<15}  {}",
            expense.id,
            expense.date.format("%Y-%m-%d").to_string(),
            format_cents(expense.amount),
            truncate(&expense.category, 15),
            expense.description
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
