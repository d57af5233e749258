mod common;

use std::fs;

use anyhow::Result;
use common::{data_file, expense, parse_date, reopen, test_service};
use outlay::application::{AppError, ExpenseService, LoadPolicy};
use outlay::domain::{Expense, ExpenseId};
use tempfile::TempDir;

#[test]
fn test_missing_file_starts_empty_without_creating_it() -> Result<()> {
    let (service, temp) = test_service()?;

    assert!(service.list().is_empty());
    assert!(!data_file(&temp).exists());

    Ok(())
}

#[test]
fn test_every_mutation_is_written() -> Result<()> {
    let (mut service, temp) = test_service()?;

    service.add(expense("Coffee", 450, "Food", "2024-03-01"))?;
    service.add(expense("Bus", 200, "Transport", "2024-03-02"))?;
    assert_eq!(reopen(&temp)?.list().len(), 2);

    service.update(
        2,
        "Train".into(),
        1250,
        "Transport".into(),
        parse_date("2024-03-05"),
    );
    let reloaded = reopen(&temp)?;
    let train = reloaded.get(2).expect("train should be saved");
    assert_eq!(train.description, "Train");
    assert_eq!(train.amount, 1250);
    assert_eq!(train.date, parse_date("2024-03-05"));

    service.delete(1);
    let reloaded = reopen(&temp)?;
    assert!(reloaded.get(1).is_none());
    assert_eq!(reloaded.list().len(), 1);

    Ok(())
}

#[test]
fn test_reload_keeps_ids_and_numbering() -> Result<()> {
    let (mut service, temp) = test_service()?;
    service.add(expense("Coffee", 450, "Food", "2024-03-01"))?;
    service.add(expense("Bus", 200, "Transport", "2024-03-02"))?;
    service.delete(1);
    drop(service);

    let mut service = reopen(&temp)?;
    assert_eq!(service.list()[0].id, 2);
    assert_eq!(service.add(expense("Snack", 100, "Food", "2024-03-03"))?, 3);

    Ok(())
}

#[test]
fn test_roundtrip_preserves_every_field() -> Result<()> {
    let (mut service, temp) = test_service()?;
    service.add(expense("Coffee \"to go\"", 450, "Food & Drink", "2024-03-01"))?;
    service.add(expense("Bus", 1, "Transport", "2023-12-31"))?;
    service.add(expense("Laptop", 129_999, "", "2024-02-29"))?;

    let reloaded = reopen(&temp)?;
    assert_eq!(reloaded.ledger(), service.ledger());

    Ok(())
}

#[test]
fn test_file_is_indented_json_array() -> Result<()> {
    let (mut service, temp) = test_service()?;
    service.add(expense("Coffee", 450, "Food", "2024-03-01"))?;

    let text = fs::read_to_string(data_file(&temp))?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    let records = value.as_array().expect("top level should be an array");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["Id"], 1);
    assert_eq!(records[0]["Amount"], 4.5);
    assert_eq!(records[0]["Date"], "2024-03-01");
    assert!(text.contains("\n  {"));

    Ok(())
}

#[test]
fn test_loads_files_with_datetime_stamps() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(
        data_file(&temp),
        r#"[
  {
    "Id": 4,
    "Description": "Groceries",
    "Amount": 23.75,
    "Category": "Food",
    "Date": "2024-05-02T18:30:12.5518251+02:00"
  },
  {
    "Id": 9,
    "Description": "Parking",
    "Amount": 3,
    "Category": "Car",
    "Date": "2024-05-03T00:00:00"
  }
]"#,
    )?;

    let mut service = reopen(&temp)?;
    let ids: Vec<u32> = service.list().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![9, 4]);
    assert_eq!(service.get(4).map(|e| e.amount), Some(2375));
    assert_eq!(service.get(4).map(|e| e.date), Some(parse_date("2024-05-02")));
    assert_eq!(service.add(expense("Fuel", 6000, "Car", "2024-05-04"))?, 10);

    Ok(())
}

#[test]
fn test_unparsable_file_lenient_starts_empty() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(data_file(&temp), "this is not json")?;

    let mut service = ExpenseService::open(data_file(&temp), LoadPolicy::Lenient)?;
    assert!(service.list().is_empty());

    // The next write replaces the unreadable file
    assert_eq!(service.add(expense("Coffee", 450, "Food", "2024-03-01"))?, 1);
    assert_eq!(reopen(&temp)?.list().len(), 1);

    Ok(())
}

#[test]
fn test_unparsable_file_strict_fails_and_leaves_file() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(data_file(&temp), "[{\"Id\": 1}]")?;

    let result = ExpenseService::open(data_file(&temp), LoadPolicy::Strict);
    assert!(matches!(result, Err(AppError::Storage(_))));
    assert_eq!(fs::read_to_string(data_file(&temp))?, "[{\"Id\": 1}]");

    Ok(())
}

#[test]
fn test_failed_write_keeps_memory_state() -> Result<()> {
    let temp = TempDir::new()?;
    // A directory where the data file should be makes every write fail
    let path = temp.path().join("expenses.json");
    fs::create_dir(&path)?;

    let mut service = ExpenseService::open(&path, LoadPolicy::Lenient)?;
    assert_eq!(service.add(expense("Coffee", 450, "Food", "2024-03-01"))?, 1);
    assert_eq!(service.add(expense("Bus", 200, "Transport", "2024-03-02"))?, 2);
    assert!(service.delete(1));

    let remaining: Vec<&Expense> = service.list();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].description, "Bus");
    assert!(path.is_dir());

    Ok(())
}

#[test]
fn test_add_after_highest_possible_id_fails_cleanly() -> Result<()> {
    let temp = TempDir::new()?;
    let json = format!(
        r#"[{{"Id": {}, "Description": "Coffee", "Amount": 4.5, "Category": "Food", "Date": "2024-03-01"}}]"#,
        ExpenseId::MAX - 1
    );
    fs::write(data_file(&temp), &json)?;

    let mut service = ExpenseService::open(data_file(&temp), LoadPolicy::Strict)?;
    assert_eq!(
        service.add(expense("Bus", 200, "Transport", "2024-03-02"))?,
        ExpenseId::MAX
    );

    let result = service.add(expense("Snack", 100, "Food", "2024-03-03"));
    assert!(matches!(result, Err(AppError::IdsExhausted(_))));
    assert_eq!(service.list().len(), 2);

    let service = reopen(&temp)?;
    assert_eq!(service.list().len(), 2);
    assert!(service.get(ExpenseId::MAX).is_some());

    Ok(())
}
