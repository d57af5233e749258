//! Validation of raw text input shared by the shell and the subcommands.

use chrono::NaiveDate;

use crate::application::AppError;
use crate::domain::{Cents, ExpenseId, parse_cents};

/// Date format accepted everywhere a date is typed in.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A description must contain something besides whitespace.
pub fn parse_description(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AppError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

/// Parse a strictly positive amount.
pub fn parse_amount(input: &str) -> Result<Cents, AppError> {
    match parse_cents(input) {
        Ok(cents) if cents > 0 => Ok(cents),
        _ => Err(AppError::InvalidAmount(input.trim().to_string())),
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, AppError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| AppError::InvalidDate(trimmed.to_string()))
}

/// Parse both ends of an inclusive range, rejecting a start after the end.
pub fn parse_date_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    if start > end {
        return Err(AppError::InvalidDateRange { start, end });
    }
    Ok((start, end))
}

pub fn parse_id(input: &str) -> Result<ExpenseId, AppError> {
    let trimmed = input.trim();
    trimmed
        .parse()
        .map_err(|_| AppError::InvalidId(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_description() {
        assert_eq!(parse_description("  Coffee ").unwrap(), "Coffee");
        assert!(matches!(
            parse_description("   "),
            Err(AppError::EmptyDescription)
        ));
    }

    #[test]
    fn test_parse_amount_requires_positive() {
        assert_eq!(parse_amount("4.50").unwrap(), 450);
        assert!(matches!(parse_amount("0"), Err(AppError::InvalidAmount(_))));
        assert!(matches!(parse_amount("-3"), Err(AppError::InvalidAmount(_))));
        assert!(matches!(parse_amount("0.001"), Err(AppError::InvalidAmount(_))));
        assert!(matches!(parse_amount("four"), Err(AppError::InvalidAmount(_))));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(matches!(parse_date("01/03/2024"), Err(AppError::InvalidDate(_))));
        assert!(matches!(parse_date("2024-02-30"), Err(AppError::InvalidDate(_))));
    }

    #[test]
    fn test_parse_date_range() {
        let (start, end) = parse_date_range("2024-01-01", "2024-01-31").unwrap();
        assert!(start < end);
        assert!(parse_date_range("2024-01-01", "2024-01-01").is_ok());
        assert!(matches!(
            parse_date_range("2024-02-01", "2024-01-01"),
            Err(AppError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(" 3 ").unwrap(), 3);
        assert!(matches!(parse_id("three"), Err(AppError::InvalidId(_))));
        assert!(matches!(parse_id("-1"), Err(AppError::InvalidId(_))));
    }
}
