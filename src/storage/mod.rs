mod store;

pub use store::*;

/// Backing file used when none is given on the command line.
pub const DEFAULT_DATA_FILE: &str = "expenses.json";
