// Application layer: the ledger wired to its backing file, plus the error
// and report types shared by every front end (shell, subcommands, export).

pub mod error;
pub mod reporting;
pub mod service;

pub use error::*;
pub use reporting::*;
pub use service::*;
