// Volatile storage: the ledger lives in memory for the lifetime of the process.
mod repository;

pub use repository::*;
