// Application layer - use cases and orchestration.
// `LedgerService` is the only writer of account balances and the transaction log.

pub mod error;
mod seed;
pub mod service;

pub use error::*;
pub use seed::seed_demo_data;
pub use service::*;
