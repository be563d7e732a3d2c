//! Route resolution and trade execution

pub mod chain;
pub mod executor;
pub mod router;

use thiserror::Error;

pub use chain::{AggregatorChainClient, ChainClient};
pub use executor::TradeExecutor;
pub use router::{RouteError, RouteResolver};

#[derive(Debug, Error)]
pub enum ExecutionError {
    /// An execution for this token is already unresolved. A no-op for the
    /// caller, never retried automatically.
    #[error("execution already in flight for {0}")]
    AlreadyInFlight(String),
    /// Chain submission failed; recorded in the receipt.
    #[error("submission failed: {0}")]
    Submission(String),
}
