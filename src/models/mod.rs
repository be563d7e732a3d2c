//! Domain data models

pub mod analysis;
pub mod decision;
pub mod execution;
pub mod market;
pub mod signal;
pub mod token;

pub use analysis::{AnalysisContext, SentimentSnapshot, TechnicalIndicators};
pub use decision::{Decision, Recommendation};
pub use execution::{ExecutionReceipt, ExecutionStatus, SwapRoute};
pub use market::MarketSnapshot;
pub use signal::{Signal, SignalDirection, SignalEvent, SignalStatus};
pub use token::{DiscoverySource, TokenCandidate};
