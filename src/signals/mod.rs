//! Risk gating and signal distribution

pub mod gate;
pub mod publisher;

pub use gate::{GateOutcome, RejectReason, RiskGate};
pub use publisher::SignalPublisher;
