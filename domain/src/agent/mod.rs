//! Agent domain module
//!
//! Contains the phases of an agent loop run.

pub mod phase;

pub use phase::{LoopPhase, PhaseTransitionError};
