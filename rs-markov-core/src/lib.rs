//! First-order Markov chain library.
//!
//! This crate provides a discrete-state Markov chain model including:
//! - Transition-frequency learning from observed (from, to) state pairs
//! - A lazily derived, row-normalized transition probability matrix
//! - Weighted random generation of successor states
//! - A stable JSON snapshot format for persistence
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core chain model and generation logic.
///
/// This module exposes the high-level chain interface while keeping
/// internal state representations private.
pub mod model;

/// Error taxonomy shared by all operations.
pub mod errors;

/// Injectable uniform random source used for all sampling.
pub mod random;

pub use errors::ChainError;
