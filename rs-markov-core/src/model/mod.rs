//! Top-level module for the chain model.
//!
//! This module provides the first-order Markov chain, including:
//! - The public chain model (`MarkovChain`)
//! - Internal per-state transition rows (`State`)

/// First-order Markov chain model.
///
/// Exposes transition training, the lazily derived probability matrix,
/// weighted successor generation, and JSON persistence.
pub mod chain;

/// Internal representation of a single chain state.
///
/// Tracks outgoing transition counts in insertion order and derives the
/// normalized probability row. This module is not exposed publicly.
mod state;
