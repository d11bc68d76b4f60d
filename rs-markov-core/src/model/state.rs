use indexmap::IndexMap;

use serde::{Deserialize, Serialize};

/// Represents one state of the chain.
///
/// A `State` stores every observed transition out of this state, keyed by
/// the successor identifier, with the number of times each transition was
/// observed. Conceptually this is a node in the chain whose outgoing edges
/// are weighted by their observation counts.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during learning
/// - Derive the row of the normalized probability matrix for this state
///
/// ## Invariants
/// - Each transition occurrence count is strictly positive
/// - Successors iterate in first-seen order; that order decides tie-breaks
///   during weighted sampling and never changes once a successor is recorded
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct State {
	/// Outgoing transitions indexed by the successor identifier.
	/// The value represents how many times this transition was observed.
	/// Example: { "rain" => 42, "sun" => 3 }
	transitions: IndexMap<String, u64>,
}

impl State {
	/// Creates a new state with no recorded transitions.
	pub fn new() -> Self {
		Self {
			transitions: IndexMap::new(),
		}
	}

	/// Records an occurrence of a transition toward `to`.
	///
	/// - If the transition already exists, its occurrence count is increased.
	/// - Otherwise, a new transition is created with an initial count of 1,
	///   appended at the end of the iteration order.
	pub fn add_transition(&mut self, to: &str) {
		*self.transitions.entry(to.to_owned()).or_insert(0) += 1;
	}

	/// Returns the recorded occurrence count toward `to`, or 0 if the
	/// transition was never observed.
	pub fn occurrences(&self, to: &str) -> u64 {
		self.transitions.get(to).copied().unwrap_or(0)
	}

	/// Derives this state's row of the probability matrix.
	///
	/// Each successor maps to `count / total`, in the same insertion order
	/// as the counts. The row sum is 1.0 within floating-point tolerance;
	/// the total is always positive since counts only exist alongside a
	/// positive increment.
	pub fn normalized(&self) -> IndexMap<String, f64> {
		let total: u64 = self.transitions.values().sum();
		self.transitions
			.iter()
			.map(|(to, occurrence)| (to.clone(), *occurrence as f64 / total as f64))
			.collect()
	}

	/// Read-only view of the raw occurrence counts, in insertion order.
	pub fn transitions(&self) -> &IndexMap<String, u64> {
		&self.transitions
	}
}
