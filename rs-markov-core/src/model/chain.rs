use indexmap::IndexMap;

use serde_json::Value;

use super::state::State;
use crate::errors::ChainError;
use crate::random::{RandomSource, ThreadRandom};

/// A first-order Markov chain over opaque string state identifiers.
///
/// The chain learns transition frequencies from observed (from, to) pairs,
/// derives a row-normalized probability matrix on demand, and generates
/// successor states by weighted random sampling.
///
/// # Responsibilities
/// - Accumulate transition counts via [`add_transition`](Self::add_transition)
/// - Lazily (re)derive the probability matrix when read after a mutation
/// - Generate successor states, starting from an explicit origin, the last
///   generated state, or a random known state
/// - Persist and restore itself through a stable JSON snapshot
///
/// # Invariants
/// - A state appears as a matrix row only if it has at least one recorded
///   outgoing transition; rows are never empty and each row sums to 1.0
///   within floating-point tolerance
/// - Successor iteration order is first-seen order, both in the counts and
///   in the derived matrix; sampling tie-breaks depend on it
/// - The matrix revision only changes when the matrix is recomputed
pub struct MarkovChain {
	/// Dead-end policy: error out instead of restarting at random.
	strict: bool,
	/// Observed transition counts, one [`State`] row per known origin.
	states: IndexMap<String, State>,
	/// Cached probability matrix, rebuilt wholesale when stale.
	matrix: IndexMap<String, IndexMap<String, f64>>,
	/// Set by every mutation, cleared by the next matrix read.
	dirty: bool,
	/// Bumped once per matrix recomputation.
	revision: u64,
	/// Origin used by the next unseeded generation call.
	last_state: Option<String>,
	/// Uniform [0, 1) source feeding every sampling decision.
	source: Box<dyn RandomSource>,
}

impl MarkovChain {
	/// Creates an empty chain using the thread-local random source.
	pub fn new(strict: bool) -> Self {
		Self::with_source(strict, Box::new(ThreadRandom))
	}

	/// Creates an empty chain drawing from the given random source.
	///
	/// Injecting the source keeps generation deterministic under test.
	pub fn with_source(strict: bool, source: Box<dyn RandomSource>) -> Self {
		Self {
			strict,
			states: IndexMap::new(),
			matrix: IndexMap::new(),
			dirty: false,
			revision: 0,
			last_state: None,
			source,
		}
	}

	/// Returns the dead-end policy fixed at construction.
	pub fn is_strict(&self) -> bool {
		self.strict
	}

	/// Records one observation of the transition `from` -> `to`.
	///
	/// The count for the pair is incremented by one; on first occurrence the
	/// pair is appended at the end of its row's iteration order. The cached
	/// matrix is marked stale. Write cost stays O(1) in the table size.
	///
	/// # Errors
	/// Returns [`ChainError::InvalidArgument`] if either identifier is empty,
	/// naming the offending side. Nothing is recorded in that case.
	pub fn add_transition(&mut self, from: &str, to: &str) -> Result<(), ChainError> {
		if from.is_empty() {
			return Err(ChainError::InvalidArgument(
				"the 'from' state may not be empty".to_owned(),
			));
		}
		if to.is_empty() {
			return Err(ChainError::InvalidArgument(
				"the 'to' state may not be empty".to_owned(),
			));
		}

		self.states
			.entry(from.to_owned())
			.or_insert_with(State::new)
			.add_transition(to);
		self.dirty = true;
		Ok(())
	}

	/// Returns the recorded count for `from` -> `to`, or 0 if never observed.
	pub fn frequency(&self, from: &str, to: &str) -> u64 {
		self.states
			.get(from)
			.map(|state| state.occurrences(to))
			.unwrap_or(0)
	}

	/// Returns the last generated state, if any generation succeeded yet.
	pub fn last_state(&self) -> Option<&str> {
		self.last_state.as_deref()
	}

	/// The row-normalized transition probability matrix.
	///
	/// Recomputed from the counts only when stale; while no mutation
	/// intervenes, repeated reads return the same cached structure and
	/// [`matrix_revision`](Self::matrix_revision) stays constant.
	pub fn transition_matrix(&mut self) -> &IndexMap<String, IndexMap<String, f64>> {
		self.refresh_matrix();
		&self.matrix
	}

	/// Identity token of the cached matrix.
	///
	/// Increases exactly when the matrix is recomputed, so callers can
	/// detect staleness-driven rebuilds without comparing values.
	pub fn matrix_revision(&self) -> u64 {
		self.revision
	}

	fn refresh_matrix(&mut self) {
		if !self.dirty {
			return;
		}
		self.matrix = self
			.states
			.iter()
			.map(|(from, state)| (from.clone(), state.normalized()))
			.collect();
		self.dirty = false;
		self.revision += 1;
	}

	/// Picks a uniformly random origin among the known "from" states.
	///
	/// States only ever seen as targets are deliberately not candidates;
	/// restarts stay within the set of states with outgoing transitions.
	fn random_restart(&mut self) -> Result<String, ChainError> {
		if self.states.is_empty() {
			return Err(ChainError::EmptyChain);
		}
		let draw = self.source.next_uniform();
		let index = ((draw * self.states.len() as f64) as usize).min(self.states.len() - 1);
		self.states
			.get_index(index)
			.map(|(from, _)| from.clone())
			.ok_or(ChainError::EmptyChain)
	}

	/// Generates the next state by weighted random sampling.
	///
	/// The origin is resolved in order: the explicit `initial_state` if
	/// given, else the last generated state, else a uniformly random known
	/// state. The successor is then drawn from the origin's matrix row by
	/// mapping one uniform draw onto the row's cumulative distribution, in
	/// the row's insertion order. The chosen state becomes the new cursor.
	///
	/// If the origin has no outgoing transitions, a strict chain fails and
	/// a lenient chain substitutes a fresh uniformly random known state
	/// instead of performing a weighted step.
	///
	/// # Errors
	/// - [`ChainError::EmptyChain`] if no transition was ever recorded
	/// - [`ChainError::InvalidState`] in strict mode, when the resolved
	///   origin has no outgoing transitions
	pub fn generate_state(&mut self, initial_state: Option<&str>) -> Result<String, ChainError> {
		if self.states.is_empty() {
			return Err(ChainError::EmptyChain);
		}
		self.refresh_matrix();

		let from = if let Some(state) = initial_state {
			state.to_owned()
		} else if let Some(state) = self.last_state.clone() {
			state
		} else {
			self.random_restart()?
		};

		// A row loaded without successors counts as a dead end too.
		let dead_end = self.matrix.get(&from).is_none_or(|row| row.is_empty());
		if dead_end {
			if self.strict {
				return Err(ChainError::InvalidState(from));
			}
			let restart = self.random_restart()?;
			self.last_state = Some(restart.clone());
			return Ok(restart);
		}

		let mut tracker = self.source.next_uniform();
		let mut picked: Option<&str> = None;
		for (to, probability) in &self.matrix[&from] {
			// Fallback to the last entry if float residue leaves tracker > 0.
			picked = Some(to.as_str());
			tracker -= probability;
			if tracker <= 0.0 {
				break;
			}
		}

		match picked {
			Some(to) => {
				let next = to.to_owned();
				self.last_state = Some(next.clone());
				Ok(next)
			}
			// Rows are never empty, kept for safety.
			None => Err(ChainError::InvalidState(from)),
		}
	}

	/// Serializes the chain to its JSON snapshot.
	///
	/// The snapshot holds exactly two fields: the full frequency table and
	/// the current cursor (`null` if none). Field and row nesting order is
	/// insertion order, so the same model state always serializes to the
	/// same string.
	pub fn save(&self) -> String {
		let mut transitions = serde_json::Map::new();
		for (from, state) in &self.states {
			let mut row = serde_json::Map::new();
			for (to, occurrence) in state.transitions() {
				row.insert(to.clone(), Value::from(*occurrence));
			}
			transitions.insert(from.clone(), Value::Object(row));
		}

		let mut root = serde_json::Map::new();
		root.insert("stateTransitions".to_owned(), Value::Object(transitions));
		root.insert(
			"lastState".to_owned(),
			match &self.last_state {
				Some(state) => Value::String(state.clone()),
				None => Value::Null,
			},
		);
		Value::Object(root).to_string()
	}

	/// Restores a chain from a JSON snapshot produced by [`save`](Self::save).
	///
	/// The restored chain uses the given dead-end policy and the thread-local
	/// random source; counts and cursor are restored verbatim and the matrix
	/// cache is left stale, to be derived on first read.
	///
	/// # Errors
	/// Returns [`ChainError::InvalidArgument`] if the payload is not valid
	/// JSON, is not an object, lacks either the `stateTransitions` or the
	/// `lastState` field, carries them with the wrong shape, or records a
	/// zero transition count. A present but `null` `lastState` is valid and
	/// means "no cursor yet".
	pub fn load(data: &str, strict: bool) -> Result<Self, ChainError> {
		let value: Value = serde_json::from_str(data)
			.map_err(|error| ChainError::InvalidArgument(error.to_string()))?;
		let root = value.as_object().ok_or_else(|| {
			ChainError::InvalidArgument("expected a JSON object".to_owned())
		})?;

		let transitions = root.get("stateTransitions").ok_or_else(|| {
			ChainError::InvalidArgument("serialized field 'stateTransitions' is missing".to_owned())
		})?;
		let last_state = root.get("lastState").ok_or_else(|| {
			ChainError::InvalidArgument("serialized field 'lastState' is missing".to_owned())
		})?;

		let states: IndexMap<String, State> = serde_json::from_value(transitions.clone())
			.map_err(|error| ChainError::InvalidArgument(error.to_string()))?;
		for (from, state) in &states {
			if state.transitions().values().any(|occurrence| *occurrence == 0) {
				return Err(ChainError::InvalidArgument(format!(
					"state '{from}' carries a zero transition count"
				)));
			}
		}
		let last_state = match last_state {
			Value::Null => None,
			Value::String(state) => Some(state.clone()),
			_ => {
				return Err(ChainError::InvalidArgument(
					"'lastState' must be a string or null".to_owned(),
				));
			}
		};

		let mut chain = Self::new(strict);
		chain.states = states;
		chain.last_state = last_state;
		chain.dirty = true;
		Ok(chain)
	}
}
