use thiserror::Error;

/// Errors raised by the chain model.
///
/// All three kinds are non-retryable and surface synchronously at the point
/// of violation; none are caught or suppressed internally. A failed operation
/// leaves the model unchanged.
#[derive(Debug, Error)]
pub enum ChainError {
	/// Malformed caller input: an absent state identifier passed to
	/// `add_transition`, or an unparsable / structurally incomplete
	/// payload passed to `load`.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// Generation attempted while no states have been trained at all.
	#[error("no states present")]
	EmptyChain,

	/// Strict-mode generation from a state with no recorded outgoing
	/// transitions.
	#[error("state '{0}' has no transitions to other states")]
	InvalidState(String),
}
