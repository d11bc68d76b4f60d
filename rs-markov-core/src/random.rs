use rand::Rng;

/// Source of uniform random numbers in `[0, 1)`.
///
/// The chain model never reads a process-wide random function directly;
/// every sampling decision draws from a source injected at construction.
/// This keeps generation deterministic under test, where a scripted
/// sequence of values can stand in for real randomness.
pub trait RandomSource {
	/// Returns the next uniform value in `[0, 1)`.
	fn next_uniform(&mut self) -> f64;
}

/// Default source backed by the thread-local generator from `rand`.
#[derive(Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
	fn next_uniform(&mut self) -> f64 {
		rand::rng().random::<f64>()
	}
}
