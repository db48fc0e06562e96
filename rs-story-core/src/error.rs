use thiserror::Error;

/// Errors produced by the chain model and story generator.
///
/// Tokenization anomalies are not errors: unrecognized characters are
/// returned to the caller as a set and training continues. Everything
/// here is either a construction-time misuse or a generation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
	/// The requested context order is not supported (only 1 and 2 are).
	#[error("context order must be 1 or 2, got {0}")]
	UnsupportedOrder(usize),

	/// Story generation dead-ended on every attempt.
	///
	/// The training corpus does not contain enough connected transitions
	/// to satisfy the request; supply more training text or raise the
	/// attempt budget.
	#[error("insufficient training data: generation dead-ended after {attempts} attempt(s)")]
	InsufficientTrainingData {
		/// Attempts consumed before giving up.
		attempts: usize,
	},

	/// The cumulative distribution never reached the drawn value.
	///
	/// Probabilities for a trained context must sum to 1.0, so this
	/// indicates corrupted bookkeeping, not bad input.
	#[error("probability mass invariant violated: cumulative sum never reached drawn value {drawn}")]
	ProbabilityMassViolation {
		/// The uniform value drawn from the generator.
		drawn: f64,
	},
}
