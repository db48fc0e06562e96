use std::collections::BTreeMap;

use rand::Rng;

use crate::error::ChainError;

/// Frequency distribution over the words following a single context.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities
/// - Accumulate occurrence counts during training
/// - Derive probabilities eagerly after every recorded occurrence,
///   so queries always reflect the latest counts
/// - Select the next word by weighted random sampling
///
/// ## Invariants
/// - Every occurrence count is strictly positive
/// - Probabilities over all outgoing words sum to 1.0 once anything
///   has been recorded
///
/// Entries are kept in a `BTreeMap` so enumeration order is the same
/// in every process; sampling with a fixed seed is reproducible
/// across runs.
#[derive(Clone, Debug, Default)]
pub(crate) struct Distribution {
	/// Total number of recorded occurrences across all words.
	total_count: usize,
	/// Occurrence count per following word.
	counts: BTreeMap<String, usize>,
	/// Probability per following word, derived from `counts`.
	probabilities: BTreeMap<String, f64>,
}

impl Distribution {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `word` following this context and
	/// recomputes all probabilities from the updated counts.
	pub(crate) fn record(&mut self, word: &str) {
		self.total_count += 1;
		*self.counts.entry(word.to_owned()).or_insert(0) += 1;

		let total = self.total_count as f64;
		for (word, count) in &self.counts {
			self.probabilities.insert(word.clone(), *count as f64 / total);
		}
	}

	/// Returns the probability of `word` following this context.
	///
	/// Unseen words have probability 0.0; that is a meaningful answer,
	/// not an error.
	pub(crate) fn probability(&self, word: &str) -> f64 {
		self.probabilities.get(word).copied().unwrap_or(0.0)
	}

	/// Iterates over `(word, probability)` entries in enumeration order.
	pub(crate) fn probabilities(&self) -> impl Iterator<Item = (&str, f64)> {
		self.probabilities.iter().map(|(word, p)| (word.as_str(), *p))
	}

	/// Total number of recorded occurrences for this context.
	pub(crate) fn observations(&self) -> usize {
		self.total_count
	}

	/// Selects the next word by weighted random sampling.
	///
	/// Draws a uniform value in `[0, 1)` from `rng`, then walks the
	/// entries accumulating a running sum and returns the first word at
	/// which the sum reaches the drawn value.
	///
	/// # Errors
	/// Returns [`ChainError::ProbabilityMassViolation`] if the walk
	/// exhausts every entry without reaching the drawn value. With
	/// probabilities summing to 1.0 this cannot happen; hitting it means
	/// the count/probability bookkeeping is broken.
	pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> Result<String, ChainError> {
		let drawn: f64 = rng.random();

		let mut cumulative = 0.0;
		for (word, probability) in self.probabilities() {
			cumulative += probability;
			if drawn <= cumulative {
				return Ok(word.to_owned());
			}
		}

		Err(ChainError::ProbabilityMassViolation { drawn })
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	const TOLERANCE: f64 = 1e-9;

	#[test]
	fn single_observation_has_full_probability() {
		let mut distribution = Distribution::new();
		distribution.record("phrase");

		assert!((distribution.probability("phrase") - 1.0).abs() < TOLERANCE);
		assert_eq!(distribution.probability("other"), 0.0);
	}

	#[test]
	fn probabilities_follow_counts() {
		let mut distribution = Distribution::new();
		distribution.record("phrase");
		distribution.record("other");

		assert!((distribution.probability("phrase") - 0.5).abs() < TOLERANCE);
		assert!((distribution.probability("other") - 0.5).abs() < TOLERANCE);

		distribution.record("phrase");
		assert!((distribution.probability("phrase") - 2.0 / 3.0).abs() < TOLERANCE);
		assert!((distribution.probability("other") - 1.0 / 3.0).abs() < TOLERANCE);
	}

	#[test]
	fn probabilities_sum_to_one() {
		let mut distribution = Distribution::new();
		for word in ["a", "b", "c", "a", "d", "a", "b"] {
			distribution.record(word);

			let sum: f64 = distribution.probabilities().map(|(_, p)| p).sum();
			assert!((sum - 1.0).abs() < TOLERANCE);
		}
		assert_eq!(distribution.observations(), 7);
	}

	#[test]
	fn sampling_returns_a_recorded_word() {
		let mut distribution = Distribution::new();
		distribution.record("alpha");
		distribution.record("beta");

		let mut rng = StdRng::seed_from_u64(42);
		for _ in 0..100 {
			let word = distribution.sample(&mut rng).unwrap();
			assert!(word == "alpha" || word == "beta");
		}
	}

	#[test]
	fn sampling_is_reproducible_for_a_fixed_seed() {
		let mut distribution = Distribution::new();
		for word in ["a", "b", "c", "d"] {
			distribution.record(word);
		}

		let mut first = StdRng::seed_from_u64(7);
		let mut second = StdRng::seed_from_u64(7);
		for _ in 0..50 {
			assert_eq!(
				distribution.sample(&mut first).unwrap(),
				distribution.sample(&mut second).unwrap()
			);
		}
	}
}
