use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::distribution::Distribution;
use super::generator::StoryGenerator;
use super::tokenizer;
use crate::error::ChainError;

/// Sentinel token seeding the context at the start of every sentence.
///
/// `^` is outside the recognized character set, so it can never collide
/// with a token produced by the tokenizer.
pub const START_OF_SENTENCE: &str = "^";

/// Chain model with a one-word context.
pub type UnigramChain = MarkovChain<1>;

/// Chain model with a two-word context.
pub type BigramChain = MarkovChain<2>;

/// Word-level Markov chain with a fixed context order `N`.
///
/// The model maps each context (the `N` most recent valid tokens) to a
/// frequency distribution over following tokens, built incrementally
/// from training lines.
///
/// # Responsibilities
/// - Train from text lines, one call per line (`process_string`)
/// - Report transition probabilities (`follow_probability`)
/// - Select the next word by weighted random sampling (`select_next_word`)
/// - Reset context to sentinels after every sentence terminator
///
/// # Invariants
/// - `N` is 1 or 2, fixed at construction
/// - Context keys contain only sentinels and valid tokens
/// - The transition table only grows; entries are never removed
///
/// The model owns its random generator, seeded at construction. For a
/// fixed seed and identical call order, sampling is reproducible.
#[derive(Debug)]
pub struct MarkovChain<const N: usize> {
	/// Mapping from a context to the distribution of following words.
	transitions: HashMap<[String; N], Distribution>,

	/// Generator shared by all sampling calls on this model.
	rng: StdRng,
}

impl<const N: usize> MarkovChain<N> {
	/// Creates a model seeded from the current time.
	///
	/// # Errors
	/// Returns [`ChainError::UnsupportedOrder`] unless `N` is 1 or 2.
	pub fn new() -> Result<Self, ChainError> {
		let seed = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|elapsed| elapsed.as_secs())
			.unwrap_or_default();
		Self::with_seed(seed)
	}

	/// Creates a model with an explicit random seed.
	///
	/// Two models built with the same seed and fed the same calls in the
	/// same order produce identical output.
	///
	/// # Errors
	/// Returns [`ChainError::UnsupportedOrder`] unless `N` is 1 or 2.
	pub fn with_seed(seed: u64) -> Result<Self, ChainError> {
		if N == 0 || N > 2 {
			return Err(ChainError::UnsupportedOrder(N));
		}
		Ok(Self {
			transitions: HashMap::new(),
			rng: StdRng::seed_from_u64(seed),
		})
	}

	/// The context order of this model.
	pub fn order(&self) -> usize {
		N
	}

	/// Context representing the start of a sentence.
	pub(crate) fn sentinel_context() -> [String; N] {
		std::array::from_fn(|_| START_OF_SENTENCE.to_owned())
	}

	/// Slides `context` forward past `token`.
	///
	/// A sentence terminator resets the context to sentinels; any other
	/// token becomes the most recent element, dropping the oldest.
	pub(crate) fn advance_context(mut context: [String; N], token: &str) -> [String; N] {
		if tokenizer::is_sentence_terminator(token) {
			return Self::sentinel_context();
		}
		context.rotate_left(1);
		context[N - 1] = token.to_owned();
		context
	}

	/// Trains the model on one line of text.
	///
	/// The line is tokenized and walked left to right with a sliding
	/// context window starting at sentinels. Each valid token is
	/// recorded as an observation under the current context, then the
	/// window advances (resetting after sentence terminators).
	///
	/// Tokens containing unrecognized characters are skipped entirely:
	/// they are not recorded, do not become context, and leave the prior
	/// context in place for the next token. The offending characters are
	/// collected into the returned set, the only diagnostics channel
	/// during training.
	pub fn process_string(&mut self, line: &str) -> HashSet<char> {
		let mut unrecognized = HashSet::new();
		let mut context = Self::sentinel_context();

		for token in tokenizer::tokenize(line) {
			let invalid = tokenizer::invalid_characters(&token);
			if !invalid.is_empty() {
				unrecognized.extend(invalid);
				continue;
			}

			self.transitions
				.entry(context.clone())
				.or_insert_with(Distribution::new)
				.record(&token);

			context = Self::advance_context(context, &token);
		}

		unrecognized
	}

	/// Returns the probability of `target` following `context`.
	///
	/// An unseen context or target yields 0.0.
	pub fn follow_probability(&self, context: [&str; N], target: &str) -> f64 {
		let key = context.map(str::to_owned);
		self.transitions
			.get(&key)
			.map_or(0.0, |distribution| distribution.probability(target))
	}

	/// Selects the next word for `context` by weighted random sampling.
	///
	/// Returns `Ok(None)` if the context has no recorded continuations
	/// (a dead-end); callers decide how to react.
	///
	/// # Errors
	/// Returns [`ChainError::ProbabilityMassViolation`] if the context's
	/// probabilities no longer sum to 1.0.
	pub fn select_next_word(&mut self, context: [&str; N]) -> Result<Option<String>, ChainError> {
		let key = context.map(str::to_owned);
		self.sample_next(&key)
	}

	/// Sampling entry point shared with the story generator.
	pub(crate) fn sample_next(&mut self, context: &[String; N]) -> Result<Option<String>, ChainError> {
		match self.transitions.get(context) {
			None => Ok(None),
			Some(distribution) => distribution.sample(&mut self.rng).map(Some),
		}
	}

	/// Generates a story of at least `minimum_words` tokens.
	///
	/// Convenience wrapper over [`StoryGenerator`]; see there for the
	/// retry and termination contract.
	///
	/// # Errors
	/// Returns [`ChainError::InsufficientTrainingData`] when every
	/// attempt dead-ends, or [`ChainError::ProbabilityMassViolation`] on
	/// broken bookkeeping.
	pub fn generate_story(
		&mut self,
		minimum_words: usize,
		maximum_attempts: usize,
	) -> Result<String, ChainError> {
		StoryGenerator::new(self, minimum_words)
			.with_attempts(maximum_attempts)
			.generate()
	}

	/// Number of distinct contexts observed during training.
	pub fn context_count(&self) -> usize {
		self.transitions.len()
	}

	/// Total number of recorded transition observations.
	pub fn observation_count(&self) -> usize {
		self.transitions.values().map(Distribution::observations).sum()
	}

	#[cfg(test)]
	pub(crate) fn distributions(&self) -> impl Iterator<Item = &Distribution> {
		self.transitions.values()
	}
}
