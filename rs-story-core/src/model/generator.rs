use super::chain::MarkovChain;
use super::tokenizer;
use crate::error::ChainError;

/// Generation phase.
///
/// A dead-end with attempts remaining moves `Accumulating` through
/// `Retrying` back to `Accumulating` with all progress discarded; a
/// dead-end with the budget exhausted moves to `Failed`. Reaching the
/// minimum length on a sentence terminator moves to `Done`.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
	Accumulating,
	Retrying,
	Done,
	Failed,
}

/// Assembles a story by repeatedly sampling from a trained chain.
///
/// # Responsibilities
/// - Sample tokens starting from the sentinel context
/// - Join tokens with spaces, attaching trailing punctuation directly
/// - Keep sampling past the minimum until the sentence in progress ends
/// - Restart from scratch on dead-ends, up to a bounded attempt budget
///
/// The generator never stops mid-sentence: once `minimum_words` tokens
/// have been emitted, it still runs until a sentence terminator is
/// sampled.
#[derive(Debug)]
pub struct StoryGenerator<'a, const N: usize> {
	chain: &'a mut MarkovChain<N>,
	minimum_words: usize,
	maximum_attempts: usize,
}

impl<'a, const N: usize> StoryGenerator<'a, N> {
	/// Creates a generator with a single-attempt retry budget.
	pub fn new(chain: &'a mut MarkovChain<N>, minimum_words: usize) -> Self {
		Self {
			chain,
			minimum_words,
			maximum_attempts: 1,
		}
	}

	/// Sets the number of times a dead-ended story may be restarted.
	pub fn with_attempts(mut self, maximum_attempts: usize) -> Self {
		self.maximum_attempts = maximum_attempts;
		self
	}

	/// Runs the generation loop to completion.
	///
	/// # Errors
	/// - [`ChainError::InsufficientTrainingData`] when a dead-end is hit
	///   with no attempts remaining
	/// - [`ChainError::ProbabilityMassViolation`] when sampling itself
	///   fails, which indicates broken model bookkeeping
	pub fn generate(self) -> Result<String, ChainError> {
		let mut phase = Phase::Accumulating;
		let mut context = MarkovChain::<N>::sentinel_context();
		let mut story = String::new();
		let mut words_emitted = 0usize;
		let mut attempts_used = 0usize;

		loop {
			match phase {
				Phase::Accumulating => match self.chain.sample_next(&context)? {
					Some(token) => {
						if !story.is_empty() && !tokenizer::no_leading_space(&token) {
							story.push(' ');
						}
						story.push_str(&token);
						words_emitted += 1;

						let terminated = tokenizer::is_sentence_terminator(&token);
						context = MarkovChain::<N>::advance_context(context, &token);

						if words_emitted >= self.minimum_words && terminated {
							phase = Phase::Done;
						}
					}
					None => {
						phase = if attempts_used < self.maximum_attempts {
							Phase::Retrying
						} else {
							Phase::Failed
						};
					}
				},
				Phase::Retrying => {
					attempts_used += 1;
					context = MarkovChain::<N>::sentinel_context();
					story.clear();
					words_emitted = 0;
					phase = Phase::Accumulating;
				}
				Phase::Done => return Ok(story),
				Phase::Failed => {
					return Err(ChainError::InsufficientTrainingData {
						attempts: attempts_used,
					});
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::chain::UnigramChain;

	fn trained(seed: u64, lines: &[&str]) -> UnigramChain {
		let mut chain = MarkovChain::with_seed(seed).unwrap();
		for line in lines {
			chain.process_string(line);
		}
		chain
	}

	#[test]
	fn reproduces_a_single_sentence_corpus() {
		let mut chain = trained(3, &["the quick brown fox."]);

		// Every context has exactly one continuation, so the only
		// possible story is the training sentence itself.
		let story = chain.generate_story(1, 1).unwrap();
		assert_eq!(story, "the quick brown fox.");
	}

	#[test]
	fn attaches_punctuation_without_leading_space() {
		let mut chain = trained(0, &["well, that went fine; mostly."]);

		let story = chain.generate_story(1, 1).unwrap();
		assert_eq!(story, "well, that went fine; mostly.");
	}

	#[test]
	fn overruns_to_the_end_of_the_sentence() {
		let mut chain = trained(0, &["alpha beta gamma delta."]);

		// Minimum reached at "beta", but the sentence must still finish.
		let story = chain.generate_story(2, 1).unwrap();
		assert_eq!(story, "alpha beta gamma delta.");
	}

	#[test]
	fn minimum_word_count_spans_sentences() {
		let mut chain = trained(0, &["loop again."]);

		// The corpus cycles: after "." the context resets and the only
		// sentence start is "loop".
		let story = chain.generate_story(5, 1).unwrap();
		assert_eq!(story, "loop again. loop again.");
	}

	#[test]
	fn fails_with_insufficient_training_data_on_dead_end() {
		// No terminator, so "here" is a dead-end in every attempt.
		let mut chain = trained(0, &["no ending here"]);

		let error = chain.generate_story(50, 3).unwrap_err();
		assert_eq!(error, ChainError::InsufficientTrainingData { attempts: 3 });
	}

	#[test]
	fn empty_model_exhausts_its_budget_immediately() {
		let mut chain: UnigramChain = MarkovChain::with_seed(0).unwrap();

		let error = chain.generate_story(1, 2).unwrap_err();
		assert_eq!(error, ChainError::InsufficientTrainingData { attempts: 2 });
	}

	#[test]
	fn retries_recover_from_a_dead_end_branch() {
		// From "fork" the chain can reach either "stop." or the
		// dead-end "nowhere"; with a generous budget some attempt must
		// come out through the terminating branch.
		let mut chain = trained(11, &["fork stop.", "fork nowhere"]);

		let story = chain.generate_story(1, 1000).unwrap();
		assert_eq!(story, "fork stop.");
	}

	#[test]
	fn generator_builder_defaults_to_one_attempt() {
		let mut chain: UnigramChain = MarkovChain::with_seed(0).unwrap();

		let error = StoryGenerator::new(&mut chain, 1).generate().unwrap_err();
		assert_eq!(error, ChainError::InsufficientTrainingData { attempts: 1 });
	}
}
