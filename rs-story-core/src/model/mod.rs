//! Top-level module for the word-transition generation system.
//!
//! This module provides a word-level Markov chain generator, including:
//! - The trainable chain model (`MarkovChain`)
//! - A sentence-aware story generator (`StoryGenerator`)
//! - Internal per-context frequency distributions (`Distribution`)
//! - Internal punctuation-aware tokenization (`tokenizer`)

/// Trainable word-transition model with a fixed context order.
///
/// Exposes training, probability queries, and seeded next-word selection.
pub mod chain;

/// Sentence-aware story assembly over a trained chain.
///
/// Exposes minimum-length generation with a bounded retry budget.
pub mod generator;

/// Internal per-context frequency distribution.
///
/// Tracks occurrence counts, derives probabilities, and supports
/// weighted random sampling. This module is not exposed publicly.
mod distribution;

/// Internal tokenizer splitting lines into word and punctuation tokens.
///
/// Handles character validation. This module is not exposed publicly.
mod tokenizer;
