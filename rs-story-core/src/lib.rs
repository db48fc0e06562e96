//! Word-level Markov chain text generation library.
//!
//! This crate provides a word-transition generation system including:
//! - Punctuation-aware word tokenization with character validation
//! - Incremental transition frequency tracking and probability derivation
//! - Seeded weighted-random next-word selection
//! - Sentence-aware story generation with bounded retry on dead-ends
//!
//! Only the high-level API is exposed publicly. Low-level components
//! are kept internal to ensure consistency and prevent misuse.

/// Core chain model and generation logic.
///
/// This module exposes the chain model and story generator interfaces
/// while keeping internal representations private.
pub mod model;

/// Error taxonomy shared across the crate.
pub mod error;

/// I/O utilities (corpus file loading).
///
/// Kept minimal: callers feed the model line by line and own all other I/O.
pub mod io;
