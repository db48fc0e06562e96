use std::collections::HashSet;

/// Characters that separate words.
const WORD_DELIMITERS: [char; 2] = [' ', '&'];

/// Punctuation characters recognized as standalone tokens.
const PUNCTUATION: [char; 10] = ['.', ',', '!', '?', '\'', '"', '(', ')', '-', ';'];

/// Punctuation that ends a sentence (and resets the chain context).
const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Punctuation that attaches to the preceding word when assembling text.
const NO_LEADING_SPACE: [char; 6] = ['.', ',', '!', '?', '-', ';'];

/// Splits a line into word and punctuation tokens.
///
/// The line is first split on word delimiters (space and ampersand),
/// then each chunk is split again so that every punctuation character
/// becomes its own token, in sequence with the text it was attached to.
/// Consecutive punctuation characters become consecutive tokens.
///
/// No validation happens here; see [`invalid_characters`].
pub(crate) fn tokenize(line: &str) -> Vec<String> {
	line.split(WORD_DELIMITERS)
		.filter(|chunk| !chunk.is_empty())
		.flat_map(split_keeping_punctuation)
		.collect()
}

/// Splits a chunk immediately before and after each punctuation character.
fn split_keeping_punctuation(chunk: &str) -> Vec<String> {
	let mut tokens = Vec::new();
	let mut current = String::new();

	for c in chunk.chars() {
		if is_punctuation(c) {
			if !current.is_empty() {
				tokens.push(std::mem::take(&mut current));
			}
			tokens.push(c.to_string());
		} else {
			current.push(c);
		}
	}
	if !current.is_empty() {
		tokens.push(current);
	}

	tokens
}

/// Collects every character of `token` outside the recognized set.
///
/// Recognized characters are ASCII letters, digits, and the punctuation
/// in [`PUNCTUATION`]. The original tool accepted a handful of symbols
/// between 'Z' and 'a' through an over-wide regex range; this
/// implementation deliberately sticks to the strict set.
pub(crate) fn invalid_characters(token: &str) -> HashSet<char> {
	token.chars()
		.filter(|c| !c.is_ascii_alphanumeric() && !is_punctuation(*c))
		.collect()
}

/// Returns true if every character of `token` is recognized.
pub(crate) fn is_valid(token: &str) -> bool {
	token.chars().all(|c| c.is_ascii_alphanumeric() || is_punctuation(c))
}

fn is_punctuation(c: char) -> bool {
	PUNCTUATION.contains(&c)
}

/// Returns true if `token` is a sentence terminator (`.`, `!` or `?`).
pub(crate) fn is_sentence_terminator(token: &str) -> bool {
	let mut chars = token.chars();
	matches!(
		(chars.next(), chars.next()),
		(Some(c), None) if SENTENCE_TERMINATORS.contains(&c)
	)
}

/// Returns true if `token` must be appended without a preceding space.
pub(crate) fn no_leading_space(token: &str) -> bool {
	let mut chars = token.chars();
	matches!(
		(chars.next(), chars.next()),
		(Some(c), None) if NO_LEADING_SPACE.contains(&c)
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_on_spaces_and_ampersands() {
		assert_eq!(tokenize("fish & chips"), vec!["fish", "chips"]);
		assert_eq!(tokenize("one  two"), vec!["one", "two"]);
	}

	#[test]
	fn punctuation_becomes_standalone_tokens() {
		assert_eq!(tokenize("hello, world."), vec!["hello", ",", "world", "."]);
		assert_eq!(tokenize("wait..."), vec!["wait", ".", ".", "."]);
		assert_eq!(tokenize("'quoted'!"), vec!["'", "quoted", "'", "!"]);
	}

	#[test]
	fn empty_and_delimiter_only_lines_yield_no_tokens() {
		assert!(tokenize("").is_empty());
		assert!(tokenize("  & ").is_empty());
	}

	#[test]
	fn reports_unrecognized_characters() {
		assert_eq!(invalid_characters("@asdf"), HashSet::from(['@']));
		assert_eq!(invalid_characters("a#b#c%"), HashSet::from(['#', '%']));
		assert!(invalid_characters("plain42").is_empty());
	}

	#[test]
	fn strict_character_set_rejects_caret_range_symbols() {
		// '[' '\' ']' '^' '_' '`' sit between 'Z' and 'a' in ASCII and
		// slipped through the original validity check.
		for c in ['[', '\\', ']', '^', '_', '`'] {
			assert!(!is_valid(&c.to_string()), "{c} should be invalid");
		}
		assert!(is_valid("Word0"));
		assert!(is_valid(";"));
	}

	#[test]
	fn classifies_terminators_and_spacing() {
		for t in [".", "!", "?"] {
			assert!(is_sentence_terminator(t));
		}
		assert!(!is_sentence_terminator(","));
		assert!(!is_sentence_terminator("end."));

		for t in [".", ",", "!", "?", "-", ";"] {
			assert!(no_leading_space(t));
		}
		assert!(!no_leading_space("'"));
		assert!(!no_leading_space("word"));
	}
}
