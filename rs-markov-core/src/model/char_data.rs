use std::fmt;

use serde::{Deserialize, Serialize};

/// One observed next character for a given window.
///
/// `count` is accumulated during training; `probability` and
/// `cumulative_probability` stay at 0.0 until
/// [`WindowStats::calculate_probabilities`] runs after training.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CharData {
	/// The observed next character.
	pub character: char,
	/// How many times this character followed the window during training.
	pub count: usize,
	/// `count / total count for the window`. Computed, not trained.
	pub probability: f64,
	/// Running sum of `probability` over the window's list, in list order.
	pub cumulative_probability: f64,
}

impl CharData {
	/// Creates a fresh record for a first observation of `character`.
	pub(crate) fn new(character: char) -> Self {
		Self {
			character,
			count: 1,
			probability: 0.0,
			cumulative_probability: 0.0,
		}
	}
}

impl fmt::Display for CharData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"({} {} {:.4} {:.4})",
			self.character, self.count, self.probability, self.cumulative_probability
		)
	}
}

/// Statistics for a single window of the model.
///
/// A `WindowStats` corresponds to one fixed-length window (`key`) and stores
/// all observed transitions from this window to the next character, in the
/// order the characters were first observed.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities
/// - Accumulate next-character occurrences during training
/// - Turn counts into probability and cumulative-probability tables
/// - Pick the next character by weighted sampling over the cumulative table
///
/// ## Invariants
/// - All entries belong to the same `key`
/// - No two entries share a character
/// - Each entry count is strictly positive
/// - Once calculated, probabilities sum to 1.0 and the cumulative column is
///   non-decreasing, ending at 1.0 (both within floating-point tolerance)
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WindowStats {
	/// Identifier of the stats (the fixed-length window).
	key: String,
	/// Observed next characters, in first-observation order.
	entries: Vec<CharData>,
}

impl WindowStats {
	/// Creates new empty statistics for the given window.
	pub(crate) fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			entries: Vec::new(),
		}
	}

	/// The window this statistics list belongs to.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// The per-character records, in first-observation order.
	pub fn entries(&self) -> &[CharData] {
		&self.entries
	}

	/// Records an occurrence of `next_char` after this window.
	///
	/// - If the character was already observed, its count is increased.
	/// - Otherwise, a new record is appended with an initial count of 1.
	pub(crate) fn observe(&mut self, next_char: char) {
		match self.entries.iter_mut().find(|e| e.character == next_char) {
			Some(entry) => entry.count += 1,
			None => self.entries.push(CharData::new(next_char)),
		}
	}

	/// Computes the probability and cumulative-probability columns from the
	/// accumulated counts.
	///
	/// An empty list is a no-op. Otherwise, in list order:
	/// - `probability = count / total count`
	/// - `cumulative_probability = previous cumulative + probability`
	///
	/// Must run once per window after training, before any generation.
	pub(crate) fn calculate_probabilities(&mut self) {
		if self.entries.is_empty() {
			return;
		}

		let total: usize = self.entries.iter().map(|e| e.count).sum();

		let mut cumulative = 0.0;
		for entry in &mut self.entries {
			entry.probability = entry.count as f64 / total as f64;
			cumulative += entry.probability;
			entry.cumulative_probability = cumulative;
		}
	}

	/// Picks the next character by weighted sampling.
	///
	/// `r` must be a uniform draw from `[0, 1)`; the caller owns the random
	/// source. The list is scanned in order and the first entry whose
	/// cumulative probability exceeds `r` wins.
	///
	/// When rounding leaves `r` at or beyond the last cumulative value, the
	/// last entry's character is returned instead of failing.
	///
	/// Returns `None` only if the list is empty.
	pub(crate) fn sample(&self, r: f64) -> Option<char> {
		for entry in &self.entries {
			if entry.cumulative_probability > r {
				return Some(entry.character);
			}
		}

		// Floating-point edge: r landed past every cumulative value.
		self.entries.last().map(|e| e.character)
	}
}

impl fmt::Display for WindowStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, entry) in self.entries.iter().enumerate() {
			if i > 0 {
				write!(f, " ")?;
			}
			write!(f, "{}", entry)?;
		}
		Ok(())
	}
}
