use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::char_data::WindowStats;

/// Character-level Markov-chain language model with a fixed window length.
///
/// The model maps every window (fixed-length string of preceding characters)
/// to the statistics of the characters observed after it, and owns the
/// random source used for generation.
///
/// # Responsibilities
/// - Build the window-to-statistics map from a character stream
/// - Compute per-window probability tables once training is done
/// - Generate text by weighted sampling over the trailing window's table
///
/// # Invariants
/// - Every key in `windows` has exactly `window_length` characters
/// - Every `WindowStats` holds at least one entry
/// - The random source is owned and advances only during generation
///
/// # Silent degradation (by contract, not oversight)
/// - A corpus shorter than the window length trains an empty model
/// - An initial text shorter than the window length is returned unchanged
/// - An unknown trailing window stops generation and returns the partial text
#[derive(Debug)]
pub struct LanguageModel {
	/// The window length used by this model (in characters).
	window_length: usize,

	/// Mapping from a window to its next-character statistics.
	windows: HashMap<String, WindowStats>,

	/// The random source used by this model, owned so that generation can be
	/// made reproducible by seeding.
	rng: StdRng,
}

impl LanguageModel {
	/// Creates a model with the given window length, seeded from OS entropy.
	///
	/// Generating texts from this model multiple times will produce
	/// different random texts.
	///
	/// # Errors
	/// Returns an error if `window_length` is 0.
	pub fn new(window_length: usize) -> Result<Self, String> {
		Self::build(window_length, StdRng::from_os_rng())
	}

	/// Creates a model with the given window length and seed.
	///
	/// Generating texts from this model multiple times with the same seed
	/// value (and the same training data) will produce the same random
	/// texts. Good for debugging.
	///
	/// # Errors
	/// Returns an error if `window_length` is 0.
	pub fn with_seed(window_length: usize, seed: u64) -> Result<Self, String> {
		Self::build(window_length, StdRng::seed_from_u64(seed))
	}

	fn build(window_length: usize, rng: StdRng) -> Result<Self, String> {
		if window_length < 1 {
			return Err("Window length must be >= 1".to_owned());
		}
		Ok(Self {
			window_length,
			windows: HashMap::new(),
			rng,
		})
	}

	/// The window length used by this model.
	pub fn window_length(&self) -> usize {
		self.window_length
	}

	/// True if the model holds no trained window.
	pub fn is_empty(&self) -> bool {
		self.windows.is_empty()
	}

	/// The statistics for one window, if it was ever observed.
	pub fn window_stats(&self, window: &str) -> Option<&WindowStats> {
		self.windows.get(window)
	}

	/// Iterates over every window's statistics.
	///
	/// Iteration order across windows is unspecified; only the order within
	/// one window's entry list is meaningful (first-observation order).
	pub fn windows(&self) -> impl Iterator<Item = &WindowStats> {
		self.windows.values()
	}

	/// Trains the model on a character stream.
	///
	/// Reads the first `window_length` characters as the initial window,
	/// then for each further character records it against the current window
	/// and slides the window forward. After the stream is exhausted, the
	/// initial window's characters are fed through the same update loop, so
	/// the tail of the corpus links back to its head and every character
	/// position contributes a training pair.
	///
	/// Finishes by computing the probability tables of every window.
	///
	/// # Notes
	/// - A stream shorter than `window_length` trains nothing, silently.
	/// - Training the same model again accumulates counts into the existing
	///   tables; the probability pass re-runs at the end of every call.
	pub fn train<I>(&mut self, source: I)
	where
		I: IntoIterator<Item = char>,
	{
		let mut chars = source.into_iter();

		let mut window = String::new();
		for _ in 0..self.window_length {
			match chars.next() {
				Some(c) => window.push(c),
				// Corpus shorter than the window: no training pairs exist.
				None => return,
			}
		}

		let prefix = window.clone();

		for c in chars {
			self.observe(&mut window, c);
		}

		// Wrap the stream cyclically: the initial window's characters are
		// treated as the continuation of the corpus.
		for c in prefix.chars() {
			self.observe(&mut window, c);
		}

		for stats in self.windows.values_mut() {
			stats.calculate_probabilities();
		}
	}

	/// Records one (window, next character) pair and slides the window.
	fn observe(&mut self, window: &mut String, c: char) {
		let stats = self
			.windows
			.entry(window.clone())
			.or_insert_with(|| WindowStats::new(window));
		stats.observe(c);

		// remove(0) drops the first character, not the first byte.
		window.remove(0);
		window.push(c);
	}

	/// Generates a random text based on the probabilities learned during
	/// training.
	///
	/// Starts from `initial_text` and appends sampled characters until the
	/// text reaches `target_length` characters. If the trailing window of
	/// the current text was never trained, generation stops and the partial
	/// text is returned as-is.
	///
	/// If `initial_text` is shorter than the window length, it is returned
	/// unchanged (no valid window can be formed).
	pub fn generate(&mut self, initial_text: &str, target_length: usize) -> String {
		let mut length = initial_text.chars().count();
		if length < self.window_length {
			return initial_text.to_owned();
		}

		let mut text = initial_text.to_owned();
		let mut window = last_n_chars(&text, self.window_length);

		while length < target_length {
			let stats = match self.windows.get(&window) {
				Some(stats) => stats,
				None => return text,
			};

			let r = self.rng.random::<f64>();
			let c = match stats.sample(r) {
				Some(c) => c,
				None => return text,
			};

			text.push(c);
			length += 1;
			window.remove(0);
			window.push(c);
		}

		text
	}
}

/// Returns the last `n` characters of a string.
///
/// If `n` is greater than the number of characters in `s`, the entire
/// string is returned. Handles UTF-8 correctly (multibyte characters).
fn last_n_chars(s: &str, n: usize) -> String {
	if n > s.chars().count() {
		return s.to_owned();
	}
	s.chars()
		.rev()
		.take(n)
		.collect::<Vec<_>>()
		.into_iter()
		.rev()
		.collect()
}

impl fmt::Display for LanguageModel {
	/// Debugging dump: one line per window, `"<window> : <list-repr>"`.
	///
	/// Not a stable machine format; window order is unspecified.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for stats in self.windows.values() {
			writeln!(f, "{} : {}", stats.key(), stats)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn trained(window_length: usize, seed: u64, corpus: &str) -> LanguageModel {
		let mut model = LanguageModel::with_seed(window_length, seed).unwrap();
		model.train(corpus.chars());
		model
	}

	fn counts_of(model: &LanguageModel, window: &str) -> Vec<(char, usize)> {
		model
			.window_stats(window)
			.unwrap()
			.entries()
			.iter()
			.map(|e| (e.character, e.count))
			.collect()
	}

	#[test]
	fn zero_window_length_is_rejected() {
		assert!(LanguageModel::new(0).is_err());
		assert!(LanguageModel::with_seed(0, 7).is_err());
		assert!(LanguageModel::new(1).is_ok());
	}

	#[test]
	fn corpus_shorter_than_window_trains_nothing() {
		let model = trained(3, 0, "ab");
		assert!(model.is_empty());
		assert_eq!(model.window_length(), 3);
	}

	#[test]
	fn windowed_counting_on_aab_with_wrap() {
		// Corpus "aab", window length 1, treated cyclically:
		// pairs are a->a, a->b, then the wrapped b->a.
		let model = trained(1, 0, "aab");

		assert_eq!(counts_of(&model, "a"), vec![('a', 1), ('b', 1)]);
		assert_eq!(counts_of(&model, "b"), vec![('a', 1)]);
	}

	#[test]
	fn every_window_is_normalized_after_training() {
		let model = trained(2, 0, "the quick brown fox jumps over the lazy dog");

		assert!(!model.is_empty());
		for stats in model.windows() {
			let sum: f64 = stats.entries().iter().map(|e| e.probability).sum();
			assert!((sum - 1.0).abs() < 1e-9, "window {:?} sums to {}", stats.key(), sum);

			let mut previous = 0.0;
			for entry in stats.entries() {
				assert!(entry.cumulative_probability >= previous);
				previous = entry.cumulative_probability;
			}
			assert!((previous - 1.0).abs() < 1e-9);
		}
	}

	#[test]
	fn generation_is_deterministic_for_a_fixed_seed() {
		let corpus = "to be or not to be that is the question";
		let mut first = trained(3, 42, corpus);
		let mut second = trained(3, 42, corpus);

		assert_eq!(first.generate("to ", 60), second.generate("to ", 60));
	}

	#[test]
	fn single_cycle_corpus_generates_its_own_loop() {
		// "ab" with window 1 wraps into a->b and b->a, so every window has
		// exactly one successor and generation is fully forced.
		let mut model = trained(1, 123, "ab");
		assert_eq!(model.generate("a", 10), "ababababab");
	}

	#[test]
	fn short_initial_text_is_returned_unchanged() {
		let mut model = trained(3, 0, "abcabcabc");
		assert_eq!(model.generate("ab", 50), "ab");
		assert_eq!(model.generate("", 50), "");
	}

	#[test]
	fn unknown_window_truncates_generation() {
		let mut model = trained(2, 0, "abcabcabc");
		// "xy" forms a valid-length window that was never trained.
		let out = model.generate("xy", 20);
		assert_eq!(out, "xy");
		assert!(out.chars().count() < 20);
	}

	#[test]
	fn generated_length_stays_within_bounds() {
		let mut model = trained(2, 9, "abcabcabc");

		let out = model.generate("ab", 15);
		assert!(out.chars().count() <= 15);
		assert!(out.chars().count() >= 2);

		// Target already reached: nothing is appended.
		let out = model.generate("abcabc", 3);
		assert_eq!(out, "abcabc");
	}

	#[test]
	fn retraining_accumulates_counts() {
		let mut model = LanguageModel::with_seed(1, 0).unwrap();
		model.train("aab".chars());
		model.train("aab".chars());

		assert_eq!(counts_of(&model, "a"), vec![('a', 2), ('b', 2)]);
		assert_eq!(counts_of(&model, "b"), vec![('a', 2)]);

		// The probability pass re-ran, so the invariants still hold.
		let stats = model.window_stats("a").unwrap();
		let last = stats.entries().last().unwrap();
		assert!((last.cumulative_probability - 1.0).abs() < 1e-9);
	}

	#[test]
	fn multibyte_characters_slide_correctly() {
		// "éa" with window 1 wraps into é->a and a->é.
		let mut model = trained(1, 5, "éa");
		assert_eq!(model.generate("é", 4), "éaéa");
	}

	#[test]
	fn display_dumps_one_line_per_window() {
		let model = trained(1, 0, "ab");

		let dump = format!("{}", model);
		let mut lines: Vec<&str> = dump.lines().collect();
		lines.sort();

		assert_eq!(
			lines,
			vec!["a : (b 1 1.0000 1.0000)", "b : (a 1 1.0000 1.0000)"]
		);
	}

	#[test]
	fn last_n_chars_is_utf8_aware() {
		assert_eq!(last_n_chars("héllo", 3), "llo");
		assert_eq!(last_n_chars("héllo", 4), "éllo");
		assert_eq!(last_n_chars("ab", 5), "ab");
	}
}
