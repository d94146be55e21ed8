use std::sync::mpsc;
use std::thread;

use log::debug;

use serde::{Deserialize, Serialize};

use super::chain_model::ChainModel;
use super::context::{Context, is_terminal};
use crate::{Error, Result};

/// Which token pairs are registered as sentence starters.
///
/// # Variants
/// - `LineStart`: only the first two tokens of each line (with at least
///   three tokens). Terminal punctuation in the middle of a line never
///   registers a new starter.
/// - `Boundary`: the first pair of each line, plus the pair following
///   each standalone terminal token inside a line.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StarterPolicy {
	#[default]
	LineStart,
	Boundary,
}

/// Incrementally builds a [`ChainModel`] from corpus lines.
///
/// # Behavior
/// Each line is split on whitespace, then a three-token window slides
/// over it: `(w1, w2) -> w3` is recorded for every position. Lines with
/// fewer than three tokens add no transition and no starter.
#[derive(Debug, Default)]
pub struct ModelBuilder {
	model: ChainModel,
}

impl ModelBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a builder registering starters according to `starter_policy`.
	pub fn with_starter_policy(starter_policy: StarterPolicy) -> Self {
		Self {
			model: ChainModel::new(starter_policy),
		}
	}

	pub fn starter_policy(&self) -> StarterPolicy {
		self.model.starter_policy()
	}

	/// Adds one corpus line to the model.
	pub fn add_line(&mut self, line: &str) {
		let words: Vec<&str> = line.split_whitespace().collect();
		self.model.record_line(&words);

		let rearm_on_terminal = self.starter_policy() == StarterPolicy::Boundary;
		let mut end_of_sentence = true;

		for window in words.windows(3) {
			let context = Context::new(window[0], window[1]);

			if end_of_sentence {
				self.model.push_starter(context.clone());
				end_of_sentence = false;
			}

			// The next window starts right after a terminal token.
			if rearm_on_terminal && is_terminal(window[0]) {
				end_of_sentence = true;
			}

			self.model.push_transition(context, window[2]);
		}
	}

	/// Adds every line of `lines`, in order.
	pub fn add_lines<I, S>(&mut self, lines: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for line in lines {
			self.add_line(line.as_ref());
		}
	}

	/// Finishes the build. The returned model is never mutated again.
	pub fn build(self) -> ChainModel {
		debug!(
			"Built model: {} contexts, {} starters",
			self.model.transition_count(),
			self.model.starter_count()
		);
		self.model
	}

	/// Builds `lines` on worker threads and merges the partial models.
	///
	/// # Behavior
	/// - Splits the lines into ordered chunks (based on CPU cores * factor).
	/// - Spawns one thread per chunk, each building a partial model.
	/// - Merges the partial models in chunk order, so the result is the
	///   same as feeding the lines one by one with [`ModelBuilder::add_line`].
	///
	/// # Errors
	/// Returns [`Error::Worker`] if a thread died before sending its model.
	pub fn build_parallel(mut self, lines: Vec<String>) -> Result<ChainModel> {
		if lines.is_empty() {
			return Ok(self.build());
		}

		let starter_policy = self.starter_policy();
		let cpus = num_cpus::get();
		let factor = 8;
		let chunks = cpus * factor;
		let chunk_size = lines.len().div_ceil(chunks).max(1);

		let (tx, rx) = mpsc::channel();
		let mut spawned = 0;
		for (index, chunk) in lines.chunks(chunk_size).enumerate() {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();

			thread::spawn(move || {
				let mut partial = ModelBuilder::with_starter_policy(starter_policy);
				partial.add_lines(&chunk);
				// The receiver only hangs up after every chunk arrived.
				let _ = tx.send((index, partial.model));
			});
			spawned += 1;
		}
		drop(tx);

		let mut partials: Vec<(usize, ChainModel)> = rx.iter().collect();
		if partials.len() != spawned {
			return Err(Error::Worker(format!(
				"{} of {} chunks were not built",
				spawned - partials.len(),
				spawned
			)));
		}
		partials.sort_by_key(|(index, _)| *index);

		for (_, partial) in &partials {
			self.model.merge(partial)?;
		}

		debug!("Merged {} partial models", spawned);
		Ok(self.build())
	}
}

/// Builds a model from `lines` with the default [`StarterPolicy::LineStart`].
pub fn build_model<I, S>(lines: I) -> ChainModel
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut builder = ModelBuilder::new();
	builder.add_lines(lines);
	builder.build()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn candidates<'a>(model: &'a ChainModel, first: &str, second: &str) -> Option<&'a [String]> {
		model.followers(&Context::new(first, second)).map(|f| f.candidates())
	}

	#[test]
	fn sliding_window_crosses_terminal_tokens() {
		let model = build_model(["The cat sat . The dog ran ."]);

		assert_eq!(model.starters(), [Context::new("The", "cat")]);
		assert_eq!(candidates(&model, "The", "cat"), Some(&["sat".to_owned()][..]));
		assert_eq!(candidates(&model, "cat", "sat"), Some(&[".".to_owned()][..]));
		assert_eq!(candidates(&model, "sat", "."), Some(&["The".to_owned()][..]));
		assert_eq!(candidates(&model, ".", "The"), Some(&["dog".to_owned()][..]));
		assert_eq!(candidates(&model, "The", "dog"), Some(&["ran".to_owned()][..]));
		assert_eq!(candidates(&model, "dog", "ran"), Some(&[".".to_owned()][..]));
		assert_eq!(candidates(&model, "ran", "."), None);
		assert_eq!(model.transition_count(), 6);
	}

	#[test]
	fn each_line_opens_a_sentence() {
		let model = build_model(["one two three", "four five six seven"]);
		assert_eq!(model.starters(), [Context::new("one", "two"), Context::new("four", "five")]);
	}

	#[test]
	fn line_start_policy_ignores_mid_line_punctuation() {
		let model = build_model(["Hi there you ! Go away now ? Fine then ok"]);
		assert_eq!(model.starters(), [Context::new("Hi", "there")]);
	}

	#[test]
	fn boundary_policy_registers_pairs_after_terminals() {
		let mut builder = ModelBuilder::with_starter_policy(StarterPolicy::Boundary);
		builder.add_line("Hi there you ! Go away now ? Fine then ok");
		let model = builder.build();

		assert_eq!(
			model.starters(),
			[Context::new("Hi", "there"), Context::new("Go", "away"), Context::new("Fine", "then")]
		);
	}

	#[test]
	fn boundary_policy_needs_a_following_pair() {
		let mut builder = ModelBuilder::with_starter_policy(StarterPolicy::Boundary);
		builder.add_line("We are done . Bye");
		let model = builder.build();

		// "Bye" alone cannot seed a message.
		assert_eq!(model.starters(), [Context::new("We", "are")]);
	}

	#[test]
	fn duplicates_are_preserved() {
		let model = build_model(["a b c", "a b c", "a b d"]);
		assert_eq!(
			candidates(&model, "a", "b"),
			Some(&["c".to_owned(), "c".to_owned(), "d".to_owned()][..])
		);
		assert_eq!(model.starter_count(), 3);
	}

	#[test]
	fn short_lines_contribute_nothing() {
		let model = build_model(["", "   ", "one", "one two"]);
		assert!(model.is_empty());
		assert_eq!(model.starter_count(), 0);
		assert_eq!(model.transition_count(), 0);
	}

	#[test]
	fn empty_corpus_gives_empty_model() {
		let model = build_model(Vec::<String>::new());
		assert!(model.is_empty());
	}

	#[test]
	fn every_mapped_context_has_candidates() {
		let model = build_model(["x y z w", "y z y z y", "? ! . ? !"]);
		for (_, candidates) in model.sorted_transitions() {
			assert!(!candidates.is_empty());
		}
	}

	#[test]
	fn building_twice_is_idempotent() {
		let corpus = ["The cat sat . The dog ran .", "The cat ran off .", "Dogs bark loudly !"];
		assert_eq!(build_model(corpus), build_model(corpus));
	}

	#[test]
	fn parallel_build_matches_sequential_build() {
		let lines: Vec<String> = (0..500)
			.map(|i| format!("w{} w{} w{} . w{} w{}", i % 7, i % 5, i % 3, i % 11, i % 2))
			.collect();

		let sequential = build_model(&lines);
		let parallel = ModelBuilder::new().build_parallel(lines).unwrap();

		assert_eq!(parallel, sequential);
	}

	#[test]
	fn parallel_build_of_nothing_is_empty() {
		let model = ModelBuilder::new().build_parallel(Vec::new()).unwrap();
		assert!(model.is_empty());
	}
}
