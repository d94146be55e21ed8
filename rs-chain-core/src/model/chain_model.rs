use std::collections::{HashMap, HashSet};
use std::path::Path;

use log::{debug, info};

use serde::{Deserialize, Serialize};

use super::builder::{ModelBuilder, StarterPolicy};
use super::context::Context;
use super::followers::Followers;
use crate::io::{CorpusPaths, read_corpus_lines};
use crate::{Error, Result};

/// A second-order Markov chain over whitespace-delimited tokens.
///
/// This struct holds:
/// - `transitions`: the transition map, from a two-token context to the
///   tokens observed right after it.
/// - `starters`: the starter registry, contexts that opened a sentence.
/// - `lines`: every corpus line with at least one token, whitespace
///   normalized (used to avoid re-generating a line verbatim).
/// - `corpus_names`: names of the corpus files loaded from disk.
///
/// A model is only filled by a [`ModelBuilder`] (or by merging models).
/// Once built it is never mutated by generation, so it can be shared
/// between threads and reused for any number of messages.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ChainModel {
	starter_policy: StarterPolicy,
	transitions: HashMap<Context, Followers>,
	starters: Vec<Context>,
	lines: HashSet<String>,
	#[serde(skip)]
	corpus_names: Vec<String>,
}

impl ChainModel {
	/// Returns an empty model whose starters follow `starter_policy`.
	pub fn new(starter_policy: StarterPolicy) -> Self {
		Self {
			starter_policy,
			..Self::default()
		}
	}

	/// Loads the model of a corpus file.
	///
	/// - `filepath` is the corpus text file, one or more sentences per line.
	/// - If `<stem>.bin` exists next to it and was built with the same
	///   starter policy, it is decoded with `postcard` instead of re-reading
	///   the corpus.
	/// - Otherwise the corpus is built in parallel and the cache is
	///   (re)written.
	pub fn load_or_build<P: AsRef<Path>>(filepath: P, starter_policy: StarterPolicy) -> Result<Self> {
		let paths = CorpusPaths::of(&filepath)?;
		let binary_data_path = &paths.cache;
		let mut model = None;

		if binary_data_path.exists() {
			let bytes = std::fs::read(binary_data_path)?;
			let cached: ChainModel = postcard::from_bytes(&bytes)?;
			if cached.starter_policy == starter_policy {
				info!("Loaded cached model {}", binary_data_path.display());
				model = Some(cached);
			} else {
				info!(
					"Cached model {} uses {:?} starters, rebuilding with {:?}",
					binary_data_path.display(),
					cached.starter_policy,
					starter_policy
				);
			}
		}

		let mut model = match model {
			Some(model) => model,
			None => Self::build_corpus_file(&filepath, binary_data_path, starter_policy)?,
		};
		model.corpus_names.push(paths.name);
		Ok(model)
	}

	/// Reads a corpus file, builds its model in parallel and writes the cache.
	fn build_corpus_file<PF, PB>(
		filename: PF,
		binary_data_path: PB,
		starter_policy: StarterPolicy,
	) -> Result<ChainModel>
	where
		PF: AsRef<Path>,
		PB: AsRef<Path>,
	{
		let lines = read_corpus_lines(&filename)?;
		info!("Building model from {} ({} lines)", filename.as_ref().display(), lines.len());

		let model = ModelBuilder::with_starter_policy(starter_policy).build_parallel(lines)?;

		let bytes = postcard::to_stdvec(&model)?;
		std::fs::write(&binary_data_path, bytes)?;
		debug!("Wrote model cache {}", binary_data_path.as_ref().display());

		Ok(model)
	}

	pub fn starter_policy(&self) -> StarterPolicy {
		self.starter_policy
	}

	/// Followers of `context`, or `None` if the context was never seen
	/// followed by a third token.
	pub fn followers(&self, context: &Context) -> Option<&Followers> {
		self.transitions.get(context)
	}

	/// The starter registry, in registration order.
	pub fn starters(&self) -> &[Context] {
		&self.starters
	}

	/// Number of distinct contexts in the transition map.
	pub fn transition_count(&self) -> usize {
		self.transitions.len()
	}

	pub fn starter_count(&self) -> usize {
		self.starters.len()
	}

	/// `true` if the corpus produced neither a transition nor a starter.
	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty() && self.starters.is_empty()
	}

	/// Names of the corpus files this model was loaded from.
	pub fn corpus_names(&self) -> &[String] {
		&self.corpus_names
	}

	/// Returns `true` if `text` is, token for token, a line of the corpus.
	pub fn contains_line(&self, text: &str) -> bool {
		let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
		self.lines.contains(&normalized)
	}

	/// All transitions sorted by context, for inspection and dumps.
	pub fn sorted_transitions(&self) -> Vec<(&Context, &[String])> {
		let mut entries: Vec<(&Context, &[String])> = self
			.transitions
			.iter()
			.map(|(context, followers)| (context, followers.candidates()))
			.collect();
		entries.sort_by(|a, b| a.0.cmp(b.0));
		entries
	}

	pub(crate) fn push_starter(&mut self, context: Context) {
		self.starters.push(context);
	}

	pub(crate) fn push_transition(&mut self, context: Context, next: &str) {
		self.transitions
			.entry(context)
			.or_insert_with_key(|context| Followers::new(context.clone()))
			.push(next);
	}

	pub(crate) fn record_line(&mut self, words: &[&str]) {
		if !words.is_empty() {
			self.lines.insert(words.join(" "));
		}
	}

	/// Merges another model into this one.
	///
	/// This is the explicit way to accumulate several corpora into a
	/// single model:
	/// - starters of `other` are appended after the ones of `self`
	/// - candidates of shared contexts are appended, new contexts are cloned
	/// - corpus lines and corpus names are added
	///
	/// # Errors
	/// Returns [`Error::InvalidInput`] if the starter policies differ, since
	/// the resulting registry would mix two definitions of a sentence start.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.starter_policy != other.starter_policy {
			return Err(Error::InvalidInput(format!(
				"Starter policy mismatch: self={:?}, other={:?}",
				self.starter_policy, other.starter_policy
			)));
		}

		for (context, followers) in &other.transitions {
			if let Some(existing) = self.transitions.get_mut(context) {
				existing.merge(followers)?;
			} else {
				self.transitions.insert(context.clone(), followers.clone());
			}
		}

		self.starters.extend(other.starters.iter().cloned());
		self.lines.extend(other.lines.iter().cloned());
		self.corpus_names.extend(other.corpus_names.iter().cloned());

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;
	use crate::model::builder::build_model;

	#[test]
	fn merge_accumulates_both_corpora() {
		let mut left = build_model(["The cat sat on the mat ."]);
		let right = build_model(["The cat ran away fast ."]);
		left.merge(&right).unwrap();

		assert_eq!(left.starters(), [Context::new("The", "cat"), Context::new("The", "cat")]);
		let followers = left.followers(&Context::new("The", "cat")).unwrap();
		assert_eq!(followers.candidates(), ["sat", "ran"]);
		assert!(left.contains_line("The cat ran away fast ."));
		assert!(left.contains_line("The cat sat on the mat ."));
	}

	#[test]
	fn merge_rejects_mixed_starter_policies() {
		let mut left = ChainModel::new(StarterPolicy::LineStart);
		let right = ChainModel::new(StarterPolicy::Boundary);
		assert!(matches!(left.merge(&right), Err(Error::InvalidInput(_))));
	}

	#[test]
	fn contains_line_ignores_spacing() {
		let model = build_model(["  The   cat sat  "]);
		assert!(model.contains_line("The cat sat"));
		assert!(!model.contains_line("The cat"));
	}

	#[test]
	fn sorted_transitions_are_ordered_by_context() {
		let model = build_model(["b c d", "a b c"]);
		let contexts: Vec<String> = model
			.sorted_transitions()
			.into_iter()
			.map(|(context, _)| context.to_string())
			.collect();
		assert_eq!(contexts, ["a b", "b c"]);
	}

	#[test]
	fn load_or_build_writes_and_reuses_the_cache() {
		let dir = tempfile::tempdir().unwrap();
		let corpus = dir.path().join("simple.txt");
		fs::write(&corpus, "The cat sat . The dog ran .\nA bird flew by .\n").unwrap();

		let built = ChainModel::load_or_build(&corpus, StarterPolicy::LineStart).unwrap();
		let cache = dir.path().join("simple.bin");
		assert!(cache.exists());
		assert_eq!(built.corpus_names(), ["simple"]);

		// Once cached, the corpus itself is no longer read.
		fs::write(&corpus, "").unwrap();
		let cached = ChainModel::load_or_build(&corpus, StarterPolicy::LineStart).unwrap();
		assert_eq!(cached, built);
		assert_eq!(cached.starter_count(), 2);
	}

	#[test]
	fn load_or_build_rebuilds_on_policy_change() {
		let dir = tempfile::tempdir().unwrap();
		let corpus = dir.path().join("simple.txt");
		fs::write(&corpus, "The cat sat . The dog ran .\n").unwrap();

		let line_start = ChainModel::load_or_build(&corpus, StarterPolicy::LineStart).unwrap();
		let boundary = ChainModel::load_or_build(&corpus, StarterPolicy::Boundary).unwrap();

		assert_eq!(line_start.starter_count(), 1);
		assert_eq!(boundary.starter_count(), 2);
		assert_eq!(boundary.starter_policy(), StarterPolicy::Boundary);
	}

	#[test]
	fn load_or_build_reports_missing_corpus() {
		let dir = tempfile::tempdir().unwrap();
		let result = ChainModel::load_or_build(dir.path().join("missing.txt"), StarterPolicy::LineStart);
		assert!(matches!(result, Err(Error::Io(_))));
	}
}
