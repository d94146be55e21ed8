use std::sync::Arc;

use log::{debug, warn};
use rand::Rng;

use crate::config::Config;
use crate::io;
use crate::model::chain_model::ChainModel;
use crate::model::generation_input::{GenerationInput, LengthPolicy};
use crate::model::message::Message;
use crate::{Error, Result};

/// Walks `model` once and returns the generated message.
///
/// # Behavior
/// - Picks a starter context uniformly at random and seeds the message
///   with its two tokens.
/// - Stops as soon as the rendering reaches `input.length_limit()`
///   characters (checked after each append under
///   [`LengthPolicy::Tolerant`], before it under [`LengthPolicy::Strict`]).
/// - Stops when the last two tokens have no recorded continuation.
/// - Stops after `input.max_steps` appends.
///
/// The message always holds at least the seed pair. Given the same `rng`
/// state, the same model and input produce the same message.
///
/// # Errors
/// Returns [`Error::EmptyModel`] if the model has no starter context.
pub fn generate_message<R: Rng + ?Sized>(
	model: &ChainModel,
	input: &GenerationInput,
	rng: &mut R,
) -> Result<Message> {
	let starters = model.starters();
	if starters.is_empty() {
		return Err(Error::EmptyModel);
	}

	let seed = &starters[rng.random_range(0..starters.len())];
	let mut message = Message::seed(seed);
	let mut steps = 0;

	while message.char_len() < input.length_limit() {
		if steps >= input.max_steps() {
			warn!("Stopped after {} steps below the {} character limit", steps, input.length_limit());
			break;
		}

		let Some(context) = message.tail() else { break };
		let Some(next) = model.followers(&context).and_then(|followers| followers.pick(&mut *rng)) else {
			break;
		};

		if input.length_policy == LengthPolicy::Strict && message.char_len_with(next) > input.length_limit() {
			break;
		}

		message.push(next);
		steps += 1;
	}

	debug!("Generated {} tokens ({} chars) from '{}'", message.len(), message.char_len(), seed);
	Ok(message)
}

/// High-level generator over a shared, read-only model.
///
/// # Responsibilities
/// - Load and merge the corpora of a folder
/// - Generate messages with the configured [`GenerationInput`]
/// - Avoid handing back a corpus line verbatim, up to `nb_try` times
///
/// Cloning a `Generator` shares the model, so clones can generate
/// concurrently from several threads, each with its own random source.
#[derive(Debug, Clone)]
pub struct Generator {
	model: Arc<ChainModel>,
	input: GenerationInput,
}

impl Generator {
	/// Creates a generator by loading every corpus file of `config.corpus_folder`.
	///
	/// # Behavior
	/// - Lists the files with the `config.corpus_extension` extension.
	/// - Loads each one through [`ChainModel::load_or_build`] (binary cache).
	/// - Merges them, in file name order, into a single model.
	///
	/// # Errors
	/// - Returns an error if the folder does not exist or is not a directory.
	/// - Returns an error if a corpus fails to load.
	pub fn new(config: &Config) -> Result<Self> {
		let folder = io::normalize_folder(&config.corpus_folder);
		if !folder.is_dir() {
			return Err(Error::Config(format!("Expected a directory, got: {}", folder.display())));
		}

		let mut model = ChainModel::new(config.starter_policy);
		for file in io::list_files(&folder, &config.corpus_extension)? {
			let corpus = ChainModel::load_or_build(folder.join(&file), config.starter_policy)?;
			model.merge(&corpus)?;
		}

		debug!(
			"Loaded corpora {:?}: {} contexts, {} starters",
			model.corpus_names(),
			model.transition_count(),
			model.starter_count()
		);
		Ok(Self::from_model(model, config.generation.clone()))
	}

	/// Wraps an already built model.
	pub fn from_model(model: ChainModel, input: GenerationInput) -> Self {
		Self {
			model: Arc::new(model),
			input,
		}
	}

	pub fn model(&self) -> &ChainModel {
		&self.model
	}

	pub fn input(&self) -> &GenerationInput {
		&self.input
	}

	pub fn input_mut(&mut self) -> &mut GenerationInput {
		&mut self.input
	}

	/// Generates a message, retrying while it reproduces a corpus line.
	///
	/// Returns the first message that is not a corpus line, or the last
	/// attempt once `nb_try` retries are spent.
	pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Message> {
		let mut message = generate_message(&self.model, &self.input, rng)?;
		let mut nb_try = self.input.nb_try;

		while nb_try > 0 && self.model.contains_line(&message.to_string()) {
			debug!("'{}' is a corpus line, {} tries left", message, nb_try);
			message = generate_message(&self.model, &self.input, rng)?;
			nb_try -= 1;
		}

		Ok(message)
	}

	/// Generates a message with the thread-local random source and renders it.
	pub fn generate_text(&self) -> Result<String> {
		Ok(self.generate(&mut rand::rng())?.to_string())
	}
}
