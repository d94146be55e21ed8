use thiserror::Error;

/// Errors produced by the chain library.
///
/// Nothing in the crate swallows these: model construction and generation
/// return them to the caller, which decides whether to skip, retry or abort.
#[derive(Error, Debug)]
pub enum Error {
	/// The model holds no starter context, so no message can be seeded.
	#[error("Model has no starter contexts, a richer corpus is required")]
	EmptyModel,

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// The cached binary model could not be encoded or decoded.
	#[error("Serialization error: {0}")]
	Serialization(#[from] postcard::Error),

	#[error("Configuration error: {0}")]
	Config(String),

	#[error("Invalid input: {0}")]
	InvalidInput(String),

	/// Two follower lists for different contexts were merged.
	#[error("Context mismatch: expected '{expected}', found '{found}'")]
	ContextMismatch { expected: String, found: String },

	/// A builder thread exited without handing back its partial model.
	#[error("Builder worker failed: {0}")]
	Worker(String),

	/// The output collaborator rejected the message.
	#[error("Publish error: {0}")]
	Publish(String),
}

pub type Result<T> = std::result::Result<T, Error>;
