use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Character budget used when nothing else is configured (a post-length limit).
pub const DEFAULT_LENGTH_LIMIT: usize = 280;

/// Upper bound on appended tokens per message.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// How the length limit is enforced while walking the chain.
///
/// # Variants
/// - `Tolerant`: the limit is checked after each append, so the last
///   token may push the message past the limit (by at most that token
///   plus one space).
/// - `Strict`: a candidate whose append would exceed the limit ends the
///   walk without being appended. The seed pair is always kept, even when
///   it alone is over the limit.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LengthPolicy {
	#[default]
	Tolerant,
	Strict,
}

/// Parameters of a generation call.
///
/// # Responsibilities
/// - Track the character budget (`length_limit`) and how it is enforced
/// - Bound the walk (`max_steps`) independently of the budget
/// - Track how many times a message reproducing a corpus line is retried
///
/// # Invariants
/// - `length_limit` is always >= 1
/// - `max_steps` is always >= 1
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationInput {
	/// Enforcement of `length_limit`.
	pub length_policy: LengthPolicy,

	/// Number of regenerations allowed when a message is a corpus line.
	pub nb_try: usize,

	/// Character budget of the space-joined message.
	length_limit: usize,

	/// Maximum number of tokens appended after the seed pair.
	max_steps: usize,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			length_policy: LengthPolicy::default(),
			nb_try: 0,
			length_limit: DEFAULT_LENGTH_LIMIT,
			max_steps: DEFAULT_MAX_STEPS,
		}
	}
}

impl GenerationInput {
	/// Creates an input with the given character budget and defaults elsewhere.
	///
	/// A budget of 0 is raised to 1.
	pub fn new(length_limit: usize) -> Self {
		Self {
			length_limit: length_limit.max(1),
			..Self::default()
		}
	}

	pub fn length_limit(&self) -> usize {
		self.length_limit
	}

	/// Sets the character budget of generated messages.
	///
	/// # Errors
	/// Returns an error if `length_limit` is 0.
	pub fn set_length_limit(&mut self, length_limit: usize) -> Result<()> {
		if length_limit == 0 {
			return Err(Error::InvalidInput("length_limit must be at least 1".to_owned()));
		}
		self.length_limit = length_limit;
		Ok(())
	}

	pub fn max_steps(&self) -> usize {
		self.max_steps
	}

	/// Sets the maximum number of appended tokens.
	///
	/// # Errors
	/// Returns an error if `max_steps` is 0.
	pub fn set_max_steps(&mut self, max_steps: usize) -> Result<()> {
		if max_steps == 0 {
			return Err(Error::InvalidInput("max_steps must be at least 1".to_owned()));
		}
		self.max_steps = max_steps;
		Ok(())
	}

	/// Checks the invariants of an input built by deserialization.
	pub fn validate(&self) -> Result<()> {
		if self.length_limit == 0 {
			return Err(Error::InvalidInput("length_limit must be at least 1".to_owned()));
		}
		if self.max_steps == 0 {
			return Err(Error::InvalidInput("max_steps must be at least 1".to_owned()));
		}
		Ok(())
	}
}
