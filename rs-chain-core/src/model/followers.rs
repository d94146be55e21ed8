use rand::Rng;

use serde::{Deserialize, Serialize};

use super::context::Context;
use crate::{Error, Result};

/// Tokens observed right after a given context.
///
/// Conceptually, this is a node of a second-order Markov chain whose
/// outgoing edges are the candidate tokens. Duplicates are kept as-is,
/// so a continuation seen three times is three times more likely to be
/// picked than one seen once.
///
/// ## Invariants
/// - All candidates belong to the same `context`
/// - A `Followers` stored in a model holds at least one candidate
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Followers {
	/// The two-token prefix these candidates follow.
	context: Context,
	/// Candidate next tokens in observation order.
	/// Example: (The, cat) => ["sat", "ran", "sat"]
	candidates: Vec<String>,
}

impl Followers {
	/// Creates an empty follower list for `context`.
	pub fn new(context: Context) -> Self {
		Self {
			context,
			candidates: Vec::new(),
		}
	}

	/// Records one more occurrence of `token` after the context.
	pub fn push(&mut self, token: &str) {
		self.candidates.push(token.to_owned());
	}

	pub fn context(&self) -> &Context {
		&self.context
	}

	pub fn candidates(&self) -> &[String] {
		&self.candidates
	}

	pub fn len(&self) -> usize {
		self.candidates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.candidates.is_empty()
	}

	/// Picks a candidate uniformly by index.
	///
	/// Since duplicates are preserved, this is a frequency-weighted draw
	/// over the distinct continuations.
	///
	/// Returns `None` if there is no candidate.
	pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
		if self.candidates.is_empty() {
			return None;
		}
		let index = rng.random_range(0..self.candidates.len());
		self.candidates.get(index).map(String::as_str)
	}

	/// Appends the candidates of `other` to this list.
	///
	/// Both lists must follow the same context. Candidate order is kept
	/// (`self` first, then `other`), so merging partial models built from
	/// consecutive corpus chunks gives the same list as a single pass.
	///
	/// # Errors
	/// Returns [`Error::ContextMismatch`] if the contexts differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.context != other.context {
			return Err(Error::ContextMismatch {
				expected: self.context.to_string(),
				found: other.context.to_string(),
			});
		}

		self.candidates.extend(other.candidates.iter().cloned());
		Ok(())
	}
}
