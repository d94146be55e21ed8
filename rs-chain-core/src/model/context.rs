use std::fmt;

use serde::{Deserialize, Serialize};

/// Tokens closing a sentence. Only recognized as standalone tokens:
/// `"sat."` is an ordinary word, `"."` is terminal.
pub const TERMINAL_TOKENS: [&str; 3] = [".", "?", "!"];

/// Returns `true` if `token` is one of the [`TERMINAL_TOKENS`].
pub fn is_terminal(token: &str) -> bool {
	TERMINAL_TOKENS.contains(&token)
}

/// Two consecutive corpus tokens.
///
/// A `Context` is both the lookup key of the transition map and the
/// descriptor of a sentence start in the starter registry.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Context {
	first: String,
	second: String,
}

impl Context {
	pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
		Self {
			first: first.into(),
			second: second.into(),
		}
	}

	pub fn first(&self) -> &str {
		&self.first
	}

	pub fn second(&self) -> &str {
		&self.second
	}

	/// Both tokens, in order.
	pub fn tokens(&self) -> [&str; 2] {
		[&self.first, &self.second]
	}
}

impl<A: Into<String>, B: Into<String>> From<(A, B)> for Context {
	fn from((first, second): (A, B)) -> Self {
		Self::new(first, second)
	}
}

impl fmt::Display for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.first, self.second)
	}
}
