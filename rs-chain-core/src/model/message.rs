use std::fmt;

use super::context::Context;

/// A generated message: the tokens of one walk through the chain.
///
/// The rendering joins tokens with single spaces. `char_len` is the
/// number of characters of that rendering, kept up to date on each push.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
	tokens: Vec<String>,
	char_len: usize,
}

impl Message {
	/// Starts a message with the two tokens of a starter context.
	pub(crate) fn seed(context: &Context) -> Self {
		let mut message = Self {
			tokens: Vec::new(),
			char_len: 0,
		};
		for token in context.tokens() {
			message.push(token);
		}
		message
	}

	pub(crate) fn push(&mut self, token: &str) {
		self.char_len = self.char_len_with(token);
		self.tokens.push(token.to_owned());
	}

	/// Length of the rendering if `token` were appended.
	pub(crate) fn char_len_with(&self, token: &str) -> usize {
		let separator = usize::from(!self.tokens.is_empty());
		self.char_len + separator + token.chars().count()
	}

	/// The last two tokens, i.e. the context to continue from.
	pub(crate) fn tail(&self) -> Option<Context> {
		match self.tokens.as_slice() {
			[.., first, second] => Some(Context::new(first.as_str(), second.as_str())),
			_ => None,
		}
	}

	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	pub fn into_tokens(self) -> Vec<String> {
		self.tokens
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// Number of characters of the space-joined rendering.
	pub fn char_len(&self) -> usize {
		self.char_len
	}
}

impl fmt::Display for Message {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.tokens.join(" "))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn char_len_counts_separators_and_chars() {
		let mut message = Message::seed(&Context::new("Ça", "va"));
		assert_eq!(message.char_len(), 5);

		message.push("?");
		assert_eq!(message.to_string(), "Ça va ?");
		assert_eq!(message.char_len(), message.to_string().chars().count());
		assert_eq!(message.tail(), Some(Context::new("va", "?")));
	}
}
