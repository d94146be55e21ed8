//! Output collaborators.
//!
//! Generation never prints or posts anything itself: the host hands a
//! [`Publisher`] to [`post_message`], which generates a message and
//! passes the rendered text on. A failing publisher is reported as
//! [`Error::Publish`] and nothing is retried.

use std::io::{self, Write};

use log::debug;
use rand::Rng;

use crate::model::generator::Generator;
use crate::model::message::Message;
use crate::{Error, Result};

/// Destination of generated messages (terminal, file, remote service...).
pub trait Publisher {
	fn publish(&mut self, message: &str) -> Result<()>;
}

/// Prints each message on its own line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutPublisher;

impl Publisher for StdoutPublisher {
	fn publish(&mut self, message: &str) -> Result<()> {
		let mut stdout = io::stdout().lock();
		writeln!(stdout, "{message}").map_err(|e| Error::Publish(e.to_string()))
	}
}

/// Writes each message on its own line to any `Write` (file, buffer...).
#[derive(Debug)]
pub struct WriterPublisher<W: Write> {
	writer: W,
}

impl<W: Write> WriterPublisher<W> {
	pub fn new(writer: W) -> Self {
		Self { writer }
	}

	pub fn into_inner(self) -> W {
		self.writer
	}
}

impl<W: Write> Publisher for WriterPublisher<W> {
	fn publish(&mut self, message: &str) -> Result<()> {
		writeln!(self.writer, "{message}")
			.and_then(|_| self.writer.flush())
			.map_err(|e| Error::Publish(e.to_string()))
	}
}

/// Generates one message and hands it to `publisher`.
///
/// Returns the published message.
pub fn post_message<R, P>(generator: &Generator, rng: &mut R, publisher: &mut P) -> Result<Message>
where
	R: Rng + ?Sized,
	P: Publisher + ?Sized,
{
	let message = generator.generate(rng)?;
	publisher.publish(&message.to_string())?;
	debug!("Published {} chars", message.char_len());
	Ok(message)
}
