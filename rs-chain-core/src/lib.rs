//! Second-order Markov chain text generation library.
//!
//! This crate provides:
//! - Model construction from corpus lines (two-token contexts and the
//!   tokens that follow them, plus the contexts that open a sentence)
//! - Message generation by random walk under a character budget
//! - A binary model cache and multi-corpus merging
//! - Output collaborators the host can inject to deliver messages
//!
//! Generation is pure: it reads a model and a random source, and returns
//! a message. Printing or posting it is left to a [`publish::Publisher`].

/// Chain model, builder and message generation.
pub mod model;

/// Host configuration loaded from TOML.
pub mod config;

/// Output collaborators (stdout, writers) and the generate-then-publish entry point.
pub mod publish;

pub mod error;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::{Error, Result};
