use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use serde::{Deserialize, Serialize};

use crate::model::builder::StarterPolicy;
use crate::model::generation_input::GenerationInput;
use crate::{Error, Result};

/// Settings of a host program driving the chain.
///
/// Every field has a default, so a partial TOML file (or none at all)
/// is valid:
///
/// ```toml
/// corpus_folder = "./data"
/// corpus_extension = "txt"
/// count = 3
/// starter_policy = "boundary"
///
/// [generation]
/// length_limit = 140
/// length_policy = "strict"
/// nb_try = 10
/// max_steps = 500
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
	/// Folder holding the corpus files.
	pub corpus_folder: PathBuf,
	/// Extension of the corpus files in `corpus_folder`.
	pub corpus_extension: String,
	/// Number of messages produced per run.
	pub count: usize,
	/// Print the transition map before generating.
	pub dump_model: bool,
	pub starter_policy: StarterPolicy,
	pub generation: GenerationInput,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			corpus_folder: PathBuf::from("./data"),
			corpus_extension: "txt".to_owned(),
			count: 1,
			dump_model: false,
			starter_policy: StarterPolicy::default(),
			generation: GenerationInput::default(),
		}
	}
}

impl Config {
	/// Loads the configuration file at `path`.
	///
	/// A missing file yields the defaults.
	///
	/// # Errors
	/// Returns [`Error::Config`] if the file cannot be read or parsed, or
	/// holds invalid values.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		if !path.exists() {
			info!("No configuration at {}, using defaults", path.display());
			return Ok(Self::default());
		}

		let contents = fs::read_to_string(path)
			.map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
		Self::parse(&contents).map_err(|e| Error::Config(format!("failed to load {}: {e}", path.display())))
	}

	/// Parses a configuration from TOML text.
	pub fn from_toml_str(contents: &str) -> Result<Self> {
		Self::parse(contents).map_err(Error::Config)
	}

	fn parse(contents: &str) -> std::result::Result<Self, String> {
		let config: Config = toml::from_str(contents).map_err(|e| e.to_string())?;
		config.generation.validate().map_err(|e| match e {
			Error::InvalidInput(reason) => reason,
			other => other.to_string(),
		})?;
		Ok(config)
	}
}
