//! TOML configuration.
//!
//! Every key is optional:
//!
//! ```toml
//! [registry]
//! duplicates = "last-wins"   # "last-wins" | "first-wins" | "reject"
//!
//! [comment]
//! width = 160
//! height = 80
//! pinned = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registry::DuplicatePolicy;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
	pub registry: RegistryConfig,
	pub comment: CommentConfig,
}

/// Icon registry behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RegistryConfig {
	/// What `register` does when the type already has a factory.
	pub duplicates: DuplicatePolicy,
}

/// Bubble defaults for newly created comment icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CommentConfig {
	pub width: u32,
	pub height: u32,
	pub pinned: bool,
}

impl Default for CommentConfig {
	fn default() -> Self {
		Self {
			width: 160,
			height: 80,
			pinned: false,
		}
	}
}

impl Config {
	pub fn from_toml_str(source: &str) -> Result<Self> {
		Ok(toml::from_str(source)?)
	}

	/// Reads and parses a config file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let source = std::fs::read_to_string(path.as_ref())?;
		Self::from_toml_str(&source)
	}
}
