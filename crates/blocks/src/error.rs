use thiserror::Error;

use crate::block::BlockId;
use crate::icon::IconType;

/// A persisted icon map named a type with no registered factory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("icon type `{icon_type}` is not registered")]
pub struct UnregisteredIconError {
	pub icon_type: IconType,
}

/// Saved icon state does not have the shape the icon expects.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed state for icon `{icon_type}`: {message}")]
pub struct MalformedStateError {
	pub icon_type: IconType,
	pub message: String,
}

impl MalformedStateError {
	pub fn new(icon_type: IconType, message: impl Into<String>) -> Self {
		Self {
			icon_type,
			message: message.into(),
		}
	}
}

/// Errors surfaced by block, registry and serialization operations.
#[derive(Error, Debug)]
pub enum Error {
	#[error(transparent)]
	UnregisteredIcon(#[from] UnregisteredIconError),
	#[error(transparent)]
	MalformedState(#[from] MalformedStateError),
	/// Registration refused under [`DuplicatePolicy::Reject`](crate::DuplicatePolicy::Reject).
	#[error("icon type `{0}` is already registered")]
	DuplicateIcon(IconType),
	/// A factory built an icon of a different type than its registration key.
	#[error("factory registered as `{registered}` produced an icon of type `{produced}`")]
	IconTypeMismatch {
		registered: IconType,
		produced: IconType,
	},
	#[error("block not found: {0}")]
	BlockNotFound(BlockId),
	/// A view was requested for a block of a headless workspace.
	#[error("{0} belongs to a headless workspace and cannot be rendered")]
	Headless(BlockId),
	#[error("invalid colour: {0:?}")]
	InvalidColour(String),
	#[error("envelope decode failed: {0}")]
	Json(#[from] serde_json::Error),
	#[error("config decode failed: {0}")]
	Config(#[from] toml::de::Error),
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result alias for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
