use thiserror::Error;

/// Errors raised by the options registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
	/// An option with this id is already registered.
	#[error("context menu option already registered: {id}")]
	DuplicateItem {
		/// Id of the rejected option.
		id: String,
	},
}
