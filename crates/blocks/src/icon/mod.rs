//! The icon contract.
//!
//! An icon is a small badge attached to a block. Every icon implements
//! [`Icon`]; the owning block calls its hooks when it is rendered and its
//! visual state changes. Two optional capabilities are discovered by
//! probing rather than inheritance:
//!
//! - [`SerializableIcon`] via [`Icon::as_serializable`]: the icon's state is
//!   written to the block envelope and restored on load.
//! - [`ContextMenuIcon`] via [`Icon::as_context_menu`]: the icon shows its
//!   own menu instead of deferring to the block's.

use std::any::Any;
use std::borrow::{Borrow, Cow};
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessel_menus::{MenuHost, MenuTrigger};

use crate::block::{BlockAttributes, BlockId, Colour};
use crate::error::MalformedStateError;

mod comment;
mod warning;


pub use comment::CommentIcon;
pub use warning::WarningIcon;

/// Case-sensitive key distinguishing icon kinds.
///
/// Two icons are the same kind iff their types compare equal. A block holds
/// at most one icon per type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconType(Cow<'static, str>);

impl IconType {
	pub const COMMENT: IconType = IconType::from_static("comment");
	pub const WARNING: IconType = IconType::from_static("warning");
	/// Reserved for mutator icons; no built-in implementation is provided.
	pub const MUTATOR: IconType = IconType::from_static("mutator");

	pub const fn from_static(name: &'static str) -> Self {
		Self(Cow::Borrowed(name))
	}

	pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
		Self(name.into())
	}

	#[inline]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Deref for IconType {
	type Target = str;

	fn deref(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for IconType {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for IconType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&'static str> for IconType {
	fn from(name: &'static str) -> Self {
		Self::from_static(name)
	}
}

impl From<String> for IconType {
	fn from(name: String) -> Self {
		Self(Cow::Owned(name))
	}
}

/// Identifies an icon as the target of pointer or keyboard input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconHandle {
	pub block: BlockId,
	pub icon_type: IconType,
}

/// Cached visual state for an icon with a live view.
///
/// Drawing is left to the frontend; this only records what the last hook
/// told the icon so the frontend can paint from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconView {
	/// Fill taken from the block colour.
	pub fill: Option<Colour>,
	/// Drawn faded (disabled or shadow block).
	pub dimmed: bool,
	/// Accepts pointer input.
	pub interactive: bool,
	/// Drawn at all.
	pub visible: bool,
}

impl Default for IconView {
	fn default() -> Self {
		Self {
			fill: None,
			dimmed: false,
			interactive: true,
			visible: true,
		}
	}
}

impl IconView {
	pub fn sync_colour(&mut self, block: &BlockAttributes) {
		self.fill = block.colour().cloned();
		self.dimmed = !block.is_enabled() || block.is_shadow();
	}

	pub fn sync_editable(&mut self, block: &BlockAttributes) {
		self.interactive = block.is_editable();
	}
}

/// An attachable unit of block state.
///
/// The view hooks (`init_view`, `apply_colour`, `update_editable`,
/// `update_collapsed`) are only called by the owning block, and only while
/// it is rendered. They receive the block's current attributes.
pub trait Icon: Any {
	/// The kind of this icon. Constant for the lifetime of the instance.
	fn icon_type(&self) -> IconType;

	/// Records the owning block. Must not allocate a view.
	fn attach(&mut self, owner: BlockId);

	/// Clears the owning block.
	fn detach(&mut self);

	/// The block this icon is attached to.
	fn owner(&self) -> Option<BlockId>;

	/// Allocates the view. Idempotent while attached.
	fn init_view(&mut self, _block: &BlockAttributes) {}

	/// Re-reads colour, style, disabled and shadow state.
	fn apply_colour(&mut self, _block: &BlockAttributes) {}

	/// Reflects the block's editable flag.
	fn update_editable(&mut self, _block: &BlockAttributes) {}

	/// Reflects the block's collapsed flag.
	///
	/// Runs deferred, so it sees the state at flush time rather than every
	/// intermediate toggle.
	fn update_collapsed(&mut self, _block: &BlockAttributes) {}

	/// Releases the view. Called after `detach` when the icon is discarded.
	fn dispose(&mut self) {}

	/// Persistence capability (optional).
	fn as_serializable(&self) -> Option<&dyn SerializableIcon> {
		None
	}

	fn as_serializable_mut(&mut self) -> Option<&mut dyn SerializableIcon> {
		None
	}

	/// Context menu capability (optional).
	fn as_context_menu(&self) -> Option<&dyn ContextMenuIcon> {
		None
	}

	fn as_context_menu_mut(&mut self) -> Option<&mut dyn ContextMenuIcon> {
		None
	}
}

impl dyn Icon {
	/// Returns the concrete icon if it is a `T`.
	pub fn downcast_ref<T: Icon>(&self) -> Option<&T> {
		(self as &dyn Any).downcast_ref::<T>()
	}

	pub fn downcast_mut<T: Icon>(&mut self) -> Option<&mut T> {
		(self as &mut dyn Any).downcast_mut::<T>()
	}

	pub fn is_serializable(&self) -> bool {
		self.as_serializable().is_some()
	}

	pub fn has_context_menu(&self) -> bool {
		self.as_context_menu().is_some()
	}
}

/// Icons whose state survives save and load.
///
/// `load_state(save_state())` must reproduce observably equivalent state.
pub trait SerializableIcon {
	fn save_state(&self) -> Value;

	fn load_state(&mut self, state: Value) -> Result<(), MalformedStateError>;
}

/// Icons that show their own context menu.
pub trait ContextMenuIcon {
	/// Builds this icon's menu and shows it on `host` at the trigger location.
	fn show_context_menu(&self, trigger: &MenuTrigger, host: &mut MenuHost);

	/// Runs a command from this icon's menu. Returns false if unrecognized.
	fn run_menu_command(&mut self, _command: &str) -> bool {
		false
	}
}
