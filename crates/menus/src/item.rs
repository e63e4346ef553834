//! Menu entries and trigger events.

use std::borrow::Cow;

/// Location a menu is anchored at, in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Input that produced a menu trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerSource {
	/// Secondary pointer button.
	#[default]
	Pointer,
	/// Context-menu key or shortcut on the focused element.
	Keyboard,
}

/// A request to open a context menu at a location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MenuTrigger {
	/// Where the menu should appear.
	pub location: Point,
	/// What kind of input asked for it.
	pub source: TriggerSource,
}

impl MenuTrigger {
	/// Trigger from a secondary click at `(x, y)`.
	pub const fn pointer(x: f64, y: f64) -> Self {
		Self {
			location: Point::new(x, y),
			source: TriggerSource::Pointer,
		}
	}

	/// Trigger from the keyboard, anchored at the focused element.
	pub const fn keyboard(at: Point) -> Self {
		Self {
			location: at,
			source: TriggerSource::Keyboard,
		}
	}
}

/// A single resolved row in a displayed menu.
///
/// `command` is handed back to whoever opened the menu when the row is
/// activated; the menu itself never runs anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
	/// Display text.
	pub label: String,
	/// Disabled rows are shown but cannot be activated.
	pub enabled: bool,
	/// Command identifier routed back to the menu owner.
	pub command: Cow<'static, str>,
}

impl MenuItem {
	/// Creates an enabled item.
	pub fn new(label: impl Into<String>, command: impl Into<Cow<'static, str>>) -> Self {
		Self {
			label: label.into(),
			enabled: true,
			command: command.into(),
		}
	}

	/// Sets whether the item can be activated.
	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}
}

/// Availability of a registered option for a given scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
	/// Shown and selectable.
	Enabled,
	/// Shown greyed out.
	Disabled,
	/// Not shown.
	Hidden,
}
