//! The single visible context menu.
//!
//! Only one menu exists at a time. Showing a menu while another is open
//! replaces it; there is no stacking. The host owns no behavior: activating
//! a row returns the [`MenuItem`] to the caller, who routes its command.

use tracing::debug;

use crate::item::{MenuItem, Point};


/// Identifies one showing of a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuId(pub u64);

/// A menu currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
	/// Identifier for this showing.
	pub id: MenuId,
	/// Rows in display order.
	pub items: Vec<MenuItem>,
	/// Anchor location.
	pub anchor: Point,
}

impl ContextMenu {
	/// Returns the labels of all rows in display order.
	pub fn labels(&self) -> Vec<&str> {
		self.items.iter().map(|item| item.label.as_str()).collect()
	}

	/// Returns true if any row has exactly this label.
	pub fn contains_label(&self, label: &str) -> bool {
		self.items.iter().any(|item| item.label == label)
	}
}

/// Owner of the one visible menu.
#[derive(Debug, Default)]
pub struct MenuHost {
	visible: Option<ContextMenu>,
	next_id: u64,
}

impl MenuHost {
	pub fn new() -> Self {
		Self::default()
	}

	/// Shows a menu, closing whatever was open.
	///
	/// An empty item list only closes the current menu and returns `None`.
	pub fn show(&mut self, items: Vec<MenuItem>, anchor: Point) -> Option<MenuId> {
		if let Some(prev) = self.visible.take() {
			debug!(menu = prev.id.0, "menu.replace");
		}
		if items.is_empty() {
			debug!("menu.empty");
			return None;
		}

		let id = MenuId(self.next_id);
		self.next_id += 1;
		debug!(menu = id.0, items = items.len(), "menu.show");
		self.visible = Some(ContextMenu { id, items, anchor });
		Some(id)
	}

	/// Closes the visible menu, if any.
	pub fn dismiss(&mut self) -> Option<ContextMenu> {
		let menu = self.visible.take()?;
		debug!(menu = menu.id.0, "menu.dismiss");
		Some(menu)
	}

	#[inline]
	pub fn visible(&self) -> Option<&ContextMenu> {
		self.visible.as_ref()
	}

	#[inline]
	pub fn is_visible(&self) -> bool {
		self.visible.is_some()
	}

	/// Activates the row at `index`, closing the menu.
	///
	/// Returns `None` without closing when no menu is open, the index is
	/// out of range, or the row is disabled.
	pub fn select(&mut self, index: usize) -> Option<MenuItem> {
		let item = self.visible.as_ref()?.items.get(index)?;
		if !item.enabled {
			return None;
		}
		let item = item.clone();
		self.dismiss();
		Some(item)
	}
}
