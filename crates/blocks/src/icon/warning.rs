//! Warning icon: one or more diagnostics raised against a block.
//!
//! Warnings are derived state and are never persisted.

use indexmap::IndexMap;

use super::{Icon, IconType, IconView};
use crate::block::{BlockAttributes, BlockId};

#[derive(Debug, Clone, Default)]
pub struct WarningIcon {
	owner: Option<BlockId>,
	texts: IndexMap<String, String>,
	collapsed: bool,
	view: Option<IconView>,
}

impl WarningIcon {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets or clears the warning raised under `id`.
	pub fn set_text(&mut self, id: impl Into<String>, text: Option<&str>) {
		let id = id.into();
		match text {
			Some(text) => {
				self.texts.insert(id, text.to_string());
			}
			None => {
				self.texts.shift_remove(&id);
			}
		}
	}

	pub fn text_for(&self, id: &str) -> Option<&str> {
		self.texts.get(id).map(String::as_str)
	}

	/// All warnings joined by blank lines, in the order they were raised.
	pub fn text(&self) -> String {
		self.texts
			.values()
			.map(String::as_str)
			.collect::<Vec<_>>()
			.join("\n\n")
	}

	pub fn is_empty(&self) -> bool {
		self.texts.is_empty()
	}

	pub fn view(&self) -> Option<&IconView> {
		self.view.as_ref()
	}

	/// Collapsed state of the owner as of the last collapse flush.
	pub fn is_collapsed(&self) -> bool {
		self.collapsed
	}
}

impl Icon for WarningIcon {
	fn icon_type(&self) -> IconType {
		IconType::WARNING
	}

	fn attach(&mut self, owner: BlockId) {
		self.owner = Some(owner);
	}

	fn detach(&mut self) {
		self.owner = None;
	}

	fn owner(&self) -> Option<BlockId> {
		self.owner
	}

	fn init_view(&mut self, block: &BlockAttributes) {
		if self.view.is_none() {
			self.collapsed = block.is_collapsed();
			self.view = Some(IconView::default());
		}
	}

	fn apply_colour(&mut self, block: &BlockAttributes) {
		if let Some(view) = self.view.as_mut() {
			view.sync_colour(block);
		}
	}

	// Warnings stay clickable on read-only blocks so they can still be read.

	fn update_collapsed(&mut self, block: &BlockAttributes) {
		self.collapsed = block.is_collapsed();
	}

	fn dispose(&mut self) {
		self.view = None;
	}
}
