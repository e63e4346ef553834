//! Comment icon: free text in a bubble next to the block.

use serde::Deserialize;
use serde_json::{Value, json};

use super::{Icon, IconType, IconView, SerializableIcon};
use crate::block::{BlockAttributes, BlockId};
use crate::config::CommentConfig;
use crate::error::MalformedStateError;

/// Saved comment state.
///
/// The bare text form is written whenever the bubble metadata equals the
/// configured defaults; both forms are accepted on load.
#[derive(Deserialize)]
#[serde(untagged)]
enum SavedComment {
	Text(String),
	Full {
		text: String,
		pinned: Option<bool>,
		width: Option<u32>,
		height: Option<u32>,
	},
}

#[derive(Debug, Clone)]
pub struct CommentIcon {
	owner: Option<BlockId>,
	text: String,
	pinned: bool,
	width: u32,
	height: u32,
	defaults: CommentConfig,
	collapsed: bool,
	view: Option<IconView>,
}

impl CommentIcon {
	pub fn new(text: impl Into<String>) -> Self {
		Self::with_config(text, CommentConfig::default())
	}

	pub fn with_config(text: impl Into<String>, defaults: CommentConfig) -> Self {
		Self {
			owner: None,
			text: text.into(),
			pinned: defaults.pinned,
			width: defaults.width,
			height: defaults.height,
			defaults,
			collapsed: false,
			view: None,
		}
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn set_text(&mut self, text: impl Into<String>) {
		self.text = text.into();
	}

	pub fn is_pinned(&self) -> bool {
		self.pinned
	}

	pub fn set_pinned(&mut self, pinned: bool) {
		self.pinned = pinned;
	}

	/// Bubble size as `(width, height)`.
	pub fn size(&self) -> (u32, u32) {
		(self.width, self.height)
	}

	pub fn set_size(&mut self, width: u32, height: u32) {
		self.width = width;
		self.height = height;
	}

	pub fn view(&self) -> Option<&IconView> {
		self.view.as_ref()
	}

	/// The bubble shows when pinned, unless the block is collapsed.
	pub fn is_bubble_visible(&self) -> bool {
		self.view.is_some() && self.pinned && !self.collapsed
	}

	fn has_default_bubble(&self) -> bool {
		self.pinned == self.defaults.pinned
			&& self.width == self.defaults.width
			&& self.height == self.defaults.height
	}
}

impl Icon for CommentIcon {
	fn icon_type(&self) -> IconType {
		IconType::COMMENT
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

	fn update_editable(&mut self, block: &BlockAttributes) {
		if let Some(view) = self.view.as_mut() {
			view.sync_editable(block);
		}
	}

	fn update_collapsed(&mut self, block: &BlockAttributes) {
		self.collapsed = block.is_collapsed();
	}

	fn dispose(&mut self) {
		self.view = None;
	}

	fn as_serializable(&self) -> Option<&dyn SerializableIcon> {
		Some(self)
	}

	fn as_serializable_mut(&mut self) -> Option<&mut dyn SerializableIcon> {
		Some(self)
	}
}

impl SerializableIcon for CommentIcon {
	fn save_state(&self) -> Value {
		if self.has_default_bubble() {
			return Value::String(self.text.clone());
		}
		json!({
			"text": self.text,
			"pinned": self.pinned,
			"width": self.width,
			"height": self.height,
		})
	}

	fn load_state(&mut self, state: Value) -> Result<(), MalformedStateError> {
		let saved = serde_json::from_value::<SavedComment>(state)
			.map_err(|err| MalformedStateError::new(IconType::COMMENT, err.to_string()))?;
		match saved {
			SavedComment::Text(text) => self.text = text,
			SavedComment::Full {
				text,
				pinned,
				width,
				height,
			} => {
				self.text = text;
				self.pinned = pinned.unwrap_or(self.defaults.pinned);
				self.width = width.unwrap_or(self.defaults.width);
				self.height = height.unwrap_or(self.defaults.height);
			}
		}
		Ok(())
	}
}
