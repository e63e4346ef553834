//! Blocks and icon hook dispatch.
//!
//! A block is either headless (data only) or rendered (has a view). The
//! transition happens at most once, through [`Block::init_view`]. While
//! headless, attribute setters only record state: no icon view hook ever
//! runs. Once rendered:
//!
//! | change                              | hook                       |
//! |-------------------------------------|----------------------------|
//! | icon attached                       | `init_view`, `apply_colour`, `update_editable` |
//! | colour, style, disabled, shadow     | `apply_colour`             |
//! | editable                            | `update_editable`          |
//! | collapsed                           | `update_collapsed`, deferred |
//!
//! Collapse propagation is coalesced: the block raises a pending flag and
//! schedules itself once on the [`DeferredQueue`]; when the workspace
//! flushes, each icon sees only the final collapsed state.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, trace};

use crate::config::CommentConfig;
use crate::error::{Error, Result};
use crate::icon::{CommentIcon, Icon, IconHandle, IconType, WarningIcon};
use crate::scheduler::DeferredQueue;

mod icons;


pub(crate) use icons::{Hook, IconCollection};

/// Disabled reason used by the block context menu.
pub const MANUALLY_DISABLED: &str = "MANUALLY_DISABLED";

/// Identifier of a block within its workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

impl fmt::Display for BlockId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "block#{}", self.0)
	}
}

/// A `#rrggbb` colour, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Colour(String);

impl Colour {
	pub fn parse(source: &str) -> Result<Self> {
		let hex = source.strip_prefix('#').unwrap_or(source);
		if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
			return Err(Error::InvalidColour(source.to_string()));
		}
		Ok(Self(format!("#{}", hex.to_ascii_lowercase())))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Colour {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Whether a block has a live view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
	#[default]
	Headless,
	Rendered,
}

/// Visual attributes that icons mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockAttributes {
	pub(crate) colour: Option<Colour>,
	pub(crate) style: Option<String>,
	pub(crate) disabled_reasons: BTreeSet<String>,
	pub(crate) shadow: bool,
	pub(crate) editable: bool,
	pub(crate) collapsed: bool,
}

impl Default for BlockAttributes {
	fn default() -> Self {
		Self {
			colour: None,
			style: None,
			disabled_reasons: BTreeSet::new(),
			shadow: false,
			editable: true,
			collapsed: false,
		}
	}
}

impl BlockAttributes {
	pub fn colour(&self) -> Option<&Colour> {
		self.colour.as_ref()
	}

	pub fn style(&self) -> Option<&str> {
		self.style.as_deref()
	}

	/// A block is enabled when it has no disabled reasons.
	pub fn is_enabled(&self) -> bool {
		self.disabled_reasons.is_empty()
	}

	pub fn disabled_reasons(&self) -> impl Iterator<Item = &str> {
		self.disabled_reasons.iter().map(String::as_str)
	}

	pub fn has_disabled_reason(&self, reason: &str) -> bool {
		self.disabled_reasons.contains(reason)
	}

	pub fn is_shadow(&self) -> bool {
		self.shadow
	}

	pub fn is_editable(&self) -> bool {
		self.editable
	}

	pub fn is_collapsed(&self) -> bool {
		self.collapsed
	}
}

/// An editable block and the icons attached to it.
pub struct Block {
	id: BlockId,
	block_type: String,
	attrs: BlockAttributes,
	render: RenderState,
	renderable: bool,
	icons: IconCollection,
	deferred: DeferredQueue,
	collapse_pending: bool,
	disposed: bool,
	comment_defaults: CommentConfig,
}

impl fmt::Debug for Block {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Block")
			.field("id", &self.id)
			.field("block_type", &self.block_type)
			.field("render", &self.render)
			.field("icons", &self.icons.types().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

impl Block {
	pub(crate) fn new(
		id: BlockId,
		block_type: impl Into<String>,
		renderable: bool,
		deferred: DeferredQueue,
		comment_defaults: CommentConfig,
	) -> Self {
		Self {
			id,
			block_type: block_type.into(),
			attrs: BlockAttributes::default(),
			render: RenderState::Headless,
			renderable,
			icons: IconCollection::default(),
			deferred,
			collapse_pending: false,
			disposed: false,
			comment_defaults,
		}
	}

	#[inline]
	pub fn id(&self) -> BlockId {
		self.id
	}

	pub fn block_type(&self) -> &str {
		&self.block_type
	}

	#[inline]
	pub fn attributes(&self) -> &BlockAttributes {
		&self.attrs
	}

	#[inline]
	pub fn render_state(&self) -> RenderState {
		self.render
	}

	#[inline]
	pub fn is_rendered(&self) -> bool {
		self.render == RenderState::Rendered
	}

	pub fn is_disposed(&self) -> bool {
		self.disposed
	}

	/// Creates the block's view, moving it from headless to rendered.
	///
	/// Icons already attached get `init_view`, `apply_colour` and
	/// `update_editable`, in that order. Returns `Ok(false)` if the block was
	/// already rendered.
	pub fn init_view(&mut self) -> Result<bool> {
		if !self.renderable {
			return Err(Error::Headless(self.id));
		}
		if self.is_rendered() {
			return Ok(false);
		}
		self.render = RenderState::Rendered;
		debug!(block = %self.id, icons = self.icons.len(), "block.render");
		self.icons.dispatch(Hook::InitView, &self.attrs);
		self.icons.dispatch(Hook::ApplyColour, &self.attrs);
		self.icons.dispatch(Hook::UpdateEditable, &self.attrs);
		Ok(true)
	}

	fn dispatch(&mut self, hook: Hook) {
		if !self.is_rendered() {
			return;
		}
		trace!(block = %self.id, hook = hook.name(), icons = self.icons.len(), "block.dispatch");
		self.icons.dispatch(hook, &self.attrs);
	}

	/// Attaches an icon, replacing any icon of the same type.
	///
	/// The replaced icon is detached and disposed without further hooks. If
	/// the block is rendered the new icon gets `init_view`, `apply_colour` and
	/// `update_editable`; collapse state reaches it on the next flush that
	/// concerns this block.
	pub fn add_icon(&mut self, mut icon: Box<dyn Icon>) -> &mut (dyn Icon + 'static) {
		let icon_type = icon.icon_type();
		if let Some(mut prev) = self.icons.remove(&icon_type) {
			debug!(block = %self.id, icon = %icon_type, "icon.replace");
			prev.detach();
			prev.dispose();
		}

		icon.attach(self.id);
		if self.is_rendered() {
			for hook in [Hook::InitView, Hook::ApplyColour, Hook::UpdateEditable] {
				hook.call(&mut *icon, &self.attrs);
			}
		}
		debug!(block = %self.id, icon = %icon_type, "icon.attach");
		self.icons.push(icon)
	}

	/// Detaches and discards the icon of `icon_type`. Returns whether one
	/// was attached.
	pub fn remove_icon(&mut self, icon_type: &str) -> bool {
		let Some(mut icon) = self.icons.remove(icon_type) else {
			return false;
		};
		icon.detach();
		icon.dispose();
		debug!(block = %self.id, icon = icon_type, "icon.detach");
		true
	}

	pub fn icon(&self, icon_type: &str) -> Option<&(dyn Icon + 'static)> {
		self.icons.get(icon_type)
	}

	pub fn icon_mut(&mut self, icon_type: &str) -> Option<&mut (dyn Icon + 'static)> {
		self.icons.get_mut(icon_type)
	}

	/// Returns the icon of `icon_type` if it is a `T`.
	pub fn icon_as<T: Icon>(&self, icon_type: &str) -> Option<&T> {
		self.icon(icon_type)?.downcast_ref::<T>()
	}

	pub fn icon_as_mut<T: Icon>(&mut self, icon_type: &str) -> Option<&mut T> {
		self.icon_mut(icon_type)?.downcast_mut::<T>()
	}

	pub fn has_icon(&self, icon_type: &str) -> bool {
		self.icons.get(icon_type).is_some()
	}

	/// Attached icons in attach order.
	pub fn icons(&self) -> impl Iterator<Item = &(dyn Icon + 'static)> {
		self.icons.iter()
	}

	pub fn icon_count(&self) -> usize {
		self.icons.len()
	}

	/// Input handle for an attached icon.
	pub fn icon_handle(&self, icon_type: &str) -> Option<IconHandle> {
		let icon = self.icons.get(icon_type)?;
		Some(IconHandle {
			block: self.id,
			icon_type: icon.icon_type(),
		})
	}

	/// Sets the block colour. Like every visual setter, icons are only
	/// notified when the stored value actually changes.
	pub fn set_colour(&mut self, colour: &str) -> Result<()> {
		let colour = Colour::parse(colour)?;
		if self.attrs.colour.as_ref() == Some(&colour) {
			return Ok(());
		}
		self.attrs.colour = Some(colour);
		self.dispatch(Hook::ApplyColour);
		Ok(())
	}

	pub fn set_style(&mut self, style: impl Into<String>) {
		let style = style.into();
		if self.attrs.style.as_deref() == Some(style.as_str()) {
			return;
		}
		self.attrs.style = Some(style);
		self.dispatch(Hook::ApplyColour);
	}

	/// Adds or removes one reason for the block being disabled.
	pub fn set_disabled_reason(&mut self, disabled: bool, reason: &str) {
		let changed = if disabled {
			self.attrs.disabled_reasons.insert(reason.to_string())
		} else {
			self.attrs.disabled_reasons.remove(reason)
		};
		if changed {
			self.dispatch(Hook::ApplyColour);
		}
	}

	pub fn set_shadow(&mut self, shadow: bool) {
		if self.attrs.shadow == shadow {
			return;
		}
		self.attrs.shadow = shadow;
		self.dispatch(Hook::ApplyColour);
	}

	pub fn set_editable(&mut self, editable: bool) {
		if self.attrs.editable == editable {
			return;
		}
		self.attrs.editable = editable;
		self.dispatch(Hook::UpdateEditable);
	}

	/// Collapses or expands the block.
	///
	/// Icon notification is deferred to the next workspace flush; toggles in
	/// between coalesce into one `update_collapsed` per icon.
	pub fn set_collapsed(&mut self, collapsed: bool) {
		if self.attrs.collapsed == collapsed {
			return;
		}
		self.attrs.collapsed = collapsed;
		if self.is_rendered() && !self.collapse_pending {
			self.collapse_pending = true;
			self.deferred.schedule(self.id);
		}
	}

	pub(crate) fn flush_collapsed(&mut self) -> bool {
		if !std::mem::take(&mut self.collapse_pending) {
			return false;
		}
		self.dispatch(Hook::UpdateCollapsed);
		true
	}

	/// Text of the attached comment, if any.
	pub fn comment_text(&self) -> Option<&str> {
		self.icon_as::<CommentIcon>(&IconType::COMMENT)
			.map(CommentIcon::text)
	}

	/// Sets the comment text, creating or removing the comment icon.
	pub fn set_comment_text(&mut self, text: Option<&str>) {
		let Some(text) = text else {
			self.remove_icon(&IconType::COMMENT);
			return;
		};
		if let Some(comment) = self.icon_as_mut::<CommentIcon>(&IconType::COMMENT) {
			comment.set_text(text);
			return;
		}
		self.add_icon(Box::new(CommentIcon::with_config(
			text,
			self.comment_defaults,
		)));
	}

	/// Sets or clears the warning raised under `id`.
	///
	/// The warning icon is created on the first warning and removed with the
	/// last one.
	pub fn set_warning_text(&mut self, text: Option<&str>, id: &str) {
		if let Some(warning) = self.icon_as_mut::<WarningIcon>(&IconType::WARNING) {
			warning.set_text(id, text);
			if warning.is_empty() {
				self.remove_icon(&IconType::WARNING);
			}
			return;
		}
		if text.is_some() {
			let mut warning = WarningIcon::new();
			warning.set_text(id, text);
			self.add_icon(Box::new(warning));
		}
	}

	/// Detaches and disposes every icon. The block is unusable afterwards.
	pub fn dispose(&mut self) {
		if self.disposed {
			return;
		}
		for mut icon in self.icons.drain() {
			icon.detach();
			icon.dispose();
		}
		self.collapse_pending = false;
		self.disposed = true;
		debug!(block = %self.id, "block.dispose");
	}
}
