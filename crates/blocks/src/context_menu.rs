//! Context menu delegation.
//!
//! A trigger on an icon that has the [`ContextMenuIcon`](crate::ContextMenuIcon)
//! capability opens that icon's own menu. Anything else (a plain icon, or the
//! block surface itself) falls back to the block's options, evaluated
//! against the block through a [`BlockOptions`] registry.
//!
//! The workspace remembers which element owns the visible menu so that
//! [`Workspace::activate_menu_item`] can route the chosen command back.

use std::sync::LazyLock;

use tessel_menus::{
	ContextMenuOption, ContextMenuRegistry, MenuError, MenuHost, MenuId, MenuItem, MenuTrigger,
	Precondition,
};
use tracing::{debug, warn};

use crate::block::{Block, BlockId, MANUALLY_DISABLED};
use crate::error::{Error, Result};
use crate::icon::IconHandle;
use crate::workspace::Workspace;

/// Options registry evaluated against a block.
pub type BlockOptions = ContextMenuRegistry<Block>;

pub const COMMENT_OPTION: &str = "blockComment";
pub const COLLAPSE_OPTION: &str = "blockCollapseExpand";
pub const DISABLE_OPTION: &str = "blockDisable";
pub const DELETE_OPTION: &str = "blockDelete";

/// The element a menu trigger was aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuTarget {
	Block(BlockId),
	Icon(IconHandle),
}

impl MenuTarget {
	/// The block that owns the target.
	pub fn block(&self) -> BlockId {
		match self {
			MenuTarget::Block(id) => *id,
			MenuTarget::Icon(handle) => handle.block,
		}
	}
}

impl From<IconHandle> for MenuTarget {
	fn from(handle: IconHandle) -> Self {
		MenuTarget::Icon(handle)
	}
}

impl From<BlockId> for MenuTarget {
	fn from(id: BlockId) -> Self {
		MenuTarget::Block(id)
	}
}

/// Registers the built-in block options.
pub fn register_default_block_options(options: &BlockOptions) -> Result<(), MenuError> {
	options.register(
		ContextMenuOption::new(
			COMMENT_OPTION,
			2,
			|block: &Block| {
				if block.comment_text().is_some() {
					"Remove Comment".to_string()
				} else {
					"Add Comment".to_string()
				}
			},
			|block: &mut Block| {
				if block.comment_text().is_some() {
					block.set_comment_text(None);
				} else {
					block.set_comment_text(Some(""));
				}
			},
		)
		.with_precondition(|block: &Block| {
			let attrs = block.attributes();
			if attrs.is_editable() && !attrs.is_collapsed() {
				Precondition::Enabled
			} else {
				Precondition::Hidden
			}
		}),
	)?;

	options.register(
		ContextMenuOption::new(
			COLLAPSE_OPTION,
			4,
			|block: &Block| {
				if block.attributes().is_collapsed() {
					"Expand Block".to_string()
				} else {
					"Collapse Block".to_string()
				}
			},
			|block: &mut Block| {
				let collapsed = block.attributes().is_collapsed();
				block.set_collapsed(!collapsed);
			},
		)
		.with_precondition(|block: &Block| {
			if block.attributes().is_shadow() {
				Precondition::Hidden
			} else {
				Precondition::Enabled
			}
		}),
	)?;

	options.register(
		ContextMenuOption::new(
			DISABLE_OPTION,
			5,
			|block: &Block| {
				if block.attributes().has_disabled_reason(MANUALLY_DISABLED) {
					"Enable Block".to_string()
				} else {
					"Disable Block".to_string()
				}
			},
			|block: &mut Block| {
				let disabled = block.attributes().has_disabled_reason(MANUALLY_DISABLED);
				block.set_disabled_reason(!disabled, MANUALLY_DISABLED);
			},
		)
		.with_precondition(|block: &Block| {
			let attrs = block.attributes();
			if attrs.is_shadow() {
				Precondition::Hidden
			} else if attrs.is_editable() {
				Precondition::Enabled
			} else {
				Precondition::Disabled
			}
		}),
	)?;

	options.register(
		ContextMenuOption::new(
			DELETE_OPTION,
			6,
			|_: &Block| "Delete Block".to_string(),
			|block: &mut Block| block.dispose(),
		)
		.with_precondition(|block: &Block| {
			let attrs = block.attributes();
			if attrs.is_shadow() {
				Precondition::Hidden
			} else if attrs.is_editable() {
				Precondition::Enabled
			} else {
				Precondition::Disabled
			}
		}),
	)?;

	Ok(())
}

static DEFAULT_OPTIONS: LazyLock<BlockOptions> = LazyLock::new(|| {
	let options = BlockOptions::new();
	if let Err(err) = register_default_block_options(&options) {
		warn!(error = %err, "menu_option.defaults");
	}
	options
});

/// Process-wide block options, pre-populated with the defaults.
pub fn default_block_options() -> &'static BlockOptions {
	&DEFAULT_OPTIONS
}

impl Workspace {
	/// Opens the context menu for `target` on `host`.
	///
	/// An icon with its own menu shows it; every other target falls back to
	/// the owning block's `options`. Returns the id of the menu shown, or
	/// `None` if there was nothing to show.
	pub fn show_context_menu(
		&mut self,
		target: impl Into<MenuTarget>,
		trigger: &MenuTrigger,
		host: &mut MenuHost,
		options: &BlockOptions,
	) -> Result<Option<MenuId>> {
		let target = target.into();
		let block = self.try_block(target.block())?;

		if let MenuTarget::Icon(handle) = &target
			&& let Some(menu) = block
				.icon(&handle.icon_type)
				.and_then(|icon| icon.as_context_menu())
		{
			debug!(block = %handle.block, icon = %handle.icon_type, "menu.delegate_icon");
			let before = host.visible().map(|menu| menu.id);
			menu.show_context_menu(trigger, host);
			let shown = host.visible().map(|menu| menu.id).filter(|id| Some(*id) != before);
			return Ok(self.record_menu_id(shown, target));
		}

		debug!(block = %block.id(), "menu.delegate_block");
		let items = options.options_for(block);
		let shown = host.show(items, trigger.location);
		// Record against the block, whichever element was clicked.
		Ok(self.record_menu_id(shown, MenuTarget::Block(target.block())))
	}

	fn record_menu_id(&mut self, shown: Option<MenuId>, target: MenuTarget) -> Option<MenuId> {
		self.menu_target = shown.map(|id| (id, target));
		shown
	}

	/// Activates row `index` of the visible menu and runs its command on
	/// the element that opened it.
	///
	/// Returns the activated item, or `None` if the visible menu was not
	/// opened through this workspace, the row cannot be activated, or the
	/// target block was disposed while the menu was open. A block disposed
	/// by its command is removed from the workspace.
	pub fn activate_menu_item(
		&mut self,
		index: usize,
		host: &mut MenuHost,
		options: &BlockOptions,
	) -> Result<Option<MenuItem>> {
		let Some((menu_id, _)) = &self.menu_target else {
			return Ok(None);
		};
		if host.visible().map(|menu| menu.id) != Some(*menu_id) {
			debug!("menu.activate_foreign");
			self.menu_target = None;
			return Ok(None);
		}
		let Some(item) = host.select(index) else {
			return Ok(None);
		};
		let Some((_, target)) = self.menu_target.take() else {
			return Ok(None);
		};

		let block_id = target.block();
		let block = self
			.block_mut(block_id)
			.ok_or(Error::BlockNotFound(block_id))?;
		if block.is_disposed() {
			debug!(block = %block_id, command = %item.command, "menu.activate_disposed");
			self.remove_disposed(block_id);
			return Ok(None);
		}
		let handled = match &target {
			MenuTarget::Icon(handle) => block
				.icon_mut(&handle.icon_type)
				.and_then(|icon| icon.as_context_menu_mut())
				.is_some_and(|menu| menu.run_menu_command(&item.command)),
			MenuTarget::Block(_) => options.run(&item.command, block),
		};
		debug!(block = %block_id, command = %item.command, handled, "menu.activate");

		self.remove_disposed(block_id);
		Ok(Some(item))
	}
}
