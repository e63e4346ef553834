//! Block envelopes and the icon state map.
//!
//! A saved block is a [`BlockState`]. Icon state lives under the reserved
//! `icons` key as a map from icon type to whatever the icon's
//! [`SerializableIcon::save_state`](crate::SerializableIcon::save_state)
//! produced. The key is omitted entirely when no attached icon is
//! serializable.
//!
//! ```json
//! {"type": "text_print", "collapsed": true, "icons": {"comment": "hi"}}
//! ```
//!
//! Loading resolves every icon type through an [`IconRegistry`]. An unknown
//! type fails the load with [`UnregisteredIconError`](crate::UnregisteredIconError),
//! and so does a factory that builds an icon of some other type, which would
//! otherwise displace an icon already loaded under that type.
//! [`load_icons`] keeps whatever it attached before the failing entry;
//! [`append`] disposes and removes the half-built block instead.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::block::{Block, BlockId};
use crate::error::Result;
use crate::icon::IconType;
use crate::registry::IconRegistry;
use crate::workspace::{Workspace, WorkspaceKind};


/// Saved icon states keyed by type, in attach order.
pub type IconStates = IndexMap<IconType, Value>;

/// Persisted form of one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockState {
	#[serde(rename = "type")]
	pub block_type: String,
	#[serde(default, skip_serializing_if = "is_false")]
	pub collapsed: bool,
	#[serde(default = "default_true", skip_serializing_if = "is_true")]
	pub editable: bool,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub disabled_reasons: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub icons: Option<IconStates>,
}

fn is_false(value: &bool) -> bool {
	!*value
}

fn is_true(value: &bool) -> bool {
	*value
}

fn default_true() -> bool {
	true
}

impl BlockState {
	pub fn new(block_type: impl Into<String>) -> Self {
		Self {
			block_type: block_type.into(),
			collapsed: false,
			editable: true,
			disabled_reasons: Vec::new(),
			icons: None,
		}
	}
}

/// Saves the state of every serializable icon on `block`.
///
/// Returns `None` when there is nothing to save, so callers never write an
/// empty map.
pub fn save_icons(block: &Block) -> Option<IconStates> {
	let states: IconStates = block
		.icons()
		.filter_map(|icon| {
			let state = icon.as_serializable()?.save_state();
			Some((icon.icon_type(), state))
		})
		.collect();
	(!states.is_empty()).then_some(states)
}

/// Instantiates and restores every icon in `states` onto `block`.
///
/// Entries are processed in map order. On the first error the call returns
/// it; icons attached by earlier entries remain on the block. Saved state
/// for an icon that turns out not to be serializable is skipped.
pub fn load_icons(states: &IconStates, block: &mut Block, registry: &IconRegistry) -> Result<()> {
	let block_id = block.id();
	for (icon_type, state) in states {
		let icon = registry.instantiate(icon_type, block_id)?;
		let icon = block.add_icon(icon);
		match icon.as_serializable_mut() {
			Some(serializable) => serializable.load_state(state.clone())?,
			None => warn!(
				block = %block_id,
				icon = %icon_type,
				"icon.load_state: icon is not serializable"
			),
		}
	}
	Ok(())
}

/// Captures `block` as an envelope.
pub fn save(block: &Block) -> BlockState {
	let attrs = block.attributes();
	BlockState {
		block_type: block.block_type().to_string(),
		collapsed: attrs.is_collapsed(),
		editable: attrs.is_editable(),
		disabled_reasons: attrs.disabled_reasons().map(str::to_string).collect(),
		icons: save_icons(block),
	}
}

/// Creates a block in `workspace` from `state`.
///
/// Attributes are applied first, then icons. If anything fails the new block
/// is disposed and removed, so no icon from a failed load is left attached.
/// Blocks appended to a rendered workspace are rendered once loaded.
pub fn append(
	state: &BlockState,
	workspace: &mut Workspace,
	registry: &IconRegistry,
) -> Result<BlockId> {
	let id = workspace.new_block(state.block_type.as_str());
	if let Err(err) = restore(state, id, workspace, registry) {
		debug!(block = %id, error = %err, "block.append_failed");
		workspace.dispose_block(id);
		return Err(err);
	}
	Ok(id)
}

fn restore(
	state: &BlockState,
	id: BlockId,
	workspace: &mut Workspace,
	registry: &IconRegistry,
) -> Result<()> {
	let render = workspace.kind() == WorkspaceKind::Rendered;
	let block = workspace.try_block_mut(id)?;

	block.set_collapsed(state.collapsed);
	block.set_editable(state.editable);
	for reason in &state.disabled_reasons {
		block.set_disabled_reason(true, reason);
	}
	if let Some(icons) = &state.icons {
		load_icons(icons, block, registry)?;
	}
	if render {
		block.init_view()?;
	}
	Ok(())
}

pub fn save_json(block: &Block) -> Result<String> {
	Ok(serde_json::to_string(&save(block))?)
}

pub fn append_json(
	source: &str,
	workspace: &mut Workspace,
	registry: &IconRegistry,
) -> Result<BlockId> {
	let state: BlockState = serde_json::from_str(source)?;
	append(&state, workspace, registry)
}
