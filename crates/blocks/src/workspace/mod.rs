//! Block ownership and the deferred dispatch loop.
//!
//! A workspace creates blocks, hands each one a clone of its
//! [`DeferredQueue`], and drains that queue in [`Workspace::run_deferred`].
//! The embedding event loop calls `run_deferred` once per batch of
//! synchronous changes.

use indexmap::IndexMap;
use tessel_menus::MenuId;
use tracing::{debug, trace};

use crate::block::{Block, BlockId};
use crate::config::Config;
use crate::context_menu::MenuTarget;
use crate::error::{Error, Result};
use crate::scheduler::DeferredQueue;


/// Whether blocks of a workspace can ever get a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkspaceKind {
	/// Data only; blocks stay headless forever.
	#[default]
	Headless,
	/// Blocks may be rendered with [`Block::init_view`].
	Rendered,
}

#[derive(Debug)]
pub struct Workspace {
	kind: WorkspaceKind,
	blocks: IndexMap<BlockId, Block>,
	next_id: u64,
	deferred: DeferredQueue,
	config: Config,
	/// Element that owns the menu currently shown for this workspace.
	pub(crate) menu_target: Option<(MenuId, MenuTarget)>,
}

impl Workspace {
	pub fn new_headless() -> Self {
		Self::with_config(WorkspaceKind::Headless, Config::default())
	}

	pub fn new_rendered() -> Self {
		Self::with_config(WorkspaceKind::Rendered, Config::default())
	}

	pub fn with_config(kind: WorkspaceKind, config: Config) -> Self {
		Self {
			kind,
			blocks: IndexMap::new(),
			next_id: 1,
			deferred: DeferredQueue::new(),
			config,
			menu_target: None,
		}
	}

	#[inline]
	pub fn kind(&self) -> WorkspaceKind {
		self.kind
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Creates a headless block of `block_type`.
	pub fn new_block(&mut self, block_type: impl Into<String>) -> BlockId {
		let id = BlockId(self.next_id);
		self.next_id += 1;
		let block = Block::new(
			id,
			block_type,
			self.kind == WorkspaceKind::Rendered,
			self.deferred.clone(),
			self.config.comment,
		);
		debug!(block = %id, block_type = block.block_type(), "block.create");
		self.blocks.insert(id, block);
		id
	}

	/// Creates a block and renders it immediately.
	pub fn new_rendered_block(&mut self, block_type: impl Into<String>) -> Result<BlockId> {
		let id = self.new_block(block_type);
		if let Err(err) = self.try_block_mut(id).and_then(Block::init_view) {
			self.dispose_block(id);
			return Err(err);
		}
		Ok(id)
	}

	pub fn block(&self, id: BlockId) -> Option<&Block> {
		self.blocks.get(&id)
	}

	pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
		self.blocks.get_mut(&id)
	}

	pub fn try_block(&self, id: BlockId) -> Result<&Block> {
		self.blocks.get(&id).ok_or(Error::BlockNotFound(id))
	}

	pub fn try_block_mut(&mut self, id: BlockId) -> Result<&mut Block> {
		self.blocks.get_mut(&id).ok_or(Error::BlockNotFound(id))
	}

	/// Disposes and removes a block. Returns false if it was not present.
	pub fn dispose_block(&mut self, id: BlockId) -> bool {
		let Some(mut block) = self.blocks.shift_remove(&id) else {
			return false;
		};
		block.dispose();
		if self
			.menu_target
			.as_ref()
			.is_some_and(|(_, target)| target.block() == id)
		{
			self.menu_target = None;
		}
		true
	}

	/// Blocks in creation order.
	pub fn blocks(&self) -> impl Iterator<Item = &Block> {
		self.blocks.values()
	}

	pub fn len(&self) -> usize {
		self.blocks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}

	pub fn has_pending_work(&self) -> bool {
		!self.deferred.is_empty()
	}

	/// Flushes deferred collapse notifications.
	///
	/// Every scheduled block still in the workspace dispatches
	/// `update_collapsed` once with its current state. Returns the number of
	/// blocks flushed.
	pub fn run_deferred(&mut self) -> usize {
		let pending = self.deferred.take();
		if pending.is_empty() {
			return 0;
		}
		let mut flushed = 0;
		for id in pending {
			match self.blocks.get_mut(&id) {
				Some(block) => {
					if block.flush_collapsed() {
						flushed += 1;
					}
				}
				None => trace!(block = %id, "deferred.drop_stale"),
			}
		}
		trace!(flushed, "deferred.flush");
		flushed
	}

	pub(crate) fn remove_disposed(&mut self, id: BlockId) {
		if self.blocks.get(&id).is_some_and(Block::is_disposed) {
			self.blocks.shift_remove(&id);
			debug!(block = %id, "block.remove");
		}
	}
}
