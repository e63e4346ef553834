//! Deferred work queue shared between a workspace and its blocks.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::block::BlockId;

/// Blocks with a pending collapse notification.
///
/// Each block schedules itself at most once per flush; the workspace drains
/// the queue in [`Workspace::run_deferred`](crate::Workspace::run_deferred).
#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
	pending: Rc<RefCell<Vec<BlockId>>>,
}

impl DeferredQueue {
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn schedule(&self, block: BlockId) {
		trace!(block = %block, "deferred.schedule");
		self.pending.borrow_mut().push(block);
	}

	/// Takes everything scheduled so far, in scheduling order.
	pub(crate) fn take(&self) -> Vec<BlockId> {
		std::mem::take(&mut *self.pending.borrow_mut())
	}

	pub fn len(&self) -> usize {
		self.pending.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.pending.borrow().is_empty()
	}
}
