//! Extensible, priority-ordered context menu options.
//!
//! A [`ContextMenuRegistry`] is keyed by the scope type `S` it is evaluated
//! against. Each [`ContextMenuOption`] decides its label and availability
//! from the scope at query time, so one registration serves every element
//! of that scope.
//!
//! Registration is copy-on-write: readers load an immutable snapshot and
//! never block writers, which makes transient register/unregister pairs
//! from tests cheap and order-independent for disjoint ids.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::{debug, warn};

use crate::error::MenuError;
use crate::item::{MenuItem, Precondition};


/// Computes an option's label for a scope.
pub type LabelFn<S> = Arc<dyn Fn(&S) -> String + Send + Sync>;
/// Computes an option's availability for a scope.
pub type PreconditionFn<S> = Arc<dyn Fn(&S) -> Precondition + Send + Sync>;
/// Runs an option against its scope.
pub type CallbackFn<S> = Arc<dyn Fn(&mut S) + Send + Sync>;

/// A registered option.
pub struct ContextMenuOption<S: ?Sized> {
	/// Unique id; doubles as the command of the produced [`MenuItem`].
	pub id: Cow<'static, str>,
	/// Ordering key (lower = higher in menu). Ties keep registration order.
	pub priority: i16,
	pub label: LabelFn<S>,
	pub precondition: PreconditionFn<S>,
	pub callback: CallbackFn<S>,
}

impl<S: ?Sized> ContextMenuOption<S> {
	/// Creates an option that is always enabled.
	pub fn new(
		id: impl Into<Cow<'static, str>>,
		priority: i16,
		label: impl Fn(&S) -> String + Send + Sync + 'static,
		callback: impl Fn(&mut S) + Send + Sync + 'static,
	) -> Self {
		Self {
			id: id.into(),
			priority,
			label: Arc::new(label),
			precondition: Arc::new(|_: &S| Precondition::Enabled),
			callback: Arc::new(callback),
		}
	}

	/// Replaces the availability check.
	pub fn with_precondition(
		mut self,
		precondition: impl Fn(&S) -> Precondition + Send + Sync + 'static,
	) -> Self {
		self.precondition = Arc::new(precondition);
		self
	}

	/// Resolves this option against `scope`, or `None` if hidden.
	pub fn to_item(&self, scope: &S) -> Option<MenuItem> {
		let enabled = match (self.precondition)(scope) {
			Precondition::Enabled => true,
			Precondition::Disabled => false,
			Precondition::Hidden => return None,
		};
		Some(MenuItem {
			label: (self.label)(scope),
			enabled,
			command: self.id.clone(),
		})
	}
}

impl<S: ?Sized> fmt::Debug for ContextMenuOption<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContextMenuOption")
			.field("id", &self.id)
			.field("priority", &self.priority)
			.finish_non_exhaustive()
	}
}

struct Snapshot<S: ?Sized> {
	options: Vec<Arc<ContextMenuOption<S>>>,
}

impl<S: ?Sized> Clone for Snapshot<S> {
	fn clone(&self) -> Self {
		Self {
			options: self.options.clone(),
		}
	}
}

impl<S: ?Sized> Snapshot<S> {
	fn get(&self, id: &str) -> Option<&Arc<ContextMenuOption<S>>> {
		self.options.iter().find(|o| o.id == id)
	}

	fn insert(&mut self, option: Arc<ContextMenuOption<S>>) {
		let pos = self
			.options
			.partition_point(|o| o.priority <= option.priority);
		self.options.insert(pos, option);
	}
}

/// Options available for scope `S`, in priority order.
pub struct ContextMenuRegistry<S: ?Sized> {
	snap: ArcSwap<Snapshot<S>>,
}

impl<S: ?Sized> Default for ContextMenuRegistry<S> {
	fn default() -> Self {
		Self {
			snap: ArcSwap::from_pointee(Snapshot {
				options: Vec::new(),
			}),
		}
	}
}

impl<S: ?Sized> ContextMenuRegistry<S> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an option. Ids are unique; a second registration is rejected.
	pub fn register(&self, option: ContextMenuOption<S>) -> Result<(), MenuError> {
		let option = Arc::new(option);
		loop {
			let cur = self.snap.load_full();
			if cur.get(&option.id).is_some() {
				return Err(MenuError::DuplicateItem {
					id: option.id.to_string(),
				});
			}

			let mut next = (*cur).clone();
			next.insert(option.clone());

			let prev = self.snap.compare_and_swap(&cur, Arc::new(next));
			if Arc::ptr_eq(&prev, &cur) {
				debug!(id = %option.id, priority = option.priority, "menu_option.register");
				return Ok(());
			}
		}
	}

	/// Removes an option. Returns false if no option had this id.
	pub fn unregister(&self, id: &str) -> bool {
		loop {
			let cur = self.snap.load_full();
			let Some(pos) = cur.options.iter().position(|o| o.id == id) else {
				warn!(id, "menu_option.unregister: not registered");
				return false;
			};

			let mut next = (*cur).clone();
			next.options.remove(pos);

			let prev = self.snap.compare_and_swap(&cur, Arc::new(next));
			if Arc::ptr_eq(&prev, &cur) {
				debug!(id, "menu_option.unregister");
				return true;
			}
		}
	}

	pub fn get(&self, id: &str) -> Option<Arc<ContextMenuOption<S>>> {
		self.snap.load().get(id).cloned()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.snap.load().get(id).is_some()
	}

	/// Ids of all options in priority order.
	pub fn ids(&self) -> Vec<String> {
		self.snap
			.load()
			.options
			.iter()
			.map(|o| o.id.to_string())
			.collect()
	}

	pub fn len(&self) -> usize {
		self.snap.load().options.len()
	}

	pub fn is_empty(&self) -> bool {
		self.snap.load().options.is_empty()
	}

	/// Resolves every option against `scope`, dropping hidden ones.
	pub fn options_for(&self, scope: &S) -> Vec<MenuItem> {
		let snap = self.snap.load_full();
		snap.options.iter().filter_map(|o| o.to_item(scope)).collect()
	}

	/// Runs the option `id` against `scope` if it is currently enabled.
	///
	/// Returns whether the callback ran. The snapshot is released before the
	/// callback, so callbacks may register or unregister options.
	pub fn run(&self, id: &str, scope: &mut S) -> bool {
		let Some(option) = self.get(id) else {
			return false;
		};
		if (option.precondition)(scope) != Precondition::Enabled {
			debug!(id, "menu_option.run: not enabled");
			return false;
		}
		(option.callback)(scope);
		true
	}
}
