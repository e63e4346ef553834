//! Per-block icon storage, keyed by type and ordered by attach time.

use indexmap::IndexMap;

use crate::block::BlockAttributes;
use crate::icon::{Icon, IconType};

/// View hooks a block forwards to its icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hook {
	InitView,
	ApplyColour,
	UpdateEditable,
	UpdateCollapsed,
}

impl Hook {
	pub(crate) fn name(self) -> &'static str {
		match self {
			Hook::InitView => "init_view",
			Hook::ApplyColour => "apply_colour",
			Hook::UpdateEditable => "update_editable",
			Hook::UpdateCollapsed => "update_collapsed",
		}
	}

	pub(crate) fn call(self, icon: &mut dyn Icon, attrs: &BlockAttributes) {
		match self {
			Hook::InitView => icon.init_view(attrs),
			Hook::ApplyColour => icon.apply_colour(attrs),
			Hook::UpdateEditable => icon.update_editable(attrs),
			Hook::UpdateCollapsed => icon.update_collapsed(attrs),
		}
	}
}

#[derive(Default)]
pub(crate) struct IconCollection {
	icons: IndexMap<IconType, Box<dyn Icon>>,
}

impl IconCollection {
	/// Appends an icon. The caller has already removed any icon of the same
	/// type, so the new one always lands last.
	pub(crate) fn push(&mut self, icon: Box<dyn Icon>) -> &mut (dyn Icon + 'static) {
		let (index, _) = self.icons.insert_full(icon.icon_type(), icon);
		&mut *self.icons[index]
	}

	/// Removes an icon, preserving the order of the rest.
	pub(crate) fn remove(&mut self, icon_type: &str) -> Option<Box<dyn Icon>> {
		self.icons.shift_remove(icon_type)
	}

	pub(crate) fn get(&self, icon_type: &str) -> Option<&(dyn Icon + 'static)> {
		self.icons.get(icon_type).map(|icon| &**icon)
	}

	pub(crate) fn get_mut(&mut self, icon_type: &str) -> Option<&mut (dyn Icon + 'static)> {
		self.icons.get_mut(icon_type).map(|icon| &mut **icon)
	}

	pub(crate) fn iter(&self) -> impl Iterator<Item = &(dyn Icon + 'static)> {
		self.icons.values().map(|icon| &**icon)
	}

	pub(crate) fn types(&self) -> impl Iterator<Item = &IconType> {
		self.icons.keys()
	}

	pub(crate) fn len(&self) -> usize {
		self.icons.len()
	}

	pub(crate) fn drain(&mut self) -> impl Iterator<Item = Box<dyn Icon>> + '_ {
		self.icons.drain(..).map(|(_, icon)| icon)
	}

	pub(crate) fn dispatch(&mut self, hook: Hook, attrs: &BlockAttributes) {
		for icon in self.icons.values_mut() {
			hook.call(&mut **icon, attrs);
		}
	}
}
