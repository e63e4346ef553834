//! Shared fixtures: a configurable icon that records every call it gets.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use tessel_blocks::{
	BlockAttributes, BlockId, ContextMenuIcon, Icon, IconType, MalformedStateError,
	SerializableIcon,
};
use tessel_menus::{MenuHost, MenuItem, MenuTrigger};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
	pub icon: String,
	pub hook: &'static str,
	pub collapsed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
	pub fn hooks(&self) -> Vec<&'static str> {
		self.0.borrow().iter().map(|call| call.hook).collect()
	}

	pub fn count(&self, hook: &str) -> usize {
		self.0.borrow().iter().filter(|call| call.hook == hook).count()
	}

	pub fn calls(&self) -> Vec<Call> {
		self.0.borrow().clone()
	}

	pub fn clear(&self) {
		self.0.borrow_mut().clear();
	}

	fn push(&self, icon: &IconType, hook: &'static str, collapsed: bool) {
		self.0.borrow_mut().push(Call {
			icon: icon.to_string(),
			hook,
			collapsed,
		});
	}
}

/// Icon with switchable capabilities.
pub struct Spy {
	icon_type: IconType,
	owner: Option<BlockId>,
	log: CallLog,
	/// Serializable when set.
	pub state: Option<Value>,
	/// Context-menu capable when set; each entry is `(label, command)`.
	pub menu: Option<Vec<(&'static str, &'static str)>>,
}

impl Spy {
	pub fn new(icon_type: &'static str, log: &CallLog) -> Self {
		Self {
			icon_type: IconType::from_static(icon_type),
			owner: None,
			log: log.clone(),
			state: None,
			menu: None,
		}
	}

	pub fn serializable(mut self, state: Value) -> Self {
		self.state = Some(state);
		self
	}

	pub fn with_menu(mut self, entries: Vec<(&'static str, &'static str)>) -> Self {
		self.menu = Some(entries);
		self
	}

	pub fn boxed(self) -> Box<dyn Icon> {
		Box::new(self)
	}

	fn record(&self, hook: &'static str, block: &BlockAttributes) {
		self.log.push(&self.icon_type, hook, block.is_collapsed());
	}
}

impl Icon for Spy {
	fn icon_type(&self) -> IconType {
		self.icon_type.clone()
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
		self.record("init_view", block);
	}

	fn apply_colour(&mut self, block: &BlockAttributes) {
		self.record("apply_colour", block);
	}

	fn update_editable(&mut self, block: &BlockAttributes) {
		self.record("update_editable", block);
	}

	fn update_collapsed(&mut self, block: &BlockAttributes) {
		self.record("update_collapsed", block);
	}

	fn as_serializable(&self) -> Option<&dyn SerializableIcon> {
		self.state.as_ref().map(|_| self as &dyn SerializableIcon)
	}

	fn as_serializable_mut(&mut self) -> Option<&mut dyn SerializableIcon> {
		if self.state.is_some() {
			Some(self)
		} else {
			None
		}
	}

	fn as_context_menu(&self) -> Option<&dyn ContextMenuIcon> {
		self.menu.as_ref().map(|_| self as &dyn ContextMenuIcon)
	}

	fn as_context_menu_mut(&mut self) -> Option<&mut dyn ContextMenuIcon> {
		if self.menu.is_some() {
			Some(self)
		} else {
			None
		}
	}
}

impl SerializableIcon for Spy {
	fn save_state(&self) -> Value {
		self.state.clone().unwrap_or(Value::Null)
	}

	fn load_state(&mut self, state: Value) -> Result<(), MalformedStateError> {
		if state.is_null() {
			return Err(MalformedStateError::new(self.icon_type.clone(), "null state"));
		}
		self.state = Some(state);
		Ok(())
	}
}

impl ContextMenuIcon for Spy {
	fn show_context_menu(&self, trigger: &MenuTrigger, host: &mut MenuHost) {
		let items = self
			.menu
			.iter()
			.flatten()
			.map(|(label, command)| MenuItem::new(*label, *command))
			.collect();
		host.show(items, trigger.location);
	}

	fn run_menu_command(&mut self, command: &str) -> bool {
		let hook = match command {
			"spy.poke" => "command:spy.poke",
			_ => return false,
		};
		self.log.push(&self.icon_type, hook, false);
		true
	}
}

/// Factory for serializable spies of `icon_type`.
///
/// Factories are `Send + Sync`, so each spawned icon gets its own log.
pub fn serializable_spy(
	icon_type: &'static str,
) -> impl Fn(BlockId) -> Box<dyn Icon> + Send + Sync + 'static {
	move |_| {
		Spy::new(icon_type, &CallLog::default())
			.serializable(Value::Null)
			.boxed()
	}
}
