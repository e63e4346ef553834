//! Context menu primitives.
//!
//! This crate is deliberately ignorant of what a menu is opened on. It
//! provides:
//!
//! - [`MenuItem`] and [`MenuTrigger`]: what a menu shows and what opened it
//! - [`ContextMenuRegistry`]: an extensible, priority-ordered set of options
//!   evaluated against a caller-supplied scope
//! - [`MenuHost`]: the single visible menu; showing a new one replaces the old

mod error;
mod host;
mod item;
mod registry;

pub use error::MenuError;
pub use host::{ContextMenu, MenuHost, MenuId};
pub use item::{MenuItem, MenuTrigger, Point, Precondition, TriggerSource};
pub use registry::{
	CallbackFn, ContextMenuOption, ContextMenuRegistry, LabelFn, PreconditionFn,
};

/// Result alias for menu operations.
pub type Result<T, E = MenuError> = std::result::Result<T, E>;
