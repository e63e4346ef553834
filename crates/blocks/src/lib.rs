//! Icons attached to editable blocks.
//!
//! A [`Block`] owns zero or more [`Icon`]s, at most one per [`IconType`].
//! The block forwards its visual state changes to attached icons, but only
//! once it has a view: headless blocks never run view hooks. Icons opt into
//! persistence and context menus through capability probes rather than a
//! shared base type.
//!
//! # Modules
//!
//! - [`icon`] - the icon contract, capabilities and built-in icons
//! - [`registry`] - type key to factory map used to rebuild icons on load
//! - [`block`] - blocks, their attributes and hook dispatch
//! - [`workspace`] - block ownership and the deferred dispatch loop
//! - [`serialization`] - block envelopes and the icon state map
//! - [`context_menu`] - icon to block menu delegation and default options

pub mod block;
pub mod config;
pub mod context_menu;
mod error;
pub mod icon;
pub mod registry;
mod scheduler;
pub mod serialization;
pub mod workspace;

pub use block::{Block, BlockAttributes, BlockId, Colour, MANUALLY_DISABLED, RenderState};
pub use config::{CommentConfig, Config, RegistryConfig};
pub use context_menu::{BlockOptions, MenuTarget, default_block_options};
pub use error::{Error, MalformedStateError, Result, UnregisteredIconError};
pub use icon::{
	CommentIcon, ContextMenuIcon, Icon, IconHandle, IconType, IconView, SerializableIcon,
	WarningIcon,
};
pub use registry::{DuplicatePolicy, IconFactory, IconRegistry, InsertAction, ScopedRegistration};
pub use scheduler::DeferredQueue;
pub use serialization::{BlockState, IconStates};
pub use workspace::{Workspace, WorkspaceKind};
