//! Icon type registry.
//!
//! Maps an [`IconType`] to the factory that builds icons of that type. Block
//! loading resolves every key of a saved icon map through a registry, so any
//! code that registers a type before loading makes that type loadable.
//!
//! Registries are explicit values; [`IconRegistry::global`] is a lazily
//! built process-wide default carrying the built-in icons. Tests that need a
//! transient entry use [`IconRegistry::scoped`], which restores the previous
//! state when the guard drops.

use std::fmt;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::block::BlockId;
use crate::config::{CommentConfig, Config};
use crate::error::{Error, Result, UnregisteredIconError};
use crate::icon::{CommentIcon, Icon, IconType};


/// Builds an icon for the given owning block.
pub type IconFactory = Arc<dyn Fn(BlockId) -> Box<dyn Icon> + Send + Sync>;

/// What `register` does when the type already has a factory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
	/// Overwrite with the newest factory.
	#[default]
	LastWins,
	/// Keep the factory registered first.
	FirstWins,
	/// Refuse with [`Error::DuplicateIcon`].
	Reject,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAction {
	InsertedNew,
	KeptExisting,
	ReplacedExisting,
}

pub struct IconRegistry {
	factories: RwLock<FxHashMap<IconType, IconFactory>>,
	policy: DuplicatePolicy,
}

impl fmt::Debug for IconRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("IconRegistry")
			.field("types", &self.types())
			.field("policy", &self.policy)
			.finish()
	}
}

impl Default for IconRegistry {
	fn default() -> Self {
		Self::new()
	}
}

static GLOBAL: LazyLock<IconRegistry> = LazyLock::new(IconRegistry::with_builtins);

impl IconRegistry {
	/// An empty registry with last-wins duplicates.
	pub fn new() -> Self {
		Self::with_policy(DuplicatePolicy::default())
	}

	pub fn with_policy(policy: DuplicatePolicy) -> Self {
		Self {
			factories: RwLock::new(FxHashMap::default()),
			policy,
		}
	}

	/// A registry carrying the built-in icons with default settings.
	pub fn with_builtins() -> Self {
		Self::from_config(&Config::default())
	}

	/// A registry with the configured duplicate policy and the built-in icons
	/// using the configured defaults.
	pub fn from_config(config: &Config) -> Self {
		let registry = Self::with_policy(config.registry.duplicates);
		registry.install_builtins(config.comment);
		registry
	}

	/// The process-wide default registry.
	pub fn global() -> &'static IconRegistry {
		&GLOBAL
	}

	fn install_builtins(&self, comment: CommentConfig) {
		let factory: IconFactory = Arc::new(move |_: BlockId| {
			Box::new(CommentIcon::with_config("", comment)) as Box<dyn Icon>
		});
		self.factories.write().insert(IconType::COMMENT, factory);
	}

	#[inline]
	pub fn policy(&self) -> DuplicatePolicy {
		self.policy
	}

	/// Registers `factory` under `icon_type`, subject to the duplicate policy.
	pub fn register<F>(&self, icon_type: impl Into<IconType>, factory: F) -> Result<InsertAction>
	where
		F: Fn(BlockId) -> Box<dyn Icon> + Send + Sync + 'static,
	{
		self.register_factory(icon_type, Arc::new(factory))
	}

	pub fn register_factory(
		&self,
		icon_type: impl Into<IconType>,
		factory: IconFactory,
	) -> Result<InsertAction> {
		let icon_type = icon_type.into();
		let mut factories = self.factories.write();

		if !factories.contains_key(&icon_type) {
			debug!(icon = %icon_type, "icon_registry.register");
			factories.insert(icon_type, factory);
			return Ok(InsertAction::InsertedNew);
		}

		match self.policy {
			DuplicatePolicy::LastWins => {
				debug!(icon = %icon_type, "icon_registry.overwrite");
				factories.insert(icon_type, factory);
				Ok(InsertAction::ReplacedExisting)
			}
			DuplicatePolicy::FirstWins => {
				debug!(icon = %icon_type, "icon_registry.keep_existing");
				Ok(InsertAction::KeptExisting)
			}
			DuplicatePolicy::Reject => Err(Error::DuplicateIcon(icon_type)),
		}
	}

	/// Removes the factory for `icon_type`. Returns whether one was present.
	pub fn unregister(&self, icon_type: &str) -> bool {
		if self.factories.write().remove(icon_type).is_some() {
			debug!(icon = icon_type, "icon_registry.unregister");
			true
		} else {
			warn!(icon = icon_type, "icon_registry.unregister_unknown");
			false
		}
	}

	pub fn resolve(&self, icon_type: &str) -> Result<IconFactory, UnregisteredIconError> {
		self.factories
			.read()
			.get(icon_type)
			.cloned()
			.ok_or_else(|| UnregisteredIconError {
				icon_type: IconType::new(icon_type.to_string()),
			})
	}

	/// Builds a fresh icon of `icon_type` attached to `block`.
	///
	/// Fails if the type is unknown, or if the factory produced an icon whose
	/// own type differs from `icon_type`; such an icon would land under a
	/// different key on the block than the one it was loaded from.
	pub fn instantiate(&self, icon_type: &str, block: BlockId) -> Result<Box<dyn Icon>> {
		// Factory runs outside the lock so it may itself consult the registry.
		let factory = self.resolve(icon_type)?;
		let mut icon = factory(block);
		let produced = icon.icon_type();
		if produced.as_str() != icon_type {
			warn!(
				registered = icon_type,
				produced = %produced,
				"icon_registry.type_mismatch"
			);
			icon.dispose();
			return Err(Error::IconTypeMismatch {
				registered: IconType::new(icon_type.to_string()),
				produced,
			});
		}
		icon.attach(block);
		Ok(icon)
	}

	pub fn contains(&self, icon_type: &str) -> bool {
		self.factories.read().contains_key(icon_type)
	}

	/// Registered types, sorted.
	pub fn types(&self) -> Vec<IconType> {
		let mut types: Vec<_> = self.factories.read().keys().cloned().collect();
		types.sort();
		types
	}

	pub fn len(&self) -> usize {
		self.factories.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.factories.read().is_empty()
	}

	/// Installs `factory` until the returned guard drops, regardless of the
	/// duplicate policy. Whatever was registered before is restored.
	pub fn scoped<F>(&self, icon_type: impl Into<IconType>, factory: F) -> ScopedRegistration<'_>
	where
		F: Fn(BlockId) -> Box<dyn Icon> + Send + Sync + 'static,
	{
		let icon_type = icon_type.into();
		let previous = self
			.factories
			.write()
			.insert(icon_type.clone(), Arc::new(factory));
		debug!(icon = %icon_type, shadowed = previous.is_some(), "icon_registry.scoped");
		ScopedRegistration {
			registry: self,
			icon_type,
			previous,
		}
	}
}

/// Guard returned by [`IconRegistry::scoped`].
#[must_use = "the registration is undone when the guard drops"]
pub struct ScopedRegistration<'a> {
	registry: &'a IconRegistry,
	icon_type: IconType,
	previous: Option<IconFactory>,
}

impl ScopedRegistration<'_> {
	pub fn icon_type(&self) -> &IconType {
		&self.icon_type
	}
}

impl Drop for ScopedRegistration<'_> {
	fn drop(&mut self) {
		let mut factories = self.registry.factories.write();
		match self.previous.take() {
			Some(previous) => {
				factories.insert(self.icon_type.clone(), previous);
			}
			None => {
				factories.remove(&self.icon_type);
			}
		}
		debug!(icon = %self.icon_type, "icon_registry.scoped_restore");
	}
}
