//! Dynamic view registry.
//!
//! Every channel is mirrored by one host UI extension. The host wants a
//! distinct static type per surface, so a [`ViewFactory`] turns each channel id
//! into a [`ViewSpec`] carrying a unique type name, and the host adapter maps
//! that name onto whatever type machinery it has.
//!
//! The registry's own bookkeeping is the source of truth for what is
//! registered; the host is only probed to confirm liveness.

use indexmap::IndexMap;

use crate::error::EngineError;
use crate::host::PresentationLayer;
use crate::types::{ChannelId, DocumentId, EntityRef, LightEntity};

/// Everything a host needs to materialize one channel surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSpec {
	/// Channel the view mirrors; also the registry key.
	pub channel: ChannelId,
	/// Unique static type discriminator handed to the host.
	pub type_name: String,
	/// Header label, taken from the entity name at registration time.
	pub label: String,
	/// Entity the surface edits.
	pub entity: EntityRef,
}

/// Builds view specs for channels.
pub trait ViewFactory {
	fn build(&self, channel: ChannelId, light: &LightEntity) -> ViewSpec;
}

/// Factory naming each view `<prefix><channel token>`.
#[derive(Debug, Clone)]
pub struct PrefixedViewFactory {
	prefix: String,
}

impl PrefixedViewFactory {
	pub fn new(prefix: impl Into<String>) -> Self {
		Self { prefix: prefix.into() }
	}
}

impl ViewFactory for PrefixedViewFactory {
	fn build(&self, channel: ChannelId, light: &LightEntity) -> ViewSpec {
		ViewSpec {
			channel,
			type_name: format!("{}{}", self.prefix, channel),
			label: light.name.clone(),
			entity: light.id,
		}
	}
}

/// Process-wide registry of live channel views.
///
/// Registrations are keyed by channel id only, with no document qualifier.
/// `bound_document` records which document the current set mirrors; it is
/// set by a rebuild and cleared by a purge.
pub struct ViewRegistry {
	factory: Box<dyn ViewFactory>,
	views: IndexMap<ChannelId, ViewSpec>,
	bound_document: Option<DocumentId>,
}

impl std::fmt::Debug for ViewRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViewRegistry")
			.field("views", &self.views)
			.field("bound_document", &self.bound_document)
			.finish_non_exhaustive()
	}
}

impl ViewRegistry {
	pub fn new(factory: Box<dyn ViewFactory>) -> Self {
		Self {
			factory,
			views: IndexMap::new(),
			bound_document: None,
		}
	}

	/// Builds and registers the view for `channel`.
	///
	/// A second registration for the same id is refused before the host is
	/// consulted, so at most one view per id can exist.
	pub fn register<P: PresentationLayer + ?Sized>(&mut self, host: &mut P, channel: ChannelId, light: &LightEntity) -> Result<(), EngineError> {
		if self.views.contains_key(&channel) {
			return Err(EngineError::RegistrationFailure {
				channel,
				reason: "view already registered".to_string(),
			});
		}

		let spec = self.factory.build(channel, light);
		host.register_view(&spec).map_err(|err| EngineError::RegistrationFailure {
			channel,
			reason: err.to_string(),
		})?;

		tracing::debug!(%channel, type_name = %spec.type_name, label = %spec.label, "view.register");
		self.views.insert(channel, spec);
		Ok(())
	}

	/// Forgets and deregisters the view for `channel`.
	///
	/// Bookkeeping is dropped even when the host call fails, since the host
	/// no longer holds a usable instance either way.
	pub fn unregister<P: PresentationLayer + ?Sized>(&mut self, host: &mut P, channel: ChannelId) -> Result<(), EngineError> {
		let Some(spec) = self.views.shift_remove(&channel) else {
			return Err(EngineError::RegistrationFailure {
				channel,
				reason: "no view registered".to_string(),
			});
		};

		tracing::debug!(%channel, type_name = %spec.type_name, "view.unregister");
		host.unregister_view(&spec).map_err(|err| EngineError::RegistrationFailure {
			channel,
			reason: err.to_string(),
		})
	}

	/// Returns true when the registry holds a view for `channel` that the host still reports live.
	pub fn is_registered<P: PresentationLayer + ?Sized>(&self, host: &P, channel: ChannelId) -> bool {
		self.views.get(&channel).is_some_and(|spec| host.view_alive(&spec.type_name))
	}

	/// Unregisters every known view, newest first, and unbinds the registry.
	///
	/// Returns the failures so the caller can schedule reconciliation.
	pub fn purge<P: PresentationLayer + ?Sized>(&mut self, host: &mut P) -> Vec<EngineError> {
		let ids: Vec<ChannelId> = self.views.keys().rev().copied().collect();
		tracing::debug!(count = ids.len(), "view.purge");

		let failures = ids.into_iter().filter_map(|id| self.unregister(host, id).err()).collect();
		self.bound_document = None;
		failures
	}

	/// Marks the registrations as mirroring `doc`.
	pub fn bind(&mut self, doc: DocumentId) {
		self.bound_document = Some(doc);
	}

	/// Drops the document binding without touching registrations.
	///
	/// The next sweep treats every registration as stray and skips the view
	/// check until a rebuild binds the registry again.
	pub fn unbind(&mut self) {
		self.bound_document = None;
	}

	pub fn bound_document(&self) -> Option<DocumentId> {
		self.bound_document
	}

	pub fn contains(&self, channel: ChannelId) -> bool {
		self.views.contains_key(&channel)
	}

	pub fn get(&self, channel: ChannelId) -> Option<&ViewSpec> {
		self.views.get(&channel)
	}

	/// Registered channel ids in registration order.
	pub fn ids(&self) -> impl Iterator<Item = ChannelId> + '_ {
		self.views.keys().copied()
	}

	pub fn specs(&self) -> impl Iterator<Item = &ViewSpec> {
		self.views.values()
	}

	pub fn len(&self) -> usize {
		self.views.len()
	}

	pub fn is_empty(&self) -> bool {
		self.views.is_empty()
	}
}
