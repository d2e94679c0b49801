//! In-memory host for headless embedding and tests.
//!
//! Documents hold plain object lists; the presentation layer is a map from
//! type name to spec. Fault injection hooks let callers simulate the host
//! losing views, rejecting registrations, or unloading documents.

use std::time::Duration;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use super::{HostRuntime, PresentationLayer, SceneGraph};
use crate::error::HostError;
use crate::signals::SignalKind;
use crate::types::{DocumentId, EntityRef, LightEntity};
use crate::views::ViewSpec;

/// One object in a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryObject {
	Light(LightEntity),
	Other(EntityRef),
}

impl MemoryObject {
	fn id(&self) -> EntityRef {
		match self {
			MemoryObject::Light(light) => light.id,
			MemoryObject::Other(id) => *id,
		}
	}
}

/// Object graph of one in-memory document.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
	pub objects: Vec<MemoryObject>,
}

/// A [`Host`](super::Host) backed entirely by in-process collections.
#[derive(Debug, Default)]
pub struct MemoryHost {
	documents: IndexMap<DocumentId, MemoryDocument>,
	active: Option<DocumentId>,
	views: IndexMap<String, ViewSpec>,
	rejected_types: FxHashSet<String>,
	reject_all_views: bool,
	tick: Option<Duration>,
	subscriptions: Vec<SignalKind>,
	refuse_subscription: Option<SignalKind>,
	refuse_tick: bool,
	registrations_total: usize,
}

impl MemoryHost {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an empty document; the first one added becomes active.
	pub fn add_document(&mut self, doc: DocumentId) {
		self.documents.entry(doc).or_default();
		if self.active.is_none() {
			self.active = Some(doc);
		}
	}

	/// Removes a document entirely, as if it were unloaded.
	pub fn delete_document(&mut self, doc: DocumentId) {
		self.documents.shift_remove(&doc);
		if self.active == Some(doc) {
			self.active = None;
		}
	}

	/// Switches the active document.
	pub fn set_active(&mut self, doc: Option<DocumentId>) {
		self.active = doc;
	}

	/// Appends a light to `doc`, creating the document when needed.
	pub fn add_light(&mut self, doc: DocumentId, light: LightEntity) {
		self.documents.entry(doc).or_default().objects.push(MemoryObject::Light(light));
	}

	/// Appends a non-light object to `doc`.
	pub fn add_object(&mut self, doc: DocumentId, id: EntityRef) {
		self.documents.entry(doc).or_default().objects.push(MemoryObject::Other(id));
	}

	/// Deletes any object with `id` from `doc`.
	pub fn remove_object(&mut self, doc: DocumentId, id: EntityRef) {
		if let Some(document) = self.documents.get_mut(&doc) {
			document.objects.retain(|object| object.id() != id);
		}
	}

	/// Renames a light in place.
	pub fn rename_light(&mut self, doc: DocumentId, id: EntityRef, name: &str) {
		let Some(document) = self.documents.get_mut(&doc) else {
			return;
		};
		for object in &mut document.objects {
			if let MemoryObject::Light(light) = object
				&& light.id == id
			{
				light.name = name.to_string();
			}
		}
	}

	/// Makes future registrations of `type_name` fail.
	pub fn reject_view_type(&mut self, type_name: impl Into<String>) {
		self.rejected_types.insert(type_name.into());
	}

	/// Makes every future registration fail (or succeed again).
	pub fn reject_all_views(&mut self, reject: bool) {
		self.reject_all_views = reject;
	}

	/// Drops a live view without telling the engine.
	pub fn lose_view(&mut self, type_name: &str) -> bool {
		self.views.shift_remove(type_name).is_some()
	}

	/// Makes the next subscription to `signal` fail.
	pub fn refuse_subscription(&mut self, signal: SignalKind) {
		self.refuse_subscription = Some(signal);
	}

	/// Makes tick registration fail.
	pub fn refuse_tick(&mut self, refuse: bool) {
		self.refuse_tick = refuse;
	}

	/// Live views, in registration order.
	pub fn views(&self) -> impl Iterator<Item = &ViewSpec> {
		self.views.values()
	}

	pub fn view_count(&self) -> usize {
		self.views.len()
	}

	/// Successful registrations since creation.
	pub fn registrations_total(&self) -> usize {
		self.registrations_total
	}

	pub fn tick_interval(&self) -> Option<Duration> {
		self.tick
	}

	pub fn subscriptions(&self) -> &[SignalKind] {
		&self.subscriptions
	}

	fn document(&self, doc: DocumentId) -> Result<&MemoryDocument, HostError> {
		self.documents.get(&doc).ok_or(HostError::DocumentGone(doc))
	}
}

impl SceneGraph for MemoryHost {
	fn active_document(&self) -> Option<DocumentId> {
		self.active
	}

	fn resolve_document(&self, doc: DocumentId) -> Result<(), HostError> {
		self.document(doc).map(|_| ())
	}

	fn lights(&self, doc: DocumentId) -> Result<Vec<LightEntity>, HostError> {
		Ok(self
			.document(doc)?
			.objects
			.iter()
			.filter_map(|object| match object {
				MemoryObject::Light(light) => Some(light.clone()),
				MemoryObject::Other(_) => None,
			})
			.collect())
	}

	fn light(&self, doc: DocumentId, entity: EntityRef) -> Option<LightEntity> {
		self.documents.get(&doc)?.objects.iter().find_map(|object| match object {
			MemoryObject::Light(light) if light.id == entity => Some(light.clone()),
			_ => None,
		})
	}

	fn object_count(&self, doc: DocumentId) -> Result<usize, HostError> {
		Ok(self.document(doc)?.objects.len())
	}
}

impl PresentationLayer for MemoryHost {
	fn register_view(&mut self, view: &ViewSpec) -> Result<(), HostError> {
		if self.reject_all_views || self.rejected_types.contains(&view.type_name) {
			return Err(HostError::ViewRejected {
				type_name: view.type_name.clone(),
				reason: "rejected by host".to_string(),
			});
		}
		if self.views.contains_key(&view.type_name) {
			return Err(HostError::ViewRejected {
				type_name: view.type_name.clone(),
				reason: "type already registered".to_string(),
			});
		}
		self.views.insert(view.type_name.clone(), view.clone());
		self.registrations_total += 1;
		Ok(())
	}

	fn unregister_view(&mut self, view: &ViewSpec) -> Result<(), HostError> {
		self.views
			.shift_remove(&view.type_name)
			.map(|_| ())
			.ok_or_else(|| HostError::ViewMissing(view.type_name.clone()))
	}

	fn view_alive(&self, type_name: &str) -> bool {
		self.views.contains_key(type_name)
	}
}

impl HostRuntime for MemoryHost {
	fn tick_registered(&self) -> bool {
		self.tick.is_some()
	}

	fn register_tick(&mut self, interval: Duration) -> Result<(), HostError> {
		if self.refuse_tick {
			return Err(HostError::Runtime("tick registration".to_string()));
		}
		self.tick = Some(interval);
		Ok(())
	}

	fn unregister_tick(&mut self) {
		self.tick = None;
	}

	fn subscribed(&self, signal: SignalKind) -> bool {
		self.subscriptions.contains(&signal)
	}

	fn subscribe(&mut self, signal: SignalKind) -> Result<(), HostError> {
		if self.refuse_subscription == Some(signal) {
			self.refuse_subscription = None;
			return Err(HostError::Runtime(format!("subscription to {signal}")));
		}
		self.subscriptions.push(signal);
		Ok(())
	}

	fn unsubscribe(&mut self, signal: SignalKind) {
		self.subscriptions.retain(|s| *s != signal);
	}
}
