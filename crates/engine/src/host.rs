//! Seam between the engine and the application that embeds it.
//!
//! A host provides three capabilities: read access to its scene graph, a
//! presentation layer that accepts dynamically-typed view registrations, and a
//! runtime that can schedule the recurring tick and deliver lifecycle signals.
//! Anything implementing all three is a [`Host`].

pub mod memory;

use std::time::Duration;

use crate::error::HostError;
use crate::signals::SignalKind;
use crate::types::{DocumentId, EntityRef, LightEntity};
use crate::views::ViewSpec;

/// Read-only queries against the host's object graph.
pub trait SceneGraph {
	/// Returns the document the user is currently working in.
	fn active_document(&self) -> Option<DocumentId>;

	/// Confirms that a previously observed document still exists.
	fn resolve_document(&self, doc: DocumentId) -> Result<(), HostError>;

	/// Enumerates every light in `doc`, in graph order.
	fn lights(&self, doc: DocumentId) -> Result<Vec<LightEntity>, HostError>;

	/// Resolves one light in `doc`, or `None` when it no longer exists.
	fn light(&self, doc: DocumentId, entity: EntityRef) -> Option<LightEntity>;

	/// Total object count of `doc`, lights or not.
	fn object_count(&self, doc: DocumentId) -> Result<usize, HostError>;
}

/// Host UI layer that owns the actual surfaces.
///
/// The host requires a distinct static type per visible surface; adapters
/// satisfy that by keying their own type table on [`ViewSpec::type_name`].
pub trait PresentationLayer {
	/// Registers one view. Duplicate type names must be rejected.
	fn register_view(&mut self, view: &ViewSpec) -> Result<(), HostError>;

	/// Removes one view by the spec it was registered with.
	fn unregister_view(&mut self, view: &ViewSpec) -> Result<(), HostError>;

	/// Probes whether a view type is still live on the host side. Must not fail.
	fn view_alive(&self, type_name: &str) -> bool;
}

/// Host scheduling and lifecycle subscription.
pub trait HostRuntime {
	/// Returns whether the recurring tick is installed.
	fn tick_registered(&self) -> bool;

	/// Installs the recurring tick with its first interval.
	fn register_tick(&mut self, interval: Duration) -> Result<(), HostError>;

	/// Removes the recurring tick.
	fn unregister_tick(&mut self);

	/// Returns whether the engine is subscribed to `signal`.
	fn subscribed(&self, signal: SignalKind) -> bool;

	/// Subscribes the engine to `signal`.
	fn subscribe(&mut self, signal: SignalKind) -> Result<(), HostError>;

	/// Drops the subscription to `signal`.
	fn unsubscribe(&mut self, signal: SignalKind);
}

/// Everything the engine needs from its embedding application.
pub trait Host: SceneGraph + PresentationLayer + HostRuntime {}

impl<T: SceneGraph + PresentationLayer + HostRuntime> Host for T {}
