//! Per-document persisted state.
//!
//! Hosts store this alongside the document (the engine does no file I/O) and
//! hand it back through [`Engine::import_document`] before the document's
//! post-switch signal. Views are never persisted; the post-switch rebuild
//! recreates them.

use serde::{Deserialize, Serialize};

use crate::catalog::{FilterState, Selection};
use crate::engine::Engine;
use crate::types::{Channel, DocumentId};

/// Serializable slice of one document's engine state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedDocument {
	#[serde(default)]
	pub filters: FilterState,
	#[serde(default)]
	pub selection: Selection,
	#[serde(default)]
	pub channels: Vec<Channel>,
}

impl Engine {
	/// Captures the persisted state of `doc`, if the engine has seen it.
	pub fn export_document(&self, doc: DocumentId) -> Option<PersistedDocument> {
		let state = self.documents.get(&doc)?;
		Some(PersistedDocument {
			filters: state.catalog.filters(),
			selection: state.catalog.selection(),
			channels: state.channels.iter().collect(),
		})
	}

	/// Replaces the persisted state of `doc`.
	///
	/// Channels that repeat an id or an entity are dropped. Returns the number
	/// of channels kept.
	pub fn import_document(&mut self, doc: DocumentId, persisted: PersistedDocument) -> usize {
		if self.views.bound_document() == Some(doc) {
			// live views mirror the replaced channels, not the restored ones
			tracing::debug!(%doc, "persist.unbind_views");
			self.views.unbind();
		}

		let filters = persisted.filters;
		let state = self.document_mut(doc);
		state.catalog.restore(filters, persisted.selection);
		state.channels = Default::default();

		let total = persisted.channels.len();
		let kept = persisted.channels.into_iter().filter(|channel| state.channels.insert(*channel)).count();
		if kept < total {
			tracing::warn!(%doc, dropped = total - kept, "persist.duplicate_channels");
		}
		tracing::debug!(%doc, channels = kept, "persist.import");
		kept
	}
}
