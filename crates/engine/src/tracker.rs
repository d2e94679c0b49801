//! Active-document tracking.

use crate::error::HostError;
use crate::host::SceneGraph;
use crate::types::DocumentId;

/// Remembers which document the engine last synchronized against.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneTracker {
	tracked: Option<DocumentId>,
}

impl SceneTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records the host's current active document.
	pub fn track<S: SceneGraph + ?Sized>(&mut self, graph: &S) -> Result<DocumentId, HostError> {
		let doc = graph.active_document().ok_or(HostError::NoActiveDocument)?;
		tracing::debug!(%doc, "tracker.track");
		self.tracked = Some(doc);
		Ok(doc)
	}

	/// Returns true when the active document differs from the tracked one.
	///
	/// A tracked document that no longer resolves, or no tracked document at
	/// all, also counts as a change.
	pub fn has_changed<S: SceneGraph + ?Sized>(&self, graph: &S) -> bool {
		let Some(tracked) = self.tracked else {
			return true;
		};
		if let Err(err) = graph.resolve_document(tracked) {
			tracing::debug!(%tracked, error = %err, "tracker.stale");
			return true;
		}
		graph.active_document() != Some(tracked)
	}

	pub fn tracked(&self) -> Option<DocumentId> {
		self.tracked
	}

	/// Clears the tracked identity.
	pub fn forget(&mut self) {
		self.tracked = None;
	}
}
