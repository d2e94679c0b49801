//! Consistency sweep ("deadheading").
//!
//! Channels can be orphaned behind the engine's back: the user deletes a
//! light, the host drops a view, a registration fails. The sweep finds those
//! channels and tears them down through the normal removal path. Views with no
//! channel in the active document are unregistered as well.

use crate::engine::{Engine, active_document};
use crate::error::Result;
use crate::host::Host;
use crate::queue::{Task, TaskScope};
use crate::types::{ChannelId, DocumentId};

/// Why a channel was judged orphaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanReason {
	/// The bound entity no longer resolves in the active document.
	EntityMissing,
	/// The registry is bound to this document but has no live view for the channel.
	ViewMissing,
}

/// Drift found by one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepPlan {
	pub orphaned: Vec<(ChannelId, OrphanReason)>,
	pub stray_views: Vec<ChannelId>,
}

impl SweepPlan {
	pub fn is_clean(&self) -> bool {
		self.orphaned.is_empty() && self.stray_views.is_empty()
	}
}

impl Engine {
	/// Computes drift for `doc` without mutating anything.
	///
	/// View presence is only checked while the registry mirrors `doc`. Between
	/// a document switch and the following rebuild the views legitimately lag,
	/// and treating that as drift would delete every channel of the document.
	pub fn plan_sweep<H: Host>(&self, host: &H, doc: DocumentId) -> SweepPlan {
		let mut plan = SweepPlan::default();
		let views_bound = self.views.bound_document() == Some(doc);

		if let Some(state) = self.documents.get(&doc) {
			// newest first, matching removal order elsewhere
			for channel in state.channels.iter().rev() {
				if host.light(doc, channel.entity).is_none() {
					plan.orphaned.push((channel.id, OrphanReason::EntityMissing));
				} else if views_bound && !self.views.is_registered(host, channel.id) {
					plan.orphaned.push((channel.id, OrphanReason::ViewMissing));
				}
			}
		}

		let owned = |id: ChannelId| self.documents.get(&doc).is_some_and(|state| state.channels.contains(id));
		plan.stray_views = self.views.ids().filter(|id| !owned(*id)).collect();
		plan
	}

	/// Tears down everything [`Engine::plan_sweep`] reports for the active document.
	pub(crate) fn sweep<H: Host>(&mut self, host: &mut H) -> Result<SweepPlan> {
		let doc = active_document(host)?;
		let plan = self.plan_sweep(host, doc);
		self.schedule_rebuild_if_unbound(host, doc);
		if plan.is_clean() {
			tracing::trace!(%doc, "sweep.clean");
			return Ok(plan);
		}

		for id in &plan.stray_views {
			tracing::debug!(channel = %id, "sweep.stray_view");
			self.unregister_view(host, *id);
		}
		for (id, reason) in &plan.orphaned {
			tracing::info!(channel = %id, ?reason, "sweep.orphaned");
			self.remove(host, *id)?;
		}
		Ok(plan)
	}

	/// Queues a rebuild when the tracked document is current but the registry
	/// no longer mirrors it, e.g. after a pre-switch that no post-switch followed.
	fn schedule_rebuild_if_unbound<H: Host>(&mut self, host: &H, doc: DocumentId) {
		if self.views.bound_document() == Some(doc) || self.tracker.has_changed(host) || self.queue.contains(Task::RebuildViews) {
			return;
		}
		tracing::debug!(%doc, "sweep.rebuild_unbound");
		self.queue.enqueue(Task::RebuildViews, TaskScope::Runtime);
	}
}
