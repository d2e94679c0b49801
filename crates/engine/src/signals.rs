//! Host lifecycle signals and the work they schedule.
//!
//! Hosts may deliver these from contexts where mutating engine state is
//! unsafe, so handling a signal only reads the scene graph and appends to the
//! task queue.

use std::fmt;

use crate::engine::Engine;
use crate::host::SceneGraph;
use crate::queue::{Task, TaskScope};

/// Work queued after the active document changes.
pub const POST_SWITCH_SEQUENCE: [Task; 5] = [Task::TrackDocument, Task::RefreshCatalog, Task::RefreshFiltered, Task::Sweep, Task::RebuildViews];

/// Work queued after a structural change within the same document.
pub const GRAPH_REFRESH_SEQUENCE: [Task; 3] = [Task::RefreshCatalog, Task::RefreshFiltered, Task::Sweep];

/// Subscription key for one lifecycle signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
	PreSwitch,
	PostSwitch,
	GraphChanged,
}

impl SignalKind {
	pub const ALL: [SignalKind; 3] = [SignalKind::PreSwitch, SignalKind::PostSwitch, SignalKind::GraphChanged];
}

impl fmt::Display for SignalKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			SignalKind::PreSwitch => "pre_switch",
			SignalKind::PostSwitch => "post_switch",
			SignalKind::GraphChanged => "graph_changed",
		})
	}
}

/// A lifecycle event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleSignal {
	/// The current document is about to be left.
	PreSwitch,
	/// A new document is now active.
	PostSwitch,
	/// The active document's graph was updated.
	GraphChanged {
		/// Whether the update touched a light (selection, data, transform).
		light_touched: bool,
	},
}

impl LifecycleSignal {
	pub const fn kind(self) -> SignalKind {
		match self {
			LifecycleSignal::PreSwitch => SignalKind::PreSwitch,
			LifecycleSignal::PostSwitch => SignalKind::PostSwitch,
			LifecycleSignal::GraphChanged { .. } => SignalKind::GraphChanged,
		}
	}
}

impl Engine {
	/// Queues the work for one lifecycle signal. Returns the number of tasks queued.
	///
	/// Signals arriving while the engine is inactive are ignored.
	pub fn handle_signal<S: SceneGraph + ?Sized>(&mut self, graph: &S, signal: LifecycleSignal) -> usize {
		if !self.is_active() {
			tracing::trace!(signal = %signal.kind(), "signal.ignored_inactive");
			return 0;
		}

		let queued = match signal {
			LifecycleSignal::PreSwitch => {
				self.queue.enqueue(Task::PurgeViews, TaskScope::Runtime);
				1
			}
			LifecycleSignal::PostSwitch => self.enqueue_sequence(&POST_SWITCH_SEQUENCE),
			LifecycleSignal::GraphChanged { light_touched } => self.on_graph_changed(graph, light_touched),
		};

		tracing::debug!(signal = %signal.kind(), queued, "signal.handle");
		queued
	}

	fn on_graph_changed<S: SceneGraph + ?Sized>(&mut self, graph: &S, light_touched: bool) -> usize {
		if graph.active_document().is_none() {
			return 0;
		}
		if self.tracker.has_changed(graph) {
			return self.enqueue_sequence_once(&POST_SWITCH_SEQUENCE);
		}

		if light_touched || self.object_count_changed(graph) {
			return self.enqueue_sequence_once(&GRAPH_REFRESH_SEQUENCE);
		}
		0
	}

	fn object_count_changed<S: SceneGraph + ?Sized>(&self, graph: &S) -> bool {
		let Some(doc) = graph.active_document() else {
			return false;
		};
		let recorded = self.documents.get(&doc).and_then(|state| state.object_count);
		match graph.object_count(doc) {
			Ok(count) => recorded != Some(count),
			Err(err) => {
				tracing::debug!(%doc, error = %err, "signal.object_count_unavailable");
				false
			}
		}
	}

	/// Queues the post-switch sequence when the tracked document is stale or
	/// the views no longer mirror the active document.
	///
	/// Meant for the host's panel poll, which runs on every redraw. Does
	/// nothing while the host has no active document.
	pub fn ensure_current<S: SceneGraph + ?Sized>(&mut self, graph: &S) -> bool {
		let Some(doc) = graph.active_document() else {
			return false;
		};
		if !self.is_active() {
			return false;
		}
		if !self.tracker.has_changed(graph) && self.views.bound_document() == Some(doc) {
			return false;
		}
		self.enqueue_sequence_once(&POST_SWITCH_SEQUENCE) > 0
	}

	fn enqueue_sequence(&mut self, tasks: &[Task]) -> usize {
		self.queue.enqueue_all(tasks.iter().copied(), TaskScope::Runtime);
		tasks.len()
	}

	/// Skips queueing when the same sequence is already the tail of the queue;
	/// every task in it reads host state at execution time.
	fn enqueue_sequence_once(&mut self, tasks: &[Task]) -> usize {
		if self.queue.ends_with(tasks) {
			return 0;
		}
		self.enqueue_sequence(tasks)
	}
}
