//! Deferred task queue drained by the host's recurring tick.
//!
//! Lifecycle signals and commands never touch the registries directly; they
//! push [`Task`]s here and the single consumer in
//! [`Engine::tick`](crate::Engine::tick) runs them in FIFO order.

use std::collections::VecDeque;
use std::fmt;

use crate::types::{ChannelId, EntityRef};

/// One deferred engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
	/// Record the host's active document.
	TrackDocument,
	/// Re-enumerate lights of the active document.
	RefreshCatalog,
	/// Rebuild the filtered view and repair the selection.
	RefreshFiltered,
	/// Reconcile channels against the graph and the view registry.
	Sweep,
	/// Unregister every known view.
	PurgeViews,
	/// Unregister every known view, then register one per active channel.
	RebuildViews,
	/// Bind an entity to a new channel unless already bound.
	Assign(EntityRef),
	/// Tear down one channel and its view.
	Remove(ChannelId),
	/// Tear down every channel of the active document.
	RemoveAll,
}

impl fmt::Display for Task {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Task::TrackDocument => f.write_str("track_document"),
			Task::RefreshCatalog => f.write_str("refresh_catalog"),
			Task::RefreshFiltered => f.write_str("refresh_filtered"),
			Task::Sweep => f.write_str("sweep"),
			Task::PurgeViews => f.write_str("purge_views"),
			Task::RebuildViews => f.write_str("rebuild_views"),
			Task::Assign(entity) => write!(f, "assign({entity})"),
			Task::Remove(id) => write!(f, "remove({id})"),
			Task::RemoveAll => f.write_str("remove_all"),
		}
	}
}

/// Scope tag used for failure policy and targeted clearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskScope {
	/// Part of the activation sequence; a failure aborts activation.
	Startup,
	/// Regular deferred work; failures are logged and skipped.
	Runtime,
}

/// Queue entry carrying sequence and scope metadata.
#[derive(Debug, Clone, Copy)]
pub struct QueuedTask {
	pub task: Task,
	pub scope: TaskScope,
	pub seq: u64,
}

/// FIFO queue of deferred tasks.
#[derive(Debug, Default)]
pub struct TaskQueue {
	seq_next: u64,
	queue: VecDeque<QueuedTask>,
}

impl TaskQueue {
	pub fn new() -> Self {
		Self::default()
	}

	/// Enqueues one task and returns its sequence number.
	pub fn enqueue(&mut self, task: Task, scope: TaskScope) -> u64 {
		let seq = self.seq_next;
		self.seq_next = self.seq_next.wrapping_add(1);
		tracing::trace!(seq, %task, ?scope, "queue.enqueue");
		self.queue.push_back(QueuedTask { task, scope, seq });
		seq
	}

	/// Enqueues a run of tasks under one scope, preserving their order.
	pub fn enqueue_all(&mut self, tasks: impl IntoIterator<Item = Task>, scope: TaskScope) {
		for task in tasks {
			self.enqueue(task, scope);
		}
	}

	/// Pops the next task in FIFO order.
	pub fn pop_front(&mut self) -> Option<QueuedTask> {
		self.queue.pop_front()
	}

	pub fn len(&self) -> usize {
		self.queue.len()
	}

	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}

	/// Returns true when an identical task is already waiting.
	pub fn contains(&self, task: Task) -> bool {
		self.queue.iter().any(|item| item.task == task)
	}

	/// Returns true when the last queued tasks equal `tail`, in order.
	pub fn ends_with(&self, tail: &[Task]) -> bool {
		tail.len() <= self.queue.len() && self.queue.iter().skip(self.queue.len() - tail.len()).map(|item| item.task).eq(tail.iter().copied())
	}

	/// Returns the queued tasks in drain order.
	pub fn pending(&self) -> impl Iterator<Item = Task> + '_ {
		self.queue.iter().map(|item| item.task)
	}

	/// Removes queued items matching the scope tag.
	pub fn remove_scope(&mut self, scope: TaskScope) -> usize {
		let before = self.queue.len();
		self.queue.retain(|item| item.scope != scope);
		before.saturating_sub(self.queue.len())
	}

	/// Drops every queued item.
	pub fn clear(&mut self) -> usize {
		let dropped = self.queue.len();
		self.queue.clear();
		dropped
	}
}
