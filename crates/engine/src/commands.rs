//! Commands exposed to the host's invocation layer.
//!
//! Each command has a precondition gate ([`Engine::can_invoke`]) that hosts use
//! to grey out buttons, and an [`Engine::invoke`] that queues the work and
//! reports a terminal status.

use std::fmt;

use crate::engine::Engine;
use crate::host::SceneGraph;
use crate::queue::{Task, TaskScope};
use crate::types::{ChannelId, DocumentId, EntityRef};

/// User-invocable engine commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
	/// Re-read the catalog and rebuild every view.
	Refresh,
	/// Bind the selected light to a new channel.
	AssignSelected,
	/// Bind every light in the filtered view.
	AssignAllFiltered,
	/// Delete one channel.
	DeleteChannel(ChannelId),
	/// Delete every channel of the active document.
	DeleteAllChannels,
	/// Emit a diagnostic snapshot to the log.
	DumpDebugState,
}

impl Command {
	pub const fn name(&self) -> &'static str {
		match self {
			Command::Refresh => "refresh",
			Command::AssignSelected => "assign-selected",
			Command::AssignAllFiltered => "assign-all-filtered",
			Command::DeleteChannel(_) => "delete-channel",
			Command::DeleteAllChannels => "delete-all-channels",
			Command::DumpDebugState => "dump-debug-state",
		}
	}
}

/// Terminal status of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
	/// Work was queued (or the diagnostic was emitted).
	Finished,
	/// The precondition did not hold; nothing happened.
	Cancelled,
}

impl Engine {
	/// Returns whether `command`'s precondition holds.
	pub fn can_invoke<S: SceneGraph + ?Sized>(&self, graph: &S, command: &Command) -> bool {
		if !self.is_active() {
			return false;
		}
		match command {
			Command::Refresh | Command::DeleteChannel(_) | Command::DumpDebugState => true,
			Command::AssignSelected => self.selected_unbound(graph).is_some(),
			Command::AssignAllFiltered => self.active_state(graph).is_some_and(|state| !state.catalog.filtered().is_empty()),
			Command::DeleteAllChannels => self.active_state(graph).is_some_and(|state| !state.channels.is_empty()),
		}
	}

	/// Runs `command` if its precondition holds.
	pub fn invoke<S: SceneGraph + ?Sized>(&mut self, graph: &S, command: Command) -> CommandStatus {
		if !self.can_invoke(graph, &command) {
			tracing::debug!(command = command.name(), "command.cancelled");
			return CommandStatus::Cancelled;
		}
		tracing::debug!(command = command.name(), "command.invoke");

		match command {
			Command::Refresh => {
				self.queue.enqueue_all([Task::RefreshCatalog, Task::RefreshFiltered, Task::RebuildViews], TaskScope::Runtime);
			}
			Command::AssignSelected => {
				if let Some(entity) = self.selected_unbound(graph) {
					self.queue.enqueue(Task::Assign(entity), TaskScope::Runtime);
				}
			}
			Command::AssignAllFiltered => {
				let entities: Vec<EntityRef> = self
					.active_state(graph)
					.map(|state| state.catalog.filtered().iter().map(|light| light.id).collect())
					.unwrap_or_default();
				self.queue.enqueue_all(entities.into_iter().map(Task::Assign), TaskScope::Runtime);
			}
			Command::DeleteChannel(id) => {
				self.queue.enqueue(Task::Remove(id), TaskScope::Runtime);
			}
			Command::DeleteAllChannels => {
				self.queue.enqueue(Task::RemoveAll, TaskScope::Runtime);
			}
			Command::DumpDebugState => {
				let report = self.debug_report(graph);
				for line in report.to_string().lines() {
					tracing::info!(target: "lightdesk::debug", "{line}");
				}
			}
		}
		CommandStatus::Finished
	}

	fn selected_unbound<S: SceneGraph + ?Sized>(&self, graph: &S) -> Option<EntityRef> {
		let state = self.active_state(graph)?;
		let selected = state.catalog.selected()?.id;
		state.channels.lookup_by_entity(selected).is_none().then_some(selected)
	}

	/// Read-only snapshot of everything the engine tracks.
	pub fn debug_report<S: SceneGraph + ?Sized>(&self, graph: &S) -> DebugReport {
		let mut documents: Vec<DocumentReport> = self
			.documents
			.iter()
			.map(|(doc, state)| DocumentReport {
				doc: *doc,
				lights: state.catalog.lights().iter().map(|l| l.name.clone()).collect(),
				filtered: state.catalog.filtered().iter().map(|l| l.name.clone()).collect(),
				selected: state.catalog.selection().index,
				channels: state
					.channels
					.iter()
					.map(|c| {
						let label = state.catalog.light(c.entity).map(|l| l.name.clone()).unwrap_or_else(|| c.entity.to_string());
						(c.id, label)
					})
					.collect(),
			})
			.collect();
		documents.sort_by_key(|d| d.doc);

		DebugReport {
			active: graph.active_document(),
			tracked: self.tracker.tracked(),
			bound: self.views.bound_document(),
			views: self.views.specs().map(|spec| spec.type_name.clone()).collect(),
			pending: self.queue.len(),
			documents,
		}
	}
}

/// Diagnostic snapshot produced by [`Command::DumpDebugState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugReport {
	pub active: Option<DocumentId>,
	pub tracked: Option<DocumentId>,
	pub bound: Option<DocumentId>,
	pub views: Vec<String>,
	pub pending: usize,
	pub documents: Vec<DocumentReport>,
}

/// Per-document section of a [`DebugReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
	pub doc: DocumentId,
	pub lights: Vec<String>,
	pub filtered: Vec<String>,
	pub selected: isize,
	pub channels: Vec<(ChannelId, String)>,
}

fn fmt_doc(doc: Option<DocumentId>) -> String {
	doc.map_or_else(|| "-".to_string(), |d| d.to_string())
}

impl fmt::Display for DebugReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "active: {}  tracked: {}  views bound to: {}", fmt_doc(self.active), fmt_doc(self.tracked), fmt_doc(self.bound))?;
		writeln!(f, "{} pending tasks", self.pending)?;
		writeln!(f, "{} views:", self.views.len())?;
		for view in &self.views {
			writeln!(f, "- {view}")?;
		}
		for doc in &self.documents {
			writeln!(f, "[{}]", doc.doc)?;
			writeln!(f, "lights: {:?}", doc.lights)?;
			writeln!(f, "filtered: {:?}", doc.filtered)?;
			writeln!(f, "selected: {}", doc.selected)?;
			writeln!(f, "{} channels:", doc.channels.len())?;
			for (id, label) in &doc.channels {
				writeln!(f, "- {id}: {label}")?;
			}
		}
		Ok(())
	}
}
