//! Engine state and the queued operations that mutate it.
//!
//! All registry mutation happens inside [`Engine::tick`], one task at a time.
//! Lifecycle signals and commands only enqueue; filter toggles and selection
//! are the one synchronous path, and they never touch channels or views.

use std::time::Duration;

use rustc_hash::FxHashMap;

use crate::catalog::{FilterState, LightCatalog};
use crate::channels::{AssignOutcome, ChannelRegistry};
use crate::config::EngineConfig;
use crate::error::{EngineError, HostError, Result};
use crate::host::{Host, SceneGraph};
use crate::queue::{Task, TaskQueue, TaskScope};
use crate::signals::SignalKind;
use crate::tracker::SceneTracker;
use crate::types::{ChannelId, DocumentId, EntityRef, LightEntity, LightKind};
use crate::views::{PrefixedViewFactory, ViewFactory, ViewRegistry};

/// Tasks run on activation, in order.
pub const STARTUP_SEQUENCE: [Task; 5] = [Task::RefreshCatalog, Task::RefreshFiltered, Task::TrackDocument, Task::Sweep, Task::RebuildViews];

/// Engine activation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
	#[default]
	Inactive,
	Active,
}

/// Per-document state: persisted filters, selection and channels, plus the
/// ephemeral catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct DocumentState {
	pub catalog: LightCatalog,
	pub channels: ChannelRegistry,
	/// Object count observed at the last catalog refresh.
	pub object_count: Option<usize>,
}

impl DocumentState {
	pub fn new(filters: FilterState) -> Self {
		Self {
			catalog: LightCatalog::new(filters),
			channels: ChannelRegistry::new(),
			object_count: None,
		}
	}
}

/// Outcome of one queue drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
	pub drained: usize,
	pub failed: usize,
	pub startup_aborted: bool,
}

/// What the host should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDirective {
	/// Delay before the next tick, or `None` when the tick should be dropped.
	pub reschedule: Option<Duration>,
	pub report: DrainReport,
}

/// The registry and synchronization engine.
#[derive(Debug)]
pub struct Engine {
	pub(crate) config: EngineConfig,
	pub(crate) phase: Phase,
	pub(crate) queue: TaskQueue,
	pub(crate) tracker: SceneTracker,
	pub(crate) documents: FxHashMap<DocumentId, DocumentState>,
	pub(crate) views: ViewRegistry,
}

impl Default for Engine {
	fn default() -> Self {
		Self::new(EngineConfig::default())
	}
}

impl Engine {
	/// Creates an inactive engine naming views with the configured prefix.
	pub fn new(config: EngineConfig) -> Self {
		let factory = PrefixedViewFactory::new(config.view_type_prefix.clone());
		Self::with_factory(config, Box::new(factory))
	}

	/// Creates an inactive engine with a custom view factory.
	pub fn with_factory(config: EngineConfig, factory: Box<dyn ViewFactory>) -> Self {
		Self {
			config,
			phase: Phase::Inactive,
			queue: TaskQueue::new(),
			tracker: SceneTracker::new(),
			documents: FxHashMap::default(),
			views: ViewRegistry::new(factory),
		}
	}

	/// Installs subscriptions and the tick, and queues the startup sequence.
	///
	/// Calling this on an active engine is a no-op. If any host registration
	/// fails the engine tears itself down and returns the error.
	pub fn activate<H: Host>(&mut self, host: &mut H) -> Result<()> {
		if self.phase == Phase::Active {
			tracing::debug!("engine.activate.already_active");
			return Ok(());
		}

		tracing::info!("engine.activate");
		self.queue.enqueue_all(STARTUP_SEQUENCE, TaskScope::Startup);

		if let Err(err) = self.install(host) {
			tracing::error!(error = %err, "engine.activate.failed");
			self.deactivate(host);
			return Err(err.into());
		}

		self.phase = Phase::Active;
		Ok(())
	}

	fn install<H: Host>(&mut self, host: &mut H) -> std::result::Result<(), HostError> {
		for signal in SignalKind::ALL {
			if !host.subscribed(signal) {
				tracing::debug!(%signal, "engine.subscribe");
				host.subscribe(signal)?;
			}
		}
		if !host.tick_registered() {
			host.register_tick(self.config.tick_interval())?;
		}
		Ok(())
	}

	/// Full teardown: views, tick, subscriptions, queue, tracked document.
	///
	/// Channel bindings are persisted state and survive.
	pub fn deactivate<H: Host>(&mut self, host: &mut H) {
		tracing::info!("engine.deactivate");
		for err in self.views.purge(host) {
			tracing::warn!(error = %err, "engine.deactivate.unregister_failed");
		}
		if host.tick_registered() {
			host.unregister_tick();
		}
		for signal in SignalKind::ALL {
			if host.subscribed(signal) {
				host.unsubscribe(signal);
			}
		}
		let dropped = self.queue.clear();
		if dropped > 0 {
			tracing::debug!(dropped, "engine.deactivate.queue_dropped");
		}
		self.tracker.forget();
		self.phase = Phase::Inactive;
	}

	/// Scheduler callback: drains the queue and says when to run again.
	pub fn tick<H: Host>(&mut self, host: &mut H) -> TickDirective {
		if self.phase != Phase::Active {
			return TickDirective {
				reschedule: None,
				report: DrainReport::default(),
			};
		}

		let report = self.drain_all(host);
		let reschedule = (self.phase == Phase::Active).then(|| self.config.tick_interval());
		TickDirective { reschedule, report }
	}

	/// Runs queued tasks in FIFO order until the queue is empty.
	///
	/// Tasks queued while draining run in the same drain. A failing runtime
	/// task is logged and skipped; a failing startup task aborts activation.
	pub(crate) fn drain_all<H: Host>(&mut self, host: &mut H) -> DrainReport {
		let mut report = DrainReport::default();

		while let Some(item) = self.queue.pop_front() {
			report.drained += 1;
			tracing::trace!(seq = item.seq, task = %item.task, "queue.run");

			let Err(err) = self.run_task(host, item.task) else {
				continue;
			};
			report.failed += 1;

			match item.scope {
				TaskScope::Startup => {
					tracing::error!(task = %item.task, error = %err, "engine.startup.failed");
					report.startup_aborted = true;
					self.queue.remove_scope(TaskScope::Startup);
					self.deactivate(host);
					break;
				}
				TaskScope::Runtime => {
					tracing::warn!(task = %item.task, error = %err, "queue.task_failed");
				}
			}
		}

		report
	}

	fn run_task<H: Host>(&mut self, host: &mut H, task: Task) -> Result<()> {
		match task {
			Task::TrackDocument => {
				self.tracker.track(host)?;
				self.prune_documents(host);
				Ok(())
			}
			Task::RefreshCatalog => self.refresh_catalog(host),
			Task::RefreshFiltered => {
				let doc = active_document(host)?;
				self.document_mut(doc).catalog.refresh_filtered();
				Ok(())
			}
			Task::Sweep => self.sweep(host).map(|_| ()),
			Task::PurgeViews => {
				self.purge_views(host);
				Ok(())
			}
			Task::RebuildViews => self.rebuild_views(host),
			Task::Assign(entity) => self.assign(host, entity),
			Task::Remove(id) => self.remove(host, id),
			Task::RemoveAll => self.remove_all(host),
		}
	}

	/// Drops state of documents the host no longer resolves.
	fn prune_documents<S: SceneGraph + ?Sized>(&mut self, graph: &S) {
		self.documents.retain(|doc, _| match graph.resolve_document(*doc) {
			Ok(()) => true,
			Err(err) => {
				tracing::debug!(%doc, error = %err, "engine.prune_document");
				false
			}
		});
	}

	fn refresh_catalog<H: Host>(&mut self, host: &mut H) -> Result<()> {
		let doc = active_document(host)?;
		let lights = host.lights(doc)?;
		let count = host.object_count(doc)?;
		tracing::debug!(%doc, lights = lights.len(), objects = count, "catalog.refresh");

		let state = self.document_mut(doc);
		state.catalog.replace_lights(lights);
		state.object_count = Some(count);
		Ok(())
	}

	/// Binds `entity` in the active document and registers its view.
	pub(crate) fn assign<H: Host>(&mut self, host: &mut H, entity: EntityRef) -> Result<()> {
		let doc = active_document(host)?;
		let light = host.light(doc, entity).ok_or(EngineError::UnknownEntity(entity))?;

		match self.document_mut(doc).channels.assign(entity) {
			AssignOutcome::Existing(id) => {
				tracing::debug!(channel = %id, %entity, "channel.assign.exists");
			}
			AssignOutcome::Created(id) => {
				tracing::debug!(channel = %id, %entity, name = %light.name, "channel.assign");
				self.register_view(host, id, &light);
			}
		}
		Ok(())
	}

	/// Unregisters the view of `id`, then deletes the channel. Unknown ids are a logged no-op.
	pub(crate) fn remove<H: Host>(&mut self, host: &mut H, id: ChannelId) -> Result<()> {
		let doc = active_document(host)?;
		let known = self.documents.get(&doc).is_some_and(|state| state.channels.contains(id));
		if !known {
			tracing::debug!(error = %EngineError::LookupMiss(id), "channel.remove.miss");
			return Ok(());
		}

		if self.views.contains(id) {
			self.unregister_view(host, id);
		}
		if let Some(state) = self.documents.get_mut(&doc) {
			state.channels.remove(id);
		}
		tracing::debug!(channel = %id, %doc, "channel.remove");
		Ok(())
	}

	/// Removes every channel of the active document, newest first.
	pub(crate) fn remove_all<H: Host>(&mut self, host: &mut H) -> Result<()> {
		let doc = active_document(host)?;
		let ids: Vec<ChannelId> = self.documents.get(&doc).map(|state| state.channels.iter().rev().map(|c| c.id).collect()).unwrap_or_default();

		tracing::debug!(%doc, count = ids.len(), "channel.remove_all");
		for id in ids {
			self.remove(host, id)?;
		}
		Ok(())
	}

	/// Unregisters every known view.
	pub(crate) fn purge_views<H: Host>(&mut self, host: &mut H) {
		let failures = self.views.purge(host);
		if !failures.is_empty() {
			for err in &failures {
				tracing::warn!(error = %err, "view.purge.failed");
			}
			self.schedule_sweep();
		}
	}

	/// Purges all views, then registers one per channel of the active document.
	pub(crate) fn rebuild_views<H: Host>(&mut self, host: &mut H) -> Result<()> {
		self.purge_views(host);

		let doc = active_document(host)?;
		let bindings: Vec<(ChannelId, EntityRef)> = self
			.documents
			.get(&doc)
			.map(|state| state.channels.iter().map(|c| (c.id, c.entity)).collect())
			.unwrap_or_default();

		tracing::debug!(%doc, channels = bindings.len(), "view.rebuild");
		self.views.bind(doc);

		for (id, entity) in bindings {
			match host.light(doc, entity) {
				Some(light) => self.register_view(host, id, &light),
				None => {
					let err = EngineError::StaleReference(format!("{entity} bound to channel {id}"));
					tracing::warn!(error = %err, "view.rebuild.stale");
					self.schedule_sweep();
				}
			}
		}
		Ok(())
	}

	pub(crate) fn register_view<H: Host>(&mut self, host: &mut H, id: ChannelId, light: &LightEntity) {
		if let Err(err) = self.views.register(host, id, light) {
			tracing::warn!(error = %err, "view.register.failed");
			self.schedule_sweep();
		}
	}

	pub(crate) fn unregister_view<H: Host>(&mut self, host: &mut H, id: ChannelId) {
		if let Err(err) = self.views.unregister(host, id) {
			tracing::warn!(error = %err, "view.unregister.failed");
			self.schedule_sweep();
		}
	}

	fn schedule_sweep(&mut self) {
		if !self.queue.contains(Task::Sweep) {
			self.queue.enqueue(Task::Sweep, TaskScope::Runtime);
		}
	}

	pub(crate) fn document_mut(&mut self, doc: DocumentId) -> &mut DocumentState {
		let filters = self.config.filters;
		self.documents.entry(doc).or_insert_with(|| DocumentState::new(filters))
	}

	/// State of the host's active document, if the engine has seen it.
	pub fn active_state<S: SceneGraph + ?Sized>(&self, graph: &S) -> Option<&DocumentState> {
		graph.active_document().and_then(|doc| self.documents.get(&doc))
	}

	/// Toggles one filter on the active document and rebuilds its filtered view.
	///
	/// Runs synchronously; filtering never touches channels or views.
	pub fn set_filter<S: SceneGraph + ?Sized>(&mut self, graph: &S, kind: LightKind, enabled: bool) -> Result<bool> {
		let doc = active_document(graph)?;
		let changed = self.document_mut(doc).catalog.set_filter(kind, enabled);
		if changed {
			tracing::debug!(%doc, %kind, enabled, "catalog.filter");
		}
		Ok(changed)
	}

	/// Selects an entry of the active document's filtered view.
	pub fn select<S: SceneGraph + ?Sized>(&mut self, graph: &S, index: isize) -> Result<()> {
		let doc = active_document(graph)?;
		self.document_mut(doc).catalog.select(index);
		Ok(())
	}

	/// Whether the channel surface should draw: its view is registered and
	/// the tracked document is still active.
	pub fn channel_view_visible<H: Host>(&self, host: &H, id: ChannelId) -> bool {
		self.views.is_registered(host, id) && !self.tracker.has_changed(host)
	}

	pub fn is_active(&self) -> bool {
		self.phase == Phase::Active
	}

	pub fn phase(&self) -> Phase {
		self.phase
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn document(&self, doc: DocumentId) -> Option<&DocumentState> {
		self.documents.get(&doc)
	}

	pub fn views(&self) -> &ViewRegistry {
		&self.views
	}

	pub fn tracked_document(&self) -> Option<DocumentId> {
		self.tracker.tracked()
	}

	/// Tasks waiting for the next tick, in drain order.
	pub fn pending_tasks(&self) -> Vec<Task> {
		self.queue.pending().collect()
	}
}

pub(crate) fn active_document<S: SceneGraph + ?Sized>(graph: &S) -> Result<DocumentId> {
	graph.active_document().ok_or(EngineError::Host(HostError::NoActiveDocument))
}
