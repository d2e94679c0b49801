//! Shared unit-test fixtures.

use crate::engine::Engine;
use crate::host::memory::MemoryHost;
use crate::types::{DocumentId, EntityRef, LightEntity, LightKind};

pub(crate) const DOC_A: DocumentId = DocumentId(1);
pub(crate) const DOC_B: DocumentId = DocumentId(2);

pub(crate) const POINT_A: EntityRef = EntityRef(1);
pub(crate) const SUN_B: EntityRef = EntityRef(2);
pub(crate) const AREA_C: EntityRef = EntityRef(3);

/// One document with lights `A:Point`, `B:Sun`, `C:Area` and one plain object.
pub(crate) fn host() -> MemoryHost {
	let _ = tracing_subscriber::fmt::try_init();

	let mut host = MemoryHost::new();
	host.add_document(DOC_A);
	host.add_light(DOC_A, LightEntity::new(POINT_A, "A", LightKind::Point));
	host.add_light(DOC_A, LightEntity::new(SUN_B, "B", LightKind::Sun));
	host.add_object(DOC_A, EntityRef(100));
	host.add_light(DOC_A, LightEntity::new(AREA_C, "C", LightKind::Area));
	host
}

/// Activated engine with the startup sequence already drained.
pub(crate) fn active_engine(host: &mut MemoryHost) -> Engine {
	let mut engine = Engine::default();
	engine.activate(host).expect("activation succeeds");
	let directive = engine.tick(host);
	assert_eq!(directive.report.failed, 0, "startup sequence is clean");
	engine
}

/// Engine with every light of `DOC_A` bound to a channel.
pub(crate) fn engine_with_channels(host: &mut MemoryHost) -> Engine {
	let mut engine = active_engine(host);
	for entity in [POINT_A, SUN_B, AREA_C] {
		engine.queue.enqueue(crate::queue::Task::Assign(entity), crate::queue::TaskScope::Runtime);
	}
	engine.tick(host);
	engine
}
