//! Common utilities for engine integration tests.

use lightdesk_engine::host::memory::MemoryHost;
use lightdesk_engine::{ChannelId, Command, DocumentId, Engine, EntityRef, LightEntity, LightKind};

pub const DOC_A: DocumentId = DocumentId(1);
pub const DOC_B: DocumentId = DocumentId(2);

pub const KEY: EntityRef = EntityRef(1);
pub const FILL: EntityRef = EntityRef(2);
pub const RIM: EntityRef = EntityRef(3);
pub const SKY: EntityRef = EntityRef(10);

/// Host with two documents. `DOC_A` (active) holds `Key:Point`, `Fill:Area`,
/// `Rim:Spot` and a camera; `DOC_B` holds `Sky:Sun`.
pub fn studio() -> MemoryHost {
	let _ = tracing_subscriber::fmt::try_init();

	let mut host = MemoryHost::new();
	host.add_document(DOC_A);
	host.add_light(DOC_A, LightEntity::new(KEY, "Key", LightKind::Point));
	host.add_light(DOC_A, LightEntity::new(FILL, "Fill", LightKind::Area));
	host.add_object(DOC_A, EntityRef(99));
	host.add_light(DOC_A, LightEntity::new(RIM, "Rim", LightKind::Spot));
	host.add_document(DOC_B);
	host.add_light(DOC_B, LightEntity::new(SKY, "Sky", LightKind::Sun));
	host
}

/// Activates `engine` and drains the startup sequence.
pub fn start(engine: &mut Engine, host: &mut MemoryHost) {
	engine.activate(host).expect("activation succeeds");
	let directive = engine.tick(host);
	assert_eq!(directive.report.failed, 0, "startup is clean");
	assert!(directive.reschedule.is_some());
}

/// Active engine with every light of `DOC_A` bound.
pub fn bound_studio(host: &mut MemoryHost) -> Engine {
	let mut engine = Engine::default();
	start(&mut engine, host);
	assert_eq!(engine.invoke(host, Command::AssignAllFiltered), lightdesk_engine::CommandStatus::Finished);
	engine.tick(host);
	engine
}

/// Channel bound to `entity` in `doc`.
pub fn channel_of(engine: &Engine, doc: DocumentId, entity: EntityRef) -> ChannelId {
	engine.document(doc).and_then(|state| state.channels.lookup_by_entity(entity)).expect("entity is bound")
}

/// Asserts the host holds exactly one live view per channel of `doc`.
pub fn assert_views_mirror(engine: &Engine, host: &MemoryHost, doc: DocumentId) {
	let state = engine.document(doc).expect("document seen");
	assert_eq!(host.view_count(), state.channels.len());
	assert_eq!(engine.views().len(), state.channels.len());
	assert_eq!(engine.views().bound_document(), Some(doc));
	for channel in state.channels.iter() {
		assert!(engine.views().is_registered(host, channel.id), "view for {} is live", channel.id);
	}
}
