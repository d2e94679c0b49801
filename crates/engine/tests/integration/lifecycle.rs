use std::time::Duration;

use lightdesk_engine::host::memory::MemoryHost;
use lightdesk_engine::{Engine, EngineConfig, EngineError, HostError, LifecycleSignal, Phase, STARTUP_SEQUENCE, SignalKind};

use crate::common::{DOC_A, assert_views_mirror, bound_studio, start, studio};

#[test]
fn activation_installs_subscriptions_and_tick() {
	let mut host = studio();
	let mut engine = Engine::default();

	engine.activate(&mut host).unwrap();

	assert_eq!(engine.phase(), Phase::Active);
	assert_eq!(host.subscriptions(), SignalKind::ALL.as_slice());
	assert_eq!(host.tick_interval(), Some(Duration::from_secs(1)));
	assert_eq!(engine.pending_tasks(), STARTUP_SEQUENCE.to_vec());
}

#[test]
fn startup_drain_tracks_document_and_builds_catalog() {
	let mut host = studio();
	let mut engine = Engine::default();
	start(&mut engine, &mut host);

	assert_eq!(engine.tracked_document(), Some(DOC_A));
	let state = engine.document(DOC_A).unwrap();
	let names: Vec<&str> = state.catalog.filtered().iter().map(|light| light.name.as_str()).collect();
	assert_eq!(names, ["Key", "Fill", "Rim"]);
	assert_eq!(state.object_count, Some(4));
	assert_eq!(engine.views().bound_document(), Some(DOC_A));
}

#[test]
fn activate_twice_registers_nothing_twice() {
	let mut host = studio();
	let mut engine = Engine::default();
	start(&mut engine, &mut host);

	engine.activate(&mut host).unwrap();

	assert_eq!(host.subscriptions().len(), SignalKind::ALL.len());
	assert!(engine.pending_tasks().is_empty(), "no second startup sequence");
}

#[test]
fn refused_subscription_rolls_back_activation() {
	let mut host = studio();
	host.refuse_subscription(SignalKind::PostSwitch);
	let mut engine = Engine::default();

	let err = engine.activate(&mut host).unwrap_err();

	assert!(matches!(err, EngineError::Host(HostError::Runtime(_))));
	assert_eq!(engine.phase(), Phase::Inactive);
	assert!(host.subscriptions().is_empty());
	assert_eq!(host.tick_interval(), None);
	assert!(engine.pending_tasks().is_empty());

	// the refusal was one-shot
	engine.activate(&mut host).unwrap();
	assert!(engine.is_active());
}

#[test]
fn refused_tick_rolls_back_activation() {
	let mut host = studio();
	host.refuse_tick(true);
	let mut engine = Engine::default();

	assert!(engine.activate(&mut host).is_err());
	assert!(host.subscriptions().is_empty());
	assert!(!engine.is_active());
}

#[test]
fn startup_without_active_document_tears_down() {
	let _ = tracing_subscriber::fmt::try_init();
	let mut host = MemoryHost::new();
	let mut engine = Engine::default();
	engine.activate(&mut host).unwrap();

	let directive = engine.tick(&mut host);

	assert!(directive.report.startup_aborted);
	assert_eq!(directive.report.drained, 1);
	assert_eq!(directive.report.failed, 1);
	assert_eq!(directive.reschedule, None);
	assert!(!engine.is_active());
	assert!(host.subscriptions().is_empty());
	assert_eq!(host.tick_interval(), None);
	assert!(engine.pending_tasks().is_empty());
}

#[test]
fn inactive_tick_asks_to_be_dropped() {
	let mut host = studio();
	let mut engine = Engine::default();
	let directive = engine.tick(&mut host);
	assert_eq!(directive.reschedule, None);
	assert_eq!(directive.report.drained, 0);
}

#[test]
fn deactivate_drops_views_but_keeps_channels() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);
	engine.handle_signal(&host, LifecycleSignal::PostSwitch);

	engine.deactivate(&mut host);

	assert_eq!(engine.phase(), Phase::Inactive);
	assert_eq!(host.view_count(), 0);
	assert!(host.subscriptions().is_empty());
	assert_eq!(host.tick_interval(), None);
	assert!(engine.pending_tasks().is_empty());
	assert_eq!(engine.tracked_document(), None);
	assert_eq!(engine.document(DOC_A).unwrap().channels.len(), 3);

	start(&mut engine, &mut host);
	assert_views_mirror(&engine, &host, DOC_A);
}

#[test]
fn configured_engine_uses_interval_and_prefix() {
	let config = EngineConfig::from_toml_str("tick_interval_ms = 250\nview_type_prefix = \"DESK_\"\n[filters]\nspot = false\n").unwrap();
	let mut host = studio();
	let mut engine = Engine::new(config);
	start(&mut engine, &mut host);

	assert_eq!(host.tick_interval(), Some(Duration::from_millis(250)));
	assert_eq!(engine.document(DOC_A).unwrap().catalog.filtered().len(), 2);

	engine.invoke(&host, lightdesk_engine::Command::AssignAllFiltered);
	let directive = engine.tick(&mut host);
	assert_eq!(directive.reschedule, Some(Duration::from_millis(250)));
	assert_eq!(host.view_count(), 2);
	assert!(host.views().all(|view| view.type_name.starts_with("DESK_")));
}

#[test]
fn config_file_round_trips_through_disk() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("lightdesk.toml");
	std::fs::write(&path, "tick_interval_ms = 500\n").unwrap();

	let config = EngineConfig::load(&path).unwrap();
	assert_eq!(config.tick_interval(), Duration::from_millis(500));

	let missing = EngineConfig::load(&dir.path().join("absent.toml")).unwrap_err();
	assert!(matches!(missing, lightdesk_engine::ConfigError::Io { .. }));
}
