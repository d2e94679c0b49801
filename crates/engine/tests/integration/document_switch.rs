use lightdesk_engine::host::memory::MemoryHost;
use lightdesk_engine::{Command, CommandStatus, Engine, LifecycleSignal, LightKind};
use pretty_assertions::assert_eq;

use crate::common::{DOC_A, DOC_B, FILL, KEY, RIM, SKY, assert_views_mirror, bound_studio, channel_of, studio};

fn switch(engine: &mut Engine, host: &mut MemoryHost, to: lightdesk_engine::DocumentId, pre_switch: bool) {
	if pre_switch {
		engine.handle_signal(host, LifecycleSignal::PreSwitch);
	}
	host.set_active(Some(to));
	engine.handle_signal(host, LifecycleSignal::PostSwitch);
	let report = engine.tick(host).report;
	assert_eq!(report.failed, 0);
}

fn round_trip(pre_switch: bool) {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);
	engine.set_filter(&host, LightKind::Spot, false).unwrap();
	engine.select(&host, 1).unwrap();
	let before = engine.export_document(DOC_A).unwrap();

	switch(&mut engine, &mut host, DOC_B, pre_switch);

	assert_eq!(engine.tracked_document(), Some(DOC_B));
	assert_views_mirror(&engine, &host, DOC_B);
	assert_eq!(host.view_count(), 0, "document B has no channels yet");
	assert_eq!(engine.document(DOC_A).unwrap().channels.len(), 3, "A's bindings survive while inactive");

	engine.select(&host, 0).unwrap();
	assert_eq!(engine.invoke(&host, Command::AssignSelected), CommandStatus::Finished);
	engine.tick(&mut host);
	channel_of(&engine, DOC_B, SKY);
	assert_views_mirror(&engine, &host, DOC_B);

	switch(&mut engine, &mut host, DOC_A, pre_switch);

	assert_eq!(engine.export_document(DOC_A).unwrap(), before);
	let selected = engine.document(DOC_A).unwrap().catalog.selected().map(|light| light.id);
	assert_eq!(selected, Some(FILL));
	assert_views_mirror(&engine, &host, DOC_A);
	assert!(host.views().all(|view| view.entity != SKY), "B's view was unregistered");
}

#[test]
fn switch_and_back_with_pre_switch_signal() {
	round_trip(true);
}

#[test]
fn switch_and_back_without_pre_switch_signal() {
	round_trip(false);
}

#[test]
fn repeated_post_switch_leaves_one_view_per_channel() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);

	for _ in 0..3 {
		engine.handle_signal(&host, LifecycleSignal::PostSwitch);
	}
	engine.tick(&mut host);

	assert_views_mirror(&engine, &host, DOC_A);
	for entity in [KEY, FILL, RIM] {
		channel_of(&engine, DOC_A, entity);
	}
}

#[test]
fn graph_change_detects_missed_switch() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);

	host.set_active(Some(DOC_B));
	assert!(!engine.channel_view_visible(&host, channel_of(&engine, DOC_A, KEY)), "stale document hides channel views");
	engine.handle_signal(&host, LifecycleSignal::GraphChanged { light_touched: false });
	engine.tick(&mut host);

	assert_eq!(engine.tracked_document(), Some(DOC_B));
	assert_eq!(host.view_count(), 0);
}

#[test]
fn panel_poll_recovers_from_missed_switch() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);

	host.set_active(Some(DOC_B));
	assert!(engine.ensure_current(&host));
	engine.tick(&mut host);
	host.set_active(Some(DOC_A));
	assert!(engine.ensure_current(&host));
	engine.tick(&mut host);

	assert_views_mirror(&engine, &host, DOC_A);
	assert!(engine.channel_view_visible(&host, channel_of(&engine, DOC_A, RIM)));
}

#[test]
fn unloaded_document_drops_its_views() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);

	engine.handle_signal(&host, LifecycleSignal::PreSwitch);
	host.delete_document(DOC_A);
	host.set_active(Some(DOC_B));
	engine.handle_signal(&host, LifecycleSignal::PostSwitch);
	let report = engine.tick(&mut host).report;

	assert_eq!(report.failed, 0);
	assert_eq!(host.view_count(), 0);
	assert_eq!(engine.tracked_document(), Some(DOC_B));
	assert!(engine.document(DOC_A).is_none(), "state of the unloaded document is dropped");
	assert!(engine.document(DOC_B).is_some());
}

#[test]
fn aborted_switch_is_repaired_by_next_sweep() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);

	engine.handle_signal(&host, LifecycleSignal::PreSwitch);
	engine.tick(&mut host);
	assert_eq!(host.view_count(), 0);
	assert_eq!(engine.views().bound_document(), None);

	engine.handle_signal(&host, LifecycleSignal::GraphChanged { light_touched: true });
	let report = engine.tick(&mut host).report;

	assert_eq!(report.failed, 0);
	assert_eq!(engine.document(DOC_A).unwrap().channels.len(), 3);
	assert_views_mirror(&engine, &host, DOC_A);
}

#[test]
fn panel_poll_repairs_aborted_switch() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);

	engine.handle_signal(&host, LifecycleSignal::PreSwitch);
	engine.tick(&mut host);

	assert!(engine.ensure_current(&host), "views no longer mirror the active document");
	engine.tick(&mut host);

	assert_views_mirror(&engine, &host, DOC_A);
	assert!(!engine.ensure_current(&host));
}
