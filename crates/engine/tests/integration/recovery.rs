use lightdesk_engine::{Command, LifecycleSignal};
use pretty_assertions::assert_eq;

use crate::common::{DOC_A, FILL, KEY, RIM, assert_views_mirror, bound_studio, channel_of, start, studio};

#[test]
fn failing_assign_does_not_stall_the_queue() {
	let mut host = studio();
	let mut engine = lightdesk_engine::Engine::default();
	start(&mut engine, &mut host);

	engine.invoke(&host, Command::AssignAllFiltered);
	host.remove_object(DOC_A, FILL);
	let report = engine.tick(&mut host).report;

	assert_eq!(report.drained, 3);
	assert_eq!(report.failed, 1);
	assert!(engine.is_active());
	let state = engine.document(DOC_A).unwrap();
	assert_eq!(state.channels.iter().map(|c| c.entity).collect::<Vec<_>>(), vec![KEY, RIM]);
	assert_views_mirror(&engine, &host, DOC_A);
}

#[test]
fn deleted_light_is_swept_after_graph_change() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);

	host.remove_object(DOC_A, RIM);
	engine.handle_signal(&host, LifecycleSignal::GraphChanged { light_touched: false });
	engine.tick(&mut host);

	assert!(engine.document(DOC_A).unwrap().channels.lookup_by_entity(RIM).is_none());
	assert_eq!(engine.document(DOC_A).unwrap().catalog.lights().len(), 2);
	assert_views_mirror(&engine, &host, DOC_A);
}

#[test]
fn deleted_light_is_swept_by_rebuild() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);

	host.remove_object(DOC_A, KEY);
	engine.invoke(&host, Command::Refresh);
	let report = engine.tick(&mut host).report;

	assert_eq!(report.failed, 0);
	assert_eq!(engine.document(DOC_A).unwrap().channels.len(), 2);
	assert_views_mirror(&engine, &host, DOC_A);
}

#[test]
fn rejected_registrations_tear_channels_down() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);

	host.reject_all_views(true);
	engine.invoke(&host, Command::Refresh);
	let report = engine.tick(&mut host).report;

	assert_eq!(report.failed, 0, "registration failures are recovered, not surfaced");
	assert!(engine.document(DOC_A).unwrap().channels.is_empty());
	assert!(engine.views().is_empty());
	assert_eq!(host.view_count(), 0);
}

#[test]
fn view_lost_by_host_is_reconciled() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);
	let lost = channel_of(&engine, DOC_A, FILL);
	let type_name = engine.views().get(lost).unwrap().type_name.clone();

	assert!(host.lose_view(&type_name));
	assert!(!engine.channel_view_visible(&host, lost));
	engine.handle_signal(&host, LifecycleSignal::GraphChanged { light_touched: true });
	let report = engine.tick(&mut host).report;

	assert_eq!(report.failed, 0);
	assert!(!engine.document(DOC_A).unwrap().channels.contains(lost));
	assert!(engine.pending_tasks().is_empty(), "follow-up sweep already ran");
	assert_views_mirror(&engine, &host, DOC_A);
}

#[test]
fn renamed_light_is_relabelled_on_refresh() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);
	let id = channel_of(&engine, DOC_A, KEY);

	host.rename_light(DOC_A, KEY, "Key Left");
	engine.invoke(&host, Command::Refresh);
	engine.tick(&mut host);

	assert_eq!(channel_of(&engine, DOC_A, KEY), id, "channel identity survives a rename");
	assert_eq!(engine.views().get(id).unwrap().label, "Key Left");
}

#[test]
fn delete_all_leaves_nothing_behind() {
	let mut host = studio();
	let mut engine = bound_studio(&mut host);

	engine.invoke(&host, Command::DeleteAllChannels);
	engine.tick(&mut host);

	assert!(engine.document(DOC_A).unwrap().channels.is_empty());
	assert_eq!(host.view_count(), 0);
	assert!(engine.views().is_empty());
}
