use pretty_assertions::assert_eq;
use tessel_blocks::context_menu::{
	COLLAPSE_OPTION, COMMENT_OPTION, DELETE_OPTION, DISABLE_OPTION,
	register_default_block_options,
};
use tessel_blocks::{
	Block, BlockId, BlockOptions, MANUALLY_DISABLED, MenuTarget, Workspace, default_block_options,
};
use tessel_menus::{ContextMenuOption, MenuHost, MenuTrigger, Point, Precondition};

use crate::common::{CallLog, Spy};

fn options() -> BlockOptions {
	let options = BlockOptions::new();
	register_default_block_options(&options).unwrap();
	options
}

fn setup(log: &CallLog) -> (Workspace, BlockId) {
	let mut ws = Workspace::new_rendered();
	let id = ws.new_rendered_block("controls_if").unwrap();
	let block = ws.block_mut(id).unwrap();
	block.add_icon(
		Spy::new("gear", log)
			.with_menu(vec![("Poke", "spy.poke"), ("Inspect", "spy.inspect")])
			.boxed(),
	);
	block.add_icon(Spy::new("plain", log).boxed());
	(ws, id)
}

fn labels(host: &MenuHost) -> Vec<String> {
	host.visible()
		.map(|menu| menu.labels().into_iter().map(str::to_string).collect())
		.unwrap_or_default()
}

#[test]
fn capable_icon_shows_its_own_menu() {
	let log = CallLog::default();
	let (mut ws, id) = setup(&log);
	let mut host = MenuHost::new();
	let handle = ws.block(id).unwrap().icon_handle("gear").unwrap();

	let shown = ws
		.show_context_menu(handle, &MenuTrigger::pointer(3.0, 4.0), &mut host, &options())
		.unwrap();
	assert!(shown.is_some());
	assert_eq!(labels(&host), vec!["Poke", "Inspect"]);
	assert_eq!(host.visible().unwrap().anchor, Point::new(3.0, 4.0));
}

#[test]
fn plain_icon_and_block_fall_back_to_block_options() {
	let log = CallLog::default();
	let (mut ws, id) = setup(&log);
	let mut host = MenuHost::new();
	let options = options();
	let trigger = MenuTrigger::pointer(0.0, 0.0);
	let expected = vec!["Add Comment", "Collapse Block", "Disable Block", "Delete Block"];

	let handle = ws.block(id).unwrap().icon_handle("plain").unwrap();
	ws.show_context_menu(handle, &trigger, &mut host, &options)
		.unwrap();
	assert_eq!(labels(&host), expected);

	ws.show_context_menu(id, &trigger, &mut host, &options)
		.unwrap();
	assert_eq!(labels(&host), expected);
}

#[test]
fn showing_a_menu_replaces_the_previous_one() {
	let log = CallLog::default();
	let (mut ws, id) = setup(&log);
	let mut host = MenuHost::new();
	let options = options();
	let trigger = MenuTrigger::keyboard(Point::default());
	let gear = ws.block(id).unwrap().icon_handle("gear").unwrap();

	let first = ws
		.show_context_menu(gear, &trigger, &mut host, &options)
		.unwrap()
		.unwrap();
	let second = ws
		.show_context_menu(id, &trigger, &mut host, &options)
		.unwrap()
		.unwrap();

	assert_ne!(first, second);
	assert_eq!(host.visible().unwrap().id, second);
	assert!(!host.visible().unwrap().contains_label("Poke"));
}

#[test]
fn icon_menu_command_routes_to_icon() {
	let log = CallLog::default();
	let (mut ws, id) = setup(&log);
	let mut host = MenuHost::new();
	let options = options();
	let gear = ws.block(id).unwrap().icon_handle("gear").unwrap();
	log.clear();

	ws.show_context_menu(gear, &MenuTrigger::pointer(0.0, 0.0), &mut host, &options)
		.unwrap();
	let item = ws.activate_menu_item(0, &mut host, &options).unwrap().unwrap();

	assert_eq!(item.command, "spy.poke");
	assert_eq!(log.hooks(), vec!["command:spy.poke"]);
	assert!(!host.is_visible());
}

#[test]
fn block_options_toggle_state() {
	let log = CallLog::default();
	let (mut ws, id) = setup(&log);
	let mut host = MenuHost::new();
	let options = options();
	let trigger = MenuTrigger::pointer(0.0, 0.0);

	// Row 2 is Disable Block.
	ws.show_context_menu(id, &trigger, &mut host, &options)
		.unwrap();
	ws.activate_menu_item(2, &mut host, &options).unwrap();
	let block = ws.block(id).unwrap();
	assert!(block.attributes().has_disabled_reason(MANUALLY_DISABLED));

	ws.show_context_menu(id, &trigger, &mut host, &options)
		.unwrap();
	assert!(host.visible().unwrap().contains_label("Enable Block"));

	// Row 0 is Add Comment.
	ws.activate_menu_item(0, &mut host, &options).unwrap();
	assert_eq!(ws.block(id).unwrap().comment_text(), Some(""));
}

#[test]
fn collapse_option_is_deferred_like_any_collapse() {
	let log = CallLog::default();
	let (mut ws, id) = setup(&log);
	let mut host = MenuHost::new();
	let options = options();
	log.clear();

	ws.show_context_menu(id, &MenuTrigger::pointer(0.0, 0.0), &mut host, &options)
		.unwrap();
	ws.activate_menu_item(1, &mut host, &options).unwrap();
	assert_eq!(log.count("update_collapsed"), 0);

	ws.run_deferred();
	assert_eq!(log.count("update_collapsed"), 2);
	assert!(ws.block(id).unwrap().attributes().is_collapsed());
}

#[test]
fn delete_option_removes_block() {
	let log = CallLog::default();
	let (mut ws, id) = setup(&log);
	let mut host = MenuHost::new();
	let options = options();

	ws.show_context_menu(id, &MenuTrigger::pointer(0.0, 0.0), &mut host, &options)
		.unwrap();
	let item = ws.activate_menu_item(3, &mut host, &options).unwrap().unwrap();

	assert_eq!(item.command, DELETE_OPTION);
	assert!(ws.block(id).is_none());
}

#[test]
fn read_only_block_greys_out_and_hides_options() {
	let log = CallLog::default();
	let (mut ws, id) = setup(&log);
	ws.block_mut(id).unwrap().set_editable(false);
	let mut host = MenuHost::new();
	let options = options();

	ws.show_context_menu(id, &MenuTrigger::pointer(0.0, 0.0), &mut host, &options)
		.unwrap();
	let menu = host.visible().unwrap();
	let rows: Vec<_> = menu
		.items
		.iter()
		.map(|item| (item.label.as_str(), item.enabled))
		.collect();
	assert_eq!(
		rows,
		vec![
			("Collapse Block", true),
			("Disable Block", false),
			("Delete Block", false),
		]
	);

	assert!(ws.activate_menu_item(2, &mut host, &options).unwrap().is_none());
	assert!(ws.block(id).is_some());
}

#[test]
fn stale_menu_is_not_activated() {
	let log = CallLog::default();
	let (mut ws, id) = setup(&log);
	let mut host = MenuHost::new();
	let options = options();

	ws.show_context_menu(id, &MenuTrigger::pointer(0.0, 0.0), &mut host, &options)
		.unwrap();
	host.dismiss();
	assert!(ws.activate_menu_item(0, &mut host, &options).unwrap().is_none());
}

#[test]
fn block_disposed_while_menu_open_is_not_activated() {
	let log = CallLog::default();
	let (mut ws, id) = setup(&log);
	let mut host = MenuHost::new();
	let options = options();

	ws.show_context_menu(id, &MenuTrigger::pointer(0.0, 0.0), &mut host, &options)
		.unwrap();
	ws.block_mut(id).unwrap().dispose();

	// Row 0 is Add Comment.
	assert!(ws.activate_menu_item(0, &mut host, &options).unwrap().is_none());
	assert!(ws.block(id).is_none());
	assert!(!host.is_visible());
}

#[test]
fn icon_of_disposed_block_is_not_activated() {
	let log = CallLog::default();
	let (mut ws, id) = setup(&log);
	let mut host = MenuHost::new();
	let options = options();
	let gear = ws.block(id).unwrap().icon_handle("gear").unwrap();

	ws.show_context_menu(gear, &MenuTrigger::pointer(0.0, 0.0), &mut host, &options)
		.unwrap();
	ws.block_mut(id).unwrap().dispose();
	log.clear();

	assert!(ws.activate_menu_item(0, &mut host, &options).unwrap().is_none());
	assert_eq!(log.count("command:spy.poke"), 0);
}

#[test]
fn extra_options_slot_in_by_priority() {
	let log = CallLog::default();
	let (mut ws, id) = setup(&log);
	let options = options();
	options
		.register(ContextMenuOption::new(
			"blockHelp",
			3,
			|_: &Block| "Help".to_string(),
			|_: &mut Block| {},
		))
		.unwrap();
	options
		.register(
			ContextMenuOption::new(
				"blockSecret",
				0,
				|_: &Block| "Secret".to_string(),
				|_: &mut Block| {},
			)
			.with_precondition(|_: &Block| Precondition::Hidden),
		)
		.unwrap();
	let mut host = MenuHost::new();

	ws.show_context_menu(
		MenuTarget::Block(id),
		&MenuTrigger::pointer(0.0, 0.0),
		&mut host,
		&options,
	)
	.unwrap();
	assert_eq!(
		labels(&host),
		vec!["Add Comment", "Help", "Collapse Block", "Disable Block", "Delete Block"]
	);
}

#[test]
fn defaults_are_registered_once_in_priority_order() {
	let options = default_block_options();
	assert_eq!(
		options.ids(),
		vec![COMMENT_OPTION, COLLAPSE_OPTION, DISABLE_OPTION, DELETE_OPTION]
	);
	assert!(register_default_block_options(options).is_err());
}

#[test]
fn unknown_block_is_an_error() {
	let mut ws = Workspace::new_headless();
	let mut host = MenuHost::new();
	let result = ws.show_context_menu(
		BlockId(99),
		&MenuTrigger::pointer(0.0, 0.0),
		&mut host,
		&options(),
	);
	assert!(result.is_err());
	assert!(!host.is_visible());
}
