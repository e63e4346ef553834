use pretty_assertions::assert_eq;
use serde_json::json;
use tessel_blocks::serialization::{self, BlockState};
use tessel_blocks::{CommentIcon, Error, IconRegistry, IconType, Workspace};

use crate::common::{CallLog, Spy, serializable_spy};

#[test]
fn example_block_saves_comment_only() {
	let log = CallLog::default();
	let mut ws = Workspace::new_rendered();
	let id = ws.new_rendered_block("text_print").unwrap();
	let block = ws.block_mut(id).unwrap();
	block.set_comment_text(Some("hi"));
	block.add_icon(Spy::new("warning", &log).boxed());

	let state = serialization::save(block);
	assert_eq!(
		serde_json::to_value(&state).unwrap(),
		json!({"type": "text_print", "icons": {"comment": "hi"}})
	);
}

#[test]
fn custom_type_round_trips_through_registry() {
	let registry = IconRegistry::with_builtins();
	let _spy = registry.scoped("spy", serializable_spy("spy"));

	let log = CallLog::default();
	let mut ws = Workspace::new_headless();
	let id = ws.new_block("lists_create");
	ws.block_mut(id)
		.unwrap()
		.add_icon(Spy::new("spy", &log).serializable(json!({"depth": 3})).boxed());
	let saved = serialization::save_json(ws.block(id).unwrap()).unwrap();

	let mut fresh = Workspace::new_headless();
	let restored = serialization::append_json(&saved, &mut fresh, &registry).unwrap();
	let spy = fresh
		.block(restored)
		.unwrap()
		.icon_as::<Spy>("spy")
		.unwrap();
	assert_eq!(spy.state, Some(json!({"depth": 3})));
}

#[test]
fn unregistered_type_fails_the_load() {
	let registry = IconRegistry::with_builtins();
	let mut ws = Workspace::new_headless();
	let mut state = BlockState::new("lists_create");
	state.icons = Some([(IconType::new("spy"), json!(1))].into_iter().collect());

	let err = serialization::append(&state, &mut ws, &registry).unwrap_err();
	match err {
		Error::UnregisteredIcon(err) => assert_eq!(err.icon_type, IconType::new("spy")),
		other => panic!("unexpected error: {other}"),
	}
	assert!(ws.is_empty());
}

#[test]
fn scoped_type_is_gone_after_guard_drops() {
	let registry = IconRegistry::with_builtins();
	let source = r#"{"type": "x", "icons": {"spy": true}}"#;
	{
		let _spy = registry.scoped("spy", serializable_spy("spy"));
		let mut ws = Workspace::new_headless();
		serialization::append_json(source, &mut ws, &registry).unwrap();
	}

	let mut ws = Workspace::new_headless();
	assert!(serialization::append_json(source, &mut ws, &registry).is_err());
}

#[test]
fn loaded_comment_renders_with_block() {
	let registry = IconRegistry::with_builtins();
	let mut ws = Workspace::new_rendered();
	let source = r#"{"type": "x", "collapsed": true, "icons": {"comment": {"text": "t", "pinned": true}}}"#;

	let id = serialization::append_json(source, &mut ws, &registry).unwrap();
	let block = ws.block(id).unwrap();
	assert!(block.is_rendered());
	let comment = block.icon_as::<CommentIcon>("comment").unwrap();
	assert!(comment.view().is_some());
	assert!(!comment.is_bubble_visible());
}
