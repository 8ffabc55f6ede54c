use scenekit_core::{
    Actor, BoundsPolicy, Command, CommandProcessor, EngineConfig, HistoryStore, PlacementConfig,
    Scene, UndoState,
};

fn add_text(label: &str) -> Command {
    Command::AddText { content: label.to_string(), x: 10.0, y: 10.0, style: None }
}

#[test]
fn test_history_store_creation() {
    let store = HistoryStore::new(Scene::new(1080.0, 1920.0));
    assert_eq!(
        store.undo_state(),
        UndoState { can_undo: false, can_redo: false, undo_depth: 0, redo_depth: 0 }
    );
    assert!(store.action_log().is_empty());
}

#[test]
fn test_multiple_undo_redo() {
    let mut store = HistoryStore::new(Scene::new(500.0, 500.0));

    for i in 0..5 {
        store.dispatch(add_text(&format!("line {}", i)), Actor::Human).unwrap();
    }
    assert_eq!(store.history_past().len(), 5);

    // Undo all
    for expected in (0..5).rev() {
        assert!(store.undo());
        assert_eq!(store.scene().objects.len(), expected);
    }
    assert!(!store.undo());
    assert_eq!(store.history_future().len(), 5);

    // Redo all
    for expected in 1..=5 {
        assert!(store.redo());
        assert_eq!(store.scene().objects.len(), expected);
    }
    assert!(!store.redo());
    assert_eq!(store.history_past().len(), 5);
}

#[test]
fn test_future_is_most_recently_undone_first() {
    let mut store = HistoryStore::new(Scene::new(500.0, 500.0));
    store.dispatch(add_text("one"), Actor::Human).unwrap();
    store.dispatch(add_text("two"), Actor::Human).unwrap();

    store.undo();
    store.undo();

    assert_eq!(store.history_future()[0].objects.len(), 1);
    assert_eq!(store.history_future()[1].objects.len(), 2);
}

#[test]
fn test_undo_does_not_touch_log() {
    let mut store = HistoryStore::new(Scene::new(500.0, 500.0));
    store.dispatch(add_text("one"), Actor::Human).unwrap();
    store.undo();
    store.redo();
    assert_eq!(store.action_log().len(), 1);
}

#[test]
fn test_independent_stores_are_isolated() {
    let mut first = HistoryStore::new(Scene::new(500.0, 500.0));
    let second = HistoryStore::new(Scene::new(500.0, 500.0));

    first.dispatch(add_text("only here"), Actor::Human).unwrap();

    assert_eq!(first.scene().objects.len(), 1);
    assert!(second.scene().objects.is_empty());
    assert!(second.action_log().is_empty());
}

#[test]
fn test_config_policy_reaches_store() {
    let config: EngineConfig =
        serde_json::from_str(r#"{"placement": {"policy": "unbounded"}}"#).unwrap();
    let mut store = HistoryStore::with_config(Scene::new(100.0, 100.0), &config);

    store
        .dispatch(Command::AddTool { tool_type: "pan.skillet".into(), x: -400.0, y: 900.0 }, Actor::Ai)
        .unwrap();
    assert_eq!(store.scene().objects.len(), 1);
}

#[test]
fn test_injected_processor() {
    let processor = CommandProcessor::from_config(&PlacementConfig {
        policy: BoundsPolicy::BoxInside,
        margin: 0.0,
    });
    let mut store = HistoryStore::with_processor(Scene::new(300.0, 300.0), processor, None);

    // knife preset is 240 wide
    assert!(store
        .dispatch(Command::AddTool { tool_type: "tool.knife".into(), x: 100.0, y: 0.0 }, Actor::Human)
        .is_err());
    assert!(store
        .dispatch(Command::AddTool { tool_type: "tool.knife".into(), x: 50.0, y: 0.0 }, Actor::Human)
        .is_ok());
}
