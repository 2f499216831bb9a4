//! Functional tests for the setup assistant.
//!
//! Core guarantees exercised here:
//! - Start and end come from standing-slot traffic; the reserved range and
//!   sit-like states never influence the guess.
//! - The suggested scope is the machine that directly holds both states.
//! - A suggestion applied to a fresh template merges without warnings.

use emote_core::{
    build_avatar, detect_merge_scope, detect_start_end, menu_path_to, suggest_setup, AssetLibrary, Avatar,
    AvatarDescriptor, BaseLayer, BuildConfig, LayerKind, SavedLog,
};
use emote_model::{BehaviorGraph, Condition, Control, MenuNode, MenuStore, Transition};
use emote_slots::{SlotTemplate, SELECTOR_PARAMETER};
use emote_test_utils::{action_template, hierarchy, host_action_graph, menu_tree, selector, END, START};
use pretty_assertions::assert_eq;

/// Tenet: the stock layout yields its own start, end, scope and menu.
#[test]
fn stock_layout_is_detected() {
    let fixture = menu_tree(&[1, 2, 3, 4]);
    let descriptor = AvatarDescriptor::new("Avatar")
        .with_layer(BaseLayer::custom(LayerKind::Action, host_action_graph().graph))
        .with_menu_root(fixture.root);

    let suggestion = suggest_setup(&descriptor, &fixture.store, &BuildConfig::new()).unwrap();

    assert_eq!(suggestion.start_state.as_deref(), Some(START));
    assert_eq!(suggestion.end_state.as_deref(), Some(END));
    assert_eq!(suggestion.merge_scope.as_deref(), Some("Standing"));
    assert_eq!(suggestion.target_menu, Some(fixture.emotes));
    assert_eq!(suggestion.target_path, Some(vec![0]));
}

/// Tenet: a sit-like state never wins start, however busy it is.
#[test]
fn sit_like_states_are_skipped() {
    let mut host = host_action_graph();
    let loop_sit = host.graph.arena.add_state(host.standing, "Loop Sit").unwrap();
    for (i, emote) in host.emotes.iter().enumerate() {
        let slot = f32::from(u8::try_from(i + 1).unwrap());
        host.graph
            .arena
            .add_transition(loop_sit, Transition::to(*emote).with_condition(selector(slot)))
            .unwrap();
    }
    host.graph
        .arena
        .add_transition(loop_sit, Transition::to(host.emotes[0]).with_condition(selector(1.0)))
        .unwrap();

    let guess = detect_start_end(&host.graph).unwrap();

    assert_eq!(guess.start.as_deref(), Some(START));
    assert_eq!(guess.end.as_deref(), Some(END));
}

/// Tenet: reserved-range traffic is invisible to detection.
#[test]
fn reserved_range_does_not_vote() {
    let mut graph = BehaviorGraph::new("Action");
    let root = graph.add_layer("Base", 1.0);
    let hub = graph.arena.add_state(root, "Hub").unwrap();
    let crowd = graph.arena.add_state(root, "Crowd").unwrap();
    for _ in 0..3 {
        graph
            .arena
            .add_transition(hub, Transition::to(crowd).with_condition(selector(12.0)))
            .unwrap();
    }

    let guess = detect_start_end(&graph).unwrap();

    assert_eq!(guess.start, None);
    assert_eq!(guess.end, None);
}

/// Tenet: any-state transitions count toward the end guess only.
#[test]
fn any_state_counts_as_incoming() {
    let mut graph = BehaviorGraph::new("Action");
    let root = graph.add_layer("Base", 1.0);
    graph.arena.add_state(root, "Idle").unwrap();
    let target = graph.arena.add_state(root, "Target").unwrap();
    let machine = graph.arena.machine_mut(root).unwrap();
    machine
        .any_state_transitions
        .push(Transition::to(target).with_condition(selector(2.0)));

    let guess = detect_start_end(&graph).unwrap();

    assert_eq!(guess.start, None);
    assert_eq!(guess.end.as_deref(), Some("Target"));
}

/// Tenet: a scope equal to the layer's default name is not suggested.
#[test]
fn default_scope_name_is_omitted() {
    let mut host = host_action_graph();
    host.graph.arena.machine_mut(host.standing).unwrap().name = "Action".to_string();
    assert_eq!(
        detect_merge_scope(&host.graph, START, END).unwrap().as_deref(),
        Some("Action")
    );

    let descriptor = AvatarDescriptor::new("Avatar").with_layer(BaseLayer::custom(LayerKind::Action, host.graph));
    let suggestion = suggest_setup(&descriptor, &MenuStore::new(), &BuildConfig::new()).unwrap();

    assert_eq!(suggestion.merge_scope, None);
    assert_eq!(suggestion.target_menu, None);
}

/// Tenet: a machine holding both states without slot traffic is no scope.
#[test]
fn scope_needs_slot_traffic() {
    let mut graph = BehaviorGraph::new("Action");
    let root = graph.add_layer("Base", 1.0);
    let quiet = graph.arena.add_child_machine(root, "Quiet").unwrap();
    let a = graph.arena.add_state(quiet, "A").unwrap();
    let b = graph.arena.add_state(quiet, "B").unwrap();
    graph
        .arena
        .add_transition(a, Transition::to(b).with_condition(Condition::is_true("Other")))
        .unwrap();

    assert_eq!(detect_merge_scope(&graph, "A", "B").unwrap(), None);
}

/// Tenet: a default action layer falls back to the configured names.
#[test]
fn default_action_layer_uses_configured_names() {
    let descriptor = AvatarDescriptor::new("Avatar").with_layer(BaseLayer::default_for(LayerKind::Action));
    let config = BuildConfig {
        default_start_state: "Begin".to_string(),
        ..BuildConfig::default()
    };

    let suggestion = suggest_setup(&descriptor, &MenuStore::new(), &config).unwrap();

    assert_eq!(suggestion.start_state.as_deref(), Some("Begin"));
    assert_eq!(suggestion.end_state.as_deref(), Some(END));
    assert_eq!(suggestion.merge_scope, None);
}

/// Tenet: the breadth-first path is the shortest control-index route.
#[test]
fn menu_path_is_shortest() {
    let mut store = MenuStore::new();
    let leaf = store.push(MenuNode::new("Leaf"));
    let mut deep = MenuNode::new("Deep");
    deep.controls.push(Control::submenu("Leaf", leaf));
    let deep = store.push(deep);
    let mut root = MenuNode::new("Root");
    root.controls.push(Control::submenu("Deep", deep));
    root.controls
        .push(Control::bound("Mute", emote_model::ControlKind::Toggle, SELECTOR_PARAMETER, 9.0));
    root.controls.push(Control::submenu("Leaf", leaf));
    let root = store.push(root);

    assert_eq!(menu_path_to(&store, root, leaf), Some(vec![2]));
    assert_eq!(menu_path_to(&store, root, deep), Some(vec![0]));
}

/// Tenet: a suggestion applied to a new template merges cleanly.
#[test]
fn suggestion_round_trips_through_a_build() {
    let (tree, nodes) = hierarchy(&["Wave"]);
    let fixture = menu_tree(&[1, 2, 3, 4]);
    let descriptor = AvatarDescriptor::new("Avatar")
        .with_layer(BaseLayer::custom(LayerKind::Action, host_action_graph().graph))
        .with_menu_root(fixture.root);
    let suggestion = suggest_setup(&descriptor, &fixture.store, &BuildConfig::new()).unwrap();

    let mut library = AssetLibrary::new();
    let wave = emote_model::AssetRef::new("wave");
    library.insert_graph(&wave, action_template("Wave", 1.0));
    let mut template = SlotTemplate::new(nodes[0], 2).with_name("Wave").with_action(wave, "", "");
    suggestion.apply_to(&mut template);
    assert_eq!(template.scope(), Some("Standing"));
    assert_eq!(template.target_menu.path, vec![0]);

    let mut avatar = Avatar::new(descriptor, tree);
    avatar.menus = fixture.store;
    avatar.add_template(template);
    let report = build_avatar(&mut avatar, &library, &mut SavedLog::default(), BuildConfig::new()).unwrap();

    assert!(!report.has_warnings(), "{:?}", report.diagnostics);
    assert_eq!(report.action_machines, vec!["EmoteSlot_2".to_string()]);
}
