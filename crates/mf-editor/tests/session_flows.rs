//! Integration tests: editor session flows (mf-editor ↔ mf-core).
//!
//! Drives the session with host events the way the canvas page does and
//! checks both the resulting canvas and what ended up in storage.

use mf_core::catalog::mock_machines;
use mf_core::persist::{CANVAS_KEY, MemoryStorage, decode_state};
use mf_core::{EdgeId, ManualClock, NodeId, Point, Position, Rect, ViewportTransform};
use mf_editor::{ClickTarget, EditorConfig, EditorSession, InputEvent, Modifiers, Overlay};
use pretty_assertions::assert_eq;

type Session<'a> = EditorSession<MemoryStorage, &'a ManualClock>;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn new_session(clock: &ManualClock) -> Session<'_> {
    init_logging();
    EditorSession::new(MemoryStorage::new(), clock, EditorConfig::default())
}

fn drop_at(s: &mut Session<'_>, clock: &ManualClock, idx: usize, x: f64, y: f64) -> NodeId {
    clock.advance(1);
    s.handle(InputEvent::Drop {
        data: mock_machines()[idx].to_json(),
        client: Point::new(x, y),
    });
    s.state().nodes.last().map(|n| n.id).expect("node placed")
}

fn press(s: &mut Session<'_>, key: &str) {
    s.handle(InputEvent::key(key, Modifiers::default()));
}

fn persisted(s: &Session<'_>) -> mf_core::CanvasState {
    decode_state(s.store().storage().get(CANVAS_KEY).expect("document written"))
        .expect("document decodes")
}

// ─── Intake ──────────────────────────────────────────────────────────────

#[test]
fn drop_on_empty_canvas_places_machine() {
    let clock = ManualClock::new(1_000);
    let mut s = new_session(&clock);
    s.set_container(Rect::new(40.0, 100.0, 840.0, 700.0));

    drop_at(&mut s, &clock, 0, 160.0, 180.0);

    let nodes = &s.state().nodes;
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].payload.id, "machine-001");
    assert_eq!(nodes[0].position, Position::new(120.0, 80.0));
    assert_eq!(persisted(&s), *s.state());
}

#[test]
fn drop_respects_viewport_transform() {
    let clock = ManualClock::new(1_000);
    let mut s = new_session(&clock);
    s.set_transform(ViewportTransform::new(-100.0, 0.0, 2.0));

    drop_at(&mut s, &clock, 2, 140.0, 160.0);
    assert_eq!(s.state().nodes[0].position, Position::new(120.0, 80.0));
}

#[test]
fn catalog_tap_only_on_small_viewports() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    s.set_container(Rect::new(0.0, 200.0, 360.0, 600.0));
    let tap = || InputEvent::CatalogTap {
        data: mock_machines()[1].to_json(),
    };

    s.set_viewport_width(1024.0);
    assert!(!s.handle(tap()).canvas);

    s.set_viewport_width(390.0);
    assert!(s.handle(tap()).canvas);
    assert_eq!(s.state().nodes[0].position, Position::new(180.0, 200.0));
}

#[test]
fn same_machine_can_be_placed_twice() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    let a = drop_at(&mut s, &clock, 0, 10.0, 10.0);
    let b = drop_at(&mut s, &clock, 0, 90.0, 10.0);
    assert_ne!(a, b);
    assert_eq!(s.state().nodes.len(), 2);
}

// ─── Connections and moves ───────────────────────────────────────────────

#[test]
fn connect_and_move() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    let a = drop_at(&mut s, &clock, 0, 10.0, 10.0);
    let b = drop_at(&mut s, &clock, 1, 200.0, 10.0);

    assert!(s.handle(InputEvent::Connect { source: a, target: b }).canvas);
    assert_eq!(s.state().edges.len(), 1);
    assert_eq!(s.state().edges[0].source, a);
    assert_eq!(s.state().edges[0].target, b);

    assert!(
        !s.handle(InputEvent::Connect {
            source: a,
            target: NodeId::intern("ghost"),
        })
        .canvas
    );

    s.handle(InputEvent::NodeMoved {
        node: b,
        position: Position::new(300.0, 40.0),
    });
    assert_eq!(persisted(&s).node(b).unwrap().position, Position::new(300.0, 40.0));
}

// ─── Deletion flows ──────────────────────────────────────────────────────

#[test]
fn node_delete_via_context_menu_prunes_edges() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    let a = drop_at(&mut s, &clock, 0, 10.0, 10.0);
    let b = drop_at(&mut s, &clock, 1, 200.0, 10.0);
    s.handle(InputEvent::Connect { source: a, target: b });

    s.handle(InputEvent::NodeContextMenu {
        node: a,
        client: Point::new(15.0, 15.0),
    });
    s.handle(InputEvent::MenuDelete);
    assert_eq!(s.overlay(), Overlay::ConfirmDeleteNode { node: a });
    assert_eq!(s.state().nodes.len(), 2, "nothing deleted before confirm");

    let outcome = s.handle(InputEvent::Confirm);
    assert!(outcome.canvas);
    assert_eq!(s.overlay(), Overlay::Idle);
    assert!(s.state().edges.is_empty());
    assert_eq!(s.state().nodes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![b]);
    assert_eq!(persisted(&s), *s.state());
}

#[test]
fn cancelled_node_delete_keeps_node() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    let a = drop_at(&mut s, &clock, 0, 10.0, 10.0);
    s.handle(InputEvent::NodeContextMenu {
        node: a,
        client: Point::new(15.0, 15.0),
    });
    s.handle(InputEvent::MenuDelete);
    let writes = s.store().storage().writes();
    s.handle(InputEvent::Cancel);
    assert_eq!(s.overlay(), Overlay::Idle);
    assert!(s.state().contains_node(a));
    assert_eq!(s.store().storage().writes(), writes);
}

#[test]
fn edge_click_asks_before_deleting() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    let a = drop_at(&mut s, &clock, 0, 10.0, 10.0);
    let b = drop_at(&mut s, &clock, 1, 200.0, 10.0);
    s.handle(InputEvent::Connect { source: a, target: b });
    let edge = s.state().edges[0].id;

    s.handle(InputEvent::EdgeClick { edge });
    assert_eq!(s.overlay(), Overlay::ConfirmDeleteEdge { edge });
    s.handle(InputEvent::Cancel);
    assert_eq!(s.state().edges.len(), 1);

    s.handle(InputEvent::EdgeClick { edge });
    press(&mut s, "Enter");
    assert!(s.state().edges.is_empty());
    assert_eq!(s.state().nodes.len(), 2);
}

#[test]
fn keyboard_delete_skips_confirmation() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    let a = drop_at(&mut s, &clock, 0, 10.0, 10.0);
    let b = drop_at(&mut s, &clock, 1, 200.0, 10.0);

    s.handle(InputEvent::SelectionChange {
        nodes: vec![a],
        edges: vec![],
    });
    press(&mut s, "Delete");

    assert_eq!(s.overlay(), Overlay::Idle);
    assert!(!s.state().contains_node(a));
    assert!(s.state().contains_node(b));
    assert!(s.selection().is_empty());
}

#[test]
fn keyboard_delete_removes_mixed_selection_in_one_write() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    let a = drop_at(&mut s, &clock, 0, 10.0, 10.0);
    let b = drop_at(&mut s, &clock, 1, 200.0, 10.0);
    let c = drop_at(&mut s, &clock, 2, 400.0, 10.0);
    s.handle(InputEvent::Connect { source: a, target: b });
    s.handle(InputEvent::Connect { source: b, target: c });
    s.handle(InputEvent::Connect { source: c, target: a });
    let bc: EdgeId = s.state().edges[1].id;
    let writes = s.store().storage().writes();

    s.handle(InputEvent::SelectionChange {
        nodes: vec![a],
        edges: vec![bc],
    });
    press(&mut s, "Backspace");

    assert_eq!(s.store().storage().writes(), writes + 1);
    assert!(s.state().edges.is_empty());
    assert_eq!(s.state().nodes.len(), 2);
}

#[test]
fn keyboard_delete_with_empty_selection_is_noop() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    drop_at(&mut s, &clock, 0, 10.0, 10.0);
    press(&mut s, "Delete");
    assert_eq!(s.state().nodes.len(), 1);
}

#[test]
fn clear_all_requires_confirmation_and_closes_popup() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    let a = drop_at(&mut s, &clock, 0, 10.0, 10.0);
    let b = drop_at(&mut s, &clock, 1, 200.0, 10.0);
    s.handle(InputEvent::Connect { source: a, target: b });
    s.handle(InputEvent::NodeDoubleClick {
        node: a,
        client: Point::new(30.0, 30.0),
    });
    assert!(s.popup().is_some());

    s.handle(InputEvent::ClearAllRequested);
    assert_eq!(s.overlay(), Overlay::ConfirmClearAll);
    // Dialogs survive outside clicks
    s.handle(InputEvent::DocumentClick {
        target: ClickTarget::Outside,
    });
    assert_eq!(s.overlay(), Overlay::ConfirmClearAll);
    assert_eq!(s.state().nodes.len(), 2);

    s.handle(InputEvent::Confirm);
    assert!(s.state().is_empty());
    assert!(s.popup().is_none());
    assert!(persisted(&s).is_empty());
}

#[test]
fn cmd_delete_opens_clear_all_dialog() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    drop_at(&mut s, &clock, 0, 10.0, 10.0);
    s.handle(InputEvent::key(
        "Backspace",
        Modifiers {
            meta: true,
            ..Modifiers::default()
        },
    ));
    assert_eq!(s.overlay(), Overlay::ConfirmClearAll);
    press(&mut s, "Escape");
    assert_eq!(s.overlay(), Overlay::Idle);
    assert_eq!(s.state().nodes.len(), 1);
}

// ─── Detail popup ────────────────────────────────────────────────────────

#[test]
fn popup_lists_fields_and_clamps() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    s.set_container(Rect::new(0.0, 0.0, 600.0, 400.0));
    let a = drop_at(&mut s, &clock, 2, 10.0, 10.0);

    s.handle(InputEvent::NodeDoubleClick {
        node: a,
        client: Point::new(590.0, 390.0),
    });
    let popup = s.popup().expect("popup open");
    assert_eq!(popup.node, a);
    assert_eq!(popup.origin, Position::new(310.0, 230.0));
    assert!(popup.fields.iter().all(|f| f.key != "position" && f.key != "components"));
    assert_eq!(popup.fields[1].value, "Qualitätskontrolle C1");
}

#[test]
fn deleting_popup_node_closes_popup() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    let a = drop_at(&mut s, &clock, 0, 10.0, 10.0);
    s.handle(InputEvent::NodeDoubleClick {
        node: a,
        client: Point::new(30.0, 30.0),
    });
    s.handle(InputEvent::SelectionChange {
        nodes: vec![a],
        edges: vec![],
    });
    press(&mut s, "Delete");
    assert!(s.popup().is_none());
}

#[test]
fn outside_click_closes_menu_and_popup() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    let a = drop_at(&mut s, &clock, 0, 10.0, 10.0);
    s.handle(InputEvent::NodeDoubleClick {
        node: a,
        client: Point::new(30.0, 30.0),
    });
    s.handle(InputEvent::NodeContextMenu {
        node: a,
        client: Point::new(30.0, 30.0),
    });
    assert!(matches!(s.overlay(), Overlay::ContextMenu { .. }));

    s.handle(InputEvent::DocumentClick {
        target: ClickTarget::Outside,
    });
    assert_eq!(s.overlay(), Overlay::Idle);
    assert!(s.popup().is_none());
}

// ─── Persistence across sessions ─────────────────────────────────────────

#[test]
fn reopened_session_sees_previous_canvas() {
    let clock = ManualClock::new(0);
    let mut s = new_session(&clock);
    let a = drop_at(&mut s, &clock, 0, 10.0, 10.0);
    let b = drop_at(&mut s, &clock, 1, 200.0, 10.0);
    s.handle(InputEvent::Connect { source: a, target: b });
    let expected = s.state().clone();

    let storage = s.store().storage().clone();
    let reopened = EditorSession::new(storage, &clock, EditorConfig::default());
    assert_eq!(*reopened.state(), expected);
}
