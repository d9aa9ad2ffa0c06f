//! Canvas Editing Integration Tests
//!
//! Exercises the public API end to end:
//! - Add / select / delete flows
//! - Z-ordering
//! - Edit-mode gating between canvas and object gestures
//! - Repositioning and viewport fitting
//! - Snapshot persistence

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use paper_core::{
    Angle, Background, CanvasConfig, CanvasEvent, CanvasObject, CanvasSession, CanvasStore,
    DrawingSurface, FeedbackEngine, GestureCoordinator, GestureMode, HapticKind, ObjectContent,
    Point2D, RecordingFeedback, Rect, Size2D, SoundKind, Transform, Vector2D,
};

/// A store whose events are collected into a shared log.
fn recorded_store() -> (CanvasStore, Rc<RefCell<Vec<CanvasEvent>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut store = CanvasStore::default();
    let sink = Rc::clone(&log);
    store.on_event(move |event| sink.borrow_mut().push(event.clone()));
    (store, log)
}

/// A session on a 1024x768 view with a recording feedback engine.
fn session() -> (CanvasSession, Arc<RecordingFeedback>) {
    let recorder = Arc::new(RecordingFeedback::new());
    let feedback: Arc<dyn FeedbackEngine> = recorder.clone();
    let mut session = CanvasSession::new(CanvasConfig::default(), feedback);
    session.set_viewport_size(Size2D::new(1024.0, 768.0));
    (session, recorder)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================================
// Add / Select / Delete
// ============================================================================

#[test]
fn test_add_select_delete_flow() {
    let (mut store, _) = recorded_store();

    let text = store.add_object(ObjectContent::text("Happy birthday"));
    assert_eq!(store.objects().len(), 1);
    assert!(approx(store.object(text).unwrap().z_index, 0.0));
    assert_eq!(store.selection().active(), Some(text));

    let photo = store.add_object(ObjectContent::photo("party"));
    assert_eq!(store.objects().len(), 2);
    assert!(approx(store.object(photo).unwrap().z_index, 1.0));
    assert_eq!(store.selection().selected(), &[photo]);
    assert!(!store.selection().contains(text));

    store.delete_object(text);
    assert_eq!(store.objects().len(), 1);
    assert_eq!(store.objects()[0].id(), photo);
    assert_eq!(store.selection().active(), Some(photo));
}

#[test]
fn test_delete_active_object_clears_selection() {
    let (mut store, log) = recorded_store();
    let id = store.add_object(ObjectContent::sticky_note("bye"));
    store.enter_edit_mode(id);
    log.borrow_mut().clear();

    store.delete_object(id);

    assert_eq!(store.selection().active(), None);
    assert!(!store.selection().is_editing());
    assert_eq!(
        *log.borrow(),
        vec![
            CanvasEvent::ObjectDeleted(id),
            CanvasEvent::EditModeChanged {
                id,
                is_editing: false
            },
            CanvasEvent::SelectionChanged(vec![]),
        ]
    );
}

#[test]
fn test_delete_selected_objects_removes_all_selected() {
    let mut store = CanvasStore::default();
    let a = store.add_object(ObjectContent::text("a"));
    let b = store.add_object(ObjectContent::text("b"));
    let c = store.add_object(ObjectContent::text("c"));
    store.select_object(a, true);
    store.select_object(b, false);

    store.delete_selected_objects();

    assert_eq!(store.objects().len(), 1);
    assert_eq!(store.objects()[0].id(), c);
    assert!(store.selection().selected().is_empty());
}

// ============================================================================
// Z-Ordering
// ============================================================================

#[test]
fn test_bring_to_front_reorders() {
    let mut store = CanvasStore::default();
    let a = store.add_object(ObjectContent::text("A"));
    let b = store.add_object(ObjectContent::text("B"));
    let c = store.add_object(ObjectContent::text("C"));

    store.bring_to_front(a);

    assert!(approx(store.object(a).unwrap().z_index, 3.0));
    let order: Vec<_> = store.state().objects_by_z().iter().map(|o| o.id()).collect();
    assert_eq!(order, vec![b, c, a]);
}

#[test]
fn test_hit_testing_prefers_topmost() {
    let mut store = CanvasStore::default();
    let below = store.add_object(ObjectContent::photo("below"));
    let above = store.add_object(ObjectContent::photo("above"));

    assert_eq!(store.object_at(Point2D::ZERO), Some(above));
    store.bring_to_front(below);
    assert_eq!(store.object_at(Point2D::ZERO), Some(below));
    assert_eq!(store.object_at(Point2D::new(5_000.0, 0.0)), None);
}

#[test]
fn test_duplicate_selected_offsets_and_selects_copies() {
    let (mut store, log) = recorded_store();
    let original = store.add_object(ObjectContent::sticky_note("copy me"));
    log.borrow_mut().clear();

    let copies = store.duplicate_selected();

    assert_eq!(copies.len(), 1);
    let copy = store.object(copies[0]).unwrap();
    assert_ne!(copy.id(), original);
    assert_eq!(copy.transform.position, Point2D::new(20.0, 20.0));
    assert!(approx(copy.z_index, 1.0));
    assert_eq!(store.selection().selected(), copies.as_slice());
    assert_eq!(
        *log.borrow(),
        vec![
            CanvasEvent::ObjectAdded(copies[0]),
            CanvasEvent::SelectionChanged(copies.clone()),
        ]
    );
}

// ============================================================================
// Edit-Mode Gating
// ============================================================================

#[test]
fn test_coordinator_gates_gesture_groups() {
    let recorder = Arc::new(RecordingFeedback::new());
    let feedback: Arc<dyn FeedbackEngine> = recorder.clone();
    let mut gestures = GestureCoordinator::new(feedback, false);
    let sticker = paper_core::ObjectId::new();
    let other = paper_core::ObjectId::new();

    assert!(gestures.can_perform_canvas_gestures());
    gestures.enter_edit_mode(sticker);
    assert_eq!(gestures.mode(), GestureMode::Editing);
    assert!(!gestures.can_perform_canvas_gestures());
    assert!(gestures.can_edit_object(sticker));
    assert!(!gestures.can_edit_object(other));

    gestures.exit_edit_mode();
    assert_eq!(gestures.mode(), GestureMode::Default);
}

#[test]
fn test_session_edit_cycle() {
    let (mut session, recorder) = session();
    let id = session.add_object(ObjectContent::sticky_note("edit me"));

    // Long press at the object's on-screen position.
    let on_screen = session.canvas_to_view(session.store().object(id).unwrap().transform.position);
    let hit = session.object_at_view_point(on_screen).unwrap();
    assert!(session.long_press(hit));
    assert!(session.store().selection().is_editing());

    assert!(session.object_drag_changed(id, Vector2D::new(30.0, -10.0)));
    assert!(session.object_rotate_changed(id, Angle::from_degrees(90.0)));
    session.object_gesture_ended(id);

    let transform = session.store().object(id).unwrap().transform;
    assert_eq!(transform.position, Point2D::new(30.0, -10.0));
    assert!(approx(transform.rotation.degrees(), 90.0));

    session.background_tapped();
    assert_eq!(session.gestures().mode(), GestureMode::Default);
    assert!(!session.store().selection().is_editing());

    let haptics = recorder.haptics();
    assert_eq!(haptics.first(), Some(&HapticKind::Light));
    assert!(haptics.contains(&HapticKind::Medium));
}

#[test]
fn test_delete_plays_delete_feedback() {
    let (mut session, recorder) = session();
    session.add_object(ObjectContent::text("gone"));
    session.delete_selected();

    let requests = recorder.requests();
    assert!(session.store().objects().is_empty());
    assert!(requests
        .iter()
        .any(|r| r.haptic == HapticKind::Rigid && r.sound == Some(SoundKind::Delete)));
}

#[test]
fn test_drawing_surface_receives_toggles() {
    struct Surface(Rc<RefCell<Vec<bool>>>);
    impl DrawingSurface for Surface {
        fn set_tool_active(&mut self, active: bool) {
            self.0.borrow_mut().push(active);
        }
    }

    let (mut session, _) = session();
    let calls = Rc::new(RefCell::new(Vec::new()));
    session.attach_drawing_surface(Box::new(Surface(Rc::clone(&calls))));

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    session
        .store_mut()
        .on_event(move |event| sink.borrow_mut().push(event.clone()));

    session.set_drawing_tool_active(true);
    session.markup_changed();
    session.set_drawing_tool_active(false);

    assert_eq!(*calls.borrow(), vec![false, true, false]);
    assert_eq!(
        *events.borrow(),
        vec![
            CanvasEvent::DrawingToolChanged(true),
            CanvasEvent::MarkupChanged,
            CanvasEvent::DrawingToolChanged(false),
        ]
    );
}

// ============================================================================
// Repositioning
// ============================================================================

#[test]
fn test_reposition_clamps_into_bounds() {
    let mut store = CanvasStore::default();
    let mut transform = Transform::with_size(Size2D::new(40.0, 40.0));
    transform.position = Point2D::new(200.0, 0.0);
    let object = CanvasObject::new(ObjectContent::text("x")).with_transform(transform);
    let id = store.insert_object(object);

    store.reposition_within_bounds(id, Rect::new(-100.0, -100.0, 100.0, 100.0));

    assert_eq!(store.object(id).unwrap().transform.position, Point2D::new(80.0, 0.0));
}

#[test]
fn test_locked_object_ignores_transforms() {
    let mut store = CanvasStore::default();
    let id = store.add_object(ObjectContent::text("pinned"));
    store.set_locked(id, true);

    store.translate_object(id, Vector2D::new(10.0, 10.0));
    store.scale_object(id, 3.0);
    store.rotate_object(id, Angle::from_degrees(45.0));

    let transform = store.object(id).unwrap().transform;
    assert_eq!(transform.position, Point2D::ZERO);
    assert!(approx(transform.scale, 1.0));
    assert!(approx(transform.rotation.radians(), 0.0));
}

// ============================================================================
// Viewport
// ============================================================================

#[test]
fn test_fit_fills_viewport_and_sets_minimum() {
    let mut store = CanvasStore::default();
    store.fit_to_viewport(Size2D::new(512.0, 192.0));

    // Canvas 1024x768: width ratio 0.5, height ratio 0.25, fill picks 0.5.
    let viewport = store.viewport();
    assert!(approx(viewport.scale, 0.5));
    assert!(approx(viewport.minimum_scale, 0.5));
    assert_eq!(viewport.offset, Vector2D::ZERO);

    store.set_scale(0.1, None);
    assert!(approx(store.viewport().scale, 0.5));
}

#[test]
fn test_reset_transform_without_viewport_returns_to_identity() {
    let (mut store, log) = recorded_store();
    store.set_scale(3.0, None);
    store.reset_transform(None);

    assert!(approx(store.viewport().scale, 1.0));
    assert_eq!(store.viewport().offset, Vector2D::ZERO);
    assert_eq!(log.borrow().len(), 2);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_snapshot_round_trip_preserves_canvas() {
    let mut store = CanvasStore::default();
    let note = store.add_object(ObjectContent::sticky_note("keep"));
    store.add_object(ObjectContent::photo("beach"));
    store.set_background(Background::Asset("kraft".to_string()));
    store.set_scale(2.0, None);

    let json = store.to_json().unwrap();
    let restored = CanvasStore::from_json(&json, CanvasConfig::default()).unwrap();

    assert_eq!(restored.objects().len(), 2);
    assert_eq!(
        restored.object(note).unwrap().content,
        ObjectContent::sticky_note("keep")
    );
    assert_eq!(restored.state().background(), &Background::Asset("kraft".to_string()));
    assert!(approx(restored.viewport().scale, 2.0));
}

#[test]
fn test_snapshot_rejects_garbage() {
    assert!(CanvasStore::from_json("{not json", CanvasConfig::default()).is_err());
}
