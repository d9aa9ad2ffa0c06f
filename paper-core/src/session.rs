//! # Canvas Session
//!
//! The entry points gesture recognizers call. Each handler first asks the
//! [`GestureCoordinator`] whether it may act, converts view-space input to
//! canvas space, and then calls the [`CanvasStore`].
//!
//! The coordinator follows the store's `EditModeChanged` events, so edit mode
//! entered or left through any path (a long press, a tap on another object, a
//! deletion, or a command issued on [`CanvasSession::store_mut`]) moves both
//! together.
//!
//! Continuous gestures capture their starting value on the first `changed`
//! callback and apply the recognizer's cumulative translation/magnification
//! to it. The matching `ended` callback resets that anchor; a cancelled
//! gesture must also call `ended`.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use crate::config::CanvasConfig;
use crate::drawing::{DrawingController, DrawingSurface};
use crate::event::CanvasEvent;
use crate::feedback::FeedbackEngine;
use crate::gesture::{GestureAnchor, GestureCoordinator, GestureMode};
use crate::geometry::{Angle, Point2D, Size2D, Transform, Vector2D};
use crate::object::{ObjectContent, ObjectId};
use crate::store::CanvasStore;

/// One paper-editing session: store, gesture gate and drawing surface.
#[derive(Debug)]
pub struct CanvasSession {
    store: CanvasStore,
    gestures: Rc<RefCell<GestureCoordinator>>,
    drawing: DrawingController,
    viewport_size: Size2D,
    pan_anchor: GestureAnchor<Vector2D>,
    zoom_anchor: GestureAnchor<f64>,
    object_anchor: GestureAnchor<(ObjectId, Transform)>,
}

impl CanvasSession {
    /// Start a session on an empty canvas.
    ///
    /// `feedback` receives both gesture-mode signals and store event feedback.
    #[must_use]
    pub fn new(config: CanvasConfig, feedback: Arc<dyn FeedbackEngine>) -> Self {
        Self::with_store(CanvasStore::new(config), feedback)
    }

    /// Start a session on an existing store.
    ///
    /// A store restored mid-edit is brought back to not editing.
    #[must_use]
    pub fn with_store(mut store: CanvasStore, feedback: Arc<dyn FeedbackEngine>) -> Self {
        store.exit_edit_mode();
        let reduce_motion = store.config().reduce_motion;
        store.attach_feedback(Arc::clone(&feedback), reduce_motion);

        let gestures = Rc::new(RefCell::new(GestureCoordinator::new(feedback, reduce_motion)));
        let gate = Rc::downgrade(&gestures);
        store.on_event(move |event| {
            let CanvasEvent::EditModeChanged { id, is_editing } = *event else {
                return;
            };
            let Some(gestures) = gate.upgrade() else {
                return;
            };
            // The session never holds a borrow across a store call.
            if let Ok(mut gestures) = gestures.try_borrow_mut() {
                if is_editing {
                    gestures.enter_edit_mode(id);
                } else {
                    gestures.exit_edit_mode();
                }
            };
        });

        Self {
            store,
            gestures,
            drawing: DrawingController::new(),
            viewport_size: Size2D::ZERO,
            pan_anchor: GestureAnchor::new(),
            zoom_anchor: GestureAnchor::new(),
            object_anchor: GestureAnchor::new(),
        }
    }

    /// The canvas store.
    #[must_use]
    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    /// Mutable access to the canvas store, for non-gesture commands (menus, toolbars).
    pub fn store_mut(&mut self) -> &mut CanvasStore {
        &mut self.store
    }

    /// The gesture coordinator.
    #[must_use]
    pub fn gestures(&self) -> Ref<'_, GestureCoordinator> {
        self.gestures.borrow()
    }

    fn mode(&self) -> GestureMode {
        self.gestures.borrow().mode()
    }

    /// Current on-screen size of the canvas view.
    #[must_use]
    pub fn viewport_size(&self) -> Size2D {
        self.viewport_size
    }

    /// Record a new view size and fit the canvas to it.
    pub fn set_viewport_size(&mut self, size: Size2D) {
        if !size.is_usable() {
            return;
        }
        self.viewport_size = size;
        self.store.fit_to_viewport(size);
    }

    /// Add content at the center of the visible area.
    pub fn add_object(&mut self, content: ObjectContent) -> ObjectId {
        let id = self.store.add_object(content);
        if self.viewport_size.is_usable() {
            let center = self.view_to_canvas(Point2D::new(
                self.viewport_size.width / 2.0,
                self.viewport_size.height / 2.0,
            ));
            self.store.translate_object(id, center - Point2D::ZERO);
            self.store.reposition_within_canvas(id);
        }
        id
    }

    /// Tap on an object: select it. Tapping another object leaves edit mode.
    pub fn select_object(&mut self, id: ObjectId, exclusive: bool) {
        self.store.select_object(id, exclusive);
    }

    /// Delete one object, leaving edit mode if it was being edited.
    pub fn delete_object(&mut self, id: ObjectId) {
        self.store.delete_object(id);
    }

    /// Duplicate the selection. The copies become the selection and edit mode ends.
    pub fn duplicate_selected(&mut self) -> Vec<ObjectId> {
        self.store.duplicate_selected()
    }

    // --- Coordinates ---

    /// Convert a view point to canvas space.
    #[must_use]
    pub fn view_to_canvas(&self, point: Point2D) -> Point2D {
        self.store.viewport().view_to_canvas(point, self.viewport_size)
    }

    /// Convert a canvas point to view space.
    #[must_use]
    pub fn canvas_to_view(&self, point: Point2D) -> Point2D {
        self.store.viewport().canvas_to_view(point, self.viewport_size)
    }

    /// The topmost object under a view point.
    #[must_use]
    pub fn object_at_view_point(&self, point: Point2D) -> Option<ObjectId> {
        self.store.object_at(self.view_to_canvas(point))
    }

    // --- Canvas gestures ---

    /// Pan changed; `translation` is cumulative since the pan began, in view units.
    pub fn canvas_pan_changed(&mut self, translation: Vector2D) -> bool {
        if !self.gestures.borrow().can_perform_canvas_gestures() || !translation.is_finite() {
            return false;
        }
        self.gestures.borrow_mut().begin_canvas_gesture();
        let viewport = self.store.viewport();
        let base = self.pan_anchor.capture(|| viewport.offset);
        self.store.set_offset(base + translation, Some(self.viewport_size));
        true
    }

    /// Pan ended or was cancelled.
    pub fn canvas_pan_ended(&mut self) {
        self.pan_anchor.reset();
        self.gestures.borrow_mut().end_canvas_gesture();
    }

    /// Pinch changed; `magnification` is cumulative since the pinch began.
    pub fn canvas_zoom_changed(&mut self, magnification: f64) -> bool {
        if !self.gestures.borrow().can_perform_canvas_gestures() || !magnification.is_finite() {
            return false;
        }
        self.gestures.borrow_mut().begin_canvas_gesture();
        let viewport = self.store.viewport();
        let base = self.zoom_anchor.capture(|| viewport.scale);
        self.store.set_scale(base * magnification, Some(self.viewport_size));
        true
    }

    /// Pinch ended or was cancelled.
    pub fn canvas_zoom_ended(&mut self) {
        self.zoom_anchor.reset();
        self.gestures.borrow_mut().end_canvas_gesture();
    }

    // --- Object editing ---

    /// Long press on an object: select it and enter edit mode.
    ///
    /// Refused while a canvas pan/zoom is in progress, while already editing,
    /// or while the drawing tool is active.
    pub fn long_press(&mut self, id: ObjectId) -> bool {
        {
            let gestures = self.gestures.borrow();
            if gestures.is_canvas_interacting() || !gestures.can_perform_canvas_gestures() {
                return false;
            }
        }
        if self.drawing.is_tool_active() || self.store.object(id).is_none() {
            return false;
        }
        self.pan_anchor.reset();
        self.zoom_anchor.reset();
        self.object_anchor.reset();
        self.store.enter_edit_mode(id);
        self.gestures.borrow().can_edit_object(id)
    }

    /// Leave edit mode, if active.
    pub fn exit_edit_mode(&mut self) -> bool {
        self.object_anchor.reset();
        self.store.exit_edit_mode()
    }

    fn object_base(&mut self, id: ObjectId) -> Option<Transform> {
        if !self.gestures.borrow().can_edit_object(id) {
            return None;
        }
        let current = self.store.object(id)?.transform;
        if self.object_anchor.base().is_some_and(|(target, _)| target != id) {
            self.object_anchor.reset();
        }
        Some(self.object_anchor.capture(|| (id, current)).1)
    }

    /// Drag of the edited object; `translation` is cumulative, in view units.
    pub fn object_drag_changed(&mut self, id: ObjectId, translation: Vector2D) -> bool {
        if !translation.is_finite() {
            return false;
        }
        let Some(base) = self.object_base(id) else {
            return false;
        };
        let Some(mut transform) = self.store.object(id).map(|o| o.transform) else {
            return false;
        };
        let delta = self.store.viewport().view_delta_to_canvas(translation);
        transform.position = base.position + delta;
        self.store.update_transform(id, transform);
        true
    }

    /// Magnify of the edited object; `magnification` is cumulative.
    pub fn object_magnify_changed(&mut self, id: ObjectId, magnification: f64) -> bool {
        if !magnification.is_finite() {
            return false;
        }
        let Some(base) = self.object_base(id) else {
            return false;
        };
        let Some(mut transform) = self.store.object(id).map(|o| o.transform) else {
            return false;
        };
        transform.scale = base.scale * magnification;
        self.store.update_transform(id, transform);
        true
    }

    /// Rotation of the edited object; `angle` is cumulative.
    pub fn object_rotate_changed(&mut self, id: ObjectId, angle: Angle) -> bool {
        if !angle.is_finite() {
            return false;
        }
        let Some(base) = self.object_base(id) else {
            return false;
        };
        let Some(mut transform) = self.store.object(id).map(|o| o.transform) else {
            return false;
        };
        transform.rotation = base.rotation + angle;
        self.store.update_transform(id, transform);
        true
    }

    /// Drag, magnify or rotate ended or was cancelled: keep the object on the canvas.
    pub fn object_gesture_ended(&mut self, id: ObjectId) {
        self.object_anchor.reset();
        if self.gestures.borrow().can_edit_object(id) {
            self.store.reposition_within_canvas(id);
        }
    }

    /// Tap on empty canvas: leave edit mode, or clear the selection when not editing.
    pub fn background_tapped(&mut self) {
        if self.mode() == GestureMode::Editing {
            self.exit_edit_mode();
        } else {
            self.store.deselect_all();
        }
    }

    /// Delete the selected objects, leaving edit mode first if needed.
    pub fn delete_selected(&mut self) {
        self.exit_edit_mode();
        self.store.delete_selected_objects();
    }

    // --- Drawing ---

    /// Attach the host's drawing view.
    pub fn attach_drawing_surface(&mut self, surface: Box<dyn DrawingSurface>) {
        self.drawing.attach(surface);
    }

    /// Detach and return the host's drawing view.
    pub fn detach_drawing_surface(&mut self) -> Option<Box<dyn DrawingSurface>> {
        self.drawing.detach()
    }

    /// Whether the drawing tool is on.
    #[must_use]
    pub fn is_drawing_tool_active(&self) -> bool {
        self.drawing.is_tool_active()
    }

    /// Turn the drawing tool on or off. Turning it on leaves edit mode.
    pub fn set_drawing_tool_active(&mut self, active: bool) {
        if active {
            self.exit_edit_mode();
        }
        if self.drawing.set_tool_active(active) {
            self.store.emit(CanvasEvent::DrawingToolChanged(active));
        }
    }

    /// The drawing surface reported new markup.
    pub fn markup_changed(&mut self) {
        self.store.emit(CanvasEvent::MarkupChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::{HapticKind, RecordingFeedback};

    fn session() -> (CanvasSession, Arc<RecordingFeedback>) {
        let recorder = Arc::new(RecordingFeedback::new());
        let feedback: Arc<dyn FeedbackEngine> = recorder.clone();
        let mut session = CanvasSession::new(CanvasConfig::default(), feedback);
        session.set_viewport_size(Size2D::new(1024.0, 768.0));
        (session, recorder)
    }

    #[test]
    fn test_pan_uses_anchor_and_resets() {
        let (mut session, _) = session();
        session.store_mut().set_scale(2.0, None);

        assert!(session.canvas_pan_changed(Vector2D::new(10.0, 0.0)));
        assert!(session.canvas_pan_changed(Vector2D::new(30.0, 0.0)));
        assert!(session.gestures().is_canvas_interacting());
        assert!((session.store().viewport().offset.dx - 30.0).abs() < f64::EPSILON);

        session.canvas_pan_ended();
        assert!(!session.gestures().is_canvas_interacting());
        assert!(session.canvas_pan_changed(Vector2D::new(5.0, 0.0)));
        assert!((session.store().viewport().offset.dx - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_is_relative_to_gesture_start() {
        let (mut session, _) = session();
        assert!(session.canvas_zoom_changed(1.5));
        assert!(session.canvas_zoom_changed(2.0));
        assert!((session.store().viewport().scale - 2.0).abs() < f64::EPSILON);
        session.canvas_zoom_ended();
        assert!(session.canvas_zoom_changed(1.5));
        assert!((session.store().viewport().scale - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_long_press_refused_during_pan() {
        let (mut session, _) = session();
        let id = session.add_object(ObjectContent::text("hi"));
        session.canvas_pan_changed(Vector2D::new(1.0, 1.0));
        assert!(!session.long_press(id));
        session.canvas_pan_ended();
        assert!(session.long_press(id));
        assert!(session.store().selection().is_editing());
    }

    #[test]
    fn test_editing_blocks_canvas_gestures() {
        let (mut session, recorder) = session();
        let id = session.add_object(ObjectContent::text("hi"));
        assert!(session.long_press(id));
        let offset = session.store().viewport().offset;

        assert!(!session.canvas_pan_changed(Vector2D::new(100.0, 0.0)));
        assert!(!session.canvas_zoom_changed(2.0));
        assert_eq!(session.store().viewport().offset, offset);
        assert!(recorder.haptics().contains(&HapticKind::Medium));
    }

    #[test]
    fn test_drag_converts_view_delta_by_scale() {
        let (mut session, _) = session();
        let id = session.add_object(ObjectContent::text("hi"));
        session.store_mut().set_scale(2.0, None);
        session.long_press(id);

        assert!(session.object_drag_changed(id, Vector2D::new(20.0, 10.0)));
        assert!(session.object_drag_changed(id, Vector2D::new(40.0, 20.0)));
        let position = session.store().object(id).expect("object").transform.position;
        assert_eq!(position, Point2D::new(20.0, 10.0));
    }

    #[test]
    fn test_object_gestures_require_edit_target() {
        let (mut session, _) = session();
        let a = session.add_object(ObjectContent::text("a"));
        let b = session.add_object(ObjectContent::text("b"));
        assert!(!session.object_drag_changed(a, Vector2D::new(5.0, 5.0)));
        session.long_press(a);
        assert!(!session.object_magnify_changed(b, 2.0));
        assert!(session.object_magnify_changed(a, 2.0));
        assert!(session.object_rotate_changed(a, Angle::from_radians(0.5)));
        let t = session.store().object(a).expect("a").transform;
        assert!((t.scale - 2.0).abs() < f64::EPSILON);
        assert!((t.rotation.radians() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gesture_end_repositions_inside_canvas() {
        let (mut session, _) = session();
        let id = session.add_object(ObjectContent::sticky_note("far"));
        session.long_press(id);
        session.object_drag_changed(id, Vector2D::new(5_000.0, 0.0));
        session.object_gesture_ended(id);
        let position = session.store().object(id).expect("object").transform.position;
        // Canvas half-width 512 minus note half-width 90.
        assert!((position.x - 422.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_background_tap_exits_then_deselects() {
        let (mut session, _) = session();
        let id = session.add_object(ObjectContent::text("a"));
        session.long_press(id);

        session.background_tapped();
        assert_eq!(session.gestures().mode(), GestureMode::Default);
        assert_eq!(session.store().selection().active(), Some(id));

        session.background_tapped();
        assert_eq!(session.store().selection().active(), None);
    }

    #[test]
    fn test_drawing_tool_exits_edit_mode_and_blocks_long_press() {
        let (mut session, _) = session();
        let id = session.add_object(ObjectContent::text("a"));
        session.long_press(id);
        session.set_drawing_tool_active(true);
        assert_eq!(session.gestures().mode(), GestureMode::Default);
        assert!(!session.long_press(id));
        session.set_drawing_tool_active(false);
        assert!(session.long_press(id));
    }

    #[test]
    fn test_add_object_centers_in_visible_area() {
        let (mut session, _) = session();
        session.store_mut().set_scale(2.0, None);
        session.canvas_pan_changed(Vector2D::new(-100.0, 0.0));
        session.canvas_pan_ended();
        let id = session.add_object(ObjectContent::photo("p"));
        let position = session.store().object(id).expect("object").transform.position;
        assert!((position.x - 50.0).abs() < 1e-9);
        assert!(position.y.abs() < 1e-9);
    }

    fn assert_edit_state_agrees(session: &CanvasSession) {
        let store_editing = session.store().selection().is_editing();
        let gate_editing = session.gestures().mode() == GestureMode::Editing;
        assert_eq!(store_editing, gate_editing);
        if gate_editing {
            let target = session.gestures().edit_target();
            assert_eq!(target, session.store().selection().active());
        }
    }

    #[test]
    fn test_selecting_another_object_ends_gesture_editing() {
        let (mut session, _) = session();
        let a = session.add_object(ObjectContent::text("a"));
        let b = session.add_object(ObjectContent::text("b"));
        assert!(session.long_press(a));

        session.select_object(b, true);

        assert_edit_state_agrees(&session);
        assert!(!session.gestures().can_edit_object(a));
        assert!(!session.object_drag_changed(a, Vector2D::new(10.0, 0.0)));
        assert!(session.canvas_pan_changed(Vector2D::new(1.0, 0.0)));
    }

    #[test]
    fn test_store_commands_keep_gate_in_step() {
        let (mut session, _) = session();
        let a = session.add_object(ObjectContent::text("a"));
        let b = session.add_object(ObjectContent::text("b"));

        session.long_press(a);
        session.store_mut().select_object(b, true);
        assert_edit_state_agrees(&session);

        session.long_press(b);
        session.store_mut().duplicate_selected();
        assert_edit_state_agrees(&session);

        session.store_mut().enter_edit_mode(a);
        assert_edit_state_agrees(&session);
        assert!(session.gestures().can_edit_object(a));

        session.store_mut().exit_edit_mode();
        assert_edit_state_agrees(&session);
    }

    #[test]
    fn test_deleting_edited_object_releases_gestures() {
        let (mut session, _) = session();
        let a = session.add_object(ObjectContent::text("a"));
        let b = session.add_object(ObjectContent::text("b"));
        session.long_press(a);

        session.delete_object(a);

        assert_edit_state_agrees(&session);
        assert_eq!(session.gestures().mode(), GestureMode::Default);
        assert!(session.long_press(b));

        session.store_mut().delete_object(b);
        assert_edit_state_agrees(&session);
        assert!(session.canvas_zoom_changed(1.5));
    }

    #[test]
    fn test_duplicate_while_editing_ends_editing() {
        let (mut session, recorder) = session();
        let a = session.add_object(ObjectContent::sticky_note("a"));
        session.long_press(a);

        let copies = session.duplicate_selected();

        assert_eq!(copies.len(), 1);
        assert_edit_state_agrees(&session);
        assert_eq!(session.gestures().mode(), GestureMode::Default);
        assert_eq!(recorder.haptics().iter().filter(|h| **h == HapticKind::Medium).count(), 1);
    }

    #[test]
    fn test_object_anchor_follows_edit_target() {
        let (mut session, _) = session();
        let a = session.add_object(ObjectContent::text("a"));
        let b = session.add_object(ObjectContent::text("b"));
        session.store_mut().translate_object(b, Vector2D::new(100.0, 0.0));

        session.long_press(a);
        session.object_drag_changed(a, Vector2D::new(10.0, 0.0));
        session.store_mut().enter_edit_mode(b);
        assert!(session.object_drag_changed(b, Vector2D::new(5.0, 0.0)));

        let position = session.store().object(b).expect("b").transform.position;
        assert!((position.x - 105.0).abs() < f64::EPSILON);
    }
}
