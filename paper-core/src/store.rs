//! The canvas store: sole mutator of [`CanvasState`].
//!
//! Every operation is infallible. Unknown IDs and non-finite numbers are
//! dropped silently, since gesture callbacks routinely race against
//! deletions and recognizers can report NaN deltas while they set up.
//! After each mutation the store emits [`CanvasEvent`]s synchronously, in order.

use std::sync::Arc;

use crate::config::CanvasConfig;
use crate::event::{CanvasEvent, EventEmitter};
use crate::feedback::{self, FeedbackEngine};
use crate::geometry::{clamp_or_center, Angle, Point2D, Rect, Size2D, Transform, Vector2D};
use crate::object::{CanvasObject, ObjectContent, ObjectId};
use crate::state::{Background, CanvasState, SelectionState};
use crate::viewport::{fill_scale, ViewportTransform};
use crate::CanvasResult;

/// Owner of the canvas state for one editing session.
#[derive(Debug)]
pub struct CanvasStore {
    state: CanvasState,
    config: CanvasConfig,
    last_viewport_size: Option<Size2D>,
    events: EventEmitter,
}

impl CanvasStore {
    /// Create an empty canvas from `config`.
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        let viewport = ViewportTransform::new(config.minimum_scale, config.maximum_scale);
        let state = CanvasState::new(config.canvas_size, viewport, config.background.clone());
        Self::from_state(state, config)
    }

    /// Resume editing an existing state.
    #[must_use]
    pub fn from_state(state: CanvasState, config: CanvasConfig) -> Self {
        Self {
            state,
            config,
            last_viewport_size: None,
            events: EventEmitter::new(),
        }
    }

    /// Restore a store from a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be parsed.
    pub fn from_json(json: &str, config: CanvasConfig) -> CanvasResult<Self> {
        Ok(Self::from_state(CanvasState::from_json(json)?, config))
    }

    /// Serialize the current state to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        self.state.to_json()
    }

    // --- Observers ---

    /// Subscribe to store events.
    pub fn on_event<F>(&mut self, handler: F)
    where
        F: FnMut(&CanvasEvent) + 'static,
    {
        self.events.subscribe(handler);
    }

    /// Play feedback on `engine` for every event that has any.
    pub fn attach_feedback(&mut self, engine: Arc<dyn FeedbackEngine>, reduce_motion: bool) {
        self.events.subscribe(move |event| {
            if let Some(request) = feedback::feedback_for_event(event, reduce_motion) {
                feedback::play(&engine, request);
            }
        });
    }

    pub(crate) fn emit(&mut self, event: CanvasEvent) {
        self.events.emit(&event);
    }

    // --- Queries ---

    /// The current state snapshot.
    #[must_use]
    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Objects in insertion order.
    #[must_use]
    pub fn objects(&self) -> &[CanvasObject] {
        self.state.objects()
    }

    /// Look up an object by ID.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.state.object(id)
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        self.state.selection()
    }

    /// The current viewport transform.
    #[must_use]
    pub fn viewport(&self) -> &ViewportTransform {
        self.state.viewport()
    }

    /// The viewport size last passed to a viewport operation.
    #[must_use]
    pub fn last_viewport_size(&self) -> Option<Size2D> {
        self.last_viewport_size
    }

    /// The canvas rectangle united with every object's bounding box.
    #[must_use]
    pub fn content_bounds(&self) -> Rect {
        self.state.content_bounds()
    }

    /// Largest z-index in use, or 0.0 for an empty canvas.
    #[must_use]
    pub fn highest_z_index(&self) -> f64 {
        self.state.highest_z_index()
    }

    /// Topmost object whose unrotated bounding box contains `point` (canvas space).
    #[must_use]
    pub fn object_at(&self, point: Point2D) -> Option<ObjectId> {
        self.state
            .objects()
            .iter()
            .filter(|o| o.transform.bounding_rect().contains(point))
            .max_by(|a, b| a.z_index.total_cmp(&b.z_index))
            .map(CanvasObject::id)
    }

    // --- Objects ---

    /// Place new content at the canvas origin and select it.
    pub fn add_object(&mut self, content: ObjectContent) -> ObjectId {
        self.insert_object(CanvasObject::new(content))
    }

    /// Place new content with an explicit transform and author, and select it.
    pub fn add_object_with(
        &mut self,
        content: ObjectContent,
        transform: Transform,
        author: Option<String>,
    ) -> ObjectId {
        let mut object = CanvasObject::new(content).with_transform(transform);
        if let Some(author) = author {
            object = object.with_author(author);
        }
        self.insert_object(object)
    }

    /// Place a prepared object and select it.
    ///
    /// The object's z-index is reset to the insertion position and its scale
    /// raised to the configured floor. A non-finite transform is replaced by
    /// the content's default.
    pub fn insert_object(&mut self, mut object: CanvasObject) -> ObjectId {
        if !object.transform.is_finite() {
            object.transform = Transform::with_size(object.content.default_size());
        }
        object.transform = object.transform.clamped_scale(self.config.object_scale_floor);
        #[allow(clippy::cast_precision_loss)]
        {
            object.z_index = self.state.objects.len() as f64;
        }
        let id = object.id();
        tracing::debug!(%id, kind = object.content.kind_name(), z = object.z_index, "object added");
        self.state.objects.push(object);
        self.emit(CanvasEvent::ObjectAdded(id));
        self.select_object(id, true);
        id
    }

    /// Replace an object's payload.
    pub fn update_content(&mut self, id: ObjectId, content: ObjectContent) {
        if let Some(object) = self.state.object_mut(id) {
            object.content = content;
        }
    }

    /// Lock or unlock an object. Locked objects ignore transform changes.
    pub fn set_locked(&mut self, id: ObjectId, locked: bool) {
        if let Some(object) = self.state.object_mut(id) {
            object.is_locked = locked;
        }
    }

    /// Replace the background.
    pub fn set_background(&mut self, background: Background) {
        self.state.background = background;
    }

    // --- Selection ---

    /// Select `id`, replacing the selection when `exclusive`, adding to it otherwise.
    ///
    /// Selecting a different object while editing leaves edit mode.
    pub fn select_object(&mut self, id: ObjectId, exclusive: bool) {
        if !self.state.contains(id) {
            return;
        }
        if self.state.selection.active() != Some(id) {
            self.end_editing();
        }
        self.state.selection.select(id, exclusive);
        self.emit_selection();
    }

    /// Empty the selection.
    pub fn deselect_all(&mut self) {
        self.end_editing();
        self.state.selection.clear();
        self.emit_selection();
    }

    /// Alias of [`Self::deselect_all`].
    pub fn clear_selection(&mut self) {
        self.deselect_all();
    }

    /// Select `id` exclusively and mark it as being edited.
    ///
    /// Returns true if edit mode was entered.
    pub fn enter_edit_mode(&mut self, id: ObjectId) -> bool {
        if !self.state.contains(id) {
            return false;
        }
        let selection = &self.state.selection;
        if selection.is_editing() && selection.active() == Some(id) {
            return false;
        }
        self.end_editing();
        let changed = self.state.selection.selected() != [id];
        self.state.selection.begin_editing(id);
        if changed {
            self.emit_selection();
        }
        self.emit(CanvasEvent::EditModeChanged {
            id,
            is_editing: true,
        });
        true
    }

    /// Leave edit mode, keeping the selection.
    ///
    /// Returns true if edit mode was active.
    pub fn exit_edit_mode(&mut self) -> bool {
        self.end_editing()
    }

    fn end_editing(&mut self) -> bool {
        let selection = &self.state.selection;
        let Some(id) = selection.active().filter(|_| selection.is_editing()) else {
            return false;
        };
        self.state.selection.end_editing();
        self.emit(CanvasEvent::EditModeChanged {
            id,
            is_editing: false,
        });
        true
    }

    fn emit_selection(&mut self) {
        let ids = self.state.selection.selected().to_vec();
        self.emit(CanvasEvent::SelectionChanged(ids));
    }

    // --- Deletion ---

    /// Remove an object. Removing the active object clears the selection.
    ///
    /// `ObjectDeleted` is always followed by `SelectionChanged`, even when the
    /// object was not selected.
    pub fn delete_object(&mut self, id: ObjectId) {
        let Some(index) = self.state.objects.iter().position(|o| o.id() == id) else {
            return;
        };
        self.state.objects.remove(index);
        tracing::debug!(%id, "object deleted");
        self.emit(CanvasEvent::ObjectDeleted(id));

        if self.state.selection.active() == Some(id) {
            self.end_editing();
        }
        self.state.selection.remove(id);
        self.emit_selection();
    }

    /// Remove every selected object and clear the selection.
    pub fn delete_selected_objects(&mut self) {
        let ids = self.state.selection.selected().to_vec();
        if ids.is_empty() {
            return;
        }
        self.state.objects.retain(|o| !ids.contains(&o.id()));
        tracing::debug!(count = ids.len(), "selected objects deleted");
        for id in ids {
            self.emit(CanvasEvent::ObjectDeleted(id));
        }
        self.end_editing();
        self.state.selection.clear();
        self.emit_selection();
    }

    // --- Object transforms ---

    fn transform_mut(&mut self, id: ObjectId) -> Option<&mut Transform> {
        self.state
            .object_mut(id)
            .filter(|o| !o.is_locked)
            .map(|o| &mut o.transform)
    }

    /// Replace an object's transform, raising its scale to the floor.
    pub fn update_transform(&mut self, id: ObjectId, transform: Transform) {
        if !transform.is_finite() {
            tracing::trace!(%id, "dropped non-finite transform");
            return;
        }
        let floor = self.config.object_scale_floor;
        if let Some(current) = self.transform_mut(id) {
            *current = transform.clamped_scale(floor);
        }
    }

    /// Move an object by `delta` canvas units.
    pub fn translate_object(&mut self, id: ObjectId, delta: Vector2D) {
        if !delta.is_finite() {
            tracing::trace!(%id, "dropped non-finite translation");
            return;
        }
        if let Some(transform) = self.transform_mut(id) {
            transform.position += delta;
        }
    }

    /// Multiply an object's scale by `factor`, never going below the floor.
    pub fn scale_object(&mut self, id: ObjectId, factor: f64) {
        if !factor.is_finite() {
            tracing::trace!(%id, factor, "dropped non-finite scale factor");
            return;
        }
        let floor = self.config.object_scale_floor;
        if let Some(transform) = self.transform_mut(id) {
            let scaled = transform.scale * factor;
            if scaled.is_finite() {
                transform.scale = scaled.max(floor);
            }
        }
    }

    /// Rotate an object by `angle`.
    pub fn rotate_object(&mut self, id: ObjectId, angle: Angle) {
        if !angle.is_finite() {
            tracing::trace!(%id, "dropped non-finite rotation");
            return;
        }
        if let Some(transform) = self.transform_mut(id) {
            transform.rotation = transform.rotation + angle;
        }
    }

    /// Pull an object back so its unrotated bounding box lies within `bounds`.
    ///
    /// An object larger than `bounds` on an axis is centered on that axis.
    pub fn reposition_within_bounds(&mut self, id: ObjectId, bounds: Rect) {
        if !(bounds.min_x.is_finite()
            && bounds.min_y.is_finite()
            && bounds.max_x.is_finite()
            && bounds.max_y.is_finite())
        {
            return;
        }
        if let Some(transform) = self.transform_mut(id) {
            let size = transform.current_size();
            let half_w = size.width / 2.0;
            let half_h = size.height / 2.0;
            transform.position.x = clamp_or_center(
                transform.position.x,
                bounds.min_x + half_w,
                bounds.max_x - half_w,
            );
            transform.position.y = clamp_or_center(
                transform.position.y,
                bounds.min_y + half_h,
                bounds.max_y - half_h,
            );
        }
    }

    /// Pull an object back inside the logical canvas rectangle.
    pub fn reposition_within_canvas(&mut self, id: ObjectId) {
        let bounds = self.state.canvas_rect();
        self.reposition_within_bounds(id, bounds);
    }

    /// Draw an object above every other object.
    pub fn bring_to_front(&mut self, id: ObjectId) {
        let top = self.state.highest_z_index() + 1.0;
        if let Some(object) = self.state.object_mut(id).filter(|o| !o.is_locked) {
            object.z_index = top;
            tracing::debug!(%id, z = top, "brought to front");
        }
    }

    /// Copy every selected object, offset so the copies are visible, and select the copies.
    ///
    /// Returns the IDs of the new objects.
    pub fn duplicate_selected(&mut self) -> Vec<ObjectId> {
        let originals: Vec<CanvasObject> = self
            .state
            .selection
            .selected()
            .iter()
            .filter_map(|&id| self.state.object(id).cloned())
            .collect();
        if originals.is_empty() {
            return Vec::new();
        }

        let mut created = Vec::with_capacity(originals.len());
        for original in originals {
            let mut copy = original.duplicate();
            copy.transform.position += self.config.duplicate_offset;
            #[allow(clippy::cast_precision_loss)]
            {
                copy.z_index = self.state.objects.len() as f64;
            }
            let id = copy.id();
            self.state.objects.push(copy);
            self.emit(CanvasEvent::ObjectAdded(id));
            created.push(id);
        }
        tracing::debug!(count = created.len(), "selection duplicated");

        self.end_editing();
        self.state.selection.replace(created.clone());
        self.emit_selection();
        created
    }

    // --- Viewport ---

    fn remember_viewport(&mut self, viewport_size: Option<Size2D>) -> Option<Size2D> {
        if let Some(size) = viewport_size.filter(|s| s.is_usable()) {
            self.last_viewport_size = Some(size);
        }
        self.last_viewport_size
    }

    fn reclamp_offset(&mut self, viewport_size: Option<Size2D>) {
        if let Some(size) = viewport_size {
            let bounds = self.state.content_bounds();
            let viewport = &self.state.viewport;
            self.state.viewport.offset = viewport.clamped_offset(viewport.offset, &bounds, size);
        }
    }

    fn emit_viewport_if_changed(&mut self, before: ViewportTransform) {
        let after = self.state.viewport;
        if after.scale != before.scale || after.offset != before.offset {
            self.emit(CanvasEvent::CanvasTransformChanged {
                scale: after.scale,
                offset: after.offset,
            });
        }
    }

    /// Set the zoom, clamped to the allowed range, then re-clamp the pan.
    pub fn set_scale(&mut self, value: f64, viewport_size: Option<Size2D>) {
        if !value.is_finite() {
            tracing::trace!(value, "dropped non-finite viewport scale");
            return;
        }
        let before = self.state.viewport;
        let size = self.remember_viewport(viewport_size);
        self.state.viewport.scale = self.state.viewport.clamp_scale(value);
        self.reclamp_offset(size);
        self.emit_viewport_if_changed(before);
    }

    /// Set the pan offset, clamped against the content bounds.
    pub fn set_offset(&mut self, value: Vector2D, viewport_size: Option<Size2D>) {
        if !value.is_finite() {
            tracing::trace!("dropped non-finite viewport offset");
            return;
        }
        let before = self.state.viewport;
        let size = self.remember_viewport(viewport_size);
        self.state.viewport.offset = value;
        self.reclamp_offset(size);
        self.emit_viewport_if_changed(before);
    }

    /// Multiply the zoom by `factor`.
    pub fn update_scale(&mut self, factor: f64) {
        if !factor.is_finite() {
            return;
        }
        self.set_scale(self.state.viewport.scale * factor, None);
    }

    /// Pan by `delta` view units.
    pub fn update_offset(&mut self, delta: Vector2D) {
        if !delta.is_finite() {
            return;
        }
        self.set_offset(self.state.viewport.offset + delta, None);
    }

    /// Zoom so the content fills the viewport, and forbid zooming out past that.
    ///
    /// Degenerate content or viewport falls back to scale 1.0 and no offset.
    pub fn fit_to_viewport(&mut self, viewport_size: Size2D) {
        let before = self.state.viewport;
        let size = self.remember_viewport(Some(viewport_size));
        let bounds = self.state.content_bounds();

        let Some(raw) = fill_scale(&bounds, viewport_size) else {
            tracing::debug!(?viewport_size, "fit fell back to identity");
            self.restore_identity_viewport();
            self.emit_viewport_if_changed(before);
            return;
        };

        let viewport = &mut self.state.viewport;
        let fit = raw.max(self.config.fit_scale_floor).min(viewport.maximum_scale);
        viewport.scale = fit;
        viewport.minimum_scale = fit;
        let center = bounds.center();
        viewport.offset = Vector2D::new(-fit * center.x, -fit * center.y);
        self.reclamp_offset(size);
        tracing::debug!(scale = fit, offset = ?self.state.viewport.offset, "fit to viewport");
        self.emit_viewport_if_changed(before);
    }

    /// Return to the fitted view, or to scale 1.0 centered when no viewport size is known.
    pub fn reset_transform(&mut self, viewport_size: Option<Size2D>) {
        match self.remember_viewport(viewport_size) {
            Some(size) => self.fit_to_viewport(size),
            None => {
                let before = self.state.viewport;
                self.restore_identity_viewport();
                self.emit_viewport_if_changed(before);
            }
        }
    }

    /// Scale 1.0 within the configured range, no pan. Drops any minimum raised by a fit.
    fn restore_identity_viewport(&mut self) {
        let viewport = &mut self.state.viewport;
        viewport.minimum_scale = self.config.minimum_scale;
        viewport.maximum_scale = self.config.maximum_scale;
        viewport.scale = viewport.clamp_scale(1.0);
        viewport.offset = Vector2D::ZERO;
    }
}

impl Default for CanvasStore {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}
