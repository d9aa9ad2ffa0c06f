//! Canvas state: the snapshot owned by [`crate::CanvasStore`].

use serde::{Deserialize, Serialize};

use crate::geometry::{Point2D, Rect, Size2D};
use crate::object::{CanvasObject, ObjectId};
use crate::viewport::ViewportTransform;
use crate::{CanvasError, CanvasResult};

/// What is drawn behind the objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Background {
    /// A solid color as hex.
    Color(String),
    /// A bundled background asset by name.
    Asset(String),
}

impl Default for Background {
    fn default() -> Self {
        Self::Color("#FFFFFF".to_string())
    }
}

/// Selection and edit-mode state.
///
/// `is_editing` is only ever true while `active` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    selected: Vec<ObjectId>,
    active: Option<ObjectId>,
    is_editing: bool,
}

impl SelectionState {
    /// All selected objects, in selection order.
    #[must_use]
    pub fn selected(&self) -> &[ObjectId] {
        &self.selected
    }

    /// The most recently selected object.
    #[must_use]
    pub fn active(&self) -> Option<ObjectId> {
        self.active
    }

    /// Whether the active object is being edited.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    /// Whether `id` is part of the selection.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.selected.contains(&id)
    }

    pub(crate) fn select(&mut self, id: ObjectId, exclusive: bool) {
        if exclusive {
            self.selected.clear();
        }
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
        self.active = Some(id);
    }

    pub(crate) fn replace(&mut self, ids: Vec<ObjectId>) {
        self.active = ids.last().copied();
        self.selected = ids;
        self.is_editing = false;
    }

    pub(crate) fn begin_editing(&mut self, id: ObjectId) {
        self.select(id, true);
        self.is_editing = true;
    }

    pub(crate) fn end_editing(&mut self) {
        self.is_editing = false;
    }

    /// Drop `id` from the selection. Losing the active object clears everything.
    ///
    /// Returns true if the selection changed.
    pub(crate) fn remove(&mut self, id: ObjectId) -> bool {
        if self.active == Some(id) {
            self.clear();
            return true;
        }
        let before = self.selected.len();
        self.selected.retain(|&sid| sid != id);
        before != self.selected.len()
    }

    pub(crate) fn clear(&mut self) {
        self.selected.clear();
        self.active = None;
        self.is_editing = false;
    }
}

/// The complete state of one paper-editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    /// Objects in insertion order (not draw order).
    pub(crate) objects: Vec<CanvasObject>,
    /// Zoom and pan of the canvas in the view.
    pub(crate) viewport: ViewportTransform,
    /// Selection and editing state.
    pub(crate) selection: SelectionState,
    /// Fixed logical dimensions of the canvas.
    pub(crate) canvas_size: Size2D,
    /// Background color or asset.
    pub(crate) background: Background,
}

impl CanvasState {
    /// Create an empty canvas state.
    #[must_use]
    pub fn new(canvas_size: Size2D, viewport: ViewportTransform, background: Background) -> Self {
        Self {
            objects: Vec::new(),
            viewport,
            selection: SelectionState::default(),
            canvas_size,
            background,
        }
    }

    /// Objects in insertion order.
    #[must_use]
    pub fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }

    /// Look up an object by ID.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&CanvasObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub(crate) fn object_mut(&mut self, id: ObjectId) -> Option<&mut CanvasObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    /// Whether an object with `id` exists.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.object(id).is_some()
    }

    /// The current viewport transform.
    #[must_use]
    pub fn viewport(&self) -> &ViewportTransform {
        &self.viewport
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Logical canvas size.
    #[must_use]
    pub fn canvas_size(&self) -> Size2D {
        self.canvas_size
    }

    /// Background color or asset.
    #[must_use]
    pub fn background(&self) -> &Background {
        &self.background
    }

    /// The logical canvas rectangle, centered on the origin.
    #[must_use]
    pub fn canvas_rect(&self) -> Rect {
        Rect::centered(Point2D::ZERO, self.canvas_size)
    }

    /// The canvas rectangle united with every object's unrotated bounding box.
    #[must_use]
    pub fn content_bounds(&self) -> Rect {
        self.objects
            .iter()
            .fold(self.canvas_rect(), |acc, o| acc.union(&o.transform.bounding_rect()))
    }

    /// Largest z-index in use, or 0.0 for an empty canvas.
    #[must_use]
    pub fn highest_z_index(&self) -> f64 {
        self.objects
            .iter()
            .map(|o| o.z_index)
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Objects in draw order: ascending z-index, ties broken by insertion order.
    #[must_use]
    pub fn objects_by_z(&self) -> Vec<&CanvasObject> {
        let mut sorted: Vec<&CanvasObject> = self.objects.iter().collect();
        sorted.sort_by(|a, b| a.z_index.total_cmp(&b.z_index));
        sorted
    }

    /// Number of objects on the canvas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the canvas has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Serialize the state to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string(self).map_err(CanvasError::Serialization)
    }

    /// Deserialize a state from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        serde_json::from_str(json).map_err(CanvasError::Serialization)
    }
}
