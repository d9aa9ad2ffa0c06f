//! # Gesture Coordination
//!
//! Decides which gesture recognizers may act at any moment.
//!
//! ```text
//!            enter_edit_mode(id)
//!   Default ─────────────────────▶ Editing(id)
//!      ▲                              │
//!      └──────────────────────────────┘
//!               exit_edit_mode()
//! ```
//!
//! Canvas pan/zoom is only allowed in `Default`; sticker drag, magnify and
//! rotate only in `Editing`, and only for the object being edited. Every
//! recognizer checks these queries at the top of its handler, so the two
//! groups can never mutate state in the same frame.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::feedback::{AnimationPreset, FeedbackEngine, HapticKind};
use crate::object::ObjectId;

/// Coordination mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureMode {
    /// Canvas gestures are live.
    #[default]
    Default,
    /// One object is being edited; canvas gestures are suspended.
    Editing,
}

/// The two-state gate between canvas gestures and object editing.
pub struct GestureCoordinator {
    mode: GestureMode,
    edit_target: Option<ObjectId>,
    is_canvas_interacting: bool,
    feedback: Arc<dyn FeedbackEngine>,
    reduce_motion: bool,
}

impl GestureCoordinator {
    /// Create a coordinator in `Default` mode.
    #[must_use]
    pub fn new(feedback: Arc<dyn FeedbackEngine>, reduce_motion: bool) -> Self {
        Self {
            mode: GestureMode::Default,
            edit_target: None,
            is_canvas_interacting: false,
            feedback,
            reduce_motion,
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> GestureMode {
        self.mode
    }

    /// The object being edited, if any.
    #[must_use]
    pub fn edit_target(&self) -> Option<ObjectId> {
        self.edit_target
    }

    /// Whether a canvas pan or zoom is physically in progress.
    #[must_use]
    pub fn is_canvas_interacting(&self) -> bool {
        self.is_canvas_interacting
    }

    /// Whether canvas pan/zoom may act.
    #[must_use]
    pub fn can_perform_canvas_gestures(&self) -> bool {
        self.mode == GestureMode::Default
    }

    /// Whether object editing gestures may act.
    #[must_use]
    pub fn can_perform_sticker_editing(&self) -> bool {
        self.mode == GestureMode::Editing
    }

    /// Whether `id` is the object currently being edited.
    #[must_use]
    pub fn can_edit_object(&self, id: ObjectId) -> bool {
        self.mode == GestureMode::Editing && self.edit_target == Some(id)
    }

    /// Start editing `id`. Ignored unless in `Default` mode.
    ///
    /// Returns true if the transition happened.
    pub fn enter_edit_mode(&mut self, id: ObjectId) -> bool {
        if self.mode != GestureMode::Default {
            tracing::trace!(%id, "enter_edit_mode ignored: already editing");
            return false;
        }
        self.edit_target = Some(id);
        self.mode = GestureMode::Editing;
        self.is_canvas_interacting = false;
        tracing::debug!(%id, "gesture mode: editing");
        self.feedback.trigger(
            HapticKind::Medium,
            None,
            (!self.reduce_motion).then_some(AnimationPreset::Bouncy),
            self.reduce_motion,
        );
        true
    }

    /// Stop editing. Ignored unless in `Editing` mode.
    ///
    /// Returns true if the transition happened.
    pub fn exit_edit_mode(&mut self) -> bool {
        if self.mode != GestureMode::Editing {
            return false;
        }
        self.edit_target = None;
        self.mode = GestureMode::Default;
        tracing::debug!("gesture mode: default");
        self.feedback.trigger(
            HapticKind::Light,
            None,
            (!self.reduce_motion).then_some(AnimationPreset::Smooth),
            self.reduce_motion,
        );
        true
    }

    /// Mark a canvas pan/zoom as in progress.
    pub fn begin_canvas_gesture(&mut self) {
        self.is_canvas_interacting = true;
    }

    /// Mark the canvas pan/zoom as finished.
    pub fn end_canvas_gesture(&mut self) {
        self.is_canvas_interacting = false;
    }
}

impl std::fmt::Debug for GestureCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureCoordinator")
            .field("mode", &self.mode)
            .field("edit_target", &self.edit_target)
            .field("is_canvas_interacting", &self.is_canvas_interacting)
            .field("reduce_motion", &self.reduce_motion)
            .finish_non_exhaustive()
    }
}

/// The value a gesture started from.
///
/// Captured on the first `changed` callback and dropped when the gesture
/// ends or is cancelled, so a later gesture never reuses a stale anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureAnchor<T> {
    base: Option<T>,
}

impl<T: Copy> GestureAnchor<T> {
    /// An anchor with nothing captured.
    #[must_use]
    pub const fn new() -> Self {
        Self { base: None }
    }

    /// The captured base, capturing `current()` first if needed.
    pub fn capture(&mut self, current: impl FnOnce() -> T) -> T {
        *self.base.get_or_insert_with(current)
    }

    /// The captured base, if any.
    #[must_use]
    pub fn base(&self) -> Option<T> {
        self.base
    }

    /// Forget the captured base.
    pub fn reset(&mut self) {
        self.base = None;
    }
}

impl<T: Copy> Default for GestureAnchor<T> {
    fn default() -> Self {
        Self::new()
    }
}
