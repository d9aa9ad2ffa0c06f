//! Gesture scripts: a JSON list of recognizer callbacks replayed through a
//! [`CanvasSession`].
//!
//! Objects are addressed by their insertion index, since their IDs are only
//! known once the script has added them.
//!
//! ```json
//! { "steps": [
//!     { "op": "add_sticky_note", "text": "Congrats!" },
//!     { "op": "long_press", "index": 0 },
//!     { "op": "drag", "index": 0, "dx": 40.0, "dy": 0.0 },
//!     { "op": "end_gesture", "index": 0 },
//!     { "op": "background_tap" }
//! ] }
//! ```

use std::path::Path;

use anyhow::{bail, Context};
use paper_core::{
    Angle, Background, CanvasSession, ObjectContent, ObjectId, Transform, Vector2D,
};
use serde::{Deserialize, Serialize};

/// One recognizer callback or toolbar command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Add arbitrary content at the visible center.
    Add {
        /// Content payload.
        content: ObjectContent,
    },
    /// Add a text object at the visible center.
    AddText {
        /// Text to show.
        text: String,
    },
    /// Add a photo at the visible center.
    AddPhoto {
        /// Asset name.
        asset: String,
    },
    /// Add a sticky note at the visible center.
    AddStickyNote {
        /// Note text.
        text: String,
    },
    /// Place content with an explicit transform and author.
    Place {
        /// Content payload.
        content: ObjectContent,
        /// Placement on the canvas.
        transform: Transform,
        /// Who placed it.
        #[serde(default)]
        author: Option<String>,
    },
    /// Tap an object to select it.
    Select {
        /// Insertion index.
        index: usize,
        /// Replace the selection instead of adding to it.
        #[serde(default = "default_true")]
        exclusive: bool,
    },
    /// Long press an object to edit it.
    LongPress {
        /// Insertion index.
        index: usize,
    },
    /// Drag the edited object; cumulative view-space translation.
    Drag {
        /// Insertion index.
        index: usize,
        /// Horizontal translation.
        dx: f64,
        /// Vertical translation.
        dy: f64,
    },
    /// Pinch the edited object; cumulative magnification.
    Magnify {
        /// Insertion index.
        index: usize,
        /// Magnification since the pinch began.
        factor: f64,
    },
    /// Rotate the edited object; cumulative angle.
    Rotate {
        /// Insertion index.
        index: usize,
        /// Rotation since the gesture began.
        degrees: f64,
    },
    /// End the drag/magnify/rotate on an object.
    EndGesture {
        /// Insertion index.
        index: usize,
    },
    /// Leave edit mode.
    ExitEdit,
    /// Tap on empty canvas.
    BackgroundTap,
    /// A complete canvas pan.
    Pan {
        /// Horizontal translation.
        dx: f64,
        /// Vertical translation.
        dy: f64,
    },
    /// A complete canvas pinch.
    Zoom {
        /// Magnification.
        factor: f64,
    },
    /// Fit the canvas to the viewport.
    Fit,
    /// Return to the fitted view.
    Reset,
    /// Draw an object above all others.
    BringToFront {
        /// Insertion index.
        index: usize,
    },
    /// Lock or unlock an object.
    Lock {
        /// Insertion index.
        index: usize,
        /// New lock state.
        locked: bool,
    },
    /// Duplicate the selection.
    Duplicate,
    /// Delete the selection.
    Delete,
    /// Turn the drawing tool on or off.
    DrawingTool {
        /// New tool state.
        active: bool,
    },
    /// Replace the background.
    SetBackground {
        /// New background.
        background: Background,
    },
}

fn default_true() -> bool {
    true
}

/// A sequence of steps to replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Steps, in order.
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    /// Parse a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a script.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid gesture script")
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in script {}", path.display()))
    }
}

/// Outcome of a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Steps the session acted on.
    pub applied: usize,
    /// Gesture steps the session refused (wrong mode, wrong target).
    pub refused: usize,
}

/// Replay every step of `script` against `session`.
///
/// # Errors
///
/// Returns an error if a step addresses an object index that does not exist.
pub fn replay(session: &mut CanvasSession, script: &Script) -> anyhow::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();
    // Insertion order, including objects deleted later in the script.
    let mut added: Vec<ObjectId> = session.store().objects().iter().map(|o| o.id()).collect();

    for (position, step) in script.steps.iter().enumerate() {
        let permitted = apply_step(session, step, &mut added)
            .with_context(|| format!("step {position} ({step:?})"))?;
        if permitted {
            summary.applied += 1;
        } else {
            tracing::debug!(position, ?step, "step refused");
            summary.refused += 1;
        }
    }
    tracing::info!(
        applied = summary.applied,
        refused = summary.refused,
        objects = session.store().objects().len(),
        "script replayed"
    );
    Ok(summary)
}

fn object_at_index(added: &[ObjectId], index: usize) -> anyhow::Result<ObjectId> {
    match added.get(index) {
        Some(&id) => Ok(id),
        None => bail!("no object at index {index} ({} added so far)", added.len()),
    }
}

fn apply_step(
    session: &mut CanvasSession,
    step: &ScriptStep,
    added: &mut Vec<ObjectId>,
) -> anyhow::Result<bool> {
    let permitted = match step {
        ScriptStep::Add { content } => {
            added.push(session.add_object(content.clone()));
            true
        }
        ScriptStep::AddText { text } => {
            added.push(session.add_object(ObjectContent::text(text.as_str())));
            true
        }
        ScriptStep::AddPhoto { asset } => {
            added.push(session.add_object(ObjectContent::photo(asset.as_str())));
            true
        }
        ScriptStep::AddStickyNote { text } => {
            added.push(session.add_object(ObjectContent::sticky_note(text.as_str())));
            true
        }
        ScriptStep::Place {
            content,
            transform,
            author,
        } => {
            let id = session
                .store_mut()
                .add_object_with(content.clone(), *transform, author.clone());
            added.push(id);
            true
        }
        ScriptStep::Select { index, exclusive } => {
            let id = object_at_index(added, *index)?;
            session.select_object(id, *exclusive);
            true
        }
        ScriptStep::LongPress { index } => session.long_press(object_at_index(added, *index)?),
        ScriptStep::Drag { index, dx, dy } => {
            let id = object_at_index(added, *index)?;
            session.object_drag_changed(id, Vector2D::new(*dx, *dy))
        }
        ScriptStep::Magnify { index, factor } => {
            let id = object_at_index(added, *index)?;
            session.object_magnify_changed(id, *factor)
        }
        ScriptStep::Rotate { index, degrees } => {
            let id = object_at_index(added, *index)?;
            session.object_rotate_changed(id, Angle::from_degrees(*degrees))
        }
        ScriptStep::EndGesture { index } => {
            session.object_gesture_ended(object_at_index(added, *index)?);
            true
        }
        ScriptStep::ExitEdit => session.exit_edit_mode(),
        ScriptStep::BackgroundTap => {
            session.background_tapped();
            true
        }
        ScriptStep::Pan { dx, dy } => {
            let permitted = session.canvas_pan_changed(Vector2D::new(*dx, *dy));
            session.canvas_pan_ended();
            permitted
        }
        ScriptStep::Zoom { factor } => {
            let permitted = session.canvas_zoom_changed(*factor);
            session.canvas_zoom_ended();
            permitted
        }
        ScriptStep::Fit => {
            let size = session.viewport_size();
            session.store_mut().fit_to_viewport(size);
            true
        }
        ScriptStep::Reset => {
            let size = session.viewport_size();
            session.store_mut().reset_transform(Some(size));
            true
        }
        ScriptStep::BringToFront { index } => {
            let id = object_at_index(added, *index)?;
            session.store_mut().bring_to_front(id);
            true
        }
        ScriptStep::Lock { index, locked } => {
            let id = object_at_index(added, *index)?;
            session.store_mut().set_locked(id, *locked);
            true
        }
        ScriptStep::Duplicate => {
            let copies = session.duplicate_selected();
            let permitted = !copies.is_empty();
            added.extend(copies);
            permitted
        }
        ScriptStep::Delete => {
            session.delete_selected();
            true
        }
        ScriptStep::DrawingTool { active } => {
            session.set_drawing_tool_active(*active);
            true
        }
        ScriptStep::SetBackground { background } => {
            session.store_mut().set_background(background.clone());
            true
        }
    };
    Ok(permitted)
}
