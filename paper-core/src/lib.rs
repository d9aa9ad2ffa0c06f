//! # RollingPaper Canvas Core
//!
//! Editing engine for a paper: the sticker-like objects placed on it, the
//! zoomable viewport it is seen through, and the gate that keeps canvas and
//! object gestures from interfering.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               CanvasSession                 │
//! │  gesture callbacks → view/canvas conversion │
//! ├──────────────────────┬──────────────────────┤
//! │  GestureCoordinator  │  CanvasStore         │
//! │  - default / editing │  - objects, z-order  │
//! │  - canvas-gesture    │  - selection / edit  │
//! │    in progress       │  - viewport clamp    │
//! ├──────────────────────┴──────────────────────┤
//! │  CanvasEvent → observers → FeedbackEngine   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Everything here runs on the UI thread. Nothing in the engine blocks or
//! spawns; asynchronous work (photo loading, recording) happens in the host
//! and re-enters on the UI thread before calling in.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod drawing;
pub mod error;
pub mod event;
pub mod feedback;
pub mod geometry;
pub mod gesture;
pub mod object;
pub mod session;
pub mod state;
pub mod store;
pub mod viewport;

pub use config::CanvasConfig;
pub use drawing::{DrawingController, DrawingSurface};
pub use error::{CanvasError, CanvasResult};
pub use event::{CanvasEvent, EventEmitter};
pub use feedback::{
    AnimationPreset, FeedbackEngine, FeedbackRequest, HapticKind, RecordingFeedback, SoundKind,
    TracingFeedback,
};
pub use geometry::{Angle, Point2D, Rect, Size2D, Transform, Vector2D};
pub use gesture::{GestureAnchor, GestureCoordinator, GestureMode};
pub use object::{CanvasObject, FontDescriptor, ImageSource, ObjectContent, ObjectId, TextStyle};
pub use session::CanvasSession;
pub use state::{Background, CanvasState, SelectionState};
pub use store::CanvasStore;
pub use viewport::ViewportTransform;

/// Canvas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
