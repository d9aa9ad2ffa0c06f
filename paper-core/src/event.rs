//! Events emitted by the canvas store for side-effecting observers.

use serde::{Deserialize, Serialize};

use crate::geometry::Vector2D;
use crate::object::ObjectId;

/// A change that observers (haptics, analytics, views) may react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum CanvasEvent {
    /// A new object was placed on the canvas.
    ObjectAdded(ObjectId),
    /// The selection changed; carries the resulting selection.
    SelectionChanged(Vec<ObjectId>),
    /// An object was removed.
    ObjectDeleted(ObjectId),
    /// An object entered or left edit mode.
    EditModeChanged {
        /// The object whose edit state changed.
        id: ObjectId,
        /// Whether it is now being edited.
        is_editing: bool,
    },
    /// The viewport scale or offset changed.
    CanvasTransformChanged {
        /// New viewport scale.
        scale: f64,
        /// New viewport offset.
        offset: Vector2D,
    },
    /// The drawing tool was switched on or off.
    DrawingToolChanged(bool),
    /// The drawing surface reported new markup.
    MarkupChanged,
}

/// Callback invoked for every emitted event.
pub type EventHandler = Box<dyn FnMut(&CanvasEvent)>;

/// Synchronous, ordered fan-out of events to subscribed handlers.
///
/// Handlers only receive a shared reference to the event, so they cannot
/// reach back into the store that is emitting it.
#[derive(Default)]
pub struct EventEmitter {
    handlers: Vec<EventHandler>,
}

impl EventEmitter {
    /// Create an emitter with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Handlers run in subscription order.
    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(&CanvasEvent) + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Deliver `event` to every handler before returning.
    pub fn emit(&mut self, event: &CanvasEvent) {
        tracing::trace!(?event, "canvas event");
        for handler in &mut self.handlers {
            handler(event);
        }
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
