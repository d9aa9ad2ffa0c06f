//! Drawing surface collaborator.
//!
//! Freehand ink lives in a native drawing view owned by the host. The engine
//! holds a handle to it while attached and only forwards tool toggles.

/// A host-owned freehand drawing view.
pub trait DrawingSurface {
    /// Show or hide the drawing tool picker and start or stop accepting ink.
    fn set_tool_active(&mut self, active: bool);
}

/// Tracks the drawing tool state and the attached surface, if any.
#[derive(Default)]
pub struct DrawingController {
    surface: Option<Box<dyn DrawingSurface>>,
    tool_active: bool,
}

impl DrawingController {
    /// A controller with no surface attached and the tool off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a surface, replacing any previous one. The current tool state is pushed to it.
    pub fn attach(&mut self, mut surface: Box<dyn DrawingSurface>) {
        surface.set_tool_active(self.tool_active);
        self.surface = Some(surface);
    }

    /// Detach and hand back the surface.
    pub fn detach(&mut self) -> Option<Box<dyn DrawingSurface>> {
        self.surface.take()
    }

    /// Whether a surface is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    /// Whether the drawing tool is on.
    #[must_use]
    pub fn is_tool_active(&self) -> bool {
        self.tool_active
    }

    /// Switch the tool. Returns true if the state changed.
    pub fn set_tool_active(&mut self, active: bool) -> bool {
        if self.tool_active == active {
            return false;
        }
        self.tool_active = active;
        if let Some(surface) = self.surface.as_mut() {
            surface.set_tool_active(active);
        }
        true
    }
}

impl std::fmt::Debug for DrawingController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingController")
            .field("attached", &self.surface.is_some())
            .field("tool_active", &self.tool_active)
            .finish()
    }
}
