//! Viewport transform: how the canvas is scaled and panned inside the view.
//!
//! A canvas point `p` is drawn at `viewport_center + offset + p * scale`.
//! `offset` is in view units, so panning by a finger translation adds the
//! translation to `offset` directly.

use serde::{Deserialize, Serialize};

use crate::geometry::{clamp_or_center, Point2D, Rect, Size2D, Vector2D};

/// Scale and pan of the canvas within the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransform {
    /// Current zoom factor, kept within `[minimum_scale, maximum_scale]`.
    pub scale: f64,
    /// Translation of the canvas origin from the viewport center, in view units.
    pub offset: Vector2D,
    /// Smallest allowed zoom. Raised by fitting so the user cannot zoom out past the fit.
    pub minimum_scale: f64,
    /// Largest allowed zoom.
    pub maximum_scale: f64,
}

impl ViewportTransform {
    /// A centered viewport at scale 1.0 (clamped to the given range).
    #[must_use]
    pub fn new(minimum_scale: f64, maximum_scale: f64) -> Self {
        let mut viewport = Self {
            scale: 1.0,
            offset: Vector2D::ZERO,
            minimum_scale,
            maximum_scale,
        };
        viewport.scale = viewport.clamp_scale(1.0);
        viewport
    }

    /// Clamp `value` to the allowed zoom range.
    #[must_use]
    pub fn clamp_scale(&self, value: f64) -> f64 {
        value.max(self.minimum_scale).min(self.maximum_scale)
    }

    /// Clamp `offset` so the content stays within reach at the current scale.
    ///
    /// On each axis the scaled content must cover the viewport. When the
    /// content is smaller than the viewport the range collapses to the single
    /// offset that centers it.
    #[must_use]
    pub fn clamped_offset(&self, offset: Vector2D, content: &Rect, viewport: Size2D) -> Vector2D {
        if !viewport.is_usable() || content.is_degenerate() {
            return offset;
        }
        let half_w = viewport.width / 2.0;
        let half_h = viewport.height / 2.0;
        let s = self.scale;

        let dx = clamp_or_center(
            offset.dx,
            half_w - s * content.max_x,
            -half_w - s * content.min_x,
        );
        let dy = clamp_or_center(
            offset.dy,
            half_h - s * content.max_y,
            -half_h - s * content.min_y,
        );
        Vector2D::new(dx, dy)
    }

    /// Convert a point in view coordinates (origin at the view's top-left) to canvas space.
    #[must_use]
    pub fn view_to_canvas(&self, point: Point2D, viewport: Size2D) -> Point2D {
        Point2D::new(
            (point.x - viewport.width / 2.0 - self.offset.dx) / self.scale,
            (point.y - viewport.height / 2.0 - self.offset.dy) / self.scale,
        )
    }

    /// Convert a canvas point to view coordinates (origin at the view's top-left).
    #[must_use]
    pub fn canvas_to_view(&self, point: Point2D, viewport: Size2D) -> Point2D {
        Point2D::new(
            point.x * self.scale + viewport.width / 2.0 + self.offset.dx,
            point.y * self.scale + viewport.height / 2.0 + self.offset.dy,
        )
    }

    /// Convert a view-space translation to a canvas-space translation.
    #[must_use]
    pub fn view_delta_to_canvas(&self, delta: Vector2D) -> Vector2D {
        delta / self.scale
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::new(0.5, 5.0)
    }
}

/// Scale at which `content` fills `viewport`, cropping the lesser dimension.
///
/// Returns `None` when either rectangle has no area.
#[must_use]
pub fn fill_scale(content: &Rect, viewport: Size2D) -> Option<f64> {
    if content.is_degenerate() || !viewport.is_usable() {
        return None;
    }
    let width_ratio = viewport.width / content.width();
    let height_ratio = viewport.height / content.height();
    Some(width_ratio.max(height_ratio))
}
