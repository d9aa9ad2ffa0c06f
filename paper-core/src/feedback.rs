//! Feedback collaborator: haptics, sounds and animation presets.
//!
//! The engine only decides *which* feedback fits an interaction. Playback is
//! the job of whatever [`FeedbackEngine`] the application injects.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::event::CanvasEvent;

/// Haptic pattern to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticKind {
    /// Light impact.
    Light,
    /// Medium impact.
    Medium,
    /// Heavy impact.
    Heavy,
    /// Rigid impact.
    Rigid,
    /// Selection tick.
    Selection,
    /// Success notification.
    Success,
    /// Warning notification.
    Warning,
}

/// Sound effect to play alongside a haptic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundKind {
    /// Object placed.
    Pop,
    /// Object removed.
    Delete,
    /// Generic tap.
    Tap,
}

/// Animation curve for the accompanying visual response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationPreset {
    /// Springy overshoot.
    Bouncy,
    /// Gentle ease.
    Smooth,
    /// Quick settle.
    Snappy,
}

/// One feedback request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    /// Haptic pattern.
    pub haptic: HapticKind,
    /// Optional sound.
    pub sound: Option<SoundKind>,
    /// Optional animation preset.
    pub animation: Option<AnimationPreset>,
    /// Whether the user asked for reduced motion.
    pub reduce_motion: bool,
}

/// Plays haptic, sound and animation feedback.
pub trait FeedbackEngine: Send + Sync {
    /// Play the requested feedback.
    fn trigger(
        &self,
        haptic: HapticKind,
        sound: Option<SoundKind>,
        animation: Option<AnimationPreset>,
        reduce_motion: bool,
    );
}

/// Default engine that only logs each request.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFeedback;

impl FeedbackEngine for TracingFeedback {
    fn trigger(
        &self,
        haptic: HapticKind,
        sound: Option<SoundKind>,
        animation: Option<AnimationPreset>,
        reduce_motion: bool,
    ) {
        tracing::debug!(?haptic, ?sound, ?animation, reduce_motion, "feedback");
    }
}

/// Engine that records every request, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingFeedback {
    requests: Mutex<Vec<FeedbackRequest>>,
}

impl RecordingFeedback {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<FeedbackRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Haptic kinds received so far, in order.
    #[must_use]
    pub fn haptics(&self) -> Vec<HapticKind> {
        self.requests().iter().map(|r| r.haptic).collect()
    }
}

impl FeedbackEngine for RecordingFeedback {
    fn trigger(
        &self,
        haptic: HapticKind,
        sound: Option<SoundKind>,
        animation: Option<AnimationPreset>,
        reduce_motion: bool,
    ) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(FeedbackRequest {
                haptic,
                sound,
                animation,
                reduce_motion,
            });
    }
}

/// Feedback that accompanies a store event, if any.
///
/// Viewport and edit-mode changes map to nothing here: the former fire every
/// frame and the latter are signalled by the gesture coordinator.
#[must_use]
pub fn feedback_for_event(event: &CanvasEvent, reduce_motion: bool) -> Option<FeedbackRequest> {
    let (haptic, sound, animation) = match event {
        CanvasEvent::ObjectAdded(_) => (
            HapticKind::Light,
            Some(SoundKind::Pop),
            Some(AnimationPreset::Bouncy),
        ),
        CanvasEvent::ObjectDeleted(_) => (
            HapticKind::Rigid,
            Some(SoundKind::Delete),
            Some(AnimationPreset::Snappy),
        ),
        CanvasEvent::SelectionChanged(ids) if !ids.is_empty() => {
            (HapticKind::Selection, None, None)
        }
        CanvasEvent::DrawingToolChanged(_) => (HapticKind::Light, Some(SoundKind::Tap), None),
        _ => return None,
    };
    Some(FeedbackRequest {
        haptic,
        sound,
        animation: if reduce_motion { None } else { animation },
        reduce_motion,
    })
}

/// Play a request on `engine`.
pub fn play(engine: &Arc<dyn FeedbackEngine>, request: FeedbackRequest) {
    engine.trigger(
        request.haptic,
        request.sound,
        request.animation,
        request.reduce_motion,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ObjectId;

    #[test]
    fn test_recording_feedback_keeps_order() {
        let recorder = RecordingFeedback::new();
        recorder.trigger(HapticKind::Medium, None, None, false);
        recorder.trigger(HapticKind::Light, Some(SoundKind::Tap), None, true);
        assert_eq!(recorder.haptics(), vec![HapticKind::Medium, HapticKind::Light]);
        assert!(recorder.requests()[1].reduce_motion);
    }

    #[test]
    fn test_empty_selection_has_no_feedback() {
        assert!(feedback_for_event(&CanvasEvent::SelectionChanged(vec![]), false).is_none());
        assert!(feedback_for_event(&CanvasEvent::SelectionChanged(vec![ObjectId::new()]), false)
            .is_some());
    }

    #[test]
    fn test_reduce_motion_drops_animation() {
        let event = CanvasEvent::ObjectAdded(ObjectId::new());
        let full = feedback_for_event(&event, false).expect("add has feedback");
        let reduced = feedback_for_event(&event, true).expect("add has feedback");
        assert_eq!(full.animation, Some(AnimationPreset::Bouncy));
        assert_eq!(reduced.animation, None);
        assert_eq!(reduced.sound, Some(SoundKind::Pop));
    }

    #[test]
    fn test_transform_change_is_silent() {
        let event = CanvasEvent::CanvasTransformChanged {
            scale: 2.0,
            offset: crate::geometry::Vector2D::ZERO,
        };
        assert!(feedback_for_event(&event, false).is_none());
    }
}
