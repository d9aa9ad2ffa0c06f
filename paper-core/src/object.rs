//! Canvas objects - the stickers, notes and media placed on a paper.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Size2D, Transform};

/// Unique identifier for a canvas object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Create a new unique object ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typographic style of a text object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextStyle {
    /// Large heading.
    Title,
    /// Secondary heading.
    Subtitle,
    /// Regular text.
    #[default]
    Body,
    /// Small annotation text.
    Caption,
}

/// Where a photo's pixels come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImageSource {
    /// A bundled asset by name.
    Asset(String),
    /// A platform symbol by name.
    SystemIcon(String),
    /// Encoded image bytes.
    Bytes(Vec<u8>),
}

/// Font used by a sticky note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    /// Font family name.
    pub family: String,
    /// Point size.
    pub size: f64,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "system".to_string(),
            size: 17.0,
        }
    }
}

/// The payload of a canvas object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ObjectContent {
    /// A styled text label.
    Text {
        /// Text content.
        text: String,
        /// Typographic style.
        style: TextStyle,
        /// Text color as hex.
        foreground_color: String,
        /// Fill behind the text as hex, if any.
        background_color: Option<String>,
    },

    /// A photo or icon.
    Photo {
        /// Image source.
        source: ImageSource,
        /// Optional tint color as hex.
        tint: Option<String>,
        /// Whether the image repeats to fill its frame.
        tiled: bool,
    },

    /// A freehand drawing.
    Doodle {
        /// Reference to the drawing data or asset.
        drawing_ref: String,
        /// Stroke color as hex.
        stroke_color: String,
        /// Stroke width in canvas units.
        line_width: f64,
        /// Stroke opacity (0.0 to 1.0), if set.
        opacity: Option<f64>,
    },

    /// A colored note with text.
    StickyNote {
        /// Note text.
        text: String,
        /// Note color as hex.
        note_color: String,
        /// Font used for the note text.
        font: FontDescriptor,
    },

    /// A recorded voice message.
    Voice {
        /// Reference to the audio resource.
        audio_ref: String,
        /// Duration in seconds.
        duration_secs: f64,
    },

    /// An opaque sticker asset.
    Sticker {
        /// Encoded sticker bytes.
        data: Vec<u8>,
    },
}

impl ObjectContent {
    /// Unscaled size given to newly added objects of this kind.
    #[must_use]
    pub fn default_size(&self) -> Size2D {
        match self {
            Self::Text { .. } => Size2D::new(200.0, 60.0),
            Self::Photo { .. } => Size2D::new(200.0, 200.0),
            Self::Doodle { .. } => Size2D::new(300.0, 300.0),
            Self::StickyNote { .. } => Size2D::new(180.0, 180.0),
            Self::Voice { .. } => Size2D::new(220.0, 64.0),
            Self::Sticker { .. } => Size2D::new(120.0, 120.0),
        }
    }

    /// Short name of the variant, used in logs.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Photo { .. } => "photo",
            Self::Doodle { .. } => "doodle",
            Self::StickyNote { .. } => "sticky_note",
            Self::Voice { .. } => "voice",
            Self::Sticker { .. } => "sticker",
        }
    }

    /// Plain body-style text in black.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            style: TextStyle::Body,
            foreground_color: "#000000".to_string(),
            background_color: None,
        }
    }

    /// An untinted, untiled photo from a bundled asset.
    #[must_use]
    pub fn photo(asset: impl Into<String>) -> Self {
        Self::Photo {
            source: ImageSource::Asset(asset.into()),
            tint: None,
            tiled: false,
        }
    }

    /// A yellow sticky note with the default font.
    #[must_use]
    pub fn sticky_note(text: impl Into<String>) -> Self {
        Self::StickyNote {
            text: text.into(),
            note_color: "#FFE066".to_string(),
            font: FontDescriptor::default(),
        }
    }
}

/// A content object placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasObject {
    /// Unique identifier, fixed at creation.
    id: ObjectId,
    /// Object payload.
    pub content: ObjectContent,
    /// Placement on the canvas.
    pub transform: Transform,
    /// Draw order key; higher values are drawn on top.
    pub z_index: f64,
    /// Locked objects ignore transform changes.
    pub is_locked: bool,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at_ms: u64,
    /// Display name of the author, if known.
    pub author: Option<String>,
}

impl CanvasObject {
    /// Create a new object with a fresh ID and the content's default size.
    #[must_use]
    pub fn new(content: ObjectContent) -> Self {
        let transform = Transform::with_size(content.default_size());
        Self {
            id: ObjectId::new(),
            content,
            transform,
            z_index: 0.0,
            is_locked: false,
            created_at_ms: now_ms(),
            author: None,
        }
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// The object's identity.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// A copy of this object under a new identity.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: ObjectId::new(),
            created_at_ms: now_ms(),
            ..self.clone()
        }
    }
}

/// Current time in milliseconds since the Unix epoch.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
