//! # Text annotations

use uuid::Uuid;

use crate::geom::{Pos, Rect, Size};
use crate::stroke::Location;
use crate::Color;

/// Font size as a fraction of the canvas height.
pub const DEFAULT_FONT_SIZE: f32 = 0.025;

/// The closed set of annotation fonts. Serialized by family name.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, strum::AsRefStr, strum::EnumString)]
pub enum Font {
    #[default]
    #[strum(serialize = "Arial")]
    Arial,
    #[strum(serialize = "Times New Roman")]
    TimesNewRoman,
}

/// A positioned run of annotation text.
///
/// Shaping and glyph drawing belong to the rendering surface; the model only
/// knows the string, its normalized anchor, and its style.
#[derive(Clone, PartialEq, Debug)]
pub struct Text {
    id: Uuid,
    pub value: String,
    pub location: Location,
    pub color: Color,
    pub font: Font,
    /// Normalized, a fraction of canvas height.
    pub font_size: f32,
    /// False while the annotation is being edited in an overlay, so it isn't
    /// drawn twice. Not persisted.
    pub is_renderable: bool,
}
impl Text {
    #[must_use]
    pub fn new(value: String, color: Color, location: Location, font: Font, font_size: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            value,
            location,
            color,
            font,
            font_size,
            is_renderable: true,
        }
    }
    pub(crate) fn from_parts(
        id: Uuid,
        value: String,
        color: Color,
        location: Location,
        font: Font,
        font_size: f32,
    ) -> Self {
        Self {
            id,
            value,
            location,
            color,
            font,
            font_size,
            is_renderable: true,
        }
    }
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }
    /// Font size in pixels when rendered at `size`.
    #[must_use]
    pub fn font_size_px(&self, size: Size) -> f32 {
        size.height * self.font_size
    }
    /// Where the first glyph's box anchors, in pixels.
    #[must_use]
    pub fn layout_origin(&self, size: Size) -> Pos {
        self.location.pos(size)
    }
    /// The integral frame occupied at `size`, given the measured extent of
    /// the shaped string (measuring is the surface's job).
    #[must_use]
    pub fn layout_rect(&self, size: Size, measured: Size) -> Rect {
        Rect {
            origin: self.layout_origin(size),
            size: measured,
        }
        .integral()
    }
}
