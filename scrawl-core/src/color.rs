//! # Color
//!
//! Stroke and text color. Channels are kept in the document's native ranges,
//! 0-255 for RGB and 0-1 for alpha. A handful of canonical colors carry a
//! [`Name`], recovered from exact channel matches. The name is a
//! serialization nicety for readable documents, nothing downstream keys off
//! it.

use strum::IntoEnumIterator;

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Color {
    pub name: Option<Name>,
    /// Red channel, 0.0-255.0.
    pub red: f32,
    /// Green channel, 0.0-255.0.
    pub green: f32,
    /// Blue channel, 0.0-255.0.
    pub blue: f32,
    /// Alpha channel, 0.0-1.0.
    pub alpha: f32,
}
impl Color {
    /// Build a color, recovering the canonical name when the channels match
    /// one exactly.
    #[must_use]
    pub fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            name: Name::matching(red, green, blue, alpha),
            red,
            green,
            blue,
            alpha,
        }
    }
}
impl Default for Color {
    fn default() -> Self {
        Name::Black.color()
    }
}
impl From<Name> for Color {
    fn from(name: Name) -> Self {
        name.color()
    }
}

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Debug,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Name {
    Red,
    Green,
    Blue,
    Orange,
    Yellow,
    Purple,
    Black,
    White,
}
impl Name {
    #[must_use]
    pub fn color(self) -> Color {
        let (red, green, blue) = match self {
            Self::Red => (255.0, 0.0, 0.0),
            Self::Green => (0.0, 255.0, 0.0),
            Self::Blue => (0.0, 0.0, 255.0),
            Self::Orange => (255.0, 127.5, 0.0),
            Self::Yellow => (255.0, 255.0, 0.0),
            Self::Purple => (255.0, 0.0, 255.0),
            Self::Black => (0.0, 0.0, 0.0),
            Self::White => (255.0, 255.0, 255.0),
        };
        Color {
            name: Some(self),
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }
    /// The canonical name whose channels are exactly these, if any. Only
    /// fully opaque colors are nameable.
    #[must_use]
    pub fn matching(red: f32, green: f32, blue: f32, alpha: f32) -> Option<Self> {
        if alpha != 1.0 {
            return None;
        }
        Self::iter().find(|name| {
            let c = name.color();
            c.red == red && c.green == green && c.blue == blue
        })
    }
}

#[cfg(test)]
mod test {
    use super::{Color, Name};

    #[test]
    fn name_recovery() {
        assert_eq!(Color::new(255.0, 0.0, 0.0, 1.0).name, Some(Name::Red));
        assert_eq!(Color::new(255.0, 127.5, 0.0, 1.0).name, Some(Name::Orange));
        // Translucency disqualifies a name.
        assert_eq!(Color::new(255.0, 0.0, 0.0, 0.5).name, None);
        assert_eq!(Color::new(12.0, 34.0, 56.0, 1.0).name, None);
    }

    #[test]
    fn default_is_black() {
        let color = Color::default();
        assert_eq!(color, Name::Black.color());
        assert_eq!(color.alpha, 1.0);
    }

    #[test]
    fn names_round_trip_through_strings() {
        assert_eq!(Name::Orange.as_ref(), "orange");
        assert_eq!("orange".parse::<Name>().unwrap(), Name::Orange);
        assert!("chartreuse".parse::<Name>().is_err());
    }
}
