//! # Blending

#[derive(strum::AsRefStr, PartialEq, Eq, strum::EnumIter, Copy, Clone, Hash, Debug, Default)]
#[repr(u8)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
}

/// Blend state a tool asks the surface to paint with: a mode plus an opacity
/// modulate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Blend {
    pub mode: BlendMode,
    pub opacity: f32,
}
impl Default for Blend {
    fn default() -> Self {
        Self {
            mode: BlendMode::default(),
            opacity: 1.0,
        }
    }
}
