use serde::{Deserialize, Serialize};

/// Mesh animation hint carried by every action. Only the renderer reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
#[repr(u8)]
pub enum AnimationType {
    #[default]
    None = 0,
    Idle = 1,
    Walking = 2,
    Instant = 3,
    Translate = 4,
    AccelDecel = 5,
    Skipping = 6,
    Rotate = 7,
    Fade = 8,
}

impl From<u8> for AnimationType {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Idle,
            2 => Self::Walking,
            3 => Self::Instant,
            4 => Self::Translate,
            5 => Self::AccelDecel,
            6 => Self::Skipping,
            7 => Self::Rotate,
            8 => Self::Fade,
            _ => Self::None,
        }
    }
}

impl From<AnimationType> for u8 {
    fn from(value: AnimationType) -> Self {
        value as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl Color {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const MAGENTA: Self = Self::new(1.0, 0.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
