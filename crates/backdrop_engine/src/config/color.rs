//! Hex color strings

use super::ConfigError;

/// Linear RGBA color with channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Rgba {
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Create a color from channels
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional)
    pub fn parse_hex(text: &str) -> Result<Self, ConfigError> {
        let digits = text.trim().trim_start_matches('#');
        let invalid = || ConfigError::Invalid {
            field: "color",
            reason: format!("`{text}` is not a hex color"),
        };

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map(|v| f32::from(v) / 255.0);
        let expanded;
        let digits = if digits.len() == 3 {
            expanded = digits.chars().flat_map(|c| [c, c]).collect::<String>();
            expanded.as_str()
        } else {
            digits
        };

        match digits.len() {
            6 | 8 => {
                let r = channel(&digits[0..2]).map_err(|_| invalid())?;
                let g = channel(&digits[2..4]).map_err(|_| invalid())?;
                let b = channel(&digits[4..6]).map_err(|_| invalid())?;
                let a = if digits.len() == 8 {
                    channel(&digits[6..8]).map_err(|_| invalid())?
                } else {
                    1.0
                };
                Ok(Self::new(r, g, b, a))
            }
            _ => Err(invalid()),
        }
    }

    /// Same color with its alpha scaled
    pub fn with_alpha(self, factor: f32) -> Self {
        Self { a: (self.a * factor).clamp(0.0, 1.0), ..self }
    }

    /// Perceived brightness in `[0, 1]`
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}
