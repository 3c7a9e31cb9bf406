//! Background colour parsing.

/// Errors produced by [`Rgba::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("colour string is empty")]
    Empty,

    #[error("invalid hex colour {0:?}: expected #rgb, #rrggbb or #rrggbbaa")]
    InvalidHex(String),

    #[error("invalid rgb() colour {0:?}: expected three integers in 0..=255")]
    InvalidRgbFunction(String),

    #[error("unknown colour name {0:?}")]
    UnknownName(String),
}

/// An sRGB colour with straight alpha, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Self = Self::opaque(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::opaque(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Build from 8-bit sRGB components.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: f32::from(a) / 255.0,
        }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `black`, `white`
    /// or `transparent`. Matching is case-insensitive and ignores surrounding
    /// whitespace.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ColorError::Empty);
        }
        let lower = trimmed.to_ascii_lowercase();

        if let Some(hex) = lower.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorError::InvalidHex(trimmed.to_string()));
        }
        if let Some(args) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_args(args)
                .ok_or_else(|| ColorError::InvalidRgbFunction(trimmed.to_string()));
        }

        match lower.as_str() {
            "black" => Ok(Self::BLACK),
            "white" => Ok(Self::WHITE),
            "transparent" => Ok(Self::TRANSPARENT),
            _ => Err(ColorError::UnknownName(trimmed.to_string())),
        }
    }

    /// Components converted to linear light, alpha unchanged.
    pub fn to_linear(self) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            self.a,
        ]
    }
}

impl std::str::FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
            Some(Rgba::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 255))
        }
        6 => Some(Rgba::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Rgba::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgba> {
    let mut parts = args.split(',').map(|p| p.trim().parse::<u8>());
    let r = parts.next()?.ok()?;
    let g = parts.next()?.ok()?;
    let b = parts.next()?.ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Rgba::from_rgba8(r, g, b, 255))
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_parse_long_hex() {
        let c = Rgba::parse("#101010").unwrap();
        assert!(approx(c.r, 16.0 / 255.0));
        assert!(approx(c.g, c.b));
        assert!(approx(c.a, 1.0));
    }

    #[test]
    fn test_parse_short_hex_expands() {
        assert_eq!(Rgba::parse("#fff").unwrap(), Rgba::WHITE);
        assert_eq!(Rgba::parse("#F00").unwrap(), Rgba::from_rgba8(255, 0, 0, 255));
    }

    #[test]
    fn test_parse_hex_with_alpha() {
        let c = Rgba::parse("#00000080").unwrap();
        assert!(approx(c.a, 128.0 / 255.0));
    }

    #[test]
    fn test_parse_rgb_function() {
        let c: Rgba = " RGB(10, 20 ,30) ".parse().unwrap();
        assert_eq!(c, Rgba::from_rgba8(10, 20, 30, 255));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(Rgba::parse("black").unwrap(), Rgba::BLACK);
        assert_eq!(Rgba::parse("White").unwrap(), Rgba::WHITE);
        assert_eq!(Rgba::parse("transparent").unwrap(), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(Rgba::parse("   "), Err(ColorError::Empty));
        assert!(matches!(Rgba::parse("#12"), Err(ColorError::InvalidHex(_))));
        assert!(matches!(Rgba::parse("#gggggg"), Err(ColorError::InvalidHex(_))));
        assert!(matches!(Rgba::parse("#1234567"), Err(ColorError::InvalidHex(_))));
        assert!(matches!(
            Rgba::parse("rgb(256, 0, 0)"),
            Err(ColorError::InvalidRgbFunction(_))
        ));
        assert!(matches!(
            Rgba::parse("rgb(1, 2)"),
            Err(ColorError::InvalidRgbFunction(_))
        ));
        assert!(matches!(
            Rgba::parse("rgb(1, 2, 3, 4)"),
            Err(ColorError::InvalidRgbFunction(_))
        ));
        assert!(matches!(Rgba::parse("teal"), Err(ColorError::UnknownName(_))));
    }

    #[test]
    fn test_rgba_function_is_not_accepted() {
        assert!(matches!(
            Rgba::parse("rgba(10, 20, 30, 0.5)"),
            Err(ColorError::UnknownName(_))
        ));
    }

    #[test]
    fn test_to_linear_endpoints() {
        assert_eq!(Rgba::BLACK.to_linear(), [0.0, 0.0, 0.0, 1.0]);
        let white = Rgba::WHITE.to_linear();
        assert!(approx(white[0], 1.0));
        let mid = Rgba::opaque(0.5, 0.5, 0.5).to_linear();
        assert!((mid[0] - 0.214).abs() < 1e-3);
    }
}
