use crate::foundation::error::{CasemapError, CasemapResult};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Rgb8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
        }
    }
}

/// Opaque RGB8 color. Serialized as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const ORANGE: Self = Self::new(255, 165, 0);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const GRAY: Self = Self::new(170, 170, 170);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> CasemapResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(CasemapError::validation(format!(
                "color '{s}' must be of the form #rrggbb"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| CasemapError::validation(format!("color '{s}' is not valid hex")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = CasemapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb8> for String {
    fn from(value: Rgb8) -> Self {
        value.to_hex()
    }
}

/// Round half toward positive infinity (`-2.5 -> -2`, `2.5 -> 3`).
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Map a numeric geography area code to the `GMxxxx` code used by the case tables.
pub fn area_code_to_municipality_code(area_code: u32) -> String {
    format!("GM{area_code:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_with_and_without_hash() {
        assert_eq!(Rgb8::from_hex("#ffa500").unwrap(), Rgb8::ORANGE);
        assert_eq!(Rgb8::from_hex("aaaaaa").unwrap(), Rgb8::GRAY);
        assert_eq!(Rgb8::RED.to_hex(), "#ff0000");
        assert!(Rgb8::from_hex("#fff").is_err());
        assert!(Rgb8::from_hex("#gg0000").is_err());
    }

    #[test]
    fn color_lerp_hits_endpoints_and_midpoint() {
        assert_eq!(Rgb8::lerp(&Rgb8::WHITE, &Rgb8::RED, 0.0), Rgb8::WHITE);
        assert_eq!(Rgb8::lerp(&Rgb8::WHITE, &Rgb8::RED, 1.0), Rgb8::RED);
        assert_eq!(
            Rgb8::lerp(&Rgb8::new(0, 0, 0), &Rgb8::new(200, 100, 50), 0.5),
            Rgb8::new(100, 50, 25)
        );
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(1000.0), 1000.0);
    }

    #[test]
    fn area_codes_are_zero_padded() {
        assert_eq!(area_code_to_municipality_code(14), "GM0014");
        assert_eq!(area_code_to_municipality_code(1680), "GM1680");
    }

    #[test]
    fn colors_serialize_as_hex_strings() {
        let json = serde_json::to_string(&Rgb8::ORANGE).unwrap();
        assert_eq!(json, "\"#ffa500\"");
        let back: Rgb8 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgb8::ORANGE);
    }
}
