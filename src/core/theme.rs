use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ParseHslError {
    #[error("expected 3 components (hue saturation lightness), got {0}")]
    ComponentCount(usize),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("{component} out of range: {value}")]
    OutOfRange { component: &'static str, value: f64 },
}

/// An HSL color. Saturation and lightness are percentages, alpha is 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub alpha: f64,
}

impl Hsl {
    pub const fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Opaque sRGB channels, ignoring alpha.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let s = self.saturation / 100.0;
        let l = self.lightness / 100.0;
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = self.hue.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (channel(r), channel(g), channel(b))
    }

    /// Composite this color over an opaque background.
    pub fn blend_over(&self, background: &Hsl) -> (u8, u8, u8) {
        let (fr, fg, fb) = self.to_rgb();
        let (br, bg, bb) = background.to_rgb();
        let mix = |f: u8, b: u8| {
            (f as f64 * self.alpha + b as f64 * (1.0 - self.alpha))
                .round()
                .clamp(0.0, 255.0) as u8
        };
        (mix(fr, br), mix(fg, bg), mix(fb, bb))
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({} {}% {}%",
            self.hue, self.saturation, self.lightness
        )?;
        if self.alpha < 1.0 {
            write!(f, " / {}", self.alpha)?;
        }
        write!(f, ")")
    }
}

/// Accepts the bare token form ("222.2 47.4% 11.2%") as well as
/// "hsl(222.2, 47.4%, 11.2%)" and an optional "/ alpha" suffix.
impl FromStr for Hsl {
    type Err = ParseHslError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix("hsl(")
            .or_else(|| trimmed.strip_prefix("hsla("))
            .map(|inner| inner.strip_suffix(')').unwrap_or(inner))
            .unwrap_or(trimmed);

        let (channels, alpha) = match body.split_once('/') {
            Some((channels, alpha)) => (channels, Some(alpha.trim())),
            None => (body, None),
        };

        let parts: Vec<&str> = channels
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() != 3 {
            return Err(ParseHslError::ComponentCount(parts.len()));
        }

        let hue = parse_component(parts[0].trim_end_matches("deg"))?;
        let saturation = parse_component(parts[1].trim_end_matches('%'))?;
        let lightness = parse_component(parts[2].trim_end_matches('%'))?;
        let alpha = match alpha {
            Some(a) if a.ends_with('%') => parse_component(a.trim_end_matches('%'))? / 100.0,
            Some(a) => parse_component(a)?,
            None => 1.0,
        };

        check_range("saturation", saturation, 100.0)?;
        check_range("lightness", lightness, 100.0)?;
        check_range("alpha", alpha, 1.0)?;

        Ok(Self {
            hue,
            saturation,
            lightness,
            alpha,
        })
    }
}

fn parse_component(raw: &str) -> Result<f64, ParseHslError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseHslError::InvalidNumber(raw.to_string()))
}

fn check_range(component: &'static str, value: f64, max: f64) -> Result<(), ParseHslError> {
    if (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(ParseHslError::OutOfRange { component, value })
    }
}

impl Serialize for Hsl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hsl {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Named color tokens the charts draw with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub primary: Hsl,
    pub destructive: Hsl,
    pub card: Hsl,
    pub border: Hsl,
    pub muted: Hsl,
    pub foreground: Hsl,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Hsl::new(222.2, 47.4, 11.2),
            destructive: Hsl::new(0.0, 84.2, 60.2),
            card: Hsl::new(0.0, 0.0, 100.0),
            border: Hsl::new(214.3, 31.8, 91.4),
            muted: Hsl::new(210.0, 40.0, 96.1),
            foreground: Hsl::new(222.2, 84.0, 4.9),
        }
    }
}
