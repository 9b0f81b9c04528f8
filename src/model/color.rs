//! Color values for series fill/stroke and derived ramps

use std::fmt;

use rand::Rng;

/// Alpha applied to series fill colors (stroke stays opaque)
pub(crate) const FILL_ALPHA: f64 = 0.7;

/// d3's brighten/darken step
const DARKER_STEP: f64 = 0.7;

/// RGB color with an alpha channel in `0.0..=1.0`
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rgba {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: f64,
}

impl Rgba {
    pub(crate) const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse `#RGB` or `#RRGGBB` (case-insensitive)
    pub(crate) fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let expand = |i: usize| {
                    let c = &digits[i..i + 1];
                    channel(&format!("{c}{c}"))
                };
                Some(Self::opaque(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Some(Self::opaque(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// Parse hex, `rgb(r,g,b)` or `rgba(r,g,b,a)`
    pub(crate) fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.starts_with('#') {
            return Self::from_hex(text);
        }
        let inner = text
            .strip_prefix("rgba(")
            .or_else(|| text.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() < 3 {
            return None;
        }
        let channel = |s: &str| s.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
        let a = match parts.get(3) {
            Some(s) => s.parse::<f64>().ok()?.clamp(0.0, 1.0),
            None => 1.0,
        };
        Some(Self {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
            a,
        })
    }

    /// Uppercase `#RRGGBB`, alpha dropped
    pub(crate) fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub(crate) fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    fn scale(self, k: f64) -> Self {
        let ch = |v: u8| (v as f64 * k).round().clamp(0.0, 255.0) as u8;
        Self {
            r: ch(self.r),
            g: ch(self.g),
            b: ch(self.b),
            a: self.a,
        }
    }

    /// Brighten by `k` steps, matching d3's `color.brighter(k)`
    pub(crate) fn brighter(self, k: f64) -> Self {
        self.scale((1.0 / DARKER_STEP).powf(k))
    }

    /// Darken by `k` steps, matching d3's `color.darker(k)`
    pub(crate) fn darker(self, k: f64) -> Self {
        self.scale(DARKER_STEP.powf(k))
    }

    /// Linear RGB interpolation; `t` is clamped to `0.0..=1.0`
    pub(crate) fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Fill/stroke pair derived from one picked hue
pub(crate) fn fill_and_stroke(base: Rgba) -> (Rgba, Rgba) {
    (base.with_alpha(FILL_ALPHA), base.with_alpha(1.0))
}

pub(crate) fn random_color(rng: &mut impl Rng) -> Rgba {
    let n: u32 = rng.random_range(0..0x00FF_FFFF);
    Rgba::opaque((n >> 16) as u8, (n >> 8) as u8, n as u8)
}

/// Per-segment colors for single-series pie charts, bright to dark
pub(crate) fn segment_ramp(base: Rgba, count: usize) -> Vec<Rgba> {
    let start = base.brighter(1.2).with_alpha(1.0);
    let end = base.darker(0.5).with_alpha(1.0);
    (0..count)
        .map(|i| {
            let t = if count <= 1 {
                0.5
            } else {
                i as f64 / (count - 1) as f64
            };
            start.lerp(end, t)
        })
        .collect()
}
