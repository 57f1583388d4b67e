use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }
}

pub const COOL: Rgb = Rgb::new(69, 133, 136);
pub const HOT: Rgb = Rgb::new(255, 0, 0);

/// Linear interpolation between an idle (`cool`) and saturated (`hot`) color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeatGradient {
    pub cool: Rgb,
    pub hot: Rgb,
}

impl Default for HeatGradient {
    fn default() -> Self {
        Self {
            cool: COOL,
            hot: HOT,
        }
    }
}

impl HeatGradient {
    /// Endpoints from `#rrggbb` strings; an unparsable one keeps its default.
    pub fn from_hex(cool: &str, hot: &str) -> Self {
        Self {
            cool: Rgb::from_hex(cool).unwrap_or(COOL),
            hot: Rgb::from_hex(hot).unwrap_or(HOT),
        }
    }

    pub fn color_for(&self, usage_percent: f64) -> Rgb {
        // f64::max drops NaN, so a NaN usage lands on the cool end.
        let ratio = (usage_percent / 100.0).max(0.0).min(1.0);
        Rgb {
            r: mix(self.cool.r, self.hot.r, ratio),
            g: mix(self.cool.g, self.hot.g, ratio),
            b: mix(self.cool.b, self.hot.b, ratio),
        }
    }
}

fn mix(cool: u8, hot: u8, ratio: f64) -> u8 {
    (cool as f64 * (1.0 - ratio) + hot as f64 * ratio).round() as u8
}
