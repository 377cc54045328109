use std::fmt;

use serde::{Deserialize, Serialize};

/// Clamp a normalized value into `[0, 1]`.
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Color in HSV space plus alpha.
///
/// Ranges: `h` in `[0, 360]`, `s` and `v` in `[0, 100]`, `a` in `[0, 1]`.
/// `h = 0` and `h = 360` convert to the same RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsva {
    pub h: f32,
    pub s: f32,
    pub v: f32,
    pub a: f32,
}

impl Hsva {
    pub const fn new(h: f32, s: f32, v: f32, a: f32) -> Self {
        Self { h, s, v, a }
    }

    /// All four channels clamped into their legal ranges.
    pub fn clamped(self) -> Self {
        Self {
            h: self.h.clamp(0.0, 360.0),
            s: self.s.clamp(0.0, 100.0),
            v: self.v.clamp(0.0, 100.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    pub fn to_rgba(self) -> Rgba {
        let c = self.clamped();
        let (r, g, b) = hsv_to_rgb(c.h, c.s / 100.0, c.v / 100.0);
        Rgba::new(channel(r), channel(g), channel(b), c.a)
    }
}

impl Default for Hsva {
    /// Opaque red.
    fn default() -> Self {
        Self::new(0.0, 100.0, 100.0, 1.0)
    }
}

/// Color in RGB space plus alpha. Channels are `0..=255`, alpha `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn to_hsva(self) -> Hsva {
        let (h, s, v) = rgb_to_hsv(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        );
        Hsva::new(h, s * 100.0, v * 100.0, self.a.clamp(0.0, 1.0))
    }

    /// `rrggbb` hex, two digits per channel. Case is left to display layers.
    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rrggbbaa` hex including the alpha channel.
    pub fn to_hex8(self) -> String {
        format!("{}{:02x}", self.to_hex(), channel(self.a))
    }

    /// Linear channel-wise interpolation towards `other`, alpha included.
    ///
    /// `amount` is a percentage: 0 returns `self`, 100 returns `other`.
    pub fn mix(self, other: Self, amount: f32) -> Self {
        let p = amount.clamp(0.0, 100.0) / 100.0;
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * p).round() as u8;
        Self {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: self.a + (other.a - self.a) * p,
        }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const fn opaque(self) -> Self {
        self.with_alpha(1.0)
    }

    /// Channels as normalized floats, in RGBA order.
    pub fn to_f32_array(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a.clamp(0.0, 1.0),
        ]
    }
}

impl Default for Rgba {
    /// Opaque red.
    fn default() -> Self {
        Self::RED
    }
}

impl From<Hsva> for Rgba {
    fn from(hsva: Hsva) -> Self {
        hsva.to_rgba()
    }
}

impl From<Rgba> for Hsva {
    fn from(rgba: Rgba) -> Self {
        rgba.to_hsva()
    }
}

impl fmt::Display for Rgba {
    /// The `rgba(r, g, b, a)` string form used in gradient strings.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            format_number(self.a)
        )
    }
}

/// Normalized float channel to a `0..=255` byte.
fn channel(x: f32) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

/// `h` in degrees, `s`/`v` normalized. Returns normalized RGB.
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h_prime < 1.0 {
        (c, x, 0.0)
    } else if h_prime < 2.0 {
        (x, c, 0.0)
    } else if h_prime < 3.0 {
        (0.0, c, x)
    } else if h_prime < 4.0 {
        (0.0, x, c)
    } else if h_prime < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

/// Normalized RGB in, `(h degrees, s, v)` out with `s`/`v` normalized.
fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    let h = if h < 0.0 { h + 360.0 } else { h };
    let s = if max == 0.0 { 0.0 } else { delta / max };

    (h, s, max)
}

/// Format a number the way CSS color strings do: no trailing zeros,
/// at most two decimals (`1`, `0.5`, `33.33`).
pub(crate) fn format_number(x: f32) -> String {
    let rounded = (x * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{rounded:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries_convert_exactly() {
        assert_eq!(Hsva::new(0.0, 100.0, 100.0, 1.0).to_rgba(), Rgba::RED);
        assert_eq!(
            Hsva::new(120.0, 100.0, 100.0, 1.0).to_rgba(),
            Rgba::rgb(0, 255, 0)
        );
        assert_eq!(
            Hsva::new(240.0, 100.0, 100.0, 1.0).to_rgba(),
            Rgba::rgb(0, 0, 255)
        );
        assert_eq!(Hsva::new(0.0, 0.0, 100.0, 1.0).to_rgba(), Rgba::WHITE);
        assert_eq!(Hsva::new(0.0, 0.0, 0.0, 1.0).to_rgba(), Rgba::BLACK);
    }

    #[test]
    fn hue_wraps_at_360() {
        let at_zero = Hsva::new(0.0, 100.0, 100.0, 1.0).to_rgba();
        let at_full = Hsva::new(360.0, 100.0, 100.0, 1.0).to_rgba();
        assert_eq!(at_zero, at_full);
    }

    #[test]
    fn round_trip_within_tolerance() {
        for h in (0..360).step_by(30) {
            for s in [40.0_f32, 70.0, 100.0] {
                for v in [40.0_f32, 70.0, 100.0] {
                    let input = Hsva::new(h as f32, s, v, 1.0);
                    let back = input.to_rgba().to_hsva();
                    assert!(
                        (back.h - input.h).abs() < 2.5,
                        "hue drifted: {input:?} -> {back:?}"
                    );
                    assert!((back.s - input.s).abs() < 1.5, "{input:?} -> {back:?}");
                    assert!((back.v - input.v).abs() < 1.0, "{input:?} -> {back:?}");
                }
            }
        }
    }

    #[test]
    fn degenerate_points_keep_sv_not_hue() {
        // Hue is undefined at s = 0 and v = 0; only assert the other axes.
        let gray = Hsva::new(210.0, 0.0, 50.0, 1.0).to_rgba().to_hsva();
        assert!(gray.s < 1.0);
        assert!((gray.v - 50.0).abs() < 1.0);

        let black = Hsva::new(123.0, 80.0, 0.0, 1.0).to_rgba().to_hsva();
        assert!(black.v < 1.0);
    }

    #[test]
    fn clamping_is_idempotent() {
        let wild = Hsva::new(400.0, 150.0, -20.0, 2.0);
        let once = wild.clamped();
        assert_eq!(once, once.clamped());
        assert_eq!(once, Hsva::new(360.0, 100.0, 0.0, 1.0));
        assert_eq!(clamp01(1.7), clamp01(clamp01(1.7)));
    }

    #[test]
    fn mix_interpolates_channelwise() {
        let a = Rgba::new(255, 0, 0, 1.0);
        let b = Rgba::new(255, 0, 0, 0.0);
        let mid = a.mix(b, 50.0);
        assert_eq!((mid.r, mid.g, mid.b), (255, 0, 0));
        assert!((mid.a - 0.5).abs() < 1e-6);

        let black_to_white = Rgba::BLACK.mix(Rgba::WHITE, 50.0);
        assert_eq!(black_to_white, Rgba::new(128, 128, 128, 1.0));

        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(Rgba::BLACK.mix(Rgba::WHITE, 100.0), Rgba::WHITE);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(Rgba::RED.to_hex(), "ff0000");
        assert_eq!(Rgba::new(70, 155, 233, 0.5).to_hex(), "469be9");
        assert_eq!(Rgba::new(255, 0, 0, 0.0).to_hex8(), "ff000000");
        assert_eq!(Rgba::RED.to_hex8(), "ff0000ff");
    }

    #[test]
    fn display_is_rgba_string() {
        assert_eq!(Rgba::RED.to_string(), "rgba(255, 0, 0, 1)");
        assert_eq!(
            Rgba::new(255, 0, 0, 0.5).to_string(),
            "rgba(255, 0, 0, 0.5)"
        );
        assert_eq!(
            Rgba::new(0, 0, 0, 0.333).to_string(),
            "rgba(0, 0, 0, 0.33)"
        );
    }

    #[test]
    fn number_formatting_trims() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(50.0), "50");
        assert_eq!(format_number(0.0), "0");
    }
}
