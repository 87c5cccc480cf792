// ABOUTME: Hex color parsing and HSL conversion for CSS custom properties
// ABOUTME: Accepts #rgb and #rrggbb, produces integer HSL triples and "h s% l%" strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::fmt;
use thiserror::Error;

/// Color parsing failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Not 3 or 6 hex digits after the optional `#`
    #[error("expected 3 or 6 hex digits, got '{0}'")]
    InvalidLength(String),
    /// Contains a non-hex character
    #[error("invalid hex digit in '{0}'")]
    InvalidDigit(String),
}

/// Hue in degrees `[0, 360)`, saturation and lightness in percent `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    /// Hue in degrees
    pub h: u16,
    /// Saturation percentage
    pub s: u8,
    /// Lightness percentage
    pub l: u8,
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}% {}%", self.h, self.s, self.l)
    }
}

/// Normalize a hex color to six lowercase digits without `#`
///
/// # Errors
///
/// Returns [`ColorError`] for anything but 3 or 6 hex digits
pub fn normalize_hex(hex: &str) -> Result<String, ColorError> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidDigit(hex.to_owned()));
    }
    match digits.len() {
        6 => Ok(digits.to_ascii_lowercase()),
        3 => Ok(digits
            .chars()
            .flat_map(|c| [c, c])
            .collect::<String>()
            .to_ascii_lowercase()),
        _ => Err(ColorError::InvalidLength(hex.to_owned())),
    }
}

/// Whether `hex` parses as a color
#[must_use]
pub fn is_valid_hex(hex: &str) -> bool {
    normalize_hex(hex).is_ok()
}

fn channels(hex: &str) -> Result<[f64; 3], ColorError> {
    let digits = normalize_hex(hex)?;
    let mut out = [0.0; 3];
    for (i, slot) in out.iter_mut().enumerate() {
        let byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map_err(|_| ColorError::InvalidDigit(hex.to_owned()))?;
        *slot = f64::from(byte) / 255.0;
    }
    Ok(out)
}

/// Convert a hex color to HSL
///
/// # Errors
///
/// Returns [`ColorError`] when `hex` is not a 3 or 6 digit hex color
pub fn hex_to_hsl(hex: &str) -> Result<Hsl, ColorError> {
    let [r, g, b] = channels(hex)?;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if (max - min).abs() < f64::EPSILON {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if (max - r).abs() < f64::EPSILON {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if (max - g).abs() < f64::EPSILON {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s)
    };

    Ok(Hsl {
        h: ((h * 360.0).round() as u16) % 360,
        s: (s * 100.0).round() as u8,
        l: (l * 100.0).round() as u8,
    })
}

/// Render HSL the way CSS variables expect it: `"h s% l%"`
#[must_use]
pub fn hsl_to_css(hsl: Hsl) -> String {
    hsl.to_string()
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        (q - p).mul_add(6.0 * t, p)
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        (q - p).mul_add((2.0 / 3.0 - t) * 6.0, p)
    } else {
        p
    }
}

/// Convert HSL back to a `#rrggbb` color
#[must_use]
pub fn hsl_to_hex(hsl: Hsl) -> String {
    let h = f64::from(hsl.h) / 360.0;
    let s = f64::from(hsl.s.min(100)) / 100.0;
    let l = f64::from(hsl.l.min(100)) / 100.0;

    let (r, g, b) = if hsl.s == 0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 {
            l * (1.0 + s)
        } else {
            l.mul_add(-s, l + s)
        };
        let p = 2.0f64.mul_add(l, -q);
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    let byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", byte(r), byte(g), byte(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hue_distance(a: u16, b: u16) -> u16 {
        let d = a.abs_diff(b);
        d.min(360 - d)
    }

    #[test]
    fn test_primary_colors() {
        assert_eq!(hex_to_hsl("#ff0000").unwrap(), Hsl { h: 0, s: 100, l: 50 });
        assert_eq!(hex_to_hsl("00ff00").unwrap(), Hsl { h: 120, s: 100, l: 50 });
        assert_eq!(hex_to_hsl("#0000FF").unwrap(), Hsl { h: 240, s: 100, l: 50 });
    }

    #[test]
    fn test_grays_have_no_saturation() {
        assert_eq!(hex_to_hsl("#ffffff").unwrap(), Hsl { h: 0, s: 0, l: 100 });
        assert_eq!(hex_to_hsl("#000").unwrap(), Hsl { h: 0, s: 0, l: 0 });
        assert_eq!(hex_to_hsl("#808080").unwrap().s, 0);
    }

    #[test]
    fn test_short_hex_is_expanded() {
        assert_eq!(normalize_hex("#ABC").unwrap(), "aabbcc");
        assert_eq!(hex_to_hsl("#f00").unwrap(), hex_to_hsl("#ff0000").unwrap());
    }

    #[test]
    fn test_invalid_colors() {
        assert!(matches!(
            hex_to_hsl("#12345"),
            Err(ColorError::InvalidLength(_))
        ));
        assert!(matches!(hex_to_hsl("#zzzzzz"), Err(ColorError::InvalidDigit(_))));
        assert!(!is_valid_hex("blue"));
    }

    #[test]
    fn test_css_format() {
        assert_eq!(hsl_to_css(hex_to_hsl("#3b82f6").unwrap()), "217 91% 60%");
    }

    #[test]
    fn test_round_trip_within_one_unit() {
        for hex in [
            "#3b82f6", "#ff0000", "#808080", "#10b981", "#f59e0b", "#8b5cf6", "#1f2937",
            "#ec4899", "#fafafa", "#0f766e",
        ] {
            let first = hex_to_hsl(hex).unwrap();
            let second = hex_to_hsl(&hsl_to_hex(first)).unwrap();
            assert!(hue_distance(first.h, second.h) <= 1, "{hex}: {first} vs {second}");
            assert!(first.s.abs_diff(second.s) <= 1, "{hex}: {first} vs {second}");
            assert!(first.l.abs_diff(second.l) <= 1, "{hex}: {first} vs {second}");
        }
    }
}
