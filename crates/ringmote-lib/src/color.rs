//! Color conversion, parsing, and formatting.
//!
//! [`hsv_to_rgb`] is the conversion the palette generators are built on;
//! [`parse_color`] / [`format_color`] handle the `#RRGGBB`-or-name form
//! used on the CLI surface.

use crate::error::{Result, RingmoteError};

/// Convert HSV to 8-bit RGB.
///
/// `hue` in degrees `[0, 360)`, `saturation` and `value` in `[0, 1]`.
/// Callers are responsible for normalizing `hue` into range first.
///
/// Standard sector decomposition: chroma `c = v*s`, secondary component
/// `x = c * (1 - |((h/60) mod 2) - 1|)`, match value `m = v - c`, then
/// one of six 60°-wide sectors selects the pre-offset triple.
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> (u8, u8, u8) {
    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r, g, b) = if hue < 60.0 {
        (c, x, 0.0)
    } else if hue < 120.0 {
        (x, c, 0.0)
    } else if hue < 180.0 {
        (0.0, c, x)
    } else if hue < 240.0 {
        (0.0, x, c)
    } else if hue < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (
        scale_channel(r + m),
        scale_channel(g + m),
        scale_channel(b + m),
    )
}

/// Scale a `[0, 1]` component to `[0, 255]`, rounding to nearest.
fn scale_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Parse a color string into an RGB triple.
///
/// Accepts:
/// - Hex: `"#FF0000"`, `"FF0000"`, `"#ff0000"`
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"orange"`, `"yellow"`, `"purple"`, `"cyan"`, `"magenta"`, `"off"`/`"black"`
pub fn parse_color(s: &str) -> Result<(u8, u8, u8)> {
    let s = s.trim();

    // Named colors
    match s.to_lowercase().as_str() {
        "red" => return Ok((255, 0, 0)),
        "green" => return Ok((0, 255, 0)),
        "blue" => return Ok((0, 0, 255)),
        "white" => return Ok((255, 255, 255)),
        "orange" => return Ok((255, 128, 0)),
        "yellow" => return Ok((255, 255, 0)),
        "purple" => return Ok((128, 0, 255)),
        "cyan" => return Ok((0, 255, 255)),
        "magenta" => return Ok((255, 0, 255)),
        "off" | "black" => return Ok((0, 0, 0)),
        _ => {}
    }

    // Hex color
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return Err(RingmoteError::Config(format!(
            "Invalid color: {s} (use #RRGGBB or a color name)"
        )));
    }
    let val = u32::from_str_radix(hex, 16)
        .map_err(|_| RingmoteError::Config(format!("Invalid hex color: {s}")))?;
    Ok(((val >> 16) as u8, (val >> 8) as u8, val as u8))
}

/// Format an RGB triple as `#RRGGBB`.
pub fn format_color(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02X}{g:02X}{b:02X}")
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── hsv_to_rgb ──

    #[test]
    fn pure_hues_at_sector_starts() {
        // The six primary/secondary pure colors.
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (255, 0, 0));
        assert_eq!(hsv_to_rgb(60.0, 1.0, 1.0), (255, 255, 0));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), (0, 255, 0));
        assert_eq!(hsv_to_rgb(180.0, 1.0, 1.0), (0, 255, 255));
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), (0, 0, 255));
        assert_eq!(hsv_to_rgb(300.0, 1.0, 1.0), (255, 0, 255));
    }

    #[test]
    fn zero_value_is_black() {
        assert_eq!(hsv_to_rgb(123.0, 1.0, 0.0), (0, 0, 0));
    }

    #[test]
    fn zero_saturation_is_gray() {
        assert_eq!(hsv_to_rgb(200.0, 0.0, 1.0), (255, 255, 255));
        let (r, g, b) = hsv_to_rgb(200.0, 0.0, 0.5);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn max_channel_tracks_value() {
        // The brightest channel of the result equals v (within rounding).
        for h in (0..360).step_by(7) {
            for s in 0..=10 {
                for v in 0..=10 {
                    let vf = f64::from(v) / 10.0;
                    let (r, g, b) = hsv_to_rgb(f64::from(h), f64::from(s) / 10.0, vf);
                    let max = f64::from(r.max(g).max(b));
                    assert!((max - vf * 255.0).abs() <= 1.0, "h={h} s={s} v={v}");
                }
            }
        }
    }

    #[test]
    fn mid_sector_secondary_component() {
        // h=30 → halfway through the red-yellow sector: (255, 128, 0).
        assert_eq!(hsv_to_rgb(30.0, 1.0, 1.0), (255, 128, 0));
    }

    // ── parse_color ──

    #[test]
    fn parse_named_colors() {
        assert_eq!(parse_color("red").unwrap(), (255, 0, 0));
        assert_eq!(parse_color("green").unwrap(), (0, 255, 0));
        assert_eq!(parse_color("blue").unwrap(), (0, 0, 255));
        assert_eq!(parse_color("off").unwrap(), (0, 0, 0));
        assert_eq!(parse_color("black").unwrap(), (0, 0, 0));
    }

    #[test]
    fn parse_named_case_insensitive() {
        assert_eq!(parse_color("RED").unwrap(), (255, 0, 0));
        assert_eq!(parse_color("  Cyan  ").unwrap(), (0, 255, 255));
    }

    #[test]
    fn parse_hex_with_and_without_hash() {
        assert_eq!(parse_color("#FF8000").unwrap(), (255, 128, 0));
        assert_eq!(parse_color("abcdef").unwrap(), (0xAB, 0xCD, 0xEF));
    }

    #[test]
    fn parse_invalid_inputs() {
        assert!(parse_color("#FFF").is_err());
        assert!(parse_color("#FF000000").is_err());
        assert!(parse_color("chartreuse").is_err());
        assert!(parse_color("#GGHHII").is_err());
    }

    // ── format_color ──

    #[test]
    fn format_basic() {
        assert_eq!(format_color(255, 0, 0), "#FF0000");
        assert_eq!(format_color(0, 0, 0), "#000000");
        assert_eq!(format_color(0xAB, 0x12, 0xCD), "#AB12CD");
    }

    #[test]
    fn parse_format_roundtrip() {
        for name in &["red", "green", "blue", "white", "orange", "yellow"] {
            let (r, g, b) = parse_color(name).unwrap();
            let hex = format_color(r, g, b);
            assert_eq!(parse_color(&hex).unwrap(), (r, g, b), "round-trip failed for {name}");
        }
    }
}
