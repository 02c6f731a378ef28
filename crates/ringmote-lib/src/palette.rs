//! Built-in palettes — named, precomputed LED sequences for the whole ring.
//!
//! Each palette is a pure function `(index, led_count) -> LedState`
//! materialized over the ring once. The catalog is a fixed, ordered
//! registry; adding a palette means adding one [`PaletteSpec`] row.
//!
//! The wave palettes (Ocean Wave, Fire, Aurora, Sunset) feed a per-index
//! phase angle through sinusoids and then clamp each channel to a
//! palette-specific sub-range. The clamp bounds and the
//! truncate-then-clamp arithmetic are part of each palette's identity
//! and reproduce the device's established look exactly.

use serde::Serialize;

use crate::color::hsv_to_rgb;
use crate::led::LedState;

/// A named, ordered sequence of LED states covering the whole ring.
#[derive(Debug, Clone, Serialize)]
pub struct Palette {
    pub name: &'static str,
    /// Display glyph shown next to the name in pickers.
    pub icon: &'static str,
    pub colors: Vec<LedState>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// One registry row: a palette name, icon, and its generator function.
struct PaletteSpec {
    name: &'static str,
    icon: &'static str,
    generator: fn(usize, usize) -> LedState,
}

/// The fixed catalog, in presentation order.
const BUILTIN: &[PaletteSpec] = &[
    PaletteSpec {
        name: "Rainbow",
        icon: "\u{1F308}",
        generator: rainbow,
    },
    PaletteSpec {
        name: "Ocean Wave",
        icon: "\u{1F30A}",
        generator: ocean_wave,
    },
    PaletteSpec {
        name: "Fire",
        icon: "\u{1F525}",
        generator: fire,
    },
    PaletteSpec {
        name: "Aurora",
        icon: "\u{2728}",
        generator: aurora,
    },
    PaletteSpec {
        name: "Sunset",
        icon: "\u{1F305}",
        generator: sunset,
    },
    PaletteSpec {
        name: "Christmas",
        icon: "\u{1F384}",
        generator: christmas,
    },
    PaletteSpec {
        name: "Party",
        icon: "\u{1F389}",
        generator: party,
    },
    PaletteSpec {
        name: "Cool White",
        icon: "\u{2744}\u{FE0F}",
        generator: |_, _| LedState::new(255, 255, 255, 180),
    },
    PaletteSpec {
        name: "Warm White",
        icon: "\u{1F4A1}",
        generator: |_, _| LedState::new(255, 200, 150, 180),
    },
    PaletteSpec {
        name: "All Off",
        icon: "\u{26AB}",
        generator: |_, _| LedState::OFF,
    },
];

/// Materialize the full built-in catalog for a ring of `led_count` LEDs.
pub fn builtin_palettes(led_count: usize) -> Vec<Palette> {
    BUILTIN
        .iter()
        .map(|spec| materialize(spec, led_count))
        .collect()
}

/// Look up a built-in palette by name (case-insensitive).
pub fn find_palette(name: &str, led_count: usize) -> Option<Palette> {
    BUILTIN
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name.trim()))
        .map(|spec| materialize(spec, led_count))
}

/// Names of all built-in palettes, in catalog order.
pub fn palette_names() -> Vec<&'static str> {
    BUILTIN.iter().map(|spec| spec.name).collect()
}

fn materialize(spec: &PaletteSpec, led_count: usize) -> Palette {
    Palette {
        name: spec.name,
        icon: spec.icon,
        colors: (0..led_count).map(|i| (spec.generator)(i, led_count)).collect(),
    }
}

/// Phase step in degrees between adjacent LEDs.
fn step(count: usize) -> f64 {
    360.0 / count as f64
}

/// Truncate toward zero, then clamp to the palette's channel sub-range.
fn wave(v: f64, lo: u8, hi: u8) -> u8 {
    (v as i64).clamp(i64::from(lo), i64::from(hi)) as u8
}

fn rainbow(i: usize, count: usize) -> LedState {
    let hue = (i as f64 * step(count)) % 360.0;
    let (r, g, b) = hsv_to_rgb(hue, 1.0, 1.0);
    LedState::new(r, g, b, 200)
}

fn ocean_wave(i: usize, count: usize) -> LedState {
    let phase = (i as f64 * step(count)) % 360.0;
    let blue = 200.0 + 55.0 * phase.to_radians().sin();
    let green = 100.0 + 100.0 * (phase + 60.0).to_radians().sin();
    LedState::new(0, wave(green, 0, 255), wave(blue, 0, 255), 180)
}

fn fire(i: usize, count: usize) -> LedState {
    let phase = (i as f64 * step(count)) % 360.0;
    let green = 80.0 + 80.0 * phase.to_radians().sin();
    LedState::new(255, wave(green, 0, 160), 0, 220)
}

fn aurora(i: usize, count: usize) -> LedState {
    let phase = i as f64 * step(count);
    let green = 150.0 + 105.0 * phase.to_radians().sin();
    let blue = 100.0 + 155.0 * phase.to_radians().cos();
    let red = 50.0 + 50.0 * (phase * 2.0).to_radians().sin();
    LedState::new(
        wave(red, 0, 255),
        wave(green, 0, 255),
        wave(blue, 0, 255),
        200,
    )
}

fn sunset(i: usize, count: usize) -> LedState {
    let phase = i as f64 * step(count);
    let green = 100.0 + 80.0 * phase.to_radians().sin();
    let blue = 50.0 + 100.0 * (phase + 90.0).to_radians().cos();
    LedState::new(255, wave(green, 50, 180), wave(blue, 0, 150), 200)
}

fn christmas(i: usize, _count: usize) -> LedState {
    if i % 2 == 0 {
        LedState::new(255, 0, 0, 200)
    } else {
        LedState::new(0, 255, 0, 200)
    }
}

fn party(i: usize, _count: usize) -> LedState {
    match i % 4 {
        0 => LedState::new(255, 0, 255, 220),   // Magenta
        1 => LedState::new(0, 255, 255, 220),   // Cyan
        2 => LedState::new(255, 255, 0, 220),   // Yellow
        _ => LedState::new(255, 100, 0, 220),   // Orange
    }
}
