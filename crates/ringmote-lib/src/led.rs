//! LED state value type.

use serde::{Deserialize, Serialize};

/// Color and brightness of a single LED.
///
/// `red`/`green`/`blue` are channel intensities; `brightness` is the
/// device-side dimming factor, independent of the RGB magnitude. States
/// are replaced wholesale, never field-mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedState {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub brightness: u8,
}

impl LedState {
    /// All channels off, zero brightness.
    pub const OFF: LedState = LedState::new(0, 0, 0, 0);

    pub const fn new(red: u8, green: u8, blue: u8, brightness: u8) -> Self {
        LedState {
            red,
            green,
            blue,
            brightness,
        }
    }

    /// The RGB portion as a `#RRGGBB` hex string.
    pub fn hex(&self) -> String {
        crate::color::format_color(self.red, self.green, self.blue)
    }
}

/// Uniform warm orange shown on every LED at controller startup.
impl Default for LedState {
    fn default() -> Self {
        LedState::new(255, 100, 50, 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_is_all_zero() {
        assert_eq!(LedState::OFF, LedState::new(0, 0, 0, 0));
    }

    #[test]
    fn default_startup_color() {
        let s = LedState::default();
        assert_eq!((s.red, s.green, s.blue, s.brightness), (255, 100, 50, 200));
    }

    #[test]
    fn hex_formats_rgb_only() {
        let s = LedState::new(0xAB, 0x12, 0xCD, 77);
        assert_eq!(s.hex(), "#AB12CD");
    }
}
