//! `show` subcommand — dump a palette's generated LED states.

use super::{resolve_palette, Config, PaletteOutput, Result};

pub(super) fn cmd_show(name: &str, json: bool) -> Result<()> {
    let config = Config::load();
    let palette = resolve_palette(name, config.led_count)?;

    if json {
        let output = PaletteOutput {
            name: palette.name.to_string(),
            icon: palette.icon.to_string(),
            led_count: palette.len(),
            leds: palette.colors.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
        return Ok(());
    }

    println!("{} {} ({} LEDs):", palette.icon, palette.name, palette.len());
    println!();
    for (i, led) in palette.colors.iter().enumerate() {
        println!(
            "  [{i:>2}] {}  rgb({:>3},{:>3},{:>3})  brightness {}",
            led.hex(),
            led.red,
            led.green,
            led.blue,
            led.brightness
        );
    }
    Ok(())
}
