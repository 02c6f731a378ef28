//! `layout` subcommand — ring coordinates per LED index.

use super::{layout, Config, LayoutOutput, Result};

pub(super) fn cmd_layout(count: Option<usize>, radius: f64, json: bool) -> Result<()> {
    let config = Config::load();
    let led_count = count.unwrap_or(config.led_count);
    let points = layout::ring_positions(led_count, radius, 0.0, 0.0);

    if json {
        let output = LayoutOutput {
            led_count,
            radius,
            points,
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
        return Ok(());
    }

    println!("Ring layout ({led_count} LEDs, radius {radius}, index 0 at 12 o'clock):");
    println!();
    for (i, p) in points.iter().enumerate() {
        println!("  [{i:>2}] x {:>8.3}  y {:>8.3}", p.x, p.y);
    }
    Ok(())
}
