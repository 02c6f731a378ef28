//! `palettes` subcommand — list the built-in catalog.

use super::{palette, Config, PaletteSummaryJson, PalettesOutput, Result};

/// Catalog entries are sampled at the configured ring size so the
/// swatch matches what `apply` would send to LED 0.
pub(super) fn cmd_palettes(json: bool) -> Result<()> {
    let config = Config::load();
    let catalog = palette::builtin_palettes(config.led_count);

    if json {
        let output = PalettesOutput {
            count: catalog.len(),
            palettes: catalog
                .iter()
                .map(|p| PaletteSummaryJson {
                    name: p.name.to_string(),
                    icon: p.icon.to_string(),
                    swatch: p.colors.first().map(|c| c.hex()).unwrap_or_default(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
        return Ok(());
    }

    println!("Built-in palettes ({}):", catalog.len());
    println!();
    let name_w = catalog.iter().map(|p| p.name.len()).max().unwrap_or(0) + 2;
    for p in &catalog {
        let swatch = p.colors.first().map(|c| c.hex()).unwrap_or_default();
        println!("  {} {:<name_w$}{swatch}", p.icon, p.name);
    }
    Ok(())
}
