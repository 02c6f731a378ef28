//! CLI subcommands — palette inspection, ring layout, LED publishing.

mod apply;
mod config_cmd;
mod layout_cmd;
mod palettes;
mod set;
mod show;

use clap::Subcommand;
use serde::Serialize;

pub(super) use ringmote_lib::channel::{Completion, PublishChannel};
pub(super) use ringmote_lib::color;
pub(super) use ringmote_lib::config::Config;
pub(super) use ringmote_lib::error::Result;
pub(super) use ringmote_lib::layout;
pub(super) use ringmote_lib::led::LedState;
pub(super) use ringmote_lib::palette;
pub(super) use ringmote_lib::RingmoteError;

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{key:<width$}{value}", width = w)
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2)
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct PalettesOutput {
    pub count: usize,
    pub palettes: Vec<PaletteSummaryJson>,
}

#[derive(Serialize)]
pub(super) struct PaletteSummaryJson {
    pub name: String,
    pub icon: String,
    pub swatch: String,
}

#[derive(Serialize)]
pub(super) struct PaletteOutput {
    pub name: String,
    pub icon: String,
    pub led_count: usize,
    pub leds: Vec<LedState>,
}

#[derive(Serialize)]
pub(super) struct LayoutOutput {
    pub led_count: usize,
    pub radius: f64,
    pub points: Vec<layout::Point>,
}

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the built-in palettes
    Palettes,

    /// Print every LED state a palette generates (no publishing)
    Show {
        /// Palette name, case-insensitive (e.g. "rainbow", "All Off")
        palette: String,
    },

    /// Print ring coordinates for each LED index
    Layout {
        /// Number of LEDs (default: from config)
        #[arg(long)]
        count: Option<usize>,
        /// Ring radius in arbitrary units
        #[arg(long, default_value_t = 1.0)]
        radius: f64,
    },

    /// Publish a single LED state (connect, publish, disconnect)
    Set {
        /// LED index, 0-based
        index: usize,
        /// Color name or #RRGGBB
        color: String,
        /// Brightness, 0-255
        #[arg(long, default_value_t = 200)]
        brightness: u8,
    },

    /// Apply a palette to the whole ring and publish it
    Apply {
        /// Palette name, case-insensitive
        palette: String,
    },

    /// Turn every LED off (shorthand for `apply "All Off"`)
    Off,

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration (the default)
    Show,
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path
    Path,
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, json: bool) -> Result<()> {
    match cmd {
        Command::Palettes => palettes::cmd_palettes(json),
        Command::Show { palette } => show::cmd_show(&palette, json),
        Command::Layout { count, radius } => layout_cmd::cmd_layout(count, radius, json),
        Command::Set {
            index,
            color,
            brightness,
        } => {
            if json {
                warn_json_unsupported("set");
            }
            set::cmd_set(index, &color, brightness)
        }
        Command::Apply { palette } => {
            if json {
                warn_json_unsupported("apply");
            }
            apply::cmd_apply(&palette)
        }
        Command::Off => {
            if json {
                warn_json_unsupported("off");
            }
            apply::cmd_apply("All Off")
        }
        Command::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => config_cmd::cmd_config_show(json),
            ConfigAction::Init { force } => config_cmd::cmd_config_init(force),
            ConfigAction::Path => config_cmd::cmd_config_path(),
        },
    }
}

/// Look up a palette sized for the configured ring, with a helpful error.
pub(super) fn resolve_palette(name: &str, led_count: usize) -> Result<palette::Palette> {
    palette::find_palette(name, led_count).ok_or_else(|| {
        RingmoteError::Config(format!(
            "unknown palette \"{name}\" (available: {})",
            palette::palette_names().join(", ")
        ))
    })
}

/// Bring up a publish channel connected per the given config.
pub(super) fn connect_channel(config: &Config) -> Result<PublishChannel> {
    let conn = config.connection()?;
    let broker = conn.broker.to_string();
    let channel = PublishChannel::new(config.ring());
    println!("Connecting to {broker}...");
    match channel.connect(conn).wait() {
        Some(Completion::Connected) => Ok(channel),
        Some(Completion::ConnectFailed { reason }) => Err(RingmoteError::Connection(reason)),
        _ => Err(RingmoteError::Connection(
            "channel shut down during connect".into(),
        )),
    }
}


#[cfg(test)]
mod resolve_tests {
    use super::*;

    #[test]
    fn resolve_known_palette() {
        let p = resolve_palette("rainbow", 24).unwrap();
        assert_eq!(p.name, "Rainbow");
        assert_eq!(p.len(), 24);
    }

    #[test]
    fn resolve_unknown_lists_available() {
        let err = resolve_palette("plasma", 24).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("plasma"));
        assert!(msg.contains("Rainbow"));
        assert!(msg.contains("All Off"));
    }
}

#[cfg(test)]
mod json_struct_tests {
    use super::*;

    #[test]
    fn palettes_output_serializes() {
        let out = PalettesOutput {
            count: 1,
            palettes: vec![PaletteSummaryJson {
                name: "Rainbow".into(),
                icon: "\u{1F308}".into(),
                swatch: "#FF0000".into(),
            }],
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["palettes"][0]["name"], "Rainbow");
        assert_eq!(json["palettes"][0]["swatch"], "#FF0000");
    }

    #[test]
    fn palette_output_serializes_led_fields() {
        let out = PaletteOutput {
            name: "All Off".into(),
            icon: String::new(),
            led_count: 2,
            leds: vec![LedState::OFF; 2],
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["leds"].as_array().unwrap().len(), 2);
        assert_eq!(json["leds"][0]["red"], 0);
        assert_eq!(json["leds"][0]["brightness"], 0);
    }

    #[test]
    fn layout_output_serializes_points() {
        let out = LayoutOutput {
            led_count: 4,
            radius: 1.0,
            points: layout::ring_positions(4, 1.0, 0.0, 0.0),
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["points"].as_array().unwrap().len(), 4);
        assert!(json["points"][0]["y"].is_number());
    }

    #[test]
    fn config_output_settings_complete() {
        let out = ConfigOutput {
            config_file: None,
            config_file_exists: false,
            settings: Config::default(),
        };
        let json = serde_json::to_value(&out).unwrap();
        assert!(json["config_file"].is_null());
        assert_eq!(json["settings"]["broker_url"], "ssl://localhost:8883");
        assert_eq!(json["settings"]["led_count"], 24);
        assert_eq!(json["settings"]["topic_prefix"], "esp32/controlled/");
    }
}
