//! Ringmote CLI — remote control for an MQTT-driven ring of RGB LEDs.

use clap::Parser;

mod cli;

#[derive(Parser)]
#[command(
    name = "ringmote",
    version,
    about = "Remote control for an MQTT-driven ring of RGB LEDs"
)]
struct Args {
    /// Output as JSON (for palettes, show, layout, config)
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (connection and publish progress)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: cli::Command,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = cli::run(args.command, args.json) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
