//! `set` subcommand — publish one LED, then disconnect.

use super::{color, connect_channel, Completion, Config, LedState, Result, RingmoteError};

pub(super) fn cmd_set(index: usize, color_spec: &str, brightness: u8) -> Result<()> {
    let config = Config::load();
    if index >= config.led_count {
        return Err(RingmoteError::OutOfRange {
            index,
            count: config.led_count,
        });
    }
    let (red, green, blue) = color::parse_color(color_spec)?;
    let state = LedState::new(red, green, blue, brightness);

    let channel = connect_channel(&config)?;
    let outcome = channel.publish_one(index, state)?.wait();
    channel.disconnect().wait();

    match outcome {
        Some(Completion::Published { sent: 1, .. }) => {
            println!("LED {index} set to {} (brightness {brightness})", state.hex());
            Ok(())
        }
        Some(Completion::Published { .. }) => Err(RingmoteError::Publish(format!(
            "LED {index} update was not delivered"
        ))),
        _ => Err(RingmoteError::Publish(
            "channel shut down before the publish completed".into(),
        )),
    }
}
