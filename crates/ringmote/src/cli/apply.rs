//! `apply` subcommand — palette to store, store to the whole ring.

use ringmote_lib::store::LedStateStore;

use super::{connect_channel, resolve_palette, Completion, Config, Result, RingmoteError};

pub(super) fn cmd_apply(name: &str) -> Result<()> {
    let config = Config::load();
    let palette = resolve_palette(name, config.led_count)?;

    let store = LedStateStore::new(config.led_count);
    store.apply_palette(&palette)?;

    let channel = connect_channel(&config)?;
    println!(
        "Applying {} {} to {} LEDs...",
        palette.icon,
        palette.name,
        config.led_count
    );
    let outcome = channel
        .publish_all(&store.snapshot(), config.inter_led_delay())?
        .wait();
    channel.disconnect().wait();

    match outcome {
        Some(Completion::Published { sent, dropped: 0, failed: 0 }) => {
            println!("Done: {sent} LEDs updated.");
            Ok(())
        }
        Some(Completion::Published { sent, dropped, failed }) => Err(RingmoteError::Publish(
            format!("ring partially updated: {sent} sent, {dropped} dropped, {failed} failed"),
        )),
        Some(Completion::Cancelled { sent }) => Err(RingmoteError::Publish(format!(
            "cancelled after {sent} sends"
        ))),
        _ => Err(RingmoteError::Publish(
            "channel shut down before the ring update completed".into(),
        )),
    }
}
