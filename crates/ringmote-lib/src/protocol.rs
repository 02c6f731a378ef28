//! Wire protocol — topics, payloads, and transport constants.
//!
//! One MQTT topic per LED: `"{topic_prefix}{led_index}"` with the index
//! in plain decimal. Payload is the four channels as ASCII decimal
//! integers separated by commas, no trailing terminator:
//! `"{red},{green},{blue},{brightness}"`. Messages go out at QoS 1
//! (at least once), non-retained. Both the real transport and the test
//! doubles share these encoders, so there is exactly one definition of
//! the wire format.

use std::time::Duration;

use crate::led::LedState;

/// Default topic namespace the device fleet subscribes under.
pub const DEFAULT_TOPIC_PREFIX: &str = "esp32/controlled/";

/// Default pacing between successive per-LED publishes in a bulk send.
/// Keeps a burst from saturating the link or overwhelming the
/// constrained receivers.
pub const DEFAULT_INTER_LED_DELAY: Duration = Duration::from_millis(50);

/// Build the topic a given LED's updates are published under.
pub fn led_topic(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}")
}

/// Encode an LED state as its wire payload.
pub fn encode_state(state: &LedState) -> String {
    format!(
        "{},{},{},{}",
        state.red, state.green, state.blue, state.brightness
    )
}
