//! Ringmote — control core for an MQTT-driven ring of addressable RGB LEDs.

pub mod channel;
pub mod color;
pub mod config;
pub mod error;
pub mod led;
pub mod layout;
pub mod palette;
pub mod protocol;
pub mod store;
pub mod transport;

pub use error::RingmoteError;
