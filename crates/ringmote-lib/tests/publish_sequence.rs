//! End-to-end: palette into the store, store snapshot out over the
//! publish channel, verified against the recorded wire traffic.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ringmote_lib::channel::{ChannelState, Completion, PublishChannel};
use ringmote_lib::config::{Config, ConnectionConfig, RingConfig};
use ringmote_lib::led::LedState;
use ringmote_lib::palette::find_palette;
use ringmote_lib::store::LedStateStore;
use ringmote_lib::transport::mock;

const LED_COUNT: usize = 24;

fn ring() -> RingConfig {
    RingConfig {
        led_count: LED_COUNT,
        topic_prefix: "esp32/controlled/".into(),
    }
}

fn conn() -> ConnectionConfig {
    Config::default().connection().unwrap()
}

fn connected(rec: &mock::Recorder) -> PublishChannel {
    let ch = PublishChannel::with_connector(ring(), Arc::new(|_| {}), mock::connector(rec.clone()));
    assert_eq!(ch.connect(conn()).wait(), Some(Completion::Connected));
    ch
}

#[test]
fn all_off_palette_reaches_every_led_in_order() {
    let store = LedStateStore::new(LED_COUNT);
    let palette = find_palette("All Off", LED_COUNT).unwrap();
    store.apply_palette(&palette).unwrap();

    let rec = mock::Recorder::new();
    let ch = connected(&rec);
    let outcome = ch
        .publish_all(&store.snapshot(), Duration::ZERO)
        .unwrap()
        .wait();
    assert_eq!(
        outcome,
        Some(Completion::Published { sent: LED_COUNT, dropped: 0, failed: 0 })
    );

    let expected: Vec<String> = (0..LED_COUNT)
        .map(|i| format!("esp32/controlled/{i}"))
        .collect();
    assert_eq!(rec.topics(), expected);
    assert!(rec.payloads().iter().all(|p| p == "0,0,0,0"));
}

#[test]
fn rainbow_payloads_match_store_contents() {
    let store = LedStateStore::new(LED_COUNT);
    let palette = find_palette("rainbow", LED_COUNT).unwrap();
    store.apply_palette(&palette).unwrap();

    let rec = mock::Recorder::new();
    let ch = connected(&rec);
    ch.publish_all(&store.snapshot(), Duration::ZERO)
        .unwrap()
        .wait();

    let snapshot = store.snapshot();
    let payloads = rec.payloads();
    assert_eq!(payloads.len(), LED_COUNT);
    for (led, payload) in snapshot.iter().zip(&payloads) {
        assert_eq!(
            payload,
            &format!("{},{},{},{}", led.red, led.green, led.blue, led.brightness)
        );
    }
}

#[test]
fn burst_paces_sends_by_the_configured_delay() {
    let rec = mock::Recorder::new();
    let ch = connected(&rec);
    let delay = Duration::from_millis(5);
    let frame = vec![LedState::default(); LED_COUNT];

    let started = Instant::now();
    ch.publish_all(&frame, delay).unwrap().wait();
    let elapsed = started.elapsed();

    assert!(
        elapsed >= delay * (LED_COUNT as u32 - 1),
        "burst finished too fast: {elapsed:?}"
    );
    let messages = rec.messages();
    assert_eq!(messages.len(), LED_COUNT);
    // Timestamps must be monotonically ordered.
    for pair in messages.windows(2) {
        assert!(pair[1].at >= pair[0].at);
    }
}

#[test]
fn publishing_while_disconnected_sends_nothing() {
    let rec = mock::Recorder::new();
    let ch = PublishChannel::with_connector(ring(), Arc::new(|_| {}), mock::connector(rec.clone()));
    assert_eq!(ch.state(), ChannelState::Disconnected);

    let single = ch.publish_one(0, LedState::default()).unwrap().wait();
    assert_eq!(
        single,
        Some(Completion::Published { sent: 0, dropped: 1, failed: 0 })
    );

    let frame = vec![LedState::default(); LED_COUNT];
    let burst = ch.publish_all(&frame, Duration::ZERO).unwrap().wait();
    assert_eq!(
        burst,
        Some(Completion::Published { sent: 0, dropped: LED_COUNT, failed: 0 })
    );
    assert!(rec.is_empty());
}

#[test]
fn reconnect_after_disconnect_resumes_publishing() {
    let rec = mock::Recorder::new();
    let ch = connected(&rec);
    assert_eq!(ch.disconnect().wait(), Some(Completion::Disconnected));

    // Dropped while down.
    ch.publish_one(3, LedState::default()).unwrap().wait();
    assert!(rec.is_empty());

    assert_eq!(ch.connect(conn()).wait(), Some(Completion::Connected));
    ch.publish_one(3, LedState::new(9, 8, 7, 6)).unwrap().wait();
    assert_eq!(rec.topics(), vec!["esp32/controlled/3"]);
    assert_eq!(rec.payloads(), vec!["9,8,7,6"]);
}
