//! Background publish channel.
//!
//! [`PublishChannel`] owns a worker thread and a command queue. Callers
//! enqueue connect / publish / disconnect operations and get back an
//! [`OpHandle`] to await (or cancel) the outcome; the worker serialises
//! all transport access, so LED payloads never interleave.
//!
//! Session lifecycle is a three-state machine:
//!
//! ```text
//! Disconnected ── connect ──▶ Connecting ──▶ Connected
//!       ▲                         │               │
//!       └──── failure ────────────┘◀─ disconnect ─┘
//! ```
//!
//! Publishes while not `Connected` are dropped, not queued — the device
//! repaints from the next full burst, so stale frames are worthless.
//! [`PublishChannel::publish_one_strict`] opts into an error instead.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::config::{ConnectionConfig, RingConfig};
use crate::error::{Result, RingmoteError};
use crate::led::LedState;
use crate::protocol;
use crate::store::RingSnapshot;
use crate::transport::{mqtt_connector, Connector, Transport};

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Connected,
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChannelState::Disconnected => "disconnected",
            ChannelState::Connecting => "connecting",
            ChannelState::Connected => "connected",
        };
        f.write_str(s)
    }
}

/// Diagnostic event emitted by the worker as operations progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Connected { broker: String },
    ConnectFailed { reason: String },
    Published { topic: String },
    PublishFailed { topic: String, reason: String },
    MessageDropped { topic: String },
    Disconnected,
}

/// Observer for [`ChannelEvent`]s. The worker also logs every event, so
/// most callers never install one.
pub type EventSink = Arc<dyn Fn(&ChannelEvent) + Send + Sync>;

/// Final outcome of one enqueued operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Connected,
    ConnectFailed { reason: String },
    /// Publish burst finished. `sent + dropped + failed` equals the
    /// number of LEDs the operation covered.
    Published { sent: usize, dropped: usize, failed: usize },
    /// Burst stopped early by [`OpHandle::cancel`].
    Cancelled { sent: usize },
    Disconnected,
}

/// Handle to one in-flight operation.
#[derive(Debug)]
pub struct OpHandle {
    rx: mpsc::Receiver<Completion>,
    cancel: Arc<AtomicBool>,
}

impl OpHandle {
    /// Block until the operation completes. `None` if the channel shut
    /// down before finishing it.
    pub fn wait(&self) -> Option<Completion> {
        self.rx.recv().ok()
    }

    /// Like [`wait`](Self::wait), bounded by `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Completion> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Request cancellation. Takes effect between sends of a burst;
    /// already-sent messages are not recalled.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }
}

enum Command {
    Connect(Box<ConnectionConfig>, mpsc::Sender<Completion>),
    PublishOne(usize, LedState, mpsc::Sender<Completion>),
    PublishAll(RingSnapshot, Duration, Arc<AtomicBool>, mpsc::Sender<Completion>),
    Disconnect(mpsc::Sender<Completion>),
}

/// Handle to the publish worker. Dropping it disconnects and joins the
/// worker thread.
pub struct PublishChannel {
    ring: RingConfig,
    tx: Option<mpsc::Sender<Command>>,
    worker: Option<thread::JoinHandle<()>>,
    state: Arc<Mutex<ChannelState>>,
}

impl PublishChannel {
    /// Channel backed by the real MQTT connector.
    pub fn new(ring: RingConfig) -> Self {
        Self::with_connector(ring, Arc::new(|_| {}), mqtt_connector())
    }

    /// Channel with an event observer, backed by the real MQTT connector.
    pub fn with_events(ring: RingConfig, events: EventSink) -> Self {
        Self::with_connector(ring, events, mqtt_connector())
    }

    /// Fully wired constructor; tests pass a mock connector here.
    pub fn with_connector(ring: RingConfig, events: EventSink, connector: Connector) -> Self {
        let state = Arc::new(Mutex::new(ChannelState::Disconnected));
        let (tx, rx) = mpsc::channel();
        let worker = Worker {
            ring: ring.clone(),
            connector,
            events,
            state: Arc::clone(&state),
            transport: None,
        };
        let handle = thread::spawn(move || worker.run(rx));
        PublishChannel {
            ring,
            tx: Some(tx),
            worker: Some(handle),
            state,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChannelState {
        *lock_state(&self.state)
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ChannelState::Connected
    }

    /// Number of LEDs this channel addresses.
    pub fn led_count(&self) -> usize {
        self.ring.led_count
    }

    /// Enqueue a connection attempt.
    pub fn connect(&self, cfg: ConnectionConfig) -> OpHandle {
        self.enqueue(|done| Command::Connect(Box::new(cfg), done))
    }

    /// Enqueue one LED update. While not connected the message is
    /// dropped and the completion reports it as such.
    pub fn publish_one(&self, index: usize, state: LedState) -> Result<OpHandle> {
        if index >= self.ring.led_count {
            return Err(RingmoteError::OutOfRange {
                index,
                count: self.ring.led_count,
            });
        }
        Ok(self.enqueue(|done| Command::PublishOne(index, state, done)))
    }

    /// Like [`publish_one`](Self::publish_one) but fails fast with
    /// `NotConnected` instead of silently dropping. Best-effort: the
    /// session can still drop between this check and the send.
    pub fn publish_one_strict(&self, index: usize, state: LedState) -> Result<OpHandle> {
        if !self.is_connected() {
            return Err(RingmoteError::NotConnected);
        }
        self.publish_one(index, state)
    }

    /// Enqueue a full-ring burst, pacing sends `delay` apart. The
    /// snapshot length must match the ring size.
    pub fn publish_all(&self, snapshot: &[LedState], delay: Duration) -> Result<OpHandle> {
        if snapshot.len() != self.ring.led_count {
            return Err(RingmoteError::SizeMismatch {
                expected: self.ring.led_count,
                actual: snapshot.len(),
            });
        }
        let frame = snapshot.to_vec();
        Ok(self.enqueue(move |done| {
            Command::PublishAll(frame, delay, Arc::new(AtomicBool::new(false)), done)
        }))
    }

    /// Enqueue a disconnect. Completes `Disconnected` even when the
    /// channel was already disconnected.
    pub fn disconnect(&self) -> OpHandle {
        self.enqueue(Command::Disconnect)
    }

    fn enqueue(&self, build: impl FnOnce(mpsc::Sender<Completion>) -> Command) -> OpHandle {
        let (done_tx, done_rx) = mpsc::channel();
        let mut cmd = build(done_tx);
        let cancel = match &mut cmd {
            Command::PublishAll(_, _, flag, _) => Arc::clone(flag),
            _ => Arc::new(AtomicBool::new(false)),
        };
        if let Some(tx) = &self.tx {
            let _ = tx.send(cmd);
        }
        OpHandle { rx: done_rx, cancel }
    }
}

impl Drop for PublishChannel {
    fn drop(&mut self) {
        // Closing the queue stops the worker after in-flight commands.
        self.tx.take();
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn lock_state(state: &Mutex<ChannelState>) -> std::sync::MutexGuard<'_, ChannelState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

enum SendOutcome {
    Sent,
    Dropped,
    Failed,
}

struct Worker {
    ring: RingConfig,
    connector: Connector,
    events: EventSink,
    state: Arc<Mutex<ChannelState>>,
    transport: Option<Box<dyn Transport>>,
}

impl Worker {
    fn run(mut self, rx: mpsc::Receiver<Command>) {
        while let Ok(cmd) = rx.recv() {
            match cmd {
                Command::Connect(cfg, done) => self.handle_connect(&cfg, &done),
                Command::PublishOne(index, state, done) => {
                    let outcome = self.publish_led(index, &state);
                    let (sent, dropped, failed) = match outcome {
                        SendOutcome::Sent => (1, 0, 0),
                        SendOutcome::Dropped => (0, 1, 0),
                        SendOutcome::Failed => (0, 0, 1),
                    };
                    let _ = done.send(Completion::Published { sent, dropped, failed });
                }
                Command::PublishAll(frame, delay, cancel, done) => {
                    self.handle_publish_all(&frame, delay, &cancel, &done);
                }
                Command::Disconnect(done) => {
                    self.drop_session();
                    let _ = done.send(Completion::Disconnected);
                }
            }
        }
        self.drop_session();
    }

    fn handle_connect(&mut self, cfg: &ConnectionConfig, done: &mpsc::Sender<Completion>) {
        // Reconnecting over a live session replaces it.
        self.drop_session();
        self.set_state(ChannelState::Connecting);
        match (self.connector)(cfg) {
            Ok(transport) => {
                self.transport = Some(transport);
                self.set_state(ChannelState::Connected);
                self.emit(ChannelEvent::Connected {
                    broker: cfg.broker.to_string(),
                });
                let _ = done.send(Completion::Connected);
            }
            Err(e) => {
                self.set_state(ChannelState::Disconnected);
                let reason = e.to_string();
                self.emit(ChannelEvent::ConnectFailed {
                    reason: reason.clone(),
                });
                let _ = done.send(Completion::ConnectFailed { reason });
            }
        }
    }

    fn handle_publish_all(
        &mut self,
        frame: &[LedState],
        delay: Duration,
        cancel: &AtomicBool,
        done: &mpsc::Sender<Completion>,
    ) {
        let (mut sent, mut dropped, mut failed) = (0, 0, 0);
        for (index, led) in frame.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                log::info!("publish burst cancelled after {sent} of {} sends", frame.len());
                let _ = done.send(Completion::Cancelled { sent });
                return;
            }
            // Pace only while a session is up; once it drops, the rest
            // of the frame is discarded without sleeping.
            if index > 0 && self.transport.is_some() && !delay.is_zero() {
                thread::sleep(delay);
                if cancel.load(Ordering::SeqCst) {
                    log::info!(
                        "publish burst cancelled after {sent} of {} sends",
                        frame.len()
                    );
                    let _ = done.send(Completion::Cancelled { sent });
                    return;
                }
            }
            match self.publish_led(index, led) {
                SendOutcome::Sent => sent += 1,
                SendOutcome::Dropped => dropped += 1,
                SendOutcome::Failed => failed += 1,
            }
        }
        let _ = done.send(Completion::Published { sent, dropped, failed });
    }

    fn publish_led(&mut self, index: usize, led: &LedState) -> SendOutcome {
        let topic = protocol::led_topic(&self.ring.topic_prefix, index);
        let Some(transport) = self.transport.as_mut() else {
            self.emit(ChannelEvent::MessageDropped { topic });
            return SendOutcome::Dropped;
        };
        match transport.publish(&topic, protocol::encode_state(led).as_bytes()) {
            Ok(()) => {
                self.emit(ChannelEvent::Published { topic });
                SendOutcome::Sent
            }
            Err(e) => {
                self.emit(ChannelEvent::PublishFailed {
                    topic,
                    reason: e.to_string(),
                });
                // A rejected publish means the session is gone.
                self.drop_session();
                SendOutcome::Failed
            }
        }
    }

    fn drop_session(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.disconnect();
            self.set_state(ChannelState::Disconnected);
            self.emit(ChannelEvent::Disconnected);
        } else {
            self.set_state(ChannelState::Disconnected);
        }
    }

    fn set_state(&self, next: ChannelState) {
        *lock_state(&self.state) = next;
    }

    fn emit(&self, event: ChannelEvent) {
        match &event {
            ChannelEvent::Connected { broker } => log::info!("connected to {broker}"),
            ChannelEvent::ConnectFailed { reason } => log::warn!("connect failed: {reason}"),
            ChannelEvent::Published { topic } => log::debug!("published to {topic}"),
            ChannelEvent::PublishFailed { topic, reason } => {
                log::warn!("publish to {topic} failed: {reason}")
            }
            ChannelEvent::MessageDropped { topic } => {
                log::debug!("dropped message for {topic}: not connected")
            }
            ChannelEvent::Disconnected => log::info!("disconnected"),
        }
        (self.events)(&event);
    }
}
