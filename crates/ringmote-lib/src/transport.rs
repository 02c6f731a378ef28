//! Publish transport — trait + MQTT backend.
//!
//! [`Transport`] is the seam between the publish channel and the wire.
//! The real backend is a rumqttc session driven by a dedicated event-loop
//! thread; tests use [`mock::MockTransport`]. Transports are created
//! through a [`Connector`] wired in at channel construction, so nothing
//! reaches for ambient/global connection state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crate::config::ConnectionConfig;
use crate::error::{Result, RingmoteError};

/// A live pub/sub session capable of QoS-1 publishes.
pub trait Transport: Send {
    /// Publish one message. At most one send attempt; an error means the
    /// transport rejected or could not deliver it.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<()>;

    /// Tear the session down. Must be safe to call more than once.
    fn disconnect(&mut self);
}

/// Factory that establishes a transport session from connection parameters.
pub type Connector = Box<dyn Fn(&ConnectionConfig) -> Result<Box<dyn Transport>> + Send>;

/// The default connector: one encrypted-or-plain MQTT session per call.
pub fn mqtt_connector() -> Connector {
    Box::new(|cfg| Ok(Box::new(MqttTransport::connect(cfg)?) as Box<dyn Transport>))
}

/// MQTT session over rumqttc's synchronous client.
///
/// The event loop runs on a detached driver thread; it stops on the
/// first event-loop error (connection loss). There is no automatic
/// reconnect — reconnect policy belongs to the caller.
pub struct MqttTransport {
    client: rumqttc::Client,
    alive: Arc<AtomicBool>,
}

impl MqttTransport {
    /// Establish a session and wait for the broker's CONNACK.
    ///
    /// Fails with `Connection` if the broker refuses the session, the
    /// network/TLS handshake fails, or `connection_timeout` elapses.
    pub fn connect(cfg: &ConnectionConfig) -> Result<Self> {
        let mut opts = rumqttc::MqttOptions::new(
            cfg.client_id.clone(),
            cfg.broker.host.clone(),
            cfg.broker.port,
        );
        if !cfg.username.is_empty() {
            opts.set_credentials(cfg.username.clone(), cfg.password.clone());
        }
        opts.set_clean_session(cfg.clean_session);
        // rumqttc rejects keep-alive intervals under 5 seconds.
        opts.set_keep_alive(cfg.keep_alive.max(Duration::from_secs(5)));
        if cfg.broker.tls {
            opts.set_transport(rumqttc::Transport::tls_with_default_config());
        }

        let (client, mut connection) = rumqttc::Client::new(opts, 64);
        let alive = Arc::new(AtomicBool::new(true));
        let (ack_tx, ack_rx) = mpsc::channel::<std::result::Result<(), String>>();

        // Driver thread: pumps the event loop for the session's lifetime.
        // Detached on purpose — joining it could block on a wedged socket.
        thread::spawn({
            let alive = Arc::clone(&alive);
            move || {
                for event in connection.iter() {
                    match event {
                        Ok(rumqttc::Event::Incoming(rumqttc::Packet::ConnAck(ack))) => {
                            if ack.code == rumqttc::ConnectReturnCode::Success {
                                let _ = ack_tx.send(Ok(()));
                            } else {
                                let _ = ack_tx
                                    .send(Err(format!("broker refused session: {:?}", ack.code)));
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(e) => {
                            log::warn!("mqtt event loop stopped: {e}");
                            let _ = ack_tx.send(Err(e.to_string()));
                            break;
                        }
                    }
                }
                alive.store(false, Ordering::SeqCst);
            }
        });

        let transport = MqttTransport { client, alive };
        match ack_rx.recv_timeout(cfg.connection_timeout) {
            Ok(Ok(())) => {
                log::info!("connected to {} as {}", cfg.broker, cfg.client_id);
                Ok(transport)
            }
            Ok(Err(reason)) => {
                drop(transport);
                Err(RingmoteError::Connection(reason))
            }
            Err(_) => {
                drop(transport);
                Err(RingmoteError::Connection(format!(
                    "no CONNACK within {:?}",
                    cfg.connection_timeout
                )))
            }
        }
    }
}

impl Transport for MqttTransport {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<()> {
        if !self.alive.load(Ordering::SeqCst) {
            return Err(RingmoteError::Publish("connection lost".into()));
        }
        self.client
            .publish(topic, rumqttc::QoS::AtLeastOnce, false, payload.to_vec())
            .map_err(|e| RingmoteError::Publish(e.to_string()))
    }

    fn disconnect(&mut self) {
        if self.alive.load(Ordering::SeqCst) {
            let _ = self.client.disconnect();
        }
    }
}

impl Drop for MqttTransport {
    fn drop(&mut self) {
        self.disconnect();
    }
}

// ── Mock transport for testing ──

/// In-memory transport for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Instant;

    /// One recorded publish.
    #[derive(Debug, Clone)]
    pub struct SentMessage {
        pub topic: String,
        pub payload: String,
        pub at: Instant,
    }

    /// Shared handle to a mock transport's send log. Clones observe the
    /// same log, so tests keep one while the transport moves into the
    /// channel worker.
    #[derive(Debug, Clone, Default)]
    pub struct Recorder {
        inner: Arc<Mutex<Vec<SentMessage>>>,
    }

    impl Recorder {
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of everything sent so far.
        pub fn messages(&self) -> Vec<SentMessage> {
            self.lock().clone()
        }

        pub fn len(&self) -> usize {
            self.lock().len()
        }

        pub fn is_empty(&self) -> bool {
            self.lock().is_empty()
        }

        /// Topics in send order.
        pub fn topics(&self) -> Vec<String> {
            self.lock().iter().map(|m| m.topic.clone()).collect()
        }

        /// Payloads in send order.
        pub fn payloads(&self) -> Vec<String> {
            self.lock().iter().map(|m| m.payload.clone()).collect()
        }

        fn record(&self, topic: &str, payload: &[u8]) {
            self.lock().push(SentMessage {
                topic: topic.to_string(),
                payload: String::from_utf8_lossy(payload).into_owned(),
                at: Instant::now(),
            });
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SentMessage>> {
            self.inner.lock().unwrap_or_else(|e| e.into_inner())
        }
    }

    /// Recording transport with failure injection.
    pub struct MockTransport {
        pub recorder: Recorder,
        /// If set, publishes fail once this many have succeeded.
        pub fail_after: Option<usize>,
        /// Number of `disconnect` calls observed (shared, for tests).
        pub disconnects: Arc<AtomicUsize>,
        sent: usize,
    }

    impl MockTransport {
        pub fn new(recorder: Recorder) -> Self {
            MockTransport {
                recorder,
                fail_after: None,
                disconnects: Arc::new(AtomicUsize::new(0)),
                sent: 0,
            }
        }
    }

    impl Transport for MockTransport {
        fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<()> {
            if let Some(limit) = self.fail_after {
                if self.sent >= limit {
                    return Err(RingmoteError::Publish(format!(
                        "mock: publish failure injected after {limit} sends"
                    )));
                }
            }
            self.recorder.record(topic, payload);
            self.sent += 1;
            Ok(())
        }

        fn disconnect(&mut self) {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Connector producing a fresh recording transport per connect.
    pub fn connector(recorder: Recorder) -> Connector {
        Box::new(move |_cfg| {
            Ok(Box::new(MockTransport::new(recorder.clone())) as Box<dyn Transport>)
        })
    }

    /// Connector producing transports that fail after `n` publishes.
    pub fn failing_after(recorder: Recorder, n: usize) -> Connector {
        Box::new(move |_cfg| {
            let mut t = MockTransport::new(recorder.clone());
            t.fail_after = Some(n);
            Ok(Box::new(t) as Box<dyn Transport>)
        })
    }

    /// Connector that always refuses the connection.
    pub fn refusing(reason: &str) -> Connector {
        let reason = reason.to_string();
        Box::new(move |_cfg| Err(RingmoteError::Connection(reason.clone())))
    }
}
