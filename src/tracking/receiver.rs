//! UDP receiver for camera-estimator payloads.
//!
//! A dedicated background thread blocks on inbound datagrams and writes
//! the latest decoded payload into a shared slot. The per-frame consumer
//! reads the slot without back-pressure: a new payload silently overwrites
//! an unconsumed one, so delivery is at-most-the-latest-payload-per-frame.

use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

/// Payloads older than this are treated as "no data": the camera path's
/// only liveness mechanism.
pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(1);

/// Socket read timeout; bounds how long shutdown can take.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Default)]
struct Slot {
    payload: Option<String>,
    received_at: Option<Instant>,
}

/// Background UDP listener with a latest-payload slot.
pub struct CameraReceiver {
    slot: Arc<Mutex<Slot>>,
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl CameraReceiver {
    /// Bind the listener socket and start the receive thread.
    pub fn bind(port: u16) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", port))?;
        socket.set_read_timeout(Some(POLL_INTERVAL))?;
        info!(port, "camera receiver listening");

        let slot = Arc::new(Mutex::new(Slot::default()));
        let shutdown = Arc::new(AtomicBool::new(false));

        let thread_slot = Arc::clone(&slot);
        let thread_shutdown = Arc::clone(&shutdown);
        let thread = std::thread::spawn(move || {
            let mut buf = [0u8; 8192];
            while !thread_shutdown.load(Ordering::Relaxed) {
                match socket.recv_from(&mut buf) {
                    Ok((len, _addr)) => {
                        let payload = String::from_utf8_lossy(&buf[..len]).into_owned();
                        let mut slot = thread_slot.lock().unwrap_or_else(|e| e.into_inner());
                        slot.payload = Some(payload);
                        slot.received_at = Some(Instant::now());
                    }
                    Err(e)
                        if e.kind() == std::io::ErrorKind::WouldBlock
                            || e.kind() == std::io::ErrorKind::TimedOut =>
                    {
                        continue;
                    }
                    Err(e) => {
                        warn!("camera receive error: {e}");
                        let mut slot = thread_slot.lock().unwrap_or_else(|e| e.into_inner());
                        slot.payload = None;
                        slot.received_at = None;
                    }
                }
            }
            debug!("camera receiver thread exiting");
        });

        Ok(Self {
            slot,
            shutdown,
            thread: Some(thread),
        })
    }

    /// Latest payload, or `None` when nothing has arrived within the
    /// receive timeout. Clearing on staleness makes the adapter report
    /// "no hand" instead of replaying old data.
    pub fn latest(&self) -> Option<String> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(at) = slot.received_at {
            if at.elapsed() > RECEIVE_TIMEOUT {
                slot.payload = None;
                slot.received_at = None;
            }
        }
        slot.payload.clone()
    }

    /// Whether fresh payloads are arriving.
    pub fn is_streaming(&self) -> bool {
        self.latest().is_some()
    }

    /// Inject a payload directly, bypassing the socket.
    #[cfg(test)]
    pub fn inject(&self, payload: &str) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.payload = Some(payload.to_string());
        slot.received_at = Some(Instant::now());
    }
}

impl Drop for CameraReceiver {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_returns_injected_payload() {
        let receiver = CameraReceiver::bind(0).expect("bind ephemeral port");
        assert!(receiver.latest().is_none());
        receiver.inject("[]");
        assert_eq!(receiver.latest().as_deref(), Some("[]"));
        assert!(receiver.is_streaming());
    }

    #[test]
    fn stale_payload_is_cleared() {
        let receiver = CameraReceiver::bind(0).expect("bind ephemeral port");
        {
            let mut slot = receiver.slot.lock().unwrap();
            slot.payload = Some("[]".to_string());
            slot.received_at = Some(Instant::now() - RECEIVE_TIMEOUT - Duration::from_millis(10));
        }
        assert!(receiver.latest().is_none());
        assert!(!receiver.is_streaming());
    }
}
