//! Shared connection manager
//!
//! One socket connection used by every network process. The manager pumps
//! the transport once per scheduler tick, retries opening indefinitely on
//! a fixed backoff (unlike the WiFi gate, there is no attempt cap), and
//! buffers inbound frames one at a time: new data overwrites unread data,
//! so consumers must poll at least as fast as messages arrive.

use grouploop_hal::{SocketClient, SocketEvent, MAX_INBOUND_LEN};
use heapless::String;

use crate::time::Timer;

/// Pause between reconnection attempts
pub const RECONNECT_INTERVAL_MS: u32 = 5_000;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnState {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnState {
    pub const fn label(self) -> &'static str {
        match self {
            ConnState::Disconnected => "DISCONNECTED",
            ConnState::Connecting => "CONNECTING",
            ConnState::Connected => "CONNECTED",
        }
    }
}

/// The shared socket connection
pub struct ConnectionManager<S: SocketClient> {
    socket: S,
    state: ConnState,
    reconnect_timer: Timer,
    inbound: Option<String<MAX_INBOUND_LEN>>,
    device_id: u16,
    url: String<{ grouploop_protocol::MAX_FIELD_LEN }>,
    initialized: bool,
}

impl<S: SocketClient> ConnectionManager<S> {
    pub fn new(socket: S) -> Self {
        Self {
            socket,
            state: ConnState::Disconnected,
            reconnect_timer: Timer::new(RECONNECT_INTERVAL_MS),
            inbound: None,
            device_id: 0,
            url: String::new(),
            initialized: false,
        }
    }

    /// Bind the server URL and device identity, and begin connecting
    ///
    /// The device id is the last two MAC bytes, matching the 4-hex-char
    /// prefix of every published frame.
    pub fn initialize(&mut self, url: &str, mac: [u8; 6], now: u32) {
        if self.initialized {
            return;
        }
        self.device_id = u16::from_be_bytes([mac[4], mac[5]]);
        if self.url.push_str(url).is_err() {
            log::warn!("socket URL too long, connection disabled");
            return;
        }
        self.initialized = true;
        self.reconnect_timer.reset(now);
        self.begin_open();
        log::info!("socket manager initialized, device id {:04X}", self.device_id);
    }

    /// Pump the transport; call exactly once per scheduler tick
    pub fn update(&mut self, now: u32) {
        if !self.initialized {
            return;
        }

        loop {
            match self.socket.poll() {
                SocketEvent::Idle => break,
                SocketEvent::Connected => {
                    log::info!("socket connected");
                    self.state = ConnState::Connected;
                }
                SocketEvent::Disconnected => {
                    log::warn!("socket disconnected");
                    self.state = ConnState::Disconnected;
                    self.reconnect_timer.reset(now);
                }
                SocketEvent::Frame(frame) => {
                    // One-slot buffer: an unread frame is overwritten
                    self.inbound = Some(frame);
                }
            }
        }

        if self.state != ConnState::Connected && self.reconnect_timer.check_and_reset(now) {
            self.begin_open();
        }
    }

    fn begin_open(&mut self) {
        match self.socket.open(&self.url) {
            Ok(()) => self.state = ConnState::Connecting,
            Err(err) => {
                log::warn!("socket open failed: {err:?}");
                self.state = ConnState::Disconnected;
            }
        }
    }

    /// Send one frame, fire-and-forget; false when not connected
    pub fn send(&mut self, frame: &str) -> bool {
        if self.state != ConnState::Connected {
            return false;
        }
        self.socket.send(frame).is_ok()
    }

    /// Take the buffered inbound frame, if any
    pub fn take_frame(&mut self) -> Option<String<MAX_INBOUND_LEN>> {
        self.inbound.take()
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnState::Connected
    }

    pub fn state(&self) -> ConnState {
        self.state
    }

    pub fn device_id(&self) -> u16 {
        self.device_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grouploop_hal::SocketError;
    use std::collections::VecDeque;
    use std::string::ToString;

    #[derive(Default)]
    struct ScriptedSocket {
        events: VecDeque<SocketEvent>,
        opens: u32,
        sent: std::vec::Vec<std::string::String>,
        connected: bool,
    }

    impl SocketClient for ScriptedSocket {
        fn open(&mut self, _url: &str) -> Result<(), SocketError> {
            self.opens += 1;
            Ok(())
        }

        fn poll(&mut self) -> SocketEvent {
            self.events.pop_front().unwrap_or(SocketEvent::Idle)
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn send(&mut self, frame: &str) -> Result<(), SocketError> {
            self.sent.push(frame.to_string());
            Ok(())
        }
    }

    fn frame(text: &str) -> SocketEvent {
        SocketEvent::Frame(String::try_from(text).unwrap())
    }

    const MAC: [u8; 6] = [0xAA, 0xBB, 0xCC, 0xDD, 0x12, 0x34];

    #[test]
    fn device_id_comes_from_the_mac_tail() {
        let mut conn = ConnectionManager::new(ScriptedSocket::default());
        conn.initialize("ws://example:5003", MAC, 0);
        assert_eq!(conn.device_id(), 0x1234);
    }

    #[test]
    fn new_inbound_frames_overwrite_unread_ones() {
        let mut conn = ConnectionManager::new(ScriptedSocket::default());
        conn.initialize("ws://example:5003", MAC, 0);

        conn.socket.events.push_back(SocketEvent::Connected);
        conn.socket.events.push_back(frame("first"));
        conn.socket.events.push_back(frame("second"));
        conn.update(10);

        assert_eq!(conn.take_frame().unwrap().as_str(), "second");
        assert!(conn.take_frame().is_none());
    }

    #[test]
    fn reconnects_indefinitely_on_backoff() {
        let mut conn = ConnectionManager::new(ScriptedSocket::default());
        conn.initialize("ws://example:5003", MAC, 0);
        assert_eq!(conn.socket.opens, 1);

        conn.socket.events.push_back(SocketEvent::Disconnected);
        conn.update(10);
        assert_eq!(conn.state(), ConnState::Disconnected);

        // Far more rounds than the WiFi gate would ever allow
        let mut now = 10;
        for _ in 0..20 {
            now += RECONNECT_INTERVAL_MS + 1;
            conn.update(now);
        }
        assert_eq!(conn.socket.opens, 21);
    }

    #[test]
    fn send_is_refused_while_disconnected() {
        let mut conn = ConnectionManager::new(ScriptedSocket::default());
        conn.initialize("ws://example:5003", MAC, 0);
        assert!(!conn.send("frame\n"));

        conn.socket.events.push_back(SocketEvent::Connected);
        conn.update(10);
        assert!(conn.send("frame\n"));
        assert_eq!(conn.socket.sent.len(), 1);
    }
}
