//! Socket transport abstraction
//!
//! One persistent bidirectional text-frame connection to the server.
//! The transport owns handshaking and framing; the application pumps
//! [`SocketClient::poll`] every tick and reacts to the events it yields.

use heapless::String;

/// Maximum length of one inbound text frame
pub const MAX_INBOUND_LEN: usize = 128;

/// Errors from socket operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SocketError {
    /// URL could not be parsed
    BadUrl,
    /// Transport-level failure
    Io,
    /// Send attempted while not connected
    NotConnected,
}

/// One event produced by pumping the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    /// Nothing happened
    Idle,
    /// The connection came up
    Connected,
    /// The connection went down
    Disconnected,
    /// A complete inbound text frame arrived
    Frame(String<MAX_INBOUND_LEN>),
}

/// Persistent socket client
pub trait SocketClient {
    /// Begin connecting to `url` (e.g. `ws://host:port/path`); returns
    /// immediately. Completion is reported through [`SocketClient::poll`].
    fn open(&mut self, url: &str) -> Result<(), SocketError>;

    /// Pump the transport; yields at most one event per call
    fn poll(&mut self) -> SocketEvent;

    /// True while the connection is established
    fn is_connected(&self) -> bool;

    /// Send one outbound text frame, fire-and-forget
    fn send(&mut self, frame: &str) -> Result<(), SocketError>;
}
