//! Serial console abstraction
//!
//! The console is the line-oriented channel used during interactive
//! reconfiguration: the operator sees the current configuration and sends
//! back a replacement JSON document.

/// Byte-at-a-time serial console
pub trait SerialConsole {
    /// Read one pending byte, if any
    fn read_byte(&mut self) -> Option<u8>;

    /// Write one line of text followed by a newline
    fn write_line(&mut self, line: &str);
}
