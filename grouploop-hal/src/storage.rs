//! Durable configuration storage abstractions
//!
//! Provides a trait for namespaced key/value storage (NVS-class hardware).
//! Values are short strings or small integers; the implementation handles
//! wear leveling and data integrity.

use heapless::String;

/// Maximum length of one stored string value
pub const MAX_VALUE_LEN: usize = 64;

/// Errors from storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Storage could not be opened
    Unavailable,
    /// Key not present in the namespace
    NotFound,
    /// Write failed
    Write,
    /// Stored value exceeds [`MAX_VALUE_LEN`]
    ValueTooLong,
}

/// Namespaced key/value store
///
/// The store is opened on a namespace, read or written, and closed again.
/// Callers must treat every failure as non-fatal and fall back to
/// compiled-in defaults.
pub trait ConfigStore {
    /// Open the given namespace for reading and writing
    fn open(&mut self, namespace: &str) -> Result<(), StoreError>;

    /// Read a string value by key
    fn get_str(&mut self, key: &str) -> Result<String<MAX_VALUE_LEN>, StoreError>;

    /// Write a string value by key
    fn put_str(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Read an integer value by key
    fn get_u8(&mut self, key: &str) -> Result<u8, StoreError>;

    /// Write an integer value by key
    fn put_u8(&mut self, key: &str, value: u8) -> Result<(), StoreError>;

    /// Close the namespace, flushing pending writes
    fn close(&mut self);
}
