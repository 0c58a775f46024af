use embedded_storage::Storage;

/// Byte addressable storage, usually an EEPROM. Any single byte can be read and overwritten
/// without erasing a surrounding sector first.
///
/// See README.md for an example implementation.
pub trait Platform: Storage {}

impl<T: Storage> Platform for T {}
