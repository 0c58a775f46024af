#![doc = include_str ! ("../README.md")]
#![cfg_attr(not(target_arch = "x86_64"), no_std)]

pub mod config;
pub mod error;
pub mod platform;
pub mod raw;
pub mod record;

pub use config::WindowConfig;
pub use record::Record;

extern crate alloc;

use crate::error::Error;
use crate::platform::Platform;
use alloc::vec;
use alloc::vec::Vec;
#[cfg(feature = "defmt")]
use defmt::trace;

#[derive(strum::Display, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlotState {
    /// All bytes of the slot are zero
    Empty,
    /// At least one byte of the slot is non-zero
    Occupied,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowStatistics {
    /// State of every slot in ascending address order
    pub slots: Vec<SlotState>,
    pub empty: u32,
    pub occupied: u32,
}

/// Keeps a single record in a window of EEPROM slots and moves it to the next slot on every
/// write, so the write cycles are spread over the whole window instead of a single address.
///
/// The struct itself holds no information about the window content. Every operation scans the
/// storage to find the occupied slot, which means that the state survives power cycles and that
/// several instances may be created over the same window, one after another.
///
/// A slot is considered occupied as soon as one of its bytes is non-zero. Consequences:
///  * a window has to be zeroed once with [`RoundRobin::zero_window`] before first use unless
///    the device is known to be erased to zero (EEPROMs are usually shipped erased to 0xFF)
///  * a record which serializes to all zero bytes cannot be told apart from an empty window
///  * the very first write lands on the second slot, as an empty window is indistinguishable
///    from a window with its first slot occupied
///
/// Writing is not atomic. If the device loses power after the new slot has been written but
/// before the previous one has been zeroed, two slots are occupied and the lower address wins
/// on the next lookup. If that is the previous slot, the last write is lost until the next one.
/// [`RoundRobin::statistics`] reports such a window.
pub struct RoundRobin<T: Platform> {
    hal: T,
    config: WindowConfig,
}

impl<T: Platform> RoundRobin<T> {
    /// Validates the window layout against the capacity of the device. No storage access
    /// happens here.
    pub fn new(config: WindowConfig, hal: T) -> Result<RoundRobin<T>, Error> {
        config.validate()?;

        if config.end() as usize > hal.capacity() {
            return Err(Error::WindowExceedsCapacity);
        }

        Ok(Self { hal, config })
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    pub fn storage(&self) -> &T {
        &self.hal
    }

    pub fn storage_mut(&mut self) -> &mut T {
        &mut self.hal
    }

    /// Releases the storage device.
    pub fn into_inner(self) -> T {
        self.hal
    }

    /// Sets every byte of the window to zero. Only bytes which are not zero yet get written,
    /// each with a single byte write.
    ///
    /// Meant for initialization and reset, not needed for regular reads and writes. Returns the
    /// number of bytes that had to be cleared.
    pub fn zero_window(&mut self) -> Result<usize, Error> {
        #[cfg(feature = "defmt")]
        trace!(
            "zero_window: @{:#08x}..={:#08x}",
            self.config.min_addr,
            self.config.max_addr
        );

        let config = self.config;
        let mut cleared = 0;
        for address in config.slot_addresses() {
            cleared += raw::clear_non_zero(&mut self.hal, address, config.slot_size_usize())?;
        }

        #[cfg(feature = "debug-logs")]
        println!("  RoundRobin: zero_window: {cleared} bytes cleared");

        Ok(cleared)
    }

    /// Returns the address of the first slot, in ascending order, with at least one non-zero
    /// byte. Returns `min_addr` if the whole window is empty.
    pub fn locate_occupied_slot(&mut self) -> Result<u32, Error> {
        let config = self.config;
        for address in config.slot_addresses() {
            if !raw::is_zeroed(&mut self.hal, address, config.slot_size_usize())? {
                #[cfg(feature = "defmt")]
                trace!("locate_occupied_slot: @{:#08x}", address);

                #[cfg(feature = "debug-logs")]
                println!("  RoundRobin: occupied slot at {address:#08x}");

                return Ok(address);
            }
        }

        #[cfg(feature = "defmt")]
        trace!("locate_occupied_slot: window empty");

        Ok(config.min_addr)
    }

    /// Reads the current record and returns it together with the address of its slot.
    ///
    /// On an empty window this yields the all-zero content of the first slot. The caller has to
    /// treat a record of zero bytes as "no data".
    pub fn read<R: Record>(&mut self) -> Result<(R, u32), Error> {
        self.check_record_size(R::SIZE)?;

        let mut buf = vec![0u8; R::SIZE];
        let address = self.read_bytes(&mut buf)?;

        Ok((R::deserialize(&buf), address))
    }

    /// Untyped variant of [`RoundRobin::read`]. `buf` has to be exactly one slot long.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<u32, Error> {
        self.check_record_size(buf.len())?;

        let address = self.locate_occupied_slot()?;

        #[cfg(feature = "defmt")]
        trace!("read: @{:#08x}", address);

        self.hal.read(address, buf).map_err(|_| Error::StorageError)?;

        Ok(address)
    }

    /// Writes `value` into the slot after the current one and zeroes the current one afterwards.
    /// After the last slot of the window the first one is used again. Returns the address the
    /// record was written to.
    pub fn write<R: Record>(&mut self, value: &R) -> Result<u32, Error> {
        self.check_record_size(R::SIZE)?;

        let mut buf = vec![0u8; R::SIZE];
        value.serialize(&mut buf);

        self.write_bytes(&buf)
    }

    /// Untyped variant of [`RoundRobin::write`]. `bytes` has to be exactly one slot long.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<u32, Error> {
        self.check_record_size(bytes.len())?;

        let prev = self.locate_occupied_slot()?;
        let next = self.config.next_address(prev);

        #[cfg(feature = "defmt")]
        trace!("write: @{:#08x} -> @{:#08x}", prev, next);

        #[cfg(feature = "debug-logs")]
        println!("  RoundRobin: write: prev {prev:#08x} next {next:#08x}");

        self.hal.write(next, bytes).map_err(|_| Error::StorageError)?;

        // a power loss between these two writes leaves two occupied slots behind
        raw::write_zeros(&mut self.hal, prev, self.config.slot_size_usize())?;

        Ok(next)
    }

    /// Returns the state of every slot of the window. A healthy window has at most one occupied
    /// slot, more than one indicates an interrupted write.
    pub fn statistics(&mut self) -> Result<WindowStatistics, Error> {
        let config = self.config;

        let slots = config
            .slot_addresses()
            .map(|address| {
                raw::is_zeroed(&mut self.hal, address, config.slot_size_usize()).map(|zeroed| {
                    if zeroed {
                        SlotState::Empty
                    } else {
                        SlotState::Occupied
                    }
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let occupied = slots
            .iter()
            .filter(|&&state| state == SlotState::Occupied)
            .count() as u32;

        #[cfg(feature = "debug-logs")]
        for (address, state) in config.slot_addresses().zip(slots.iter()) {
            println!("  RoundRobin: {address:#08x}: {state}");
        }

        Ok(WindowStatistics {
            empty: slots.len() as u32 - occupied,
            occupied,
            slots,
        })
    }

    fn check_record_size(&self, actual: usize) -> Result<(), Error> {
        let expected = self.config.slot_size_usize();
        if actual != expected {
            return Err(Error::RecordSizeMismatch { expected, actual });
        }
        Ok(())
    }
}
