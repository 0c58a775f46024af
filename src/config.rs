use crate::error::Error;
use core::iter::StepBy;
use core::ops::RangeInclusive;

/// Size of the record kept by the laser power monitor: three 4 byte fields and one 2 byte field.
pub const DEFAULT_SLOT_SIZE: u32 = 4 + 4 + 4 + 2;

/// Slots skipped at the start of the device. Address 0 has already seen a lot of writes.
pub const DEFAULT_SKIP_SLOTS: u32 = 1;

/// Fits comfortably into the 512 bytes of an ATmega168.
pub const DEFAULT_SLOT_COUNT: u32 = 30;

/// Describes the window of equally sized slots the record rotates through.
///
/// All addresses are absolute offsets into the storage device. `min_addr` and `max_addr` are
/// the start addresses of the first and the last slot, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WindowConfig {
    pub slot_size: u32,
    pub min_addr: u32,
    pub max_addr: u32,
}

impl Default for WindowConfig {
    /// 14 byte slots at `14..=420`
    fn default() -> Self {
        Self::from_slots(DEFAULT_SLOT_SIZE, DEFAULT_SKIP_SLOTS, DEFAULT_SLOT_COUNT)
    }
}

impl WindowConfig {
    /// Creates a config without checking it. [`WindowConfig::validate`] runs when the config is
    /// handed to [`crate::RoundRobin::new`].
    pub const fn new(slot_size: u32, min_addr: u32, max_addr: u32) -> Self {
        Self {
            slot_size,
            min_addr,
            max_addr,
        }
    }

    /// Lays out `slot_count` slots after skipping the first `skip_slots` slots of the device.
    ///
    /// Tip: use a const context to have the layout computed at compile time:
    ///   `const WINDOW: WindowConfig = WindowConfig::from_slots(14, 1, 30);`
    pub const fn from_slots(slot_size: u32, skip_slots: u32, slot_count: u32) -> Self {
        let min_addr = skip_slots * slot_size;
        let max_addr = min_addr + slot_count.saturating_sub(1) * slot_size;
        Self::new(slot_size, min_addr, max_addr)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.slot_size == 0 {
            return Err(Error::InvalidSlotSize);
        }

        if self.max_addr < self.min_addr
            || !(self.max_addr - self.min_addr).is_multiple_of(self.slot_size)
        {
            return Err(Error::InvalidWindow);
        }

        // the end of the window has to be addressable as well
        if self.max_addr.checked_add(self.slot_size).is_none() {
            return Err(Error::InvalidWindow);
        }

        if self.slot_count() < 2 {
            return Err(Error::WindowTooSmall);
        }

        Ok(())
    }

    /// Number of slots in the window. Only meaningful for a valid config.
    pub const fn slot_count(&self) -> u32 {
        (self.max_addr - self.min_addr) / self.slot_size + 1
    }

    /// First address behind the window.
    pub const fn end(&self) -> u32 {
        self.max_addr + self.slot_size
    }

    /// The slot that follows `prev`, wrapping around to the start of the window after the last
    /// slot.
    pub const fn next_address(&self, prev: u32) -> u32 {
        if prev == self.max_addr {
            self.min_addr
        } else {
            prev + self.slot_size
        }
    }

    /// Start addresses of all slots in ascending order.
    pub fn slot_addresses(&self) -> StepBy<RangeInclusive<u32>> {
        (self.min_addr..=self.max_addr).step_by(self.slot_size as usize)
    }

    pub(crate) fn slot_size_usize(&self) -> usize {
        self.slot_size as usize
    }
}
