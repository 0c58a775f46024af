//! Byte level access to the storage device. Nothing in here knows about the window layout, the
//! functions may also be used to keep records at fixed addresses outside of the window.

use crate::error::Error;
use crate::platform::Platform;
use crate::record::Record;
use alloc::vec;
#[cfg(feature = "defmt")]
use defmt::trace;

/// Slots are inspected and scrubbed in chunks of this size to avoid heap allocations.
const CHUNK_SIZE: usize = 16;

const ZEROS: [u8; CHUNK_SIZE] = [0u8; CHUNK_SIZE];

/// Serializes `value` and writes it to `address`. Returns the number of bytes written.
pub fn write_at<T: Platform, R: Record>(
    hal: &mut T,
    address: u32,
    value: &R,
) -> Result<usize, Error> {
    #[cfg(feature = "defmt")]
    trace!("write_at @{:#08x}: [{}]", address, R::SIZE);

    let mut buf = vec![0u8; R::SIZE];
    value.serialize(&mut buf);
    hal.write(address, &buf).map_err(|_| Error::StorageError)?;

    Ok(R::SIZE)
}

/// Reads `R::SIZE` bytes from `address` and deserializes them.
pub fn read_at<T: Platform, R: Record>(hal: &mut T, address: u32) -> Result<R, Error> {
    #[cfg(feature = "defmt")]
    trace!("read_at @{:#08x}: [{}]", address, R::SIZE);

    let mut buf = vec![0u8; R::SIZE];
    hal.read(address, &mut buf).map_err(|_| Error::StorageError)?;

    Ok(R::deserialize(&buf))
}

/// Returns true if all `len` bytes starting at `address` are zero.
pub(crate) fn is_zeroed<T: Platform>(hal: &mut T, address: u32, len: usize) -> Result<bool, Error> {
    let mut buf = [0u8; CHUNK_SIZE];
    let mut offset = 0;
    while offset < len {
        let chunk = &mut buf[..CHUNK_SIZE.min(len - offset)];
        hal.read(address + offset as u32, chunk)
            .map_err(|_| Error::StorageError)?;
        if chunk.iter().any(|&b| b != 0) {
            return Ok(false);
        }
        offset += chunk.len();
    }

    Ok(true)
}

/// Unconditionally writes `len` zero bytes starting at `address`.
pub(crate) fn write_zeros<T: Platform>(hal: &mut T, address: u32, len: usize) -> Result<(), Error> {
    #[cfg(feature = "defmt")]
    trace!("write_zeros @{:#08x}: [{}]", address, len);

    let mut offset = 0;
    while offset < len {
        let chunk = &ZEROS[..CHUNK_SIZE.min(len - offset)];
        hal.write(address + offset as u32, chunk)
            .map_err(|_| Error::StorageError)?;
        offset += chunk.len();
    }

    Ok(())
}

/// Zeroes every non-zero byte in `address..address + len` with a single byte write each. Bytes
/// which are already zero are not written to spare the cells. Returns the number of writes.
pub(crate) fn clear_non_zero<T: Platform>(
    hal: &mut T,
    address: u32,
    len: usize,
) -> Result<usize, Error> {
    let mut buf = [0u8; CHUNK_SIZE];
    let mut writes = 0;
    let mut offset = 0;
    while offset < len {
        let chunk_address = address + offset as u32;
        let chunk = &mut buf[..CHUNK_SIZE.min(len - offset)];
        hal.read(chunk_address, chunk).map_err(|_| Error::StorageError)?;

        for (i, _) in chunk.iter().enumerate().filter(|(_, b)| **b != 0) {
            hal.write(chunk_address + i as u32, &[0u8])
                .map_err(|_| Error::StorageError)?;
            writes += 1;
        }
        offset += chunk.len();
    }

    #[cfg(feature = "defmt")]
    trace!("clear_non_zero @{:#08x}: {} bytes", address, writes);

    Ok(writes)
}
