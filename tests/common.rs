#![allow(dead_code)]

// filename according to https://doc.rust-lang.org/book/ch11-03-test-organization.html
use eeprom_rr::WindowConfig;
use embedded_storage::{ReadStorage, Storage};

/// 512 bytes, the EEPROM size of an ATmega168
pub const EEPROM_SIZE: usize = 512;

/// Three slots of four bytes at 4, 8 and 12
pub const SMALL_WINDOW: WindowConfig = WindowConfig::new(4, 4, 12);

#[derive(Default)]
pub struct Eeprom {
    pub buf: Vec<u8>,
    pub fail_after_operation: usize,
    pub operations: Vec<Operation>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Operation {
    Read { offset: u32, len: usize },
    Write { offset: u32, len: usize },
}

impl Eeprom {
    /// A device with all bytes set to zero
    pub fn new(size: usize) -> Self {
        Self::new_filled(size, 0x00)
    }

    /// A device as shipped from the factory
    pub fn new_erased(size: usize) -> Self {
        Self::new_filled(size, 0xFF)
    }

    pub fn new_filled(size: usize, value: u8) -> Self {
        Self {
            buf: vec![value; size],
            fail_after_operation: usize::MAX,
            ..Default::default()
        }
    }

    /// Every operation starting with the `fail_after_operation`th one fails, which simulates a
    /// power loss at that point.
    pub fn new_with_fault(size: usize, fail_after_operation: usize) -> Self {
        Self {
            buf: vec![0x00; size],
            fail_after_operation,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn disable_faults(&mut self) {
        self.fail_after_operation = usize::MAX;
    }

    pub fn fail_after(&mut self, operations: usize) {
        self.fail_after_operation = self.operations.len() + operations;
    }

    pub fn slot(&self, address: u32, len: usize) -> &[u8] {
        &self.buf[address as usize..address as usize + len]
    }

    pub fn writes(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::Write { .. }))
            .count()
    }

    pub fn bytes_written(&self) -> usize {
        self.operations
            .iter()
            .map(|op| match op {
                Operation::Write { len, .. } => *len,
                _ => 0,
            })
            .sum()
    }

    pub fn dump_operations(&self) {
        println!("Operations:");
        for op in &self.operations {
            println!("  {:?}", op);
        }
    }
}

#[derive(Debug)]
pub struct EepromError;

impl ReadStorage for Eeprom {
    type Error = EepromError;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        println!(
            "    eeprom: read:  0x{offset:04X}[0x{:04X}] #{:>2}",
            bytes.len(),
            self.operations.len()
        );
        if self.operations.len() >= self.fail_after_operation {
            println!("    eeprom: FAULT");
            return Err(EepromError);
        }
        self.operations.push(Operation::Read {
            offset,
            len: bytes.len(),
        });

        let offset = offset as usize;
        bytes.copy_from_slice(&self.buf[offset..offset + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl Storage for Eeprom {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        println!(
            "    eeprom: write: 0x{offset:04X}[0x{:04X}] #{:>2}",
            bytes.len(),
            self.operations.len()
        );

        if self.operations.len() >= self.fail_after_operation {
            println!("    eeprom: FAULT");
            return Err(EepromError);
        }
        assert!(!bytes.is_empty());

        self.operations.push(Operation::Write {
            offset,
            len: bytes.len(),
        });

        // unlike flash, every byte can be overwritten with any value
        let offset = offset as usize;
        self.buf[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}
