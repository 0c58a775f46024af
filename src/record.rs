//! The `Record` trait maps a value onto the fixed number of bytes of one slot.
//!
//! Every implementation in this module uses little-endian byte order, which is also the native
//! in-memory order of the AVR parts this layout originates from. Composite records are
//! serialized by concatenating their fields in declaration order without padding.

/// A value with a fixed-width binary layout.
///
/// `serialize` and `deserialize` are only ever called with a buffer of exactly `SIZE` bytes.
///
/// Keep in mind that a record serializing to all zero bytes is indistinguishable from an empty
/// slot. Reading it back yields the content of the first slot of the window instead.
pub trait Record: Sized {
    const SIZE: usize;

    fn serialize(&self, buf: &mut [u8]);

    fn deserialize(buf: &[u8]) -> Self;
}

impl<const N: usize> Record for [u8; N] {
    const SIZE: usize = N;

    fn serialize(&self, buf: &mut [u8]) {
        buf.copy_from_slice(self);
    }

    fn deserialize(buf: &[u8]) -> Self {
        let mut value = [0u8; N];
        value.copy_from_slice(buf);
        value
    }
}

impl Record for bool {
    const SIZE: usize = 1;

    fn serialize(&self, buf: &mut [u8]) {
        buf[0] = *self as u8;
    }

    fn deserialize(buf: &[u8]) -> Self {
        buf[0] != 0
    }
}

macro_rules! impl_record_le {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Record for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                fn serialize(&self, buf: &mut [u8]) {
                    buf.copy_from_slice(&self.to_le_bytes());
                }

                fn deserialize(buf: &[u8]) -> Self {
                    let mut raw = [0u8; core::mem::size_of::<$ty>()];
                    raw.copy_from_slice(buf);
                    <$ty>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_record_le!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
