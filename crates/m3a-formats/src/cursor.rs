//! Bounds-checked sequential reader/writer over an owned byte buffer
//!
//! All multi-byte fields in the directory header are little-endian. Every
//! access either advances the position by exactly the field width or fails
//! with [`FormatError::OutOfBounds`] and leaves the position untouched.

use crate::error::{FormatError, Result};
use std::ops::Range;

/// Largest value representable by the 24-bit index field
pub const U24_MAX: u32 = 0x00FF_FFFF;

/// Little-endian integer with a fixed on-disk width
pub trait FixedWidth: Sized + Copy {
    /// Encoded width in bytes
    const WIDTH: usize;

    /// Decode from exactly `WIDTH` bytes
    fn from_le_slice(bytes: &[u8]) -> Self;

    /// Encode into exactly `WIDTH` bytes
    fn write_le_slice(self, out: &mut [u8]);
}

macro_rules! impl_fixed_width {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn from_le_slice(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(buf)
                }

                fn write_le_slice(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_fixed_width!(u8, u16, u32);

/// Cursor owning a fixed-size byte buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteCursor {
    data: Vec<u8>,
    position: usize,
}

impl ByteCursor {
    /// Wrap existing bytes, positioned at the start
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, position: 0 }
    }

    /// Zero-filled buffer of `len` bytes, ready for writing
    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0; len])
    }

    /// Current position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Total buffer length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Borrow the whole buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Release the buffer
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Reserve the next `width` bytes, advancing past them
    fn take(&mut self, width: usize) -> Result<Range<usize>> {
        let end = self
            .position
            .checked_add(width)
            .filter(|&end| end <= self.data.len())
            .ok_or(FormatError::OutOfBounds {
                position: self.position,
                width,
                len: self.data.len(),
            })?;

        let range = self.position..end;
        self.position = end;
        Ok(range)
    }

    /// Read one fixed-width little-endian value
    pub fn read<T: FixedWidth>(&mut self) -> Result<T> {
        let range = self.take(T::WIDTH)?;
        Ok(T::from_le_slice(&self.data[range]))
    }

    /// Write one fixed-width little-endian value
    pub fn write<T: FixedWidth>(&mut self, value: T) -> Result<()> {
        let range = self.take(T::WIDTH)?;
        value.write_le_slice(&mut self.data[range]);
        Ok(())
    }

    /// Read the 3-byte index field: low 16 bits, then the high byte
    pub fn read_u24(&mut self) -> Result<u32> {
        let range = self.take(3)?;
        let low = u16::from_le_slice(&self.data[range.start..range.start + 2]);
        let high = self.data[range.start + 2];
        Ok(u32::from(low) | (u32::from(high) << 16))
    }

    /// Write the 3-byte index field
    pub fn write_u24(&mut self, value: u32) -> Result<()> {
        if value > U24_MAX {
            return Err(FormatError::FieldOverflow {
                field: "index",
                value: u64::from(value),
            });
        }

        let range = self.take(3)?;
        let slot = &mut self.data[range];
        slot[..2].copy_from_slice(&((value & 0xFFFF) as u16).to_le_bytes());
        slot[2] = (value >> 16) as u8;
        Ok(())
    }

    /// Read `len` raw bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&[u8]> {
        let range = self.take(len)?;
        Ok(&self.data[range])
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let range = self.take(bytes.len())?;
        self.data[range].copy_from_slice(bytes);
        Ok(())
    }

    /// Read a fixed-length string field as raw bytes
    pub fn read_string<const N: usize>(&mut self) -> Result<[u8; N]> {
        let range = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[range]);
        Ok(out)
    }

    /// Write a string field of exactly `max_len` bytes, truncating longer
    /// input and zero-padding shorter input
    pub fn write_string(&mut self, bytes: &[u8], max_len: usize) -> Result<()> {
        let range = self.take(max_len)?;
        let count = bytes.len().min(max_len);
        let slot = &mut self.data[range];
        slot[..count].copy_from_slice(&bytes[..count]);
        slot[count..].fill(0);
        Ok(())
    }
}
