//! Random-access reader for `.nib` packed DNA.
//!
//! A nib stream stores one sequence at 4 bits per base over a fixed
//! ten-letter alphabet (`TCAGN` in upper and lower case):
//!
//! ```text
//! offset 0x00  4 bytes  magic   6B E9 3D 3A (big-endian) or 3A 3D E9 6B (little-endian)
//! offset 0x04  4 bytes  length  u32 in the byte order of the magic, in bases
//! offset 0x08  ...      data    ceil(length / 2) bytes, high nibble first
//! ```
//!
//! [`SequenceSource`] parses the header once and then decodes arbitrary
//! windows by reading only the bytes that cover them. It does not own the
//! stream: each call to [`SequenceSource::fetch`] borrows it mutably, so
//! two fetches on the same handle cannot interleave their seek and read.

use std::io::{Read, Seek, SeekFrom};

use nibkit_core::{NibkitError, Result};

/// Magic number as read big-endian from a big-endian nib file.
pub const NIB_MAGIC_NUMBER: u32 = 0x6BE9_3D3A;
/// The same magic as read big-endian from a little-endian nib file.
pub const NIB_MAGIC_NUMBER_SWAP: u32 = 0x3A3D_E96B;

const NIB_MAGIC_SIZE: u64 = 4;
const NIB_LENGTH_SIZE: u64 = 4;
/// Offset of the packed data region.
pub const NIB_HEADER_SIZE: u64 = NIB_MAGIC_SIZE + NIB_LENGTH_SIZE;

/// Nibble value → base. Slots 5–7 and 13–15 are never written by encoders
/// and decode to the placeholders `X` and `x`.
pub static NIB_I2C_TABLE: [u8; 16] = *b"TCAGNXXXtcagnxxx";

/// Nibble values with no base assigned.
const RESERVED_NIBBLES: u16 = 0b1110_0000_1110_0000;

/// Byte order of the multi-byte header fields, fixed by the magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    /// Resolve the byte order from the first four bytes of a stream.
    ///
    /// Returns `None` if the bytes are not a nib magic number in either order.
    pub fn from_magic(raw: [u8; 4]) -> Option<Self> {
        match u32::from_be_bytes(raw) {
            NIB_MAGIC_NUMBER => Some(ByteOrder::BigEndian),
            NIB_MAGIC_NUMBER_SWAP => Some(ByteOrder::LittleEndian),
            _ => None,
        }
    }

    /// Decode a `u32` field written in this byte order.
    pub fn read_u32(self, raw: [u8; 4]) -> u32 {
        match self {
            ByteOrder::BigEndian => u32::from_be_bytes(raw),
            ByteOrder::LittleEndian => u32::from_le_bytes(raw),
        }
    }

    /// Encode a `u32` field in this byte order.
    pub fn write_u32(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        }
    }

    /// The magic number bytes that announce this byte order.
    pub fn magic_bytes(self) -> [u8; 4] {
        self.write_u32(NIB_MAGIC_NUMBER)
    }
}

/// Snapshot of a parsed nib header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NibHeader {
    /// Byte order of the header fields.
    pub byte_order: ByteOrder,
    /// Magic number as it appeared on disk, read big-endian.
    pub magic: u32,
    /// Number of bases in the sequence.
    pub total_length: u32,
}

/// One opened nib stream: the validated header plus the windowed decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSource {
    byte_order: ByteOrder,
    magic: u32,
    total_length: u32,
}

impl SequenceSource {
    /// Parse the 8-byte header at the stream's current position.
    ///
    /// On success the stream has advanced by exactly 8 bytes. A bad magic
    /// number stops after the first 4 bytes; the length field is left unread.
    ///
    /// # Errors
    ///
    /// - [`NibkitError::Format`] if the magic matches neither byte order.
    /// - [`NibkitError::Io`] if the stream ends before the header does.
    pub fn open<R: Read>(stream: &mut R) -> Result<Self> {
        let mut raw = [0u8; NIB_MAGIC_SIZE as usize];
        stream.read_exact(&mut raw)?;
        let magic = u32::from_be_bytes(raw);
        let byte_order = ByteOrder::from_magic(raw).ok_or_else(|| {
            NibkitError::Format(format!(
                "not a recognized nib stream (magic 0x{:08X})",
                magic
            ))
        })?;

        let mut raw = [0u8; NIB_LENGTH_SIZE as usize];
        stream.read_exact(&mut raw)?;
        let total_length = byte_order.read_u32(raw);

        tracing::debug!(?byte_order, total_length, "parsed nib header");

        Ok(Self {
            byte_order,
            magic,
            total_length,
        })
    }

    /// Byte order established by the magic number.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Raw magic value, read big-endian.
    pub fn magic(&self) -> u32 {
        self.magic
    }

    /// Number of bases in the sequence.
    pub fn total_length(&self) -> usize {
        self.total_length as usize
    }

    /// Copy of the parsed header fields.
    pub fn header(&self) -> NibHeader {
        NibHeader {
            byte_order: self.byte_order,
            magic: self.magic,
            total_length: self.total_length,
        }
    }

    /// Decode `length` bases starting at base `start`.
    ///
    /// Bounds against [`total_length`](Self::total_length) are the caller's
    /// job; this only requires the covering bytes to be readable. A zero
    /// `length` returns immediately without touching the stream.
    ///
    /// # Errors
    ///
    /// - [`NibkitError::Io`] if the stream holds fewer bytes than the window
    ///   needs. The result is never silently shortened.
    /// - [`NibkitError::InvalidInput`] if `start + length` overflows.
    pub fn fetch<R: Read + Seek>(
        &self,
        stream: &mut R,
        start: usize,
        length: usize,
    ) -> Result<Vec<u8>> {
        let Some((block_start, block_len)) = block_range(start, length)? else {
            return Ok(Vec::new());
        };

        tracing::trace!(start, length, block_start, block_len, "nib fetch");

        stream.seek(SeekFrom::Start(NIB_HEADER_SIZE + block_start as u64))?;
        let mut block = vec![0u8; block_len];
        stream.read_exact(&mut block)?;

        let bases = unpack_window(&block, start, length);
        debug_assert_eq!(bases.len(), length, "nib window arithmetic is off");
        Ok(bases)
    }
}

/// Byte span `(block_start, block_len)` of the data region covering a window,
/// or `None` for an empty window.
pub fn block_range(start: usize, length: usize) -> Result<Option<(usize, usize)>> {
    if length == 0 {
        return Ok(None);
    }
    let end = start.checked_add(length).ok_or_else(|| {
        NibkitError::InvalidInput(format!(
            "window start {} length {} overflows",
            start, length
        ))
    })?;
    let block_start = start / 2;
    let block_end = (end - 1) / 2;
    Ok(Some((block_start, block_end - block_start + 1)))
}

/// Number of packed bytes holding `length` bases.
pub fn packed_len(length: usize) -> usize {
    length / 2 + length % 2
}

/// Unpack one byte into its two bases, high nibble first.
#[inline]
pub fn decode_byte(b: u8) -> [u8; 2] {
    [
        NIB_I2C_TABLE[((b >> 4) & 0xF) as usize],
        NIB_I2C_TABLE[(b & 0xF) as usize],
    ]
}

/// Unpack the bytes covering a window and trim the half-byte overhang.
///
/// `block` must be exactly the bytes from `start / 2` through
/// `(start + length - 1) / 2`, as computed by [`block_range`].
pub fn unpack_window(block: &[u8], start: usize, length: usize) -> Vec<u8> {
    let mut bases = Vec::with_capacity(block.len() * 2);
    for &b in block {
        bases.extend_from_slice(&decode_byte(b));
    }

    // An odd start lands on the low nibble of the first byte.
    if start & 1 == 1 && !bases.is_empty() {
        bases.remove(0);
    }
    // An odd end leaves the low nibble of the last byte unused.
    if start.wrapping_add(length) & 1 == 1 {
        bases.pop();
    }
    bases
}

/// Count nibbles in a packed block that decode to a reserved placeholder.
///
/// The decoder passes such values through unchanged; this lets a caller
/// decide whether to treat them as corruption.
pub fn count_reserved(block: &[u8]) -> usize {
    block
        .iter()
        .map(|&b| {
            let hi = (RESERVED_NIBBLES >> (b >> 4)) & 1;
            let lo = (RESERVED_NIBBLES >> (b & 0xF)) & 1;
            (hi + lo) as usize
        })
        .sum()
}
