//! `.nib` writer.
//!
//! Packs a sequence over the nib alphabet two bases per byte and writes it
//! behind a magic number and length in the requested byte order. Output is
//! readable by [`SequenceSource`](crate::nib::SequenceSource).

use std::io::Write;
use std::path::Path;

use nibkit_core::{NibkitError, Result};

use crate::nib::ByteOrder;

/// Encode a single base to its nibble value.
#[inline]
fn encode_base(b: u8) -> Result<u8> {
    match b {
        b'T' => Ok(0),
        b'C' => Ok(1),
        b'A' => Ok(2),
        b'G' => Ok(3),
        b'N' => Ok(4),
        b't' => Ok(8),
        b'c' => Ok(9),
        b'a' => Ok(10),
        b'g' => Ok(11),
        b'n' => Ok(12),
        _ => Err(NibkitError::InvalidInput(format!(
            "invalid base for nib encoding: '{}' (0x{:02X}). Only TCAGN and tcagn are supported",
            b as char, b
        ))),
    }
}

/// Pack bases into nibbles, first base in the high nibble.
///
/// An odd-length sequence leaves the low nibble of the last byte zero.
///
/// # Errors
///
/// Returns `NibkitError::InvalidInput` for any byte outside `TCAGNtcagn`.
pub fn encode_nibbles(seq: &[u8]) -> Result<Vec<u8>> {
    seq.chunks(2)
        .map(|pair| -> Result<u8> {
            let hi = encode_base(pair[0])?;
            let lo = match pair.get(1) {
                Some(&b) => encode_base(b)?,
                None => 0,
            };
            Ok((hi << 4) | lo)
        })
        .collect()
}

/// Write a complete nib stream (header and packed data) to `writer`.
pub fn write_nib<W: Write>(writer: &mut W, seq: &[u8], byte_order: ByteOrder) -> Result<()> {
    let length = u32::try_from(seq.len()).map_err(|_| {
        NibkitError::InvalidInput(format!(
            "sequence of {} bases exceeds the nib length field",
            seq.len()
        ))
    })?;
    let packed = encode_nibbles(seq)?;

    writer.write_all(&byte_order.magic_bytes())?;
    writer.write_all(&byte_order.write_u32(length))?;
    writer.write_all(&packed)?;
    Ok(())
}

/// Write a sequence to a `.nib` file, replacing any existing file.
pub fn write_nib_file(path: impl AsRef<Path>, seq: &[u8], byte_order: ByteOrder) -> Result<()> {
    let path = path.as_ref();
    let mut buf = Vec::with_capacity(seq.len() / 2 + 9);
    write_nib(&mut buf, seq, byte_order)?;
    std::fs::write(path, &buf).map_err(|e| {
        NibkitError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })?;
    tracing::debug!(path = %path.display(), bases = seq.len(), "wrote nib file");
    Ok(())
}
