//! Packed nucleotide readers for nibkit.
//!
//! Random access into `.nib` files, which store one DNA sequence at
//! 4 bits per base:
//!
//! - **Decoding** — [`SequenceSource`] parses the header and decodes any
//!   window by reading only the bytes that cover it
//! - **Sequence files** — [`NibFile`] adds a name, bounds checking and a
//!   reverse-strand view on top of the decoder
//! - **Encoding** — [`write_nib`] and [`write_nib_file`] produce nib streams
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use nibkit_seq::{write_nib, ByteOrder, SequenceSource};
//!
//! let mut raw = Vec::new();
//! write_nib(&mut raw, b"GATTACA", ByteOrder::BigEndian).unwrap();
//!
//! let mut stream = Cursor::new(raw);
//! let source = SequenceSource::open(&mut stream).unwrap();
//! assert_eq!(source.total_length(), 7);
//! assert_eq!(source.fetch(&mut stream, 1, 4).unwrap(), b"ATTA");
//! ```

pub mod nib;
pub mod nib_file;
pub mod nib_write;

pub use nib::{ByteOrder, NibHeader, SequenceSource, NIB_I2C_TABLE};
pub use nib_file::{NibFile, NibFileOptions};
pub use nib_write::{encode_nibbles, write_nib, write_nib_file};
