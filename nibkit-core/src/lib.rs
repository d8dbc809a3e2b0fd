//! Shared primitives, traits, and utilities for nibkit.
//!
//! `nibkit-core` provides the foundation the sequence readers build on:
//!
//! - **Error types** — [`NibkitError`] and [`Result`] for structured error handling
//! - **Traits** — [`RandomAccessSequence`] and [`Annotated`] for sequence files
//! - **Memory mapping** — Zero-copy file access (`mmap` feature only)

pub mod error;
pub mod traits;

#[cfg(feature = "mmap")]
pub mod mmap;

pub use error::{NibkitError, Result};
pub use traits::*;

#[cfg(feature = "mmap")]
pub use mmap::MappedFile;
