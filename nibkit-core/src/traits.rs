//! Core trait definitions for nibkit.
//!
//! These traits define the contracts that sequence sources implement across crates.

use crate::Result;

/// A type that carries annotations (names, descriptions, metadata).
pub trait Annotated {
    /// A human-readable name or identifier.
    fn name(&self) -> &str;

    /// An optional description.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// A sequence that can be sliced without loading it whole.
///
/// Coordinates are 0-based character offsets. Implementors validate that the
/// requested window lies inside the sequence and report
/// [`NibkitError::Range`](crate::NibkitError::Range) otherwise.
pub trait RandomAccessSequence: Annotated {
    /// Length in bases.
    fn len(&self) -> usize;

    /// Whether the sequence is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch `length` bases starting at `start`.
    fn fetch(&mut self, start: usize, length: usize) -> Result<Vec<u8>>;

    /// Fetch the entire sequence.
    fn fetch_all(&mut self) -> Result<Vec<u8>> {
        let len = self.len();
        self.fetch(0, len)
    }
}

/// Check that `[start, start + length)` lies within a sequence of `total` bases.
pub fn check_window(start: usize, length: usize, total: usize) -> Result<()> {
    match start.checked_add(length) {
        Some(end) if end <= total => Ok(()),
        _ => Err(crate::NibkitError::Range(format!(
            "window start {} length {} out of bounds (length {})",
            start, length, total
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NibkitError;

    struct Fixed(&'static [u8]);

    impl Annotated for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
    }

    impl RandomAccessSequence for Fixed {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn fetch(&mut self, start: usize, length: usize) -> Result<Vec<u8>> {
            check_window(start, length, self.0.len())?;
            Ok(self.0[start..start + length].to_vec())
        }
    }

    #[test]
    fn default_fetch_all() {
        let mut seq = Fixed(b"ACGT");
        assert_eq!(seq.fetch_all().unwrap(), b"ACGT");
        assert!(!seq.is_empty());
        assert_eq!(seq.description(), None);
    }

    #[test]
    fn window_bounds() {
        assert!(check_window(0, 4, 4).is_ok());
        assert!(check_window(4, 0, 4).is_ok());
        assert!(matches!(check_window(3, 2, 4), Err(NibkitError::Range(_))));
        assert!(matches!(
            check_window(usize::MAX, 1, 4),
            Err(NibkitError::Range(_))
        ));
    }
}
