//! Named, range-checked access to a single `.nib` file.
//!
//! [`NibFile`] owns its stream and pairs it with a parsed
//! [`SequenceSource`]. It adds what the bare decoder leaves to its caller:
//! a sequence name, bounds checking against the header length, and an
//! optional reverse-strand view.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use nibkit_core::{check_window, Annotated, NibkitError, RandomAccessSequence, Result};

use crate::nib::{ByteOrder, SequenceSource};

/// Options for opening a [`NibFile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NibFileOptions {
    /// Sequence name. Defaults to the file stem when opening by path.
    pub name: Option<String>,
    /// Serve windows from the reverse strand.
    pub revcomp: bool,
}

impl NibFileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sequence name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Interpret fetch coordinates on the reverse strand and return
    /// reverse-complemented bases.
    pub fn revcomp(mut self, revcomp: bool) -> Self {
        self.revcomp = revcomp;
        self
    }
}

/// A nib sequence bound to its stream.
pub struct NibFile<R> {
    reader: R,
    source: SequenceSource,
    name: String,
    revcomp: bool,
}

impl NibFile<BufReader<File>> {
    /// Open a `.nib` file with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, NibFileOptions::default())
    }

    /// Open a `.nib` file.
    pub fn open_with(path: impl AsRef<Path>, options: NibFileOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            NibkitError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;
        tracing::debug!(path = %path.display(), "opening nib file");
        let options = with_default_name(options, path);
        Self::from_reader(BufReader::new(file), options)
    }
}

#[cfg(feature = "mmap")]
impl NibFile<std::io::Cursor<nibkit_core::MappedFile>> {
    /// Open a `.nib` file through a read-only memory map.
    pub fn open_mapped(path: impl AsRef<Path>, options: NibFileOptions) -> Result<Self> {
        let path = path.as_ref();
        let mapped = nibkit_core::MappedFile::open(path)?;
        tracing::debug!(path = %path.display(), bytes = mapped.len(), "mapped nib file");
        let options = with_default_name(options, path);
        Self::from_reader(std::io::Cursor::new(mapped), options)
    }
}

impl<R: Read + Seek> NibFile<R> {
    /// Parse the header from `reader`'s current position and take ownership of it.
    pub fn from_reader(mut reader: R, options: NibFileOptions) -> Result<Self> {
        let source = SequenceSource::open(&mut reader)?;
        Ok(Self {
            reader,
            source,
            name: options.name.unwrap_or_default(),
            revcomp: options.revcomp,
        })
    }

    /// Fetch `length` bases starting at `start`.
    ///
    /// With `revcomp` set, `start` counts from the end of the forward strand
    /// and the returned bases are reverse-complemented.
    ///
    /// # Errors
    ///
    /// Returns `NibkitError::Range` if the window extends past the sequence.
    pub fn fetch(&mut self, start: usize, length: usize) -> Result<Vec<u8>> {
        let total = self.source.total_length();
        check_window(start, length, total).map_err(|_| {
            NibkitError::Range(format!(
                "window [{}..{}) out of bounds for {} (length {})",
                start,
                start.saturating_add(length),
                self.name,
                total
            ))
        })?;

        if !self.revcomp {
            return self.source.fetch(&mut self.reader, start, length);
        }
        let forward_start = total - start - length;
        let mut bases = self.source.fetch(&mut self.reader, forward_start, length)?;
        reverse_complement_in_place(&mut bases);
        Ok(bases)
    }

    /// Fetch bases `[start, end)`.
    pub fn fetch_region(&mut self, start: usize, end: usize) -> Result<Vec<u8>> {
        if start > end {
            return Err(NibkitError::Range(format!(
                "region start {} is after end {} in {}",
                start, end, self.name
            )));
        }
        self.fetch(start, end - start)
    }

    /// Fetch the entire sequence.
    pub fn fetch_all(&mut self) -> Result<Vec<u8>> {
        self.fetch(0, self.source.total_length())
    }
}

impl<R> NibFile<R> {
    /// Sequence length in bases, from the header.
    pub fn len(&self) -> usize {
        self.source.total_length()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sequence name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether windows are served from the reverse strand.
    pub fn is_revcomp(&self) -> bool {
        self.revcomp
    }

    /// Byte order of the underlying file.
    pub fn byte_order(&self) -> ByteOrder {
        self.source.byte_order()
    }

    /// The parsed header and decoder.
    pub fn source(&self) -> &SequenceSource {
        &self.source
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R> Annotated for NibFile<R> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<R: Read + Seek> RandomAccessSequence for NibFile<R> {
    fn len(&self) -> usize {
        self.source.total_length()
    }

    fn fetch(&mut self, start: usize, length: usize) -> Result<Vec<u8>> {
        NibFile::fetch(self, start, length)
    }
}

fn with_default_name(mut options: NibFileOptions, path: &Path) -> NibFileOptions {
    if options.name.is_none() {
        options.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }
    options
}

/// Complement within the nib alphabet, keeping case. `N`, `n` and the
/// reserved placeholders map to themselves.
fn nib_complement(b: u8) -> u8 {
    match b {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'a' => b't',
        b't' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        other => other,
    }
}

fn reverse_complement_in_place(bases: &mut [u8]) {
    bases.reverse();
    for b in bases.iter_mut() {
        *b = nib_complement(*b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nib_write::{write_nib, write_nib_file};
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    const SEQ: &[u8] = b"ACGTNacgtnGGA";

    fn in_memory(options: NibFileOptions) -> NibFile<Cursor<Vec<u8>>> {
        let mut raw = Vec::new();
        write_nib(&mut raw, SEQ, ByteOrder::LittleEndian).unwrap();
        NibFile::from_reader(Cursor::new(raw), options).unwrap()
    }

    fn nib_on_disk(seq: &[u8]) -> NamedTempFile {
        let file = tempfile::Builder::new().suffix(".nib").tempfile().unwrap();
        write_nib_file(file.path(), seq, ByteOrder::BigEndian).unwrap();
        file
    }

    #[test]
    fn forward_fetch() {
        let mut nib = in_memory(NibFileOptions::new().name("chrT"));
        assert_eq!(nib.name(), "chrT");
        assert_eq!(nib.len(), SEQ.len());
        assert_eq!(nib.byte_order(), ByteOrder::LittleEndian);
        assert_eq!(nib.fetch(1, 4).unwrap(), b"CGTN");
        assert_eq!(nib.fetch_region(5, 10).unwrap(), b"acgtn");
        assert_eq!(nib.fetch_all().unwrap(), SEQ);
    }

    #[test]
    fn out_of_bounds_is_range_error() {
        let mut nib = in_memory(NibFileOptions::new().name("chrT"));
        let err = nib.fetch(10, 4).unwrap_err();
        assert!(matches!(err, NibkitError::Range(_)));
        assert!(err.to_string().contains("out of bounds for chrT"));

        assert!(matches!(nib.fetch(usize::MAX, 2), Err(NibkitError::Range(_))));
        assert!(matches!(nib.fetch_region(5, 3), Err(NibkitError::Range(_))));
        // The end of the sequence is a valid empty window.
        assert!(nib.fetch(SEQ.len(), 0).unwrap().is_empty());
    }

    #[test]
    fn reverse_strand_fetch() {
        let mut nib = in_memory(NibFileOptions::new().revcomp(true));
        assert!(nib.is_revcomp());
        // Reverse complement of ACGTNacgtnGGA.
        assert_eq!(nib.fetch_all().unwrap(), b"TCCnacgtNACGT");
        assert_eq!(nib.fetch(0, 3).unwrap(), b"TCC");
        assert_eq!(nib.fetch(10, 3).unwrap(), b"CGT");
    }

    #[test]
    fn complement_keeps_placeholders() {
        let mut bases = b"AxXnC".to_vec();
        reverse_complement_in_place(&mut bases);
        assert_eq!(bases, b"GnXxT");
    }

    #[test]
    fn open_by_path_uses_file_stem() {
        let file = nib_on_disk(b"GATTACA");
        let mut nib = NibFile::open(file.path()).unwrap();
        let stem = file.path().file_stem().unwrap().to_string_lossy().into_owned();
        assert_eq!(nib.name(), stem);
        assert_eq!(nib.fetch(1, 3).unwrap(), b"ATT");
    }

    #[test]
    fn open_missing_file() {
        let err = NibFile::open("/nonexistent/chr1.nib").err().unwrap();
        assert!(matches!(err, NibkitError::Io(_)));
        assert!(err.to_string().contains("/nonexistent/chr1.nib"));
    }

    #[test]
    fn open_non_nib_file() {
        let mut file = NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b">chr1\nACGT\n").unwrap();
        let err = NibFile::open(file.path()).err().unwrap();
        assert!(matches!(err, NibkitError::Format(_)));
    }

    #[cfg(feature = "mmap")]
    #[test]
    fn mapped_matches_buffered() {
        let file = nib_on_disk(SEQ);
        let mut buffered = NibFile::open(file.path()).unwrap();
        let mut mapped =
            NibFile::open_mapped(file.path(), NibFileOptions::new().name("m")).unwrap();
        assert_eq!(mapped.name(), "m");
        assert_eq!(mapped.fetch(3, 7).unwrap(), buffered.fetch(3, 7).unwrap());
        assert_eq!(mapped.fetch_all().unwrap(), SEQ);
    }

    #[test]
    fn usable_through_trait() {
        fn first_base(seq: &mut dyn RandomAccessSequence) -> Vec<u8> {
            seq.fetch(0, 1).unwrap()
        }
        let mut nib = in_memory(NibFileOptions::new().name("t"));
        assert_eq!(first_base(&mut nib), b"A");
        assert_eq!(Annotated::name(&nib), "t");
        assert!(!RandomAccessSequence::is_empty(&nib));
    }

    #[test]
    fn into_inner_returns_stream() {
        let nib = in_memory(NibFileOptions::default());
        let cursor = nib.into_inner();
        assert_eq!(cursor.get_ref().len(), 8 + 7);
    }
}
