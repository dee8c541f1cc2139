//! Memory-mapped SWC readers.
//!

use crate::{Error, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use swcvox_core::{Importer, TracingPath, TransformParameters};
use swcvox_swc::SwcDocument;

/// A memory-mapped file reader.
///
/// Uses memmap2 to access file contents without copying them into a
/// separate buffer first.
pub struct MappedFileReader {
    // Empty files cannot be mapped on every platform.
    mmap: Option<Mmap>,
    path: PathBuf,
}

impl MappedFileReader {
    /// Opens a file for memory-mapped reading.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or memory-mapped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let mmap = if file.metadata()?.len() == 0 {
            None
        } else {
            // SAFETY: The file is opened read-only and we assume it is not modified concurrently.
            // This is the standard safety contract for memory mapping.
            #[allow(unsafe_code)]
            let mmap = unsafe { Mmap::map(&file)? };
            Some(mmap)
        };
        Ok(Self {
            mmap,
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Returns the file contents as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or_default()
    }

    /// Returns the file contents as UTF-8 text.
    ///
    /// # Errors
    /// Returns [`Error::InvalidFormat`] when the file is not valid UTF-8.
    pub fn as_str(&self) -> Result<&str> {
        std::str::from_utf8(self.as_bytes()).map_err(|e| {
            Error::InvalidFormat(format!(
                "{} is not UTF-8 text: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the path the reader was opened with.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// An SWC file parsed once and importable any number of times.
pub struct SwcFileImporter {
    document: SwcDocument,
    path: PathBuf,
    file_size: usize,
}

impl SwcFileImporter {
    /// Opens and parses an SWC file.
    ///
    /// # Errors
    /// Returns an error if the file is missing, unreadable, not text, or
    /// contains a malformed sample line.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InvalidFormat(format!(
                "the file '{}' is not available",
                path.display()
            )));
        }
        let reader = MappedFileReader::open(path)?;
        let document = SwcDocument::parse(reader.as_str()?)?;
        log::debug!(
            "read {} ({} bytes, {} samples)",
            path.display(),
            reader.len(),
            document.len()
        );
        Ok(Self {
            document,
            path: path.to_path_buf(),
            file_size: reader.len(),
        })
    }

    /// Returns the parsed document.
    #[must_use]
    pub fn document(&self) -> &SwcDocument {
        &self.document
    }

    /// Returns the source path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub fn file_size(&self) -> usize {
        self.file_size
    }
}

impl Importer for SwcFileImporter {
    type Error = swcvox_swc::Error;

    fn import(&self, params: &TransformParameters) -> swcvox_swc::Result<Vec<TracingPath>> {
        self.document.to_paths(params)
    }

    fn source_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| {
                n.to_string_lossy().into_owned()
            })
    }
}
