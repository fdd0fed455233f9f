//! Model file reading with memory mapping support.
//!
//! Small files are read straight into memory; large ones stay behind a
//! read-only memory map that the payload borrows until it is sent.

// Memory mapping requires unsafe
#![allow(unsafe_code)]

use crate::core::ModelBlob;
use crate::error::{IoError, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Threshold for using memory mapping (1MB).
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Largest model file accepted (1GB).
const MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Model file reader.
///
/// # Examples
///
/// ```no_run
/// use redisai_loader::io::FileReader;
///
/// let reader = FileReader::open("career_model.pt").unwrap();
/// let size = reader.size();
/// let blob = reader.into_blob().unwrap();
/// assert_eq!(blob.len() as u64, size);
/// ```
pub struct FileReader {
    file: File,
    size: u64,
    path: PathBuf,
}

impl FileReader {
    /// Opens a file for reading.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::FileNotFound`] if the file doesn't exist, and
    /// [`IoError::ReadFailed`] if it can't be opened or is too large.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let path_str = path_ref.to_string_lossy().to_string();

        if !path_ref.exists() {
            return Err(IoError::FileNotFound { path: path_str }.into());
        }

        let file = File::open(path_ref).map_err(|e| IoError::ReadFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;

        let metadata = file.metadata().map_err(|e| IoError::ReadFailed {
            path: path_str.clone(),
            reason: e.to_string(),
        })?;

        if metadata.is_dir() {
            return Err(IoError::ReadFailed {
                path: path_str,
                reason: "is a directory".to_string(),
            }
            .into());
        }

        let size = metadata.len();
        if size > MAX_FILE_SIZE {
            return Err(IoError::ReadFailed {
                path: path_str,
                reason: format!("file too large: {size} bytes (max: {MAX_FILE_SIZE} bytes)"),
            }
            .into());
        }

        Ok(Self {
            file,
            size,
            path: path_ref.to_path_buf(),
        })
    }

    /// Returns the file size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Reads the whole file into a [`ModelBlob`].
    ///
    /// # Errors
    ///
    /// Returns an error if reading or mapping fails.
    pub fn into_blob(self) -> Result<ModelBlob> {
        if self.size >= MMAP_THRESHOLD {
            self.map_blob()
        } else {
            self.read_blob()
        }
    }

    fn map_blob(self) -> Result<ModelBlob> {
        // Safety: read-only map; the file must not be truncated while the
        // blob is alive, which holds for a one-shot upload of a local file
        let mmap = unsafe {
            Mmap::map(&self.file).map_err(|e| IoError::MmapFailed {
                path: self.display_path(),
                reason: e.to_string(),
            })?
        };

        Ok(ModelBlob::from_buffer(self.path, mmap))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn read_blob(self) -> Result<ModelBlob> {
        let mut file = &self.file;
        let mut buffer = Vec::with_capacity(self.size as usize);
        file.read_to_end(&mut buffer)
            .map_err(|e| IoError::ReadFailed {
                path: self.display_path(),
                reason: e.to_string(),
            })?;
        Ok(ModelBlob::new(self.path, buffer))
    }

    fn display_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// Reads a model file into a [`ModelBlob`].
///
/// The content is not inspected; empty files are returned as empty blobs.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or too large.
pub fn read_model<P: AsRef<Path>>(path: P) -> Result<ModelBlob> {
    let blob = FileReader::open(&path)?.into_blob()?;
    tracing::debug!(
        path = %blob.source().display(),
        bytes = blob.len(),
        "read model file"
    );
    Ok(blob)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_small_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&[0x80, 0x02, 0x00, 0xff]).unwrap();

        let reader = FileReader::open(temp.path()).unwrap();
        assert_eq!(reader.size(), 4);
        assert_eq!(reader.into_blob().unwrap().as_bytes(), &[0x80, 0x02, 0x00, 0xff]);
    }

    #[test]
    fn test_read_large_file_uses_mmap_path() {
        let mut temp = NamedTempFile::new().unwrap();
        #[allow(clippy::cast_possible_truncation)]
        let content: Vec<u8> = (0..MMAP_THRESHOLD + 17).map(|i| (i % 251) as u8).collect();
        temp.write_all(&content).unwrap();

        let reader = FileReader::open(temp.path()).unwrap();
        assert!(reader.size() >= MMAP_THRESHOLD);
        let blob = reader.into_blob().unwrap();
        assert_eq!(blob.as_bytes(), content.as_slice());
        assert_eq!(blob.source(), temp.path());
    }

    #[test]
    fn test_missing_file() {
        let err = FileReader::open("/nonexistent/career_model.pt")
            .err()
            .unwrap();
        assert!(matches!(err, Error::Io(IoError::FileNotFound { .. })));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileReader::open(dir.path()).err().unwrap();
        assert!(matches!(err, Error::Io(IoError::ReadFailed { .. })));
    }

    #[test]
    fn test_read_model_empty_file() {
        let temp = NamedTempFile::new().unwrap();
        let blob = read_model(temp.path()).unwrap();
        assert!(blob.is_empty());
        assert_eq!(blob.source(), temp.path());
    }
}
