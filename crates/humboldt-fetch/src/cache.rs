//! File-backed cache of decompressed remote resources.
//!
//! One file per fetched resource, keyed by the URL path after the
//! datafeed base with separators flattened to `-`. Contents are the
//! decompressed bytes, so cache hits skip both the network and the
//! LZMA step. Writes go through a temp file in the same directory and
//! a rename, so concurrent readers observe either the full file or
//! nothing.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::url::BASE_URL;

/// A directory of cached resource files.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Creates a cache over the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Derives the cache key for a URL: the path after the datafeed
    /// base, with `/` flattened to `-`.
    #[must_use]
    pub fn key_for(url: &str) -> String {
        let path = url.strip_prefix(BASE_URL).unwrap_or(url);
        path.trim_start_matches('/').replace('/', "-")
    }

    /// Returns the on-disk path for a URL's cache entry.
    #[must_use]
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(Self::key_for(url))
    }

    /// Reads the cached bytes for a URL, or `None` on a miss.
    ///
    /// # Errors
    ///
    /// Returns the I/O error for anything other than a missing entry.
    pub fn read(&self, url: &str) -> io::Result<Option<Bytes>> {
        match fs::read(self.path_for(url)) {
            Ok(bytes) => Ok(Some(bytes.into())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Writes the bytes for a URL atomically.
    ///
    /// Concurrent writers at the same key are benign: last writer wins
    /// and readers never observe a partial file.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the directory cannot be
    /// created or the entry cannot be written.
    pub fn write(&self, url: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.persist(self.path_for(url)).map_err(|e| e.error)?;
        Ok(())
    }
}
