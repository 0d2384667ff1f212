//! Storage boundary: reading source files and writing results back.
//!
//! The resize pipeline never touches `std::fs` itself; it goes through an
//! [`ImageStore`]. The production [`FileStore`] gives in-place resizes two
//! guarantees:
//!
//! - **Reads** hold a shared advisory lock for as long as the bytes are being
//!   read, so cooperating writers cannot interleave with them.
//! - **Writes** land in a temporary file next to the destination, are flushed
//!   to disk, inherit the destination's permissions and are then renamed over
//!   it. Readers see either the old file or the new one, never a mix.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Byte-level access to where images live.
pub trait ImageStore: Sync {
    /// Read the whole file at `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the contents of `path` with `bytes`.
    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Local filesystem store with locked reads and atomic writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileStore;

impl FileStore {
    pub fn new() -> Self {
        Self
    }
}

impl ImageStore for FileStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let mut file = File::open(path)?;
        match file.lock_shared() {
            Ok(()) => {}
            // Some network filesystems have no advisory locks
            Err(e) if e.kind() == io::ErrorKind::Unsupported => {
                warn!(path = %path.display(), "file locking unsupported, reading unlocked");
            }
            Err(e) => return Err(e),
        }

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "read source");
        Ok(bytes)
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::Builder::new()
            .prefix(".vice-")
            .suffix(".tmp")
            .tempfile_in(dir)?;
        tmp.write_all(bytes)?;
        if let Ok(meta) = fs::metadata(path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        debug!(path = %path.display(), bytes = bytes.len(), "replaced file");
        Ok(())
    }
}
