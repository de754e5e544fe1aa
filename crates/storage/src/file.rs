//! FileStorage: one durable file per key
//!
//! Each key maps to `<dir>/<base64url(key)>.json`. Writes go to a sibling
//! temporary file that is renamed over the slot, so a reader never observes a
//! half-written document. With `sync_writes` the temporary file is fsynced
//! before the rename.
//!
//! # Design Notes
//!
//! - **Key encoding**: URL-safe base64 without padding, so any key string is a
//!   valid file name on every platform
//! - **Single process**: an in-process mutex serializes writes; no file locks
//!   are taken, so concurrent processes follow last-writer-wins

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use parking_lot::Mutex;
use tracing::{debug, warn};

use jstore_core::{Result, Storage};

const SLOT_EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "json.tmp";

/// File-backed storage backend
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
    sync_writes: bool,
    write_lock: Mutex<()>,
}

impl FileStorage {
    /// Open (creating if needed) a storage directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            sync_writes: true,
            write_lock: Mutex::new(()),
        })
    }

    /// Enable or disable fsync before each slot replace
    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// The storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether writes are fsynced
    pub fn sync_writes(&self) -> bool {
        self.sync_writes
    }

    /// Path of the file backing `key`
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", URL_SAFE_NO_PAD.encode(key), SLOT_EXTENSION))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", URL_SAFE_NO_PAD.encode(key), TEMP_EXTENSION))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.slot_path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, text: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        let temp = self.temp_path(key);
        let slot = self.slot_path(key);

        let written = (|| -> io::Result<()> {
            let mut file = fs::File::create(&temp)?;
            file.write_all(text.as_bytes())?;
            if self.sync_writes {
                file.sync_all()?;
            }
            fs::rename(&temp, &slot)
        })();

        if let Err(e) = written {
            warn!(target: "jstore::storage", slot = %slot.display(), error = %e, "Slot write failed");
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }
        debug!(target: "jstore::storage", slot = %slot.display(), bytes = text.len(), "Slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        match fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.slot_path(key).is_file())
    }
}
