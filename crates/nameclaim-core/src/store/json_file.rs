use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;

use super::{DocPath, DocumentStore, Documents, Snapshot, Write};
use crate::error::StoreError;

/// Document store persisted to a single JSON file.
///
/// The file is the source of truth: every read reloads it, so several handles
/// (or processes) on one path see each other's commits. A commit holds an
/// exclusive lock on `<path>.lock` while it reloads the file, checks the
/// batch's preconditions and writes the result to a temp file renamed over the
/// target. A crash never leaves a half-applied batch on disk, and two commits
/// never overwrite each other.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
    /// Contents as of the last read or commit; a difference bumps `revision`.
    seen: Mutex<Documents>,
    revision: watch::Sender<u64>,
}

impl JsonFileStore {
    /// Opens the store at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let docs = load(&path)?;
        tracing::debug!(path = %path.display(), documents = docs.len(), "opened document store");

        let mut lock_path = OsString::from(path.as_os_str());
        lock_path.push(".lock");
        let (revision, _) = watch::channel(0);
        Ok(Self {
            path,
            lock_path: PathBuf::from(lock_path),
            seen: Mutex::new(docs),
            revision,
        })
    }

    fn seen(&self) -> MutexGuard<'_, Documents> {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records `docs` as the latest contents, bumping the revision if another
    /// handle changed the file since we last looked.
    fn observe(&self, docs: &Documents) {
        let mut seen = self.seen();
        if *seen != *docs {
            seen.clone_from(docs);
            drop(seen);
            tracing::debug!(path = %self.path.display(), "store changed on disk");
            self.revision.send_modify(|rev| *rev += 1);
        }
    }
}

fn load(path: &Path) -> Result<Documents, StoreError> {
    match fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(Documents::default()),
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Documents::default()),
        Err(e) => Err(e.into()),
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Opens `lock_path` and blocks until it is held exclusively.
///
/// The lock is released when the returned file is dropped.
fn lock_exclusive(lock_path: &Path) -> Result<File, StoreError> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path)?;
    file.lock()?;
    Ok(file)
}

fn persist(path: &Path, docs: &Documents) -> Result<(), StoreError> {
    let mut tmp = tempfile::NamedTempFile::new_in(parent_dir(path))?;
    serde_json::to_writer_pretty(&mut tmp, docs)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

/// Reload, apply and persist under the lock file.
fn commit(path: &Path, lock_path: &Path, writes: Vec<Write>) -> Result<Documents, StoreError> {
    fs::create_dir_all(parent_dir(path))?;
    let _lock = lock_exclusive(lock_path)?;

    let mut docs = load(path)?;
    docs.apply(writes)?;
    persist(path, &docs)?;
    Ok(docs)
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get_document(&self, path: &DocPath) -> Result<Snapshot, StoreError> {
        let docs = load(&self.path)?;
        self.observe(&docs);
        Ok(docs.get(path))
    }

    async fn batch_write(&self, writes: Vec<Write>) -> Result<(), StoreError> {
        let path = self.path.clone();
        let lock_path = self.lock_path.clone();
        let docs = tokio::task::spawn_blocking(move || commit(&path, &lock_path, writes))
            .await
            .map_err(|e| StoreError::Io(io::Error::other(e)))??;

        *self.seen() = docs;
        self.revision.send_modify(|rev| *rev += 1);
        Ok(())
    }

    fn watch(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
