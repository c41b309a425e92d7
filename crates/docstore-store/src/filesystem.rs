use std::fs::{self, DirBuilder, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use docstore_filter::Filterable;
use docstore_types::{Entry, EntryId};

use crate::error::{StoreError, StoreResult};
use crate::traits::Collection;

const ENTRY_EXTENSION: &str = "json";

/// A collection stored as one JSON file per entry in a single directory.
///
/// Obtained from [`Storage::collection`](crate::Storage::collection). Clones
/// and every other handle for the same name share one lock, which is held
/// for the whole of each operation: directory creation through file write,
/// or directory listing through the last file read.
#[derive(Clone, Debug)]
pub struct FilesystemCollection {
    name: String,
    dir: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FilesystemCollection {
    pub(crate) fn new(name: &str, dir: PathBuf, lock: Arc<Mutex<()>>) -> Self {
        Self {
            name: name.to_string(),
            dir,
            lock,
        }
    }

    /// Directory holding this collection's entry files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deterministic location of the entry with `id`.
    pub fn entry_path(&self, id: EntryId) -> PathBuf {
        self.dir.join(format!("{id}.{ENTRY_EXTENSION}"))
    }

    /// Returns `true` if both handles serialize on the same lock.
    pub fn shares_lock_with(&self, other: &FilesystemCollection) -> bool {
        Arc::ptr_eq(&self.lock, &other.lock)
    }

    /// Number of entry files, without decoding any of them.
    pub fn count_entries(&self) -> StoreResult<usize> {
        let _guard = self.guard()?;
        Ok(self.entry_ids()?.len())
    }

    fn guard(&self) -> StoreResult<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|e| StoreError::LockPoisoned(format!("collection {}: {e}", self.name)))
    }

    fn create_dir(&self) -> io::Result<()> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder.create(&self.dir)
    }

    fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path)?;
        file.write_all(contents)?;
        file.flush()
    }

    /// Identifiers of every entry file, in directory-listing order.
    ///
    /// A missing directory is an empty collection. Sub-directories and files
    /// without the entry extension are ignored; an entry file whose stem is
    /// not an identifier is an error.
    fn entry_ids(&self) -> StoreResult<Vec<EntryId>> {
        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for item in dir {
            let item = item?;
            if !item.file_type()?.is_file() {
                continue;
            }
            let path = item.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            let id = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<EntryId>().ok())
                .ok_or_else(|| StoreError::InvalidEntryFile {
                    collection: self.name.clone(),
                    file: item.file_name().to_string_lossy().into_owned(),
                })?;
            ids.push(id);
        }
        Ok(ids)
    }

    fn read_raw(&self, id: EntryId) -> StoreResult<Vec<u8>> {
        fs::read(self.entry_path(id)).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::EntryDoesNotExist,
            _ => StoreError::Io(e),
        })
    }

    /// Read and decode one entry during a listing.
    fn decode_listed<E: DeserializeOwned>(&self, id: EntryId) -> StoreResult<E> {
        let raw = self.read_raw(id)?;
        serde_json::from_slice(&raw).map_err(|e| {
            warn!(collection = %self.name, %id, error = %e, "entry file is not parsable");
            StoreError::EntryNotParsable {
                id,
                collection: self.name.clone(),
            }
        })
    }
}

impl Collection for FilesystemCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn persist<E>(&self, entry: &mut E) -> StoreResult<()>
    where
        E: Entry + Serialize,
    {
        let _guard = self.guard()?;

        if entry.id().is_nil() {
            entry.set_id(EntryId::new_random());
        }
        let id = entry.id();

        self.create_dir()?;
        let serialized = serde_json::to_vec(&*entry)?;
        Self::write_file(&self.entry_path(id), &serialized)?;

        debug!(collection = %self.name, %id, bytes = serialized.len(), "persisted entry");
        Ok(())
    }

    fn delete<E>(&self, entry: &E) -> StoreResult<()>
    where
        E: Entry + ?Sized,
    {
        let _guard = self.guard()?;

        let id = entry.id();
        fs::remove_file(self.entry_path(id)).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::EntryDoesNotExist,
            _ => StoreError::Io(e),
        })?;

        debug!(collection = %self.name, %id, "deleted entry");
        Ok(())
    }

    fn load<E>(&self, id: EntryId) -> StoreResult<E>
    where
        E: DeserializeOwned,
    {
        let _guard = self.guard()?;

        let raw = self.read_raw(id)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    fn load_all<E>(&self, limit: usize) -> StoreResult<Vec<E>>
    where
        E: DeserializeOwned,
    {
        let _guard = self.guard()?;

        let mut entries = Vec::new();
        for id in self.entry_ids()? {
            if limit != 0 && entries.len() >= limit {
                break;
            }
            entries.push(self.decode_listed(id)?);
        }
        Ok(entries)
    }

    fn query<F, E>(&self, filter: &F, limit: usize) -> StoreResult<Vec<E>>
    where
        F: Filterable + ?Sized,
        E: Serialize + DeserializeOwned,
    {
        let filter = filter.to_filter();
        let _guard = self.guard()?;

        let mut entries = Vec::new();
        for id in self.entry_ids()? {
            let entry: E = self.decode_listed(id)?;
            if filter.matches(&serde_json::to_value(&entry)?) {
                entries.push(entry);
                if limit != 0 && entries.len() >= limit {
                    break;
                }
            }
        }
        Ok(entries)
    }
}
