use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

use docstore_types::CollectionInfo;

use crate::error::{StoreError, StoreResult};
use crate::filesystem::FilesystemCollection;

const MAX_NAME_LEN: usize = 255;

/// A storage root: the directory that holds one sub-directory per collection.
///
/// `Storage` owns the lock table. Every [`FilesystemCollection`] it hands
/// out for a given name shares a single lock, so handles can be created per
/// request without losing mutual exclusion. The table holds weak references:
/// a lock lives as long as some handle for its name does.
#[derive(Debug)]
pub struct Storage {
    root: PathBuf,
    locks: Mutex<HashMap<String, Weak<Mutex<()>>>>,
}

impl Storage {
    /// Use `root` as the storage root. Nothing is created until the first
    /// entry is persisted.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A handle to the collection called `name`.
    pub fn collection(&self, name: &str) -> StoreResult<FilesystemCollection> {
        validate_collection_name(name)?;
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
            match locks.get(name).and_then(Weak::upgrade) {
                Some(lock) => lock,
                None => {
                    locks.retain(|_, lock| lock.strong_count() > 0);
                    let lock = Arc::new(Mutex::new(()));
                    locks.insert(name.to_string(), Arc::downgrade(&lock));
                    lock
                }
            }
        };
        Ok(FilesystemCollection::new(name, self.root.join(name), lock))
    }

    /// Summaries of every collection under the root, sorted by name.
    ///
    /// A missing root yields an empty list. Entry counts come from file
    /// names only; nothing is decoded.
    pub fn list_collections(&self) -> StoreResult<Vec<CollectionInfo>> {
        let dir = match fs::read_dir(&self.root) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut infos = Vec::new();
        for item in dir {
            let item = item?;
            if !item.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = item.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if validate_collection_name(&name).is_err() {
                continue;
            }
            let entries = self.collection(&name)?.count_entries()?;
            infos.push(CollectionInfo::new(name, entries));
        }
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(infos)
    }
}

/// Check that `name` is usable as a single directory name under the root.
///
/// Rejects empty names, names starting with `.`, path separators and NUL.
pub fn validate_collection_name(name: &str) -> StoreResult<()> {
    let invalid = name.is_empty()
        || name.len() > MAX_NAME_LEN
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(StoreError::InvalidCollectionName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Collection;
    use docstore_types::UntypedEntry;
    use tempfile::TempDir;

    fn persist_n(storage: &Storage, name: &str, n: usize) {
        let collection = storage.collection(name).unwrap();
        for _ in 0..n {
            collection.persist(&mut UntypedEntry::new()).unwrap();
        }
    }

    #[test]
    fn missing_root_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::open(tmp.path().join("does-not-exist"));
        assert!(storage.list_collections().unwrap().is_empty());
    }

    #[test]
    fn lists_collections_with_counts() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::open(tmp.path());
        persist_n(&storage, "books", 3);
        persist_n(&storage, "authors", 1);

        let infos = storage.list_collections().unwrap();
        assert_eq!(
            infos,
            vec![CollectionInfo::new("authors", 1), CollectionInfo::new("books", 3)]
        );
    }

    #[test]
    fn counting_does_not_decode() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::open(tmp.path());
        persist_n(&storage, "books", 1);
        let id = docstore_types::EntryId::new_random();
        fs::write(tmp.path().join("books").join(format!("{id}.json")), b"{ not json").unwrap();

        let infos = storage.list_collections().unwrap();
        assert_eq!(infos[0].entries, 2);
    }

    #[test]
    fn skips_plain_files_and_hidden_dirs() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::open(tmp.path());
        persist_n(&storage, "books", 1);
        fs::write(tmp.path().join("README"), b"hello").unwrap();
        fs::create_dir(tmp.path().join(".trash")).unwrap();

        let infos = storage.list_collections().unwrap();
        assert_eq!(infos.len(), 1);
        assert_eq!(infos[0].name, "books");
    }

    #[test]
    fn empty_collection_dir_counts_zero() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("empty")).unwrap();
        let storage = Storage::open(tmp.path());
        assert_eq!(storage.list_collections().unwrap(), vec![CollectionInfo::new("empty", 0)]);
    }

    #[test]
    fn handles_for_one_name_share_a_lock() {
        let storage = Storage::open("unused");
        let a = storage.collection("books").unwrap();
        let b = storage.collection("books").unwrap();
        let c = storage.collection("authors").unwrap();
        assert!(a.shares_lock_with(&b));
        assert!(a.shares_lock_with(&a.clone()));
        assert!(!a.shares_lock_with(&c));
    }

    #[test]
    fn dropped_handles_release_their_locks() {
        let storage = Storage::open("unused");
        let live = storage.collection("books").unwrap();
        for i in 0..10_000 {
            storage.collection(&format!("never-created-{i}")).unwrap();
        }
        assert!(storage.locks.lock().unwrap().len() <= 2);

        let again = storage.collection("books").unwrap();
        assert!(live.shares_lock_with(&again));

        drop(live);
        drop(again);
        let fresh = storage.collection("authors").unwrap();
        assert_eq!(storage.locks.lock().unwrap().len(), 1);
        assert!(fresh.shares_lock_with(&storage.collection("authors").unwrap()));
    }

    #[test]
    fn rejects_unsafe_names() {
        let storage = Storage::open("unused");
        for name in ["", ".", "..", ".hidden", "a/b", "a\\b", "nul\0"] {
            let err = storage.collection(name).unwrap_err();
            assert!(matches!(err, StoreError::InvalidCollectionName(_)), "{name:?}");
        }
        assert!(storage.collection(&"x".repeat(256)).is_err());
        assert!(storage.collection("test-authors").is_ok());
    }
}
