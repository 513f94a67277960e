use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::StoreError;
use crate::family::{HashFamily, Prefix};

const ETAG_XATTR_NAME: &str = "user.etag";

/// On-disk layout: one plain file per (family, prefix), under
/// `<root>/<family>/<PREFIX>.txt`. ETags live in the `user.etag` extended
/// attribute, falling back to a `<shard>.etag` sidecar file on filesystems
/// that reject xattrs (the fallback is a store-wide, not per-shard, choice).
#[derive(Debug, Clone)]
pub struct ShardStore {
    root: PathBuf,
}

impl ShardStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ShardStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn family_dir(&self, family: HashFamily) -> PathBuf {
        self.root.join(family.dir_name())
    }

    pub fn ensure_family_dir(&self, family: HashFamily) -> Result<(), StoreError> {
        let dir = self.family_dir(family);
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io { path: dir, source })
    }

    pub fn path_of(&self, family: HashFamily, prefix: Prefix) -> PathBuf {
        self.family_dir(family).join(format!("{prefix}.txt"))
    }

    fn sidecar_path(shard_path: &Path) -> PathBuf {
        let mut sidecar = shard_path.as_os_str().to_owned();
        sidecar.push(".etag");
        PathBuf::from(sidecar)
    }

    /// Opens the shard for reading. A missing file is reported as
    /// `StoreError::ShardNotFound`, which callers map to "cold miss".
    pub fn open_for_read(&self, path: &Path) -> Result<File, StoreError> {
        match File::open(path) {
            Ok(file) => Ok(file),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::ShardNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn read_to_string(&self, path: &Path) -> Result<String, StoreError> {
        let mut file = self.open_for_read(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(contents)
    }

    /// Creates or truncates the shard and writes `contents`.
    pub fn create_or_overwrite(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        file.write_all(contents).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn set_mtime(&self, path: &Path, t: SystemTime) -> Result<(), StoreError> {
        let t = filetime::FileTime::from_system_time(t);
        filetime::set_file_mtime(path, t).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn mtime(&self, path: &Path) -> Result<SystemTime, StoreError> {
        let metadata = fs::metadata(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        metadata.modified().map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get_etag(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        match xattr::get(path, ETAG_XATTR_NAME) {
            Ok(value) => Ok(value),
            Err(err) if is_xattr_unsupported(&err) => {
                match fs::read(Self::sidecar_path(path)) {
                    Ok(bytes) => Ok(Some(bytes)),
                    Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(source) => Err(StoreError::Io {
                        path: path.to_path_buf(),
                        source,
                    }),
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Xattr {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn set_etag(&self, path: &Path, value: &[u8]) -> Result<(), StoreError> {
        match xattr::set(path, ETAG_XATTR_NAME, value) {
            Ok(()) => Ok(()),
            Err(err) if is_xattr_unsupported(&err) => {
                fs::write(Self::sidecar_path(path), value).map_err(|source| StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Err(source) => Err(StoreError::Xattr {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// `xattr` surfaces "not supported" filesystems as `ENOTSUP`/`EOPNOTSUPP`,
/// both mapped by `std::io` to `Unsupported` on the platforms we target.
fn is_xattr_unsupported(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::Unsupported)
        || err.raw_os_error() == Some(libc_enotsup())
}

#[cfg(target_os = "linux")]
fn libc_enotsup() -> i32 {
    95 // ENOTSUP on Linux
}

#[cfg(not(target_os = "linux"))]
fn libc_enotsup() -> i32 {
    -1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::family::HashFamily;
    use tempfile::tempdir;

    #[test]
    fn path_of_uses_uppercase_prefix_and_family_dir() {
        let dir = tempdir().unwrap();
        let store = ShardStore::new(dir.path());
        let path = store.path_of(HashFamily::Sha1, Prefix::parse("00ab1").unwrap());
        assert_eq!(
            path,
            dir.path().join("sha1").join("00AB1.txt")
        );
    }

    #[test]
    fn overwrite_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let store = ShardStore::new(dir.path());
        let path = store.path_of(HashFamily::Sha1, Prefix::from_index(0));
        store.create_or_overwrite(&path, b"ABC:1\n").unwrap();
        assert_eq!(store.read_to_string(&path).unwrap(), "ABC:1\n");

        store.create_or_overwrite(&path, b"DEF:2\n").unwrap();
        assert_eq!(store.read_to_string(&path).unwrap(), "DEF:2\n");
    }

    #[test]
    fn missing_shard_is_reported_distinctly() {
        let dir = tempdir().unwrap();
        let store = ShardStore::new(dir.path());
        let path = store.path_of(HashFamily::Sha1, Prefix::from_index(1));
        assert!(matches!(
            store.open_for_read(&path),
            Err(StoreError::ShardNotFound { .. })
        ));
    }

    #[test]
    fn etag_round_trips() {
        let dir = tempdir().unwrap();
        let store = ShardStore::new(dir.path());
        let path = store.path_of(HashFamily::Ntlm, Prefix::from_index(2));
        store.create_or_overwrite(&path, b"").unwrap();

        assert_eq!(store.get_etag(&path).unwrap(), None);
        store.set_etag(&path, b"\"abc123\"").unwrap();
        assert_eq!(
            store.get_etag(&path).unwrap(),
            Some(b"\"abc123\"".to_vec())
        );
    }
}
