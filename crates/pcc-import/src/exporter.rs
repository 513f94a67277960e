//! Master-file exporter (spec §4.E'): the inverse of the file importer,
//! reassembling a sorted master file from an already-imported family's
//! shards. Sequential by construction — output order must be ascending by
//! prefix to produce a sorted file, so unlike the importers this does not
//! use a bounded worker pool.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use pcc_store::{HashFamily, Prefix, ShardStore, StateRegistry, StoreError};

use crate::error::ImportError;

pub fn export_to_file(
    store: &ShardStore,
    state: &StateRegistry,
    family: HashFamily,
    destination: &Path,
) -> Result<(), ImportError> {
    let supported = state.supported()?;
    if !supported.contains(&family) {
        return Err(ImportError::FamilyNotImported(family));
    }

    let out_file = File::create(destination).map_err(|source| ImportError::MasterFileIo {
        path: destination.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(out_file);

    for prefix in Prefix::iter_all() {
        write_shard(store, family, prefix, &mut writer, destination)?;
    }

    writer.flush().map_err(|source| ImportError::MasterFileIo {
        path: destination.to_path_buf(),
        source,
    })
}

fn write_shard(
    store: &ShardStore,
    family: HashFamily,
    prefix: Prefix,
    writer: &mut impl Write,
    destination: &Path,
) -> Result<(), ImportError> {
    let path = store.path_of(family, prefix);
    let file = match store.open_for_read(&path) {
        Ok(file) => file,
        Err(StoreError::ShardNotFound { .. }) => return Ok(()),
        Err(source) => return Err(source.into()),
    };

    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| ImportError::MasterFileIo {
            path: path.clone(),
            source,
        })?;
        if line.is_empty() {
            continue;
        }
        writeln!(writer, "{prefix}{line}").map_err(|source| ImportError::MasterFileIo {
            path: destination.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn export_requires_prior_import() {
        let dir = tempdir().unwrap();
        let store = ShardStore::new(dir.path());
        let state = StateRegistry::new(dir.path());
        let dest = dir.path().join("out.txt");

        let err = export_to_file(&store, &state, HashFamily::Sha1, &dest).unwrap_err();
        assert!(matches!(err, ImportError::FamilyNotImported(HashFamily::Sha1)));
    }

    #[test]
    fn export_reassembles_prefixed_lines_in_ascending_order() {
        let dir = tempdir().unwrap();
        let store = ShardStore::new(dir.path());
        let state = StateRegistry::new(dir.path());

        let first = Prefix::parse("00000").unwrap();
        let second = Prefix::parse("00001").unwrap();
        store
            .create_or_overwrite(&store.path_of(HashFamily::Sha1, first), b"AAA:1\n")
            .unwrap();
        store
            .create_or_overwrite(&store.path_of(HashFamily::Sha1, second), b"BBB:2\n")
            .unwrap();
        state.add(HashFamily::Sha1).unwrap();

        let dest = dir.path().join("out.txt");
        export_to_file(&store, &state, HashFamily::Sha1, &dest).unwrap();

        let contents = std::fs::read_to_string(&dest).unwrap();
        assert_eq!(contents, "00000AAA:1\n00001BBB:2\n");
    }
}
