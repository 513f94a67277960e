use std::path::PathBuf;

use pcc_store::{HashFamily, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("store error")]
    Store(#[from] StoreError),

    #[error("fetching {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("upstream returned unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("reading master file {path:?}")]
    MasterFileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("state does not list {0} as imported; run import-values first")]
    FamilyNotImported(HashFamily),

    #[error("{failed} of {total} shards failed to import for {family}")]
    PartialImport {
        family: HashFamily,
        failed: usize,
        total: usize,
    },
}
