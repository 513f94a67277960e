use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("shard {path:?} not found")]
    ShardNotFound { path: PathBuf },

    #[error("state file {path:?} not found")]
    StateNotFound { path: PathBuf },

    #[error("io error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reading extended attribute on {path:?}")]
    Xattr {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decoding state file {path:?}")]
    StateDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
