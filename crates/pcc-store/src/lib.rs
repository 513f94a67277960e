//! On-disk shard store, state registry, and master-file slicer for the
//! password-compromise-check service.

mod error;
mod family;
mod paths;
mod shard;
mod slicer;
mod state;

pub use error::StoreError;
pub use family::{HashFamily, Prefix, PrefixParseError, UnknownHashFamily, PREFIX_COUNT, PREFIX_LEN};
pub use paths::{resolve_storage_root, STORAGE_ROOT_ENV};
pub use shard::ShardStore;
pub use slicer::slice;
pub use state::{State, StateRegistry, STATE_FILE_NAME};
