//! Shard importers and the master-file exporter for the
//! password-compromise-check service.

mod api_importer;
mod error;
mod exporter;
mod file_importer;
mod progress;

pub use api_importer::{import_from_api, ApiImporterConfig};
pub use error::ImportError;
pub use exporter::export_to_file;
pub use file_importer::{import_from_file, FileImporterConfig};
pub use progress::{NoopProgress, ProgressSink};
