use std::path::PathBuf;

use clap::Args;

use pcc_import::export_to_file;
use pcc_store::{resolve_storage_root, ShardStore, StateRegistry};

use crate::commands::HashFunctionArg;
use crate::logging::LogArgs;

#[derive(Debug, Args)]
pub struct ExportValuesArgs {
    #[clap(flatten)]
    pub log: LogArgs,

    #[arg(long, value_enum)]
    mode: HashFunctionArg,

    #[arg(long)]
    file: PathBuf,
}

pub fn run(args: ExportValuesArgs) -> anyhow::Result<()> {
    let family = args.mode.into();
    let storage_root = resolve_storage_root();
    let store = ShardStore::new(&storage_root);
    let state = StateRegistry::new(&storage_root);

    export_to_file(&store, &state, family, &args.file)?;
    tracing::info!(%family, path = %args.file.display(), "export complete");
    Ok(())
}
