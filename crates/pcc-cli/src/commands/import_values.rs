use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use pcc_import::{
    import_from_api, import_from_file, ApiImporterConfig, FileImporterConfig, NoopProgress,
    ProgressSink,
};
use pcc_store::{resolve_storage_root, ShardStore, StateRegistry};

use crate::commands::HashFunctionArg;
use crate::logging::LogArgs;
use crate::progress::IndicatifProgress;

#[derive(Debug, Args)]
pub struct ImportValuesArgs {
    #[clap(flatten)]
    pub log: LogArgs,

    #[arg(long, value_enum)]
    hash_function: HashFunctionArg,

    /// Upstream base URL to mirror (mutually exclusive with --file).
    #[arg(long)]
    url: Option<String>,

    /// A local sorted master file to carve instead of fetching (mutually exclusive with --url).
    #[arg(long)]
    file: Option<PathBuf>,

    /// Re-fetch every shard even if a stored ETag suggests it is unchanged.
    #[arg(long)]
    force_rewrite: bool,

    /// Stop dispatching new prefixes as soon as one worker fails, instead
    /// of letting every already-queued worker run to completion.
    #[arg(long)]
    fail_fast: bool,

    /// Suppress the progress bar.
    #[arg(long)]
    quiet: bool,
}

pub async fn run(args: ImportValuesArgs) -> anyhow::Result<()> {
    let family = args.hash_function.into();
    let storage_root = resolve_storage_root();
    let store = ShardStore::new(&storage_root);
    let state = StateRegistry::new(&storage_root);

    let progress: Arc<dyn ProgressSink> = if args.quiet {
        Arc::new(NoopProgress)
    } else {
        Arc::new(IndicatifProgress::new())
    };

    match (args.url, args.file) {
        (Some(url), None) => {
            import_from_api(
                &store,
                ApiImporterConfig {
                    base_url: url,
                    family,
                    force_rewrite: args.force_rewrite,
                    fail_fast: args.fail_fast,
                },
                progress,
            )
            .await?;
        }
        (None, Some(master_path)) => {
            import_from_file(
                &store,
                FileImporterConfig {
                    master_path,
                    family,
                    fail_fast: args.fail_fast,
                },
                progress,
            )
            .await?;
        }
        (Some(_), Some(_)) => anyhow::bail!("--url and --file are mutually exclusive"),
        (None, None) => anyhow::bail!("one of --url or --file is required"),
    }

    state.add(family)?;
    tracing::info!(%family, "import complete, family is now queryable");
    Ok(())
}
