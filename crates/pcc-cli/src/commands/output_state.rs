use clap::Args;

use pcc_store::{resolve_storage_root, StateRegistry};

use crate::logging::LogArgs;

#[derive(Debug, Args)]
pub struct OutputStateArgs {
    #[clap(flatten)]
    pub log: LogArgs,

    #[arg(long)]
    json: bool,
}

pub fn run(args: OutputStateArgs) -> anyhow::Result<()> {
    let storage_root = resolve_storage_root();
    let registry = StateRegistry::new(&storage_root);
    let state = registry.read()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else if state.supported_hash_functions.is_empty() {
        println!("no hash functions imported yet");
    } else {
        for family in &state.supported_hash_functions {
            println!("{family}");
        }
    }
    Ok(())
}
