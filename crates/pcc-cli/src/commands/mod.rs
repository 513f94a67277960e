pub mod export_values;
pub mod import_values;
pub mod output_state;
pub mod run_server;

use pcc_store::HashFamily;

/// Shared `--hash-function`/`--mode` value for the import/export
/// subcommands; kept distinct from `run_server`'s `Mode` (hash vs. psi
/// serving protocol), which is a different axis entirely.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum HashFunctionArg {
    Sha1,
    Ntlm,
}

impl From<HashFunctionArg> for HashFamily {
    fn from(value: HashFunctionArg) -> Self {
        match value {
            HashFunctionArg::Sha1 => HashFamily::Sha1,
            HashFunctionArg::Ntlm => HashFamily::Ntlm,
        }
    }
}
