mod psi;
mod range;
mod single_hash;

pub use psi::psi_handler;
pub use range::range_handler;
pub use single_hash::single_hash_handler;

use serde::Deserialize;

use pcc_store::HashFamily;

use crate::error::ApiError;

/// Shared `?mode=` query extractor for all three routes.
#[derive(Debug, Deserialize)]
pub(crate) struct ModeQuery {
    pub mode: Option<String>,
}

pub(crate) fn validate_mode(mode: Option<&str>) -> Result<HashFamily, ApiError> {
    match mode.unwrap_or("sha1") {
        "sha1" => Ok(HashFamily::Sha1),
        "ntlm" => Ok(HashFamily::Ntlm),
        other => Err(ApiError::BadRequest(format!(
            "unsupported mode {other:?}, expected \"sha1\" or \"ntlm\""
        ))),
    }
}

pub(crate) fn require_supported(
    ctx: &crate::state::ServerContext,
    family: HashFamily,
) -> Result<(), ApiError> {
    let supported = ctx.state.supported()?;
    if !supported.contains(&family) {
        return Err(ApiError::BadRequest(format!(
            "hash function {family} is not supported by this server"
        )));
    }
    Ok(())
}
