//! Single-Hash Handler (spec §4.G): count lookup for one full hash.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pcc_store::{Prefix, StoreError, PREFIX_LEN};

use crate::error::ApiError;
use crate::handlers::{require_supported, validate_mode, ModeQuery};
use crate::state::ServerContext;

pub async fn single_hash_handler(
    State(ctx): State<Arc<ServerContext>>,
    Path(hash_raw): Path<String>,
    Query(query): Query<ModeQuery>,
) -> Result<Response, ApiError> {
    let family = validate_mode(query.mode.as_deref())?;
    require_supported(&ctx, family)?;

    let hash = hash_raw.to_uppercase();
    if hash.len() != family.full_hash_len() || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ApiError::BadRequest(format!(
            "hash must be {} hex characters for mode {family}",
            family.full_hash_len()
        )));
    }

    let (prefix_str, suffix) = hash.split_at(PREFIX_LEN);
    let prefix = Prefix::parse(prefix_str).expect("length and hex-ness already validated above");

    let path = ctx.store.path_of(family, prefix);
    let contents = match ctx.store.read_to_string(&path) {
        Ok(contents) => contents,
        Err(StoreError::ShardNotFound { .. }) => return Err(ApiError::NotFound),
        Err(err) => return Err(err.into()),
    };

    for line in contents.lines() {
        let Some((line_suffix, count)) = line.split_once(':') else {
            continue;
        };
        if line_suffix != suffix {
            continue;
        }
        let count: u64 = count.trim().parse().unwrap_or(0);
        return if count > 0 {
            Ok((StatusCode::OK, count.to_string()).into_response())
        } else {
            Err(ApiError::NotFound)
        };
    }

    Err(ApiError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_split_matches_store_prefix_length() {
        assert_eq!(PREFIX_LEN, 5);
    }
}
