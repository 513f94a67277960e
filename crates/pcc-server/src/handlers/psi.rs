//! PSI Handler (spec §4.H): per-request PSI server setup and response
//! framing over whichever shard the caller addresses by prefix.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;

use pcc_psi::{DataStructure, PsiServer, Request as PsiRequest};
use pcc_store::{Prefix, StoreError};

use crate::error::ApiError;
use crate::handlers::{require_supported, validate_mode, ModeQuery};
use crate::state::ServerContext;

pub async fn psi_handler(
    State(ctx): State<Arc<ServerContext>>,
    Path(prefix_raw): Path<String>,
    Query(query): Query<ModeQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let prefix = Prefix::parse(&prefix_raw.to_uppercase()).map_err(|_| ApiError::ShardNotAvailable)?;
    let family = validate_mode(query.mode.as_deref())?;
    require_supported(&ctx, family)?;

    // Deserialize and process the client's request before touching the
    // shard store or running any PSI setup crypto, so a malformed body
    // fails cheaply with 400 instead of paying for a shard read and a
    // full blinding pass over its suffixes first.
    let server = ctx.psi.server_for_request();
    let request = PsiRequest::from_bytes(body.to_vec());
    let response = server.process_request(&request)?;

    let path = ctx.store.path_of(family, prefix);
    let contents = match ctx.store.read_to_string(&path) {
        Ok(contents) => contents,
        Err(StoreError::ShardNotFound { .. }) => return Err(ApiError::ShardNotAvailable),
        Err(err) => return Err(err.into()),
    };

    let suffixes: Vec<String> = contents
        .lines()
        .filter_map(|line| line.split_once(':').map(|(suffix, _)| suffix.to_string()))
        .collect();

    let setup = server.create_setup_message(false, 1.0, &suffixes, DataStructure::Raw)?;

    let response_bytes = response.into_bytes();
    let setup_bytes = setup.into_bytes();

    let mut payload = Vec::with_capacity(response_bytes.len() + setup_bytes.len());
    payload.extend_from_slice(&response_bytes);
    payload.extend_from_slice(&setup_bytes);

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(axum::http::header::CONTENT_TYPE, "application/octet-stream")
        .header("PSI-Response-Length", response_bytes.len())
        .header("PSI-Setup-Length", setup_bytes.len())
        .body(Body::from(payload))
        .unwrap())
}
