use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use pcc_store::StoreError;

/// Every handler returns `Result<_, ApiError>`; this is the single seam
/// that turns internal failures into the status codes of §7: bad input
/// never logs above `debug`, filesystem/library bugs are `error` and 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("The hash prefix was not in a valid format")]
    ShardNotAvailable,

    #[error("not found")]
    NotFound,

    #[error("decoding PSI request")]
    Psi(#[from] pcc_psi::PsiError),

    #[error("store error")]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) | ApiError::ShardNotAvailable | ApiError::Psi(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::ShardNotFound { .. })
            | ApiError::Store(StoreError::StateNotFound { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        (status, self.to_string()).into_response()
    }
}

/// Maps a shard lookup's `StoreError` the way §4.F/§4.H want it: a missing
/// shard is folded into the generic "invalid format" 400, hiding whether
/// the prefix itself or its containing family is the actual problem.
pub(crate) fn shard_lookup_error(err: StoreError) -> ApiError {
    match err {
        StoreError::ShardNotFound { .. } => ApiError::ShardNotAvailable,
        other => ApiError::Store(other),
    }
}
