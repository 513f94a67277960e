//! The HTTP serving path: Range, Single-Hash, and PSI handlers over a
//! read-only `ShardStore`, mounted according to the server's configured
//! `ServerMode`.

mod error;
mod handlers;
mod state;

pub use error::ApiError;
pub use state::{PaddingPolicy, PsiKeying, ServerContext, ServerMode};

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

/// Builds the router for `ctx`. `ServerMode::Hash` mounts the range and
/// single-hash routes; `ServerMode::Psi` mounts the PSI route instead —
/// the two protocols are never served from the same process, matching
/// `run-server --mode`.
pub fn build_router(ctx: Arc<ServerContext>) -> Router {
    let router = match ctx.mode {
        state::ServerMode::Hash => Router::new()
            .route("/range/:prefix", get(handlers::range_handler))
            .route("/pwnedpassword/:hash", get(handlers::single_hash_handler)),
        state::ServerMode::Psi => {
            Router::new().route("/psi/:prefix", post(handlers::psi_handler))
        }
    };

    router
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_origin(tower_http::cors::Any),
        )
        .with_state(ctx)
}
