use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::Args;

use pcc_psi::{DhPsiServer, PsiServer};
use pcc_server::{build_router, PaddingPolicy, PsiKeying, ServerContext, ServerMode};
use pcc_store::{resolve_storage_root, ShardStore};

use crate::logging::LogArgs;

#[derive(Debug, Args)]
pub struct RunServerArgs {
    #[clap(flatten)]
    pub log: LogArgs,

    #[arg(long, default_value_t = 8080)]
    port: u16,

    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    #[arg(long, value_enum, default_value_t = Mode::Hash)]
    mode: Mode,

    /// Mint a fresh PSI key per request instead of reusing one built at startup.
    #[arg(long)]
    psi_fresh_key_per_request: bool,

    #[arg(long, default_value_t = 1300)]
    padding_floor: u32,

    #[arg(long, default_value_t = 200)]
    padding_jitter: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Mode {
    Hash,
    Psi,
}

pub async fn run(args: RunServerArgs) -> anyhow::Result<()> {
    let storage_root = resolve_storage_root();
    let store = ShardStore::new(storage_root);

    let mode = match args.mode {
        Mode::Hash => ServerMode::Hash,
        Mode::Psi => ServerMode::Psi,
    };
    let psi = if args.psi_fresh_key_per_request {
        PsiKeying::FreshPerRequest
    } else {
        PsiKeying::Shared(Arc::new(DhPsiServer::create(false)))
    };
    let padding = PaddingPolicy {
        floor: args.padding_floor,
        jitter: args.padding_jitter,
    };

    let ctx = Arc::new(ServerContext::new(store, mode, padding, psi));
    let app = build_router(ctx);

    let addr = SocketAddr::new(args.host, args.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, mode = ?args.mode, "pccserver listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
    tracing::info!("shutdown signal received, stopping pccserver");
}
