use std::sync::Arc;

use pcc_psi::{DhPsiServer, PsiServer};
use pcc_store::{ShardStore, StateRegistry};

/// The `Add-Padding` size distribution (spec §4.F, §9 open question): the
/// 1300/+U(0,200) constants from the original implementation, exposed as
/// configuration instead of hardcoded.
#[derive(Debug, Clone, Copy)]
pub struct PaddingPolicy {
    pub floor: u32,
    pub jitter: u32,
}

impl Default for PaddingPolicy {
    fn default() -> Self {
        PaddingPolicy {
            floor: 1300,
            jitter: 200,
        }
    }
}

/// Which query protocol this server instance exposes, selected by
/// `run-server --mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMode {
    Hash,
    Psi,
}

/// How the PSI handler obtains a `DhPsiServer`: a long-lived key shared
/// across requests (the default), or a fresh key minted per request via
/// `--psi-fresh-key-per-request`. Both are correct PSI protocol
/// implementations; the choice only affects whether the server's secret
/// scalar is stable across requests.
pub enum PsiKeying {
    Shared(Arc<DhPsiServer>),
    FreshPerRequest,
}

impl PsiKeying {
    pub(crate) fn server_for_request(&self) -> Arc<DhPsiServer> {
        match self {
            PsiKeying::Shared(server) => server.clone(),
            PsiKeying::FreshPerRequest => Arc::new(DhPsiServer::create(false)),
        }
    }
}

/// Explicit, not a process-wide global: constructed once per server
/// instance and threaded through as `axum::extract::State`, so tests can
/// build isolated instances against a `tempfile::TempDir`.
pub struct ServerContext {
    pub store: ShardStore,
    pub state: StateRegistry,
    pub mode: ServerMode,
    pub padding: PaddingPolicy,
    pub psi: PsiKeying,
}

impl ServerContext {
    pub fn new(store: ShardStore, mode: ServerMode, padding: PaddingPolicy, psi: PsiKeying) -> Self {
        let state = StateRegistry::new(store.root());
        ServerContext {
            store,
            state,
            mode,
            padding,
            psi,
        }
    }
}
