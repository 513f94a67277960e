use crate::error::PsiError;
use crate::messages::{DataStructure, Request, Response, ServerSetup};

/// The PSI library boundary this service consumes. The cryptography behind
/// a concrete implementation is deliberately not specified here — see
/// `dh_backend` for the reference implementation this workspace ships.
///
/// A server instance may be long-lived (shared `Arc` across requests, the
/// default) or constructed fresh per request; both are correct because
/// every response is self-contained (`Response` plus `ServerSetup`).
pub trait PsiServer: Send + Sync {
    /// Creates a new server instance. `reveal_intersection` selects between
    /// a protocol variant that only reveals intersection *size* to the
    /// client versus one that reveals the intersecting elements themselves.
    fn create(reveal_intersection: bool) -> Self
    where
        Self: Sized;

    /// Encodes the server's set (e.g. shard suffixes) for the client,
    /// under the requested false-positive rate and on-wire representation.
    fn create_setup_message(
        &self,
        reveal_intersection: bool,
        fpr: f64,
        set: &[String],
        ds: DataStructure,
    ) -> Result<ServerSetup, PsiError>;

    /// Processes a client `Request`, returning the `Response` the client
    /// needs (together with the `ServerSetup`) to learn the intersection.
    fn process_request(&self, request: &Request) -> Result<Response, PsiError>;
}
