//! A reference `PsiServer` backed by a textbook Diffie-Hellman PSI
//! protocol over the Ristretto group (`curve25519-dalek`): elements are
//! mapped to curve points via hash-to-group, and the server multiplies
//! points by its own secret scalar. Because scalar multiplication on the
//! group commutes (`a*(b*P) == b*(a*P)`), a client that applies its own
//! secret scalar to both the server's set and its own blinded query can
//! detect intersection without either side learning the other's elements.
//!
//! This is a genuine (if unoptimized, semi-honest-model) PSI construction,
//! not a placeholder — but the spec treats the PSI library as an external
//! collaborator, so swapping this module for a hardened implementation
//! (batched OPRF, malicious-secure PSI, etc.) changes nothing above the
//! `PsiServer` trait.

use std::collections::BTreeSet;

use bloomfilter::Bloom;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::error::PsiError;
use crate::messages::{DataStructure, Request, Response, ServerSetup};
use crate::server::PsiServer;

/// Points are fixed-size 32-byte compressed Ristretto elements.
type PointBytes = [u8; 32];

#[derive(Serialize, Deserialize)]
enum SetupPayload {
    Raw(BTreeSet<PointBytes>),
    Gcs { bloom: Bloom<PointBytes> },
}

fn hash_to_point(element: &str) -> RistrettoPoint {
    let mut hasher = Sha512::new();
    hasher.update(b"pcc-psi/hash-to-group/v1");
    hasher.update(element.as_bytes());
    let digest = hasher.finalize();
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&digest);
    RistrettoPoint::from_uniform_bytes(&wide)
}

/// A `PsiServer` holding a persistent secret scalar. Construct once at
/// startup and share via `Arc` (the default), or construct fresh per
/// request for forward secrecy of server state at the cost of CPU.
pub struct DhPsiServer {
    key: Scalar,
    reveal_intersection: bool,
}

impl PsiServer for DhPsiServer {
    fn create(reveal_intersection: bool) -> Self {
        let mut rng = OsRng;
        DhPsiServer {
            key: Scalar::random(&mut rng),
            reveal_intersection,
        }
    }

    fn create_setup_message(
        &self,
        _reveal_intersection: bool,
        fpr: f64,
        set: &[String],
        ds: DataStructure,
    ) -> Result<ServerSetup, PsiError> {
        if !(0.0 < fpr && fpr <= 1.0) {
            return Err(PsiError::InvalidFalsePositiveRate(fpr));
        }

        let blinded: Vec<PointBytes> = set
            .iter()
            .map(|element| (self.key * hash_to_point(element)).compress().to_bytes())
            .collect();

        let payload = match ds {
            DataStructure::Raw => SetupPayload::Raw(blinded.into_iter().collect()),
            DataStructure::Gcs => {
                let count = blinded.len().max(1);
                let mut bloom = Bloom::new_for_fp_rate(count, fpr);
                for point in &blinded {
                    bloom.set(point);
                }
                SetupPayload::Gcs { bloom }
            }
        };

        let bytes = bincode::serialize(&payload)?;
        Ok(ServerSetup::from_bytes(bytes))
    }

    fn process_request(&self, request: &Request) -> Result<Response, PsiError> {
        let query_points: Vec<PointBytes> = bincode::deserialize(request.as_bytes())?;

        let reblinded: Vec<PointBytes> = query_points
            .into_iter()
            .map(|bytes| {
                let compressed = CompressedRistretto(bytes);
                let point = compressed.decompress().ok_or(PsiError::MalformedPoint)?;
                Ok((self.key * point).compress().to_bytes())
            })
            .collect::<Result<_, PsiError>>()?;

        tracing::debug!(
            reveal_intersection = self.reveal_intersection,
            queries = reblinded.len(),
            "processed PSI request"
        );

        Ok(Response::from_bytes(bincode::serialize(&reblinded)?))
    }
}
