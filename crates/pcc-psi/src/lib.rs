//! The PSI (Private Set Intersection) library boundary consumed by the
//! PSI handler: a small trait plus a reference Diffie-Hellman backend.
//! The spec treats PSI cryptography as an external collaborator; this
//! crate is the seam a hardened implementation would be dropped behind.

mod dh_backend;
mod error;
mod messages;
mod server;

pub use dh_backend::DhPsiServer;
pub use error::PsiError;
pub use messages::{DataStructure, Request, Response, ServerSetup};
pub use server::PsiServer;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dh_backend::test_client;
    use curve25519_dalek::scalar::Scalar;
    use rand::rngs::OsRng;

    #[test]
    fn raw_setup_detects_intersection() {
        let server = DhPsiServer::create(false);
        let server_set = vec![
            "0005AD76BD555C1D6D771DE417A4B87E4B4".to_string(),
            "000000005AD76BD555C1D6D771DE417A4B8".to_string(),
        ];
        let setup = server
            .create_setup_message(false, 1.0, &server_set, DataStructure::Raw)
            .unwrap();

        let client_key = Scalar::random(&mut OsRng);
        let queries = vec![
            "0005AD76BD555C1D6D771DE417A4B87E4B4".to_string(),
            "NOT-IN-THE-SET-AT-ALL-00000000000000".to_string(),
        ];
        let blinded = test_client::blind(&queries, &client_key);
        let request = Request::from_bytes(bincode::serialize(&blinded).unwrap());

        let response = server.process_request(&request).unwrap();
        let response_points: Vec<[u8; 32]> = bincode::deserialize(response.as_bytes()).unwrap();

        let hits = test_client::intersection_size(&setup, &response_points, &client_key);
        assert_eq!(hits, 1);
    }

    #[test]
    fn gcs_setup_detects_intersection_with_bounded_false_positives() {
        let server = DhPsiServer::create(false);
        let server_set: Vec<String> = (0..64).map(|i| format!("SUFFIX{i:032}")).collect();
        let setup = server
            .create_setup_message(false, 0.01, &server_set, DataStructure::Gcs)
            .unwrap();

        let client_key = Scalar::random(&mut OsRng);
        let queries = vec!["SUFFIX0000000000000000000000000000".to_string()];
        let blinded = test_client::blind(&queries, &client_key);
        let request = Request::from_bytes(bincode::serialize(&blinded).unwrap());

        let response = server.process_request(&request).unwrap();
        let response_points: Vec<[u8; 32]> = bincode::deserialize(response.as_bytes()).unwrap();

        let hits = test_client::intersection_size(&setup, &response_points, &client_key);
        assert_eq!(hits, 1);
    }

    #[test]
    fn malformed_request_bytes_fail_to_decode() {
        let server = DhPsiServer::create(false);
        let request = Request::from_bytes(vec![0xFF, 0x00, 0x01]);
        assert!(server.process_request(&request).is_err());
    }

    #[test]
    fn rejects_invalid_false_positive_rate() {
        let server = DhPsiServer::create(false);
        let err = server
            .create_setup_message(false, 0.0, &[], DataStructure::Raw)
            .unwrap_err();
        assert!(matches!(err, PsiError::InvalidFalsePositiveRate(_)));
    }
}
