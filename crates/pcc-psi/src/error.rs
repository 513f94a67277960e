#[derive(Debug, thiserror::Error)]
pub enum PsiError {
    #[error("decoding PSI message")]
    Decode(#[from] bincode::Error),

    #[error("fpr must be in (0, 1], got {0}")]
    InvalidFalsePositiveRate(f64),

    #[error("request contained a point that does not decode to a valid curve element")]
    MalformedPoint,
}
