/// Notified once per completed prefix during an import or export run, so a
/// CLI frontend can drive a progress bar while library callers with no
/// terminal can no-op it. Mirrors the original's global `progressbar`
/// gated behind `--quiet`, generalized into an injectable collaborator.
pub trait ProgressSink: Send + Sync {
    /// Total unit count, called once before any `inc` call.
    fn set_len(&self, len: u64);

    /// One unit of work finished, whether it succeeded or failed.
    fn inc(&self);

    /// All units finished.
    fn finish(&self);
}

/// The default sink: does nothing. Used by library callers and by `--quiet`.
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn set_len(&self, _len: u64) {}
    fn inc(&self) {}
    fn finish(&self) {}
}
