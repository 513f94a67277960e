//! Helpers shared across `pccserver` subcommands.

pub mod commands;
pub mod logging;
pub mod progress;

/// Exits the process with status 1 after logging `message` at both
/// `debug` (with error detail) and `error`, mirroring the teacher's CLI
/// exit convention: the first error encountered becomes the process
/// exit status, with no partial retries.
pub trait OrBail<T> {
    fn or_bail(self, message: &str) -> T;
}

impl<T, E> OrBail<T> for Result<T, E>
where
    E: std::fmt::Display + std::fmt::Debug,
{
    fn or_bail(self, message: &str) -> T {
        match self {
            Ok(t) => t,
            Err(e) => {
                tracing::debug!(error_details = ?e, message);
                tracing::error!(error = %e, message);
                std::process::exit(1);
            }
        }
    }
}
