//! Fixed-delay retry for transient failures.
//!
//! Two policies are used in practice (see [`RetryPolicy`]): local file I/O
//! gets 3 attempts and result delivery gets 5, both with a 2 second pause.
//! Only errors classified as transient by [`IsRetryable`] are retried; anything
//! else is returned after the first attempt.
//!
//! # Example
//!
//! ```rust
//! use contactpack::config::RetryPolicy;
//! use contactpack::retry::with_retry;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> contactpack::Result<()> {
//! let policy = RetryPolicy::io().with_delay(std::time::Duration::ZERO);
//! let value = with_retry(&policy, "read upload", || async {
//!     Ok::<_, contactpack::ContactpackError>(42)
//! }).await?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;
use std::future::Future;
use std::io;

use crate::config::RetryPolicy;
use crate::error::ContactpackError;

/// Trait for errors that can be classified as retryable or not.
///
/// Transient failures (timeouts, interrupted reads, network resets) return `true`.
/// Permanent failures (bad input, missing files, corrupt data) return `false`.
pub trait IsRetryable {
    /// Returns true if the operation that produced this error should be retried.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for ContactpackError {
    fn is_retryable(&self) -> bool {
        match self {
            ContactpackError::Io(e) => !matches!(
                e.kind(),
                io::ErrorKind::NotFound
                    | io::ErrorKind::PermissionDenied
                    | io::ErrorKind::InvalidInput
                    | io::ErrorKind::InvalidData
            ),
            ContactpackError::Delivery { transient, .. } => *transient,
            _ => false,
        }
    }
}

/// Runs `operation` until it succeeds, fails permanently, or the policy runs out.
///
/// `what` names the operation in log lines. The last error is returned when
/// all attempts are exhausted.
pub async fn with_retry<F, Fut, T, E>(policy: &RetryPolicy, what: &str, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + Display,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(operation = what, attempts = attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempt < policy.max_attempts => {
                tracing::warn!(
                    operation = what,
                    error = %e,
                    attempt = attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = policy.delay.as_millis(),
                    "Operation failed, retrying"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::error!(
                        operation = what,
                        error = %e,
                        attempts = attempt,
                        "Operation failed after all retry attempts exhausted"
                    );
                } else {
                    tracing::debug!(operation = what, error = %e, "Operation failed with permanent error");
                }
                return Err(e);
            }
        }
    }
}
