//! Result-file delivery with bounded retry.
//!
//! A failed send never ends the workflow. After the last attempt the user gets
//! a short notice and the caller moves on to the next file.

use std::path::Path;

use crate::config::RetryPolicy;
use crate::prompts;
use crate::retry::with_retry;
use crate::transport::{Responder, UserId};

/// Sends one file, retrying transient failures per `policy`.
///
/// Returns `true` when the file was delivered. On failure the user is told
/// and `false` is returned.
pub async fn deliver(
    responder: &dyn Responder,
    user: UserId,
    path: &Path,
    display_name: &str,
    policy: &RetryPolicy,
) -> bool {
    let sent = with_retry(policy, "send file", || responder.send_file(user, path, display_name)).await;

    match sent {
        Ok(()) => {
            tracing::info!(user = %user, file = display_name, "File sent");
            true
        }
        Err(e) => {
            tracing::error!(user = %user, file = display_name, error = %e, "Giving up on file delivery");
            if let Err(e) = responder.reply(user, prompts::DELIVERY_FAILED).await {
                tracing::warn!(user = %user, error = %e, "Failed to report delivery failure");
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::{ContactpackError, Result};

    struct Flaky {
        failures_left: Mutex<u32>,
        permanent: bool,
        sends: Mutex<u32>,
        replies: Mutex<Vec<String>>,
    }

    impl Flaky {
        fn new(failures: u32, permanent: bool) -> Self {
            Self {
                failures_left: Mutex::new(failures),
                permanent,
                sends: Mutex::new(0),
                replies: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Responder for Flaky {
        async fn reply(&self, _user: UserId, text: &str) -> Result<()> {
            self.replies.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn send_file(&self, _user: UserId, _path: &Path, _name: &str) -> Result<()> {
            *self.sends.lock().unwrap() += 1;
            let mut left = self.failures_left.lock().unwrap();
            if *left == 0 {
                return Ok(());
            }
            *left -= 1;
            if self.permanent {
                Err(ContactpackError::permanent_delivery("file too big"))
            } else {
                Err(ContactpackError::transient_delivery("timeout"))
            }
        }
    }

    fn policy() -> RetryPolicy {
        RetryPolicy::delivery().with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_recovers_within_five_attempts() {
        let responder = Flaky::new(4, false);
        assert!(deliver(&responder, UserId(1), Path::new("x"), "x.vcf", &policy()).await);
        assert_eq!(*responder.sends.lock().unwrap(), 5);
        assert!(responder.replies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gives_up_after_five_attempts() {
        let responder = Flaky::new(10, false);
        assert!(!deliver(&responder, UserId(1), Path::new("x"), "x.vcf", &policy()).await);
        assert_eq!(*responder.sends.lock().unwrap(), 5);
        assert_eq!(responder.replies.lock().unwrap().as_slice(), [prompts::DELIVERY_FAILED]);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let responder = Flaky::new(1, true);
        assert!(!deliver(&responder, UserId(1), Path::new("x"), "x.vcf", &policy()).await);
        assert_eq!(*responder.sends.lock().unwrap(), 1);
    }
}
