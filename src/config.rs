//! Configuration types for the engine.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies. The console driver builds an
//! [`EngineConfig`] from its flags; tests build one pointing at a temp dir
//! with zero retry delays.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use contactpack::config::{EngineConfig, RetryPolicy};
//!
//! let config = EngineConfig::new("/tmp/contactpack")
//!     .with_io_retry(RetryPolicy::io().with_delay(Duration::ZERO))
//!     .with_default_contact_name("Kontak");
//!
//! assert_eq!(config.io_retry.max_attempts, 3);
//! assert_eq!(config.delivery_retry.max_attempts, 5);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed-delay retry policy.
///
/// `max_attempts` counts every try including the first one, so a policy of
/// 3 attempts sleeps at most twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of attempts (default: 3)
    pub max_attempts: u32,

    /// Pause between attempts (default: 2 seconds)
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::io()
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt count and delay.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Policy for reading and writing local files: 3 attempts, 2s apart.
    pub fn io() -> Self {
        Self::new(3, Duration::from_secs(2))
    }

    /// Policy for sending result files: 5 attempts, 2s apart.
    pub fn delivery() -> Self {
        Self::new(5, Duration::from_secs(2))
    }

    /// Returns a single-attempt policy.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Sets the delay between attempts.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the total number of attempts. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }
}

/// Configuration for the conversation engine.
///
/// # Example
///
/// ```rust
/// use contactpack::config::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.default_contact_name, "Kontak");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding uploads and generated outputs (default: system temp + `contactpack`)
    pub work_dir: PathBuf,

    /// Retry policy for local file reads and writes
    pub io_retry: RetryPolicy,

    /// Retry policy for delivering result files
    pub delivery_retry: RetryPolicy,

    /// Contact name used when a workflow has no user-supplied base name (default: "Kontak")
    pub default_contact_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir().join("contactpack"),
            io_retry: RetryPolicy::io(),
            delivery_retry: RetryPolicy::delivery(),
            default_contact_name: "Kontak".to_string(),
        }
    }
}

impl EngineConfig {
    /// Creates a configuration rooted at `work_dir` with default policies.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Self::default()
        }
    }

    /// Sets the retry policy for local file operations.
    #[must_use]
    pub fn with_io_retry(mut self, policy: RetryPolicy) -> Self {
        self.io_retry = policy;
        self
    }

    /// Sets the retry policy for result delivery.
    #[must_use]
    pub fn with_delivery_retry(mut self, policy: RetryPolicy) -> Self {
        self.delivery_retry = policy;
        self
    }

    /// Sets the delay of both retry policies at once.
    #[must_use]
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.io_retry.delay = delay;
        self.delivery_retry.delay = delay;
        self
    }

    /// Sets the fallback contact name.
    #[must_use]
    pub fn with_default_contact_name(mut self, name: impl Into<String>) -> Self {
        self.default_contact_name = name.into();
        self
    }
}
