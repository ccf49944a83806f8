//! Fixed pacing and the single retry after a 429.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::config::Config;
use crate::error::ApiError;

/// Blanket delays applied while enriching applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottlePolicy {
    /// Delay awaited before each per-application API call.
    pub request_delay: Duration,
    /// Wait before the one retry that follows a 429.
    pub rate_limit_backoff: Duration,
}

impl Default for ThrottlePolicy {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_secs(1),
            rate_limit_backoff: Duration::from_secs(30),
        }
    }
}

impl From<&Config> for ThrottlePolicy {
    fn from(config: &Config) -> Self {
        Self {
            request_delay: config.request_delay(),
            rate_limit_backoff: config.rate_limit_backoff(),
        }
    }
}

/// Value produced by [`ThrottlePolicy::retry_once_on_rate_limit`].
#[derive(Debug)]
pub struct Attempt<T> {
    pub value: T,
    /// The first call was rate limited and the retry succeeded.
    pub retried: bool,
}

impl ThrottlePolicy {
    /// No delays at all.
    pub fn immediate() -> Self {
        Self {
            request_delay: Duration::ZERO,
            rate_limit_backoff: Duration::ZERO,
        }
    }

    /// Await the fixed inter-call delay.
    pub async fn pace(&self) {
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
    }

    /// Run `call`; on a 429 wait the backoff and run it exactly once more.
    ///
    /// Any other error, or a second failure, is returned unchanged.
    pub async fn retry_once_on_rate_limit<T, F, Fut>(
        &self,
        what: &str,
        mut call: F,
    ) -> Result<Attempt<T>, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        match call().await {
            Err(e) if e.is_rate_limited() => {
                warn!(
                    "Rate limited on {}, waiting {}s before retrying once",
                    what,
                    self.rate_limit_backoff.as_secs()
                );
                tokio::time::sleep(self.rate_limit_backoff).await;
                call().await.map(|value| Attempt {
                    value,
                    retried: true,
                })
            }
            result => result.map(|value| Attempt {
                value,
                retried: false,
            }),
        }
    }
}
