//! Retry logic with exponential backoff
//!
//! Every ClickUp request runs through [`with_backoff`]. Failures are classified
//! by [`IsRetryable::retry_action`]:
//!
//! - [`RetryAction::Backoff`]: sleep for the current delay, multiply the delay, try again
//! - [`RetryAction::Immediate`]: log and try again right away, delay unchanged
//! - [`RetryAction::Fail`]: return the error without retrying
//!
//! Each attempt consumes one slot of `max_attempts`. When the budget is spent the
//! error produced by [`IsRetryable::exhausted`] is returned. Delays are
//! deterministic: no jitter, no cap.
//!
//! # Example
//!
//! ```no_run
//! use clickup_sheets_sync::config::RetryConfig;
//! use clickup_sheets_sync::error::Error;
//! use clickup_sheets_sync::retry::with_backoff;
//!
//! # async fn example() -> Result<(), Error> {
//! let config = RetryConfig::default();
//! let body = with_backoff(&config, "https://api.clickup.com/api/v2/task/1", || async {
//!     Ok::<_, Error>("response".to_string())
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use crate::config::RetryConfig;
use crate::error::Error;
use std::future::Future;
use std::time::Duration;

/// What the retry loop does with a failed attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryAction {
    /// Sleep for the current backoff delay, then retry
    Backoff,
    /// Retry without sleeping
    Immediate,
    /// Give up and return the error
    Fail,
}

/// Trait for errors that can be classified for the retry loop
pub trait IsRetryable: Sized {
    /// How the retry loop should react to this error
    fn retry_action(&self) -> RetryAction;

    /// Error returned once all attempts for `target` are used up
    fn exhausted(target: &str, attempts: u32) -> Self;
}

impl IsRetryable for Error {
    fn retry_action(&self) -> RetryAction {
        match self {
            Error::RateLimited { .. } => RetryAction::Backoff,
            Error::Transport(_) => RetryAction::Immediate,
            _ => RetryAction::Fail,
        }
    }

    fn exhausted(target: &str, attempts: u32) -> Self {
        Error::RetriesExhausted {
            url: target.to_string(),
            attempts,
        }
    }
}

/// Sleep before the n-th backoff retry (1-based): `initial_delay * multiplier^(n-1)`
///
/// Saturates at [`Duration::MAX`] once the product no longer fits a `Duration`.
pub fn backoff_delay(config: &RetryConfig, retry_number: u32) -> Duration {
    let exponent = retry_number.saturating_sub(1).min(i32::MAX as u32);
    let factor = config.backoff_multiplier.powi(exponent as i32);
    Duration::try_from_secs_f64(config.initial_delay.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

/// Execute an async operation under the retry policy
///
/// # Arguments
///
/// * `config` - Retry policy (attempt budget, initial delay, multiplier)
/// * `target` - What is being fetched, used in logs and the exhaustion error
/// * `operation` - Async closure producing one attempt
///
/// # Returns
///
/// The first successful result, the first non-retryable error, or the
/// exhaustion error once `config.max_attempts` attempts have failed.
pub async fn with_backoff<F, Fut, T, E>(
    config: &RetryConfig,
    target: &str,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let mut backoffs = 0;

    for attempt in 1..=config.max_attempts {
        let err = match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(target_url = target, attempts = attempt, "request succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) => e,
        };

        match err.retry_action() {
            RetryAction::Fail => return Err(err),
            RetryAction::Immediate => {
                tracing::error!(
                    target_url = target,
                    error = %err,
                    attempt,
                    max_attempts = config.max_attempts,
                    "request failed, retrying"
                );
            }
            RetryAction::Backoff => {
                if attempt == config.max_attempts {
                    break;
                }
                backoffs += 1;
                let delay = backoff_delay(config, backoffs);
                tracing::warn!(
                    target_url = target,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "rate limit hit, backing off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    tracing::error!(
        target_url = target,
        attempts = config.max_attempts,
        "maximum number of attempts reached"
    );
    Err(E::exhausted(target, config.max_attempts))
}
