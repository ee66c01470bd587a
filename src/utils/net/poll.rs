//! Bounded polling loop
//!
//! Calls a probe at a fixed interval until it produces a value, the attempt
//! budget runs out, the probe fails, or the owner cancels.

use crate::utils::error::Result;
use crate::utils::sys::CancelFlag;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Fixed-interval polling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two consecutive probes
    pub interval: Duration,
    /// Maximum number of probes, including the first one
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 10,
        }
    }
}

/// How a polling loop ended without an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The probe produced a value
    Ready { value: T, attempts: u32 },
    /// Every attempt returned `None`
    Exhausted { attempts: u32 },
    /// The cancel flag was observed before the next probe
    Cancelled { attempts: u32 },
}

impl<T> PollOutcome<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            PollOutcome::Ready { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Ready { attempts, .. }
            | PollOutcome::Exhausted { attempts }
            | PollOutcome::Cancelled { attempts } => *attempts,
        }
    }
}

/// Run `probe` until it yields `Some`, the policy is exhausted or `cancel` is set.
///
/// The first probe runs immediately; later probes wait `policy.interval`.
/// A probe error ends the loop and is returned unchanged.
pub async fn poll_until<F, Fut, T>(
    policy: &PollPolicy,
    cancel: &CancelFlag,
    mut probe: F,
) -> Result<PollOutcome<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let mut attempts = 0;

    while attempts < policy.max_attempts {
        if attempts > 0 {
            tokio::time::sleep(policy.interval).await;
        }
        if cancel.is_cancelled() {
            debug!("Polling cancelled after {} attempts", attempts);
            return Ok(PollOutcome::Cancelled { attempts });
        }

        attempts += 1;
        if let Some(value) = probe(attempts).await? {
            debug!("Polling succeeded on attempt {}", attempts);
            return Ok(PollOutcome::Ready { value, attempts });
        }
        if cancel.is_cancelled() {
            return Ok(PollOutcome::Cancelled { attempts });
        }
    }

    debug!("Polling exhausted after {} attempts", attempts);
    Ok(PollOutcome::Exhausted { attempts })
}
