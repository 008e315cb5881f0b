//! Bounded polling for eventually-consistent cluster state.
//!
//! This is the only retry mechanism in the crate. A wait repeatedly evaluates
//! a condition, sleeping `poll_interval` between attempts, until the condition
//! holds or `timeout` has elapsed. It is synchronous and cannot be cancelled.

use crate::clock::Clock;
use crate::error::{Error, Result};
use std::time::Duration;

/// Default time between state fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default budget for readiness waits.
pub const DEFAULT_READINESS_TIMEOUT: Duration = Duration::from_secs(570);

/// Default budget for deletion and update waits.
pub const DEFAULT_DELETION_TIMEOUT: Duration = Duration::from_secs(240);

/// Longest budget a wait accepts.
pub const MAX_TIMEOUT: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Polling interval and overall budget of a wait.
///
/// The interval is always non-zero and strictly shorter than the timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    poll_interval: Duration,
    timeout: Duration,
}

impl WaitConfig {
    /// Create a wait config, rejecting intervals that are zero or not
    /// shorter than the timeout.
    pub fn new(poll_interval: Duration, timeout: Duration) -> Result<Self> {
        if poll_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        if timeout > MAX_TIMEOUT {
            return Err(Error::InvalidConfig(format!(
                "timeout ({timeout:?}) must not exceed {MAX_TIMEOUT:?}"
            )));
        }
        if poll_interval >= timeout {
            return Err(Error::InvalidConfig(format!(
                "poll interval ({poll_interval:?}) must be shorter than timeout ({timeout:?})"
            )));
        }
        Ok(Self {
            poll_interval,
            timeout,
        })
    }

    /// Defaults for readiness and creation waits (1s / 570s).
    pub const fn readiness() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_READINESS_TIMEOUT,
        }
    }

    /// Defaults for deletion and update waits (1s / 240s).
    pub const fn deletion() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_DELETION_TIMEOUT,
        }
    }

    /// Time between condition checks.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Overall budget.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::readiness()
    }
}

/// Poll `ready` until it returns `true` or the budget runs out.
///
/// An error from `ready` stops the wait immediately. The final sleep is
/// shortened to the remaining budget, so a timeout is reported no later than
/// one poll interval after the deadline.
pub fn poll_until<F>(clock: &dyn Clock, config: &WaitConfig, what: &str, mut ready: F) -> Result<()>
where
    F: FnMut() -> Result<bool>,
{
    let deadline = clock
        .now()
        .checked_add(config.timeout)
        .ok_or_else(|| Error::InvalidConfig(format!("timeout {:?} is out of range", config.timeout)))?;

    loop {
        if ready()? {
            log::info!("done waiting for {what}");
            return Ok(());
        }

        let remaining = deadline.saturating_duration_since(clock.now());
        if remaining.is_zero() {
            return Err(Error::Timeout {
                what: what.to_string(),
                timeout: config.timeout,
            });
        }

        log::debug!("waiting for {what}, {remaining:?} left");
        clock.sleep(config.poll_interval.min(remaining));
    }
}

/// Wait until the JSON document returned by `fetch` satisfies `ready`.
///
/// A fetch failing with [`Error::NotFound`] counts as "not ready yet"; any
/// other failure, including unparsable JSON, ends the wait.
pub fn wait_for_state<F, P>(
    clock: &dyn Clock,
    config: &WaitConfig,
    what: &str,
    mut fetch: F,
    mut ready: P,
) -> Result<()>
where
    F: FnMut() -> Result<String>,
    P: FnMut(&serde_json::Value) -> Result<bool>,
{
    poll_until(clock, config, what, || match fetch() {
        Ok(json) => {
            log::trace!("{json}");
            let state: serde_json::Value = serde_json::from_str(&json)?;
            ready(&state)
        }
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    })
}

/// Wait until `fetch` fails with [`Error::NotFound`].
///
/// Successful fetches keep the wait going; other failures end it.
pub fn wait_for_absence<F>(clock: &dyn Clock, config: &WaitConfig, what: &str, mut fetch: F) -> Result<()>
where
    F: FnMut() -> Result<String>,
{
    poll_until(clock, config, what, || match fetch() {
        Ok(_) => Ok(false),
        Err(e) if e.is_not_found() => Ok(true),
        Err(e) => Err(e),
    })
}
