//! Retry policy for the REST transport.

use std::time::Duration;

/// Status the upstream returns when a per-second or daily quota is spent.
const TOO_MANY_REQUESTS: u16 = 429;

/// When and how long [`RestTransport`](crate::transport::RestTransport)
/// waits before re-sending a request.
///
/// The sync drivers never retry. A page that still fails after the
/// transport gives up is returned to the orchestrator as an error and
/// replayed later with the same cursor.
///
/// Retried: `429`, any `5xx`, connection failures, and timeouts when
/// `retry_on_timeout` is set. A `429` waits for the upstream's
/// `Retry-After` hint when one is present.
///
/// ## Default Values
///
/// - `max_retries`: 3
/// - `initial_delay`: 1s
/// - `max_delay`: 60s
/// - `multiplier`: 2.0
/// - `jitter`: 0.2
///
/// ## Example
///
/// ```rust
/// use zoomsync::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::new()
///     .with_max_retries(5)
///     .with_max_delay(Duration::from_secs(120));
/// assert!(config.retries_status(429));
/// assert!(!config.retries_status(404));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Re-sends after the first attempt; `0` disables retries.
    pub max_retries: u32,
    /// Backoff before the first re-send.
    pub initial_delay: Duration,
    /// Upper bound on any single wait, including `Retry-After` waits.
    pub max_delay: Duration,
    /// Backoff growth per attempt.
    pub multiplier: f64,
    /// Fraction of the backoff randomized in either direction, `0.0..=1.0`.
    pub jitter: f64,
    /// Whether a timed-out request is re-sent.
    pub retry_on_timeout: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: 0.2,
            retry_on_timeout: true,
        }
    }
}

impl RetryConfig {
    /// Creates the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that sends every request exactly once.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Sets the number of re-sends.
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the first backoff.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the wait cap.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the backoff growth.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Sets the jitter fraction, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    /// Sets whether timeouts are re-sent.
    #[must_use]
    pub fn with_retry_on_timeout(mut self, retry: bool) -> Self {
        self.retry_on_timeout = retry;
        self
    }

    /// Returns `true` if retries are enabled.
    pub fn is_enabled(&self) -> bool {
        self.max_retries > 0
    }

    /// Total sends allowed for one request.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether a response with `status` is worth re-sending.
    pub fn retries_status(&self, status: u16) -> bool {
        status == TOO_MANY_REQUESTS || (500..600).contains(&status)
    }

    /// Whether a send failure is worth re-sending.
    pub fn retries_failure(&self, is_connect: bool, is_timeout: bool) -> bool {
        is_connect || (is_timeout && self.retry_on_timeout)
    }

    /// Backoff after `attempt` failed sends:
    /// `initial_delay * multiplier^(attempt - 1)`, capped at `max_delay`,
    /// then jittered.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let backoff = (self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent))
            .min(self.max_delay.as_secs_f64());

        if self.jitter <= 0.0 {
            return Duration::from_secs_f64(backoff);
        }
        let spread = backoff * self.jitter;
        let offset = (fastrand::f64() * 2.0 - 1.0) * spread;
        Duration::from_secs_f64((backoff + offset).max(0.0))
    }

    /// Wait before re-sending a `status` response after `attempt` sends.
    ///
    /// A `429` with a `Retry-After` hint waits for the hint, capped at
    /// `max_delay`; everything else backs off.
    pub fn delay_for_response(
        &self,
        status: u16,
        retry_after: Option<Duration>,
        attempt: u32,
    ) -> Duration {
        match retry_after {
            Some(hint) if status == TOO_MANY_REQUESTS => hint.min(self.max_delay),
            _ => self.delay_for_attempt(attempt),
        }
    }
}
