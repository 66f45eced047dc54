//! Rate-limit extraction from upstream response headers.
//!
//! Quota headers are read on every response, successful or not. Parsing
//! never fails: a missing or malformed header leaves its field at zero (or
//! `None` for the reset time).

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// Header carrying the remaining request quota.
pub const REMAINING_HEADER: &str = "X-Ratelimit-Remaining";

/// Header carrying the total request quota.
pub const LIMIT_HEADER: &str = "X-Ratelimit-Limit";

/// Header carrying the quota reset time as Unix seconds.
pub const RESET_HEADER: &str = "Retry-After";

/// Quota state observed on one upstream response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitDescriptor {
    /// Total requests allowed in the current window.
    pub limit: i64,
    /// Requests left in the current window.
    pub remaining: i64,
    /// When the window resets.
    pub reset_at: Option<DateTime<Utc>>,
}

impl RateLimitDescriptor {
    /// Returns `true` if no quota information was present.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Extracts the rate-limit descriptor from response headers.
///
/// ```rust
/// use reqwest::header::{HeaderMap, HeaderValue};
/// use zoomsync::ratelimit;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-ratelimit-limit", HeaderValue::from_static("100"));
/// headers.insert("x-ratelimit-remaining", HeaderValue::from_static("oops"));
///
/// let descriptor = ratelimit::extract(&headers);
/// assert_eq!(descriptor.limit, 100);
/// assert_eq!(descriptor.remaining, 0);
/// ```
pub fn extract(headers: &HeaderMap) -> RateLimitDescriptor {
    RateLimitDescriptor {
        limit: header_i64(headers, LIMIT_HEADER).unwrap_or(0),
        remaining: header_i64(headers, REMAINING_HEADER).unwrap_or(0),
        reset_at: header_i64(headers, RESET_HEADER)
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
    }
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
