//! Injected dependencies for the seating engine.
//!
//! External effects the engine needs beyond the store are abstracted behind
//! traits so tests can substitute deterministic implementations.

use chrono::{DateTime, Utc};

/// Clock trait - abstracts time operations for testability
///
/// The engine stamps the arrival time of a guest from this clock at the
/// moment it issues the arrival write. Callers never supply the timestamp.
///
/// # Examples
///
/// ```
/// use guestlist_core::environment::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let before = clock.now();
/// assert!(clock.now() >= before);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
