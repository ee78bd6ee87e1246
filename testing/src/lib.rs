//! # Guest List Testing
//!
//! Testing utilities and helpers for the guest list service.
//!
//! This crate provides:
//! - A deterministic [`FixedClock`]
//! - [`InMemorySeatingStore`], a lock-protected stand-in for `PostgreSQL`
//! - [`UnavailableSeatingStore`] for storage failure paths
//! - [`SeatingHarness`] to wire an engine over those collaborators
//! - proptest strategies for guest names and party sizes
//!
//! ## Example
//!
//! ```
//! use guestlist_testing::SeatingHarness;
//! use guestlist_core::types::{GuestName, Table, TableId};
//!
//! # tokio_test::block_on(async {
//! let harness = SeatingHarness::with_tables([Table::new(TableId::new(1), 3)]);
//!
//! let ann = GuestName::new("Ann");
//! harness.engine.add_reservation(ann.clone(), 1, TableId::new(1)).await.ok();
//! harness.engine.record_arrival(&ann, 1).await.ok();
//!
//! assert_eq!(harness.engine.count_empty_seats().await.ok(), Some(1));
//! # });
//! ```

use chrono::{DateTime, Utc};
use guestlist_core::environment::Clock;

mod harness;
mod seating_mocks;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use guestlist_testing::mocks::FixedClock;
    /// use guestlist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Property-based testing strategies for domain inputs.
pub mod properties {
    use guestlist_core::types::GuestName;
    use proptest::prelude::*;

    /// Guest names made of letters and single inner spaces, as accepted
    /// from path segments.
    pub fn guest_name() -> impl Strategy<Value = GuestName> {
        "[A-Z][a-z]{1,8}( [A-Z][a-z]{1,8})?".prop_map(GuestName::new)
    }

    /// Companion counts small enough to keep capacity arithmetic readable.
    pub fn party_size() -> impl Strategy<Value = u32> {
        0u32..12
    }

    /// Table capacities, including the degenerate zero-seat table.
    pub fn capacity() -> impl Strategy<Value = u32> {
        0u32..16
    }
}

/// Install a `tracing` subscriber for tests.
///
/// Honors `RUST_LOG` and defaults to `debug`. Safe to call from every test:
/// only the first call installs the subscriber.
pub fn init_test_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use harness::SeatingHarness;
pub use mocks::{FixedClock, test_clock};
pub use seating_mocks::{InMemorySeatingStore, UnavailableSeatingStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_clock_starts_at_new_year_2025() {
        assert_eq!(test_clock().now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }
}
