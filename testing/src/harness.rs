//! Engine wiring for tests.

use crate::mocks::{FixedClock, test_clock};
use crate::seating_mocks::InMemorySeatingStore;
use guestlist_core::engine::SeatingEngine;
use guestlist_core::types::{GuestName, Table};
use std::sync::Arc;

/// A [`SeatingEngine`] over an in-memory store and a fixed clock.
///
/// The store handle shares state with the engine, so tests can seed it and
/// inspect it directly around engine calls.
///
/// # Example
///
/// ```
/// use guestlist_testing::SeatingHarness;
/// use guestlist_core::types::{GuestName, Table, TableId};
///
/// # tokio_test::block_on(async {
/// let harness = SeatingHarness::with_tables([Table::new(TableId::new(7), 2)]);
/// harness.engine.add_reservation(GuestName::new("Ann"), 1, TableId::new(7)).await.ok();
///
/// assert!(harness.is_listed(&GuestName::new("Ann")));
/// # });
/// ```
#[derive(Clone)]
pub struct SeatingHarness {
    /// Engine under test.
    pub engine: SeatingEngine,
    /// Store backing the engine.
    pub store: InMemorySeatingStore,
    /// Clock the engine stamps arrivals with.
    pub clock: FixedClock,
}

impl SeatingHarness {
    /// Harness with no tables, using [`test_clock`].
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(InMemorySeatingStore::new(), test_clock())
    }

    /// Harness whose store already holds `tables`.
    #[must_use]
    pub fn with_tables(tables: impl IntoIterator<Item = Table>) -> Self {
        Self::from_parts(InMemorySeatingStore::with_tables(tables), test_clock())
    }

    /// Harness over an existing store and clock.
    #[must_use]
    pub fn from_parts(store: InMemorySeatingStore, clock: FixedClock) -> Self {
        let engine = SeatingEngine::new(Arc::new(store.clone()), Arc::new(clock.clone()));
        Self {
            engine,
            store,
            clock,
        }
    }

    /// Whether the store holds an entry for `name`.
    #[must_use]
    pub fn is_listed(&self, name: &GuestName) -> bool {
        self.store.entry(name).is_some()
    }
}

impl Default for SeatingHarness {
    fn default() -> Self {
        Self::new()
    }
}
