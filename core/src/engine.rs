//! Reservation and arrival engine.
//!
//! The engine enforces the seating invariants:
//!
//! - **Admission**: A table holds a single reservation, and the reserving
//!   party (the named guest plus companions) must fit its capacity.
//! - **Reconciliation**: A guest who arrives with more companions than
//!   planned is re-checked against the table capacity before being seated.
//! - **Availability**: Empty seats are total capacity minus the seats taken
//!   by arrived parties, with no clamping at zero.
//!
//! Every operation either passes all its checks and issues exactly one write,
//! or issues none. Failures are returned immediately; the engine neither
//! retries nor recovers.

use crate::environment::Clock;
use crate::error::{Result, SeatingError};
use crate::store::SeatingStore;
use crate::types::{
    ArrivedGuest, GuestEntry, GuestListing, GuestName, Page, Table, TableId, required_seats,
};
use std::sync::Arc;

/// Decision logic for reservations, arrivals and seat availability.
///
/// Holds an injected store and clock; cloning is cheap and every clone shares
/// the same collaborators.
///
/// # Example
///
/// ```ignore
/// use guestlist_core::engine::SeatingEngine;
/// use guestlist_core::environment::SystemClock;
///
/// let engine = SeatingEngine::new(Arc::new(store), Arc::new(SystemClock));
/// engine.add_table(Table::new(TableId::new(1), 3)).await?;
/// engine.add_reservation(GuestName::new("Ann"), 1, TableId::new(1)).await?;
/// ```
#[derive(Clone)]
pub struct SeatingEngine {
    store: Arc<dyn SeatingStore>,
    clock: Arc<dyn Clock>,
}

impl SeatingEngine {
    /// Create an engine over the given store and clock.
    #[must_use]
    pub fn new(store: Arc<dyn SeatingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Register a table definition.
    ///
    /// Tables are immutable once created.
    ///
    /// # Errors
    ///
    /// - [`SeatingError::Storage`] if the id is already taken or the store fails
    #[tracing::instrument(skip(self), fields(table_id = %table.table_id, capacity = table.capacity))]
    pub async fn add_table(&self, table: Table) -> Result<Table> {
        self.store.insert_table(table).await?;
        tracing::info!("Table added");
        Ok(table)
    }

    /// Admit a reservation for `name` and `planned_party_size` companions at `table_id`.
    ///
    /// Checks, in order:
    ///
    /// 1. The table has no reservation at all. One reservation occupies the
    ///    whole table regardless of how many seats it leaves free.
    /// 2. The table exists and its capacity covers `planned_party_size + 1`.
    ///
    /// The insert itself re-checks occupancy atomically, so a concurrent
    /// admission that slipped past step 1 still fails with
    /// [`SeatingError::TableAlreadyReserved`].
    ///
    /// # Errors
    ///
    /// - [`SeatingError::TableAlreadyReserved`]: The table already has a reservation
    /// - [`SeatingError::TableNotFound`]: The table does not exist
    /// - [`SeatingError::InsufficientCapacity`]: The party does not fit
    /// - [`SeatingError::Storage`]: The store failed (including a duplicate guest name)
    #[tracing::instrument(skip(self, name), fields(guest = %name, table_id = %table_id))]
    pub async fn add_reservation(
        &self,
        name: GuestName,
        planned_party_size: u32,
        table_id: TableId,
    ) -> Result<GuestEntry> {
        if self.store.has_reservation(table_id).await? {
            tracing::warn!("Table is already reserved");
            metrics::counter!("guestlist.reservations.rejected", "reason" => "table_reserved")
                .increment(1);
            return Err(SeatingError::TableAlreadyReserved { table_id });
        }

        let capacity = self
            .store
            .find_table_capacity(table_id)
            .await?
            .ok_or(SeatingError::TableNotFound { table_id })?;

        let required = required_seats(planned_party_size);
        if required > u64::from(capacity) {
            tracing::warn!(required, capacity, "Not enough seats at the requested table");
            metrics::counter!("guestlist.reservations.rejected", "reason" => "capacity")
                .increment(1);
            return Err(SeatingError::InsufficientCapacity {
                table_id,
                required,
                capacity,
            });
        }

        let entry = GuestEntry::reservation(name, planned_party_size, table_id);
        self.store.insert_guest_entry(entry.clone()).await?;

        tracing::info!(planned_party_size, "Guest added to the guest list");
        metrics::counter!("guestlist.reservations.admitted").increment(1);

        Ok(entry)
    }

    /// Record the arrival of `name` with `actual_party_size` companions.
    ///
    /// If the guest brought more companions than reserved, the table capacity
    /// is checked again for the actual party. The arrival time comes from the
    /// engine's clock at write time.
    ///
    /// A guest can arrive only once; a second call is rejected rather than
    /// overwriting the first arrival.
    ///
    /// # Errors
    ///
    /// - [`SeatingError::GuestNotFound`]: No entry has this name
    /// - [`SeatingError::GuestAlreadyArrived`]: The arrival was already recorded
    /// - [`SeatingError::TableNotFound`]: The reserved table no longer exists
    /// - [`SeatingError::InsufficientCapacity`]: The larger party does not fit
    /// - [`SeatingError::Storage`]: The store failed
    #[tracing::instrument(skip(self, name), fields(guest = %name))]
    pub async fn record_arrival(
        &self,
        name: &GuestName,
        actual_party_size: u32,
    ) -> Result<GuestEntry> {
        let entry = self.find_guest(name).await?;

        if entry.is_arrived() {
            tracing::warn!("Guest has already arrived");
            metrics::counter!("guestlist.arrivals.rejected", "reason" => "already_arrived")
                .increment(1);
            return Err(SeatingError::GuestAlreadyArrived { name: name.clone() });
        }

        if actual_party_size > entry.planned_party_size {
            let table_id = entry.table_id;
            let capacity = self
                .store
                .find_table_capacity(table_id)
                .await?
                .ok_or(SeatingError::TableNotFound { table_id })?;

            let required = required_seats(actual_party_size);
            if required > u64::from(capacity) {
                tracing::warn!(
                    planned = entry.planned_party_size,
                    actual = actual_party_size,
                    capacity,
                    "Table cannot accommodate the accompanying guests"
                );
                metrics::counter!("guestlist.arrivals.rejected", "reason" => "capacity")
                    .increment(1);
                return Err(SeatingError::InsufficientCapacity {
                    table_id,
                    required,
                    capacity,
                });
            }
        }

        let arrived_at = self.clock.now();
        let Some(updated) = self
            .store
            .update_arrival(name, actual_party_size, arrived_at)
            .await?
        else {
            // The entry changed between the lookup and the write.
            return Err(match self.store.find_guest_entry(name).await? {
                Some(_) => SeatingError::GuestAlreadyArrived { name: name.clone() },
                None => SeatingError::GuestNotFound { name: name.clone() },
            });
        };

        tracing::info!(actual_party_size, %arrived_at, "Guest arrived");
        metrics::counter!("guestlist.arrivals.recorded").increment(1);

        Ok(updated)
    }

    /// Count the seats not taken by arrived parties.
    ///
    /// `sum(capacity) - sum(actual_party_size + 1 for arrived guests)`. The
    /// result is not clamped: with no tables and arrived guests it is negative.
    ///
    /// # Errors
    ///
    /// - [`SeatingError::Storage`]: The store failed
    #[tracing::instrument(skip(self))]
    pub async fn count_empty_seats(&self) -> Result<i64> {
        let total_capacity = self.store.sum_capacity_across_tables().await?;
        let occupied = self.store.sum_occupied_seats().await?;
        let empty = total_capacity - occupied;
        tracing::debug!(total_capacity, occupied, empty, "Counted empty seats");
        Ok(empty)
    }

    /// List planned reservations.
    ///
    /// # Errors
    ///
    /// - [`SeatingError::Storage`]: The store failed
    #[tracing::instrument(skip(self))]
    pub async fn list_guests(&self, page: Page) -> Result<Vec<GuestListing>> {
        let entries = self.store.list_guest_entries(page).await?;
        Ok(entries.iter().map(GuestListing::from).collect())
    }

    /// List guests who have arrived.
    ///
    /// # Errors
    ///
    /// - [`SeatingError::Storage`]: The store failed
    #[tracing::instrument(skip(self))]
    pub async fn list_arrived(&self, page: Page) -> Result<Vec<ArrivedGuest>> {
        let entries = self.store.list_arrived_entries(page).await?;
        Ok(entries.iter().filter_map(ArrivedGuest::from_entry).collect())
    }

    /// Look up a single guest entry (used to render invitations).
    ///
    /// # Errors
    ///
    /// - [`SeatingError::GuestNotFound`]: No entry has this name
    /// - [`SeatingError::Storage`]: The store failed
    #[tracing::instrument(skip(self, name), fields(guest = %name))]
    pub async fn find_guest(&self, name: &GuestName) -> Result<GuestEntry> {
        self.store
            .find_guest_entry(name)
            .await?
            .ok_or_else(|| SeatingError::GuestNotFound { name: name.clone() })
    }

    /// Remove a guest entry, whatever its status.
    ///
    /// Used both for cancelled reservations and for departures. Removing a
    /// name that is not listed also succeeds.
    ///
    /// # Returns
    ///
    /// `true` if an entry was removed, `false` if the name was not listed.
    ///
    /// # Errors
    ///
    /// - [`SeatingError::Storage`]: The store failed
    #[tracing::instrument(skip(self, name), fields(guest = %name))]
    pub async fn remove_guest(&self, name: &GuestName) -> Result<bool> {
        let removed = self.store.delete_guest_entry(name).await? > 0;
        if removed {
            tracing::info!("Guest removed from the guest list");
            metrics::counter!("guestlist.guests.removed").increment(1);
        } else {
            tracing::debug!("Guest was not listed, nothing removed");
        }
        Ok(removed)
    }
}
