//! # Guest List Core
//!
//! Seating and reservation consistency core for the guest list service.
//!
//! Guests are pre-assigned to tables with a fixed capacity. When they arrive,
//! the party they actually brought is reconciled against the reservation and
//! against the seats the table can hold. This crate contains only the rules
//! that make those decisions; persistence and transport live elsewhere.
//!
//! ## Core Concepts
//!
//! - **Table**: A fixed-capacity seating unit identified by an integer id
//! - **Guest entry**: A reservation plus its arrival state for one named guest
//! - **Admission**: Creating a reservation, subject to capacity and single-occupancy checks
//! - **Reconciliation**: Turning a reservation into a confirmed arrival
//! - **Store**: Injected persistence collaborator ([`store::SeatingStore`])
//!
//! ## Architecture
//!
//! ```text
//! request layer ──▶ SeatingEngine ──▶ Arc<dyn SeatingStore>
//!                        │                 ├─ PostgresSeatingStore  (guestlist-postgres)
//!                        │                 └─ InMemorySeatingStore  (guestlist-testing)
//!                        └──────────▶ Arc<dyn Clock>
//! ```
//!
//! The engine holds no state of its own. Every operation reads what it needs
//! from the store, applies its checks and issues at most one write.
//!
//! ## Example
//!
//! ```ignore
//! use guestlist_core::engine::SeatingEngine;
//! use guestlist_core::environment::SystemClock;
//! use guestlist_core::types::{GuestName, TableId};
//! use std::sync::Arc;
//!
//! let engine = SeatingEngine::new(Arc::new(store), Arc::new(SystemClock));
//!
//! let ann = GuestName::parse("Ann")?;
//! engine.add_reservation(ann.clone(), 1, TableId::new(1)).await?;
//! engine.record_arrival(&ann, 1).await?;
//!
//! let empty = engine.count_empty_seats().await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

pub mod engine;
pub mod environment;
pub mod error;
pub mod store;
pub mod types;

pub use engine::SeatingEngine;
pub use error::{ErrorCategory, Result, SeatingError};
pub use store::{SeatingStore, StoreError};
pub use types::{
    ArrivedGuest, GuestEntry, GuestListing, GuestName, GuestStatus, Page, Table, TableId,
};
