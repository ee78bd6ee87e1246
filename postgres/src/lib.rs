//! `PostgreSQL` seating store for the guest list service.
//!
//! This crate provides a production-ready PostgreSQL-based store that implements
//! the `SeatingStore` trait from `guestlist-core`. It supports:
//!
//! - Table definitions and guest list persistence
//! - Atomic admission (one reservation per table, enforced by a unique constraint)
//! - Guarded arrival updates (a guest arrives at most once)
//! - Aggregate capacity and occupancy queries
//! - Connection pooling configured from the environment
//!
//! # Example
//!
//! ```ignore
//! use guestlist_core::{SeatingEngine, environment::SystemClock};
//! use guestlist_postgres::{PostgresConfig, PostgresSeatingStore};
//! use std::sync::Arc;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresSeatingStore::connect(&PostgresConfig::from_env()).await?;
//!     store.migrate().await?;
//!
//!     let engine = SeatingEngine::new(Arc::new(store), Arc::new(SystemClock));
//!     println!("empty seats: {}", engine.count_empty_seats().await?);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
mod seating_store;

pub use config::PostgresConfig;
pub use seating_store::PostgresSeatingStore;
