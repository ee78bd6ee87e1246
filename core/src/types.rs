//! Seating domain types.
//!
//! This module defines the strong types shared by the engine and every store
//! implementation: table and guest identifiers, the guest entry with its
//! arrival state, pagination, and the read views returned by the list
//! operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default page size for guest list queries.
pub const DEFAULT_LIMIT: u32 = 100;

/// Default page offset for guest list queries.
pub const DEFAULT_OFFSET: u32 = 0;

/// Error type for guest name and party size decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid input: {0}")]
pub struct ParseInputError(String);

impl ParseInputError {
    /// Human readable reason the input was rejected.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.0
    }
}

/// Unique identifier of a table.
///
/// # Examples
///
/// ```
/// use guestlist_core::types::TableId;
///
/// let id = TableId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(i64);

impl TableId {
    /// Create a new `TableId`.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TableId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Name of a guest, unique within the guest list.
///
/// The name is the primary key for every guest lookup.
///
/// # Validation
///
/// - `FromStr::from_str()` / [`GuestName::parse`]: Validates input (rejects blank names)
/// - [`GuestName::from_path_segment`]: Decodes the URL form where `+` stands for a space
/// - `From::from()` and `new()`: No validation (for names read back from storage)
///
/// # Examples
///
/// ```
/// use guestlist_core::types::GuestName;
///
/// let name = GuestName::from_path_segment("John+Smith").unwrap();
/// assert_eq!(name.as_str(), "John Smith");
///
/// assert!(GuestName::parse("   ").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestName(String);

impl GuestName {
    /// Create a new `GuestName` without validation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parse a guest name from caller input.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ParseInputError`] if the name is empty or only whitespace.
    pub fn parse(raw: &str) -> Result<Self, ParseInputError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ParseInputError("guest name cannot be empty".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Decode a guest name from a URL path segment.
    ///
    /// Spaces travel as `+` in the guest list routes, and only ASCII letters
    /// are accepted otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ParseInputError`] if the segment is empty or contains
    /// anything other than ASCII letters and `+`.
    pub fn from_path_segment(segment: &str) -> Result<Self, ParseInputError> {
        if let Some(bad) = segment
            .chars()
            .find(|c| !(c.is_ascii_alphabetic() || *c == '+'))
        {
            return Err(ParseInputError(format!(
                "guest name contains unsupported character {bad:?}"
            )));
        }
        Self::parse(&segment.replace('+', " "))
    }

    /// Get the guest name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert the `GuestName` into its inner `String`.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for GuestName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GuestName {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<String> for GuestName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GuestName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for GuestName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Decode a companion count supplied by a caller.
///
/// # Errors
///
/// Returns [`ParseInputError`] if the value is negative or does not fit in `u32`.
///
/// # Examples
///
/// ```
/// use guestlist_core::types::parse_party_size;
///
/// assert_eq!(parse_party_size(2).unwrap(), 2);
/// assert!(parse_party_size(-1).is_err());
/// ```
pub fn parse_party_size(value: i64) -> Result<u32, ParseInputError> {
    u32::try_from(value)
        .map_err(|_| ParseInputError(format!("party size must be between 0 and {}, got {value}", u32::MAX)))
}

/// Seats needed by a named guest and their companions.
///
/// One seat for the named guest plus one per companion. Computed in `u64`
/// so it cannot overflow.
#[must_use]
pub const fn required_seats(party_size: u32) -> u64 {
    party_size as u64 + 1
}

/// A fixed-capacity seating unit.
///
/// Immutable once created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table identifier
    pub table_id: TableId,
    /// Total seats at the table
    pub capacity: u32,
}

impl Table {
    /// Create a new table definition.
    #[must_use]
    pub const fn new(table_id: TableId, capacity: u32) -> Self {
        Self { table_id, capacity }
    }
}

/// Arrival state of a guest entry.
///
/// The party size and arrival time only exist once the guest has arrived,
/// so an arrived party without a timestamp (or the reverse) cannot be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuestStatus {
    /// Reservation exists, guest not yet here
    NotArrived,
    /// Guest has arrived
    Arrived {
        /// Companions the guest actually brought
        actual_party_size: u32,
        /// When the arrival was recorded
        arrived_at: DateTime<Utc>,
    },
}

impl GuestStatus {
    /// Persisted spelling of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotArrived => "NOT_ARRIVED",
            Self::Arrived { .. } => "ARRIVED",
        }
    }

    /// Returns `true` once the guest has arrived.
    #[must_use]
    pub const fn is_arrived(&self) -> bool {
        matches!(self, Self::Arrived { .. })
    }
}

/// A reservation record plus its arrival state for one named guest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestEntry {
    /// Guest name (primary key)
    pub name: GuestName,
    /// Companions reserved for, excluding the named guest
    pub planned_party_size: u32,
    /// Table the guest is seated at
    pub table_id: TableId,
    /// Arrival state
    pub status: GuestStatus,
}

impl GuestEntry {
    /// Create a fresh reservation that has not arrived yet.
    #[must_use]
    pub const fn reservation(name: GuestName, planned_party_size: u32, table_id: TableId) -> Self {
        Self {
            name,
            planned_party_size,
            table_id,
            status: GuestStatus::NotArrived,
        }
    }

    /// Seats the reservation needs (the guest plus planned companions).
    #[must_use]
    pub const fn required_seats(&self) -> u64 {
        required_seats(self.planned_party_size)
    }

    /// Returns `true` once the guest has arrived.
    #[must_use]
    pub const fn is_arrived(&self) -> bool {
        self.status.is_arrived()
    }

    /// Companions the guest actually brought, once arrived.
    #[must_use]
    pub const fn actual_party_size(&self) -> Option<u32> {
        match self.status {
            GuestStatus::Arrived {
                actual_party_size, ..
            } => Some(actual_party_size),
            GuestStatus::NotArrived => None,
        }
    }

    /// When the guest arrived, once arrived.
    #[must_use]
    pub const fn arrived_at(&self) -> Option<DateTime<Utc>> {
        match self.status {
            GuestStatus::Arrived { arrived_at, .. } => Some(arrived_at),
            GuestStatus::NotArrived => None,
        }
    }
}

/// Pagination window passed through to the store unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Maximum number of entries to return
    pub limit: u32,
    /// Number of entries to skip
    pub offset: u32,
}

impl Page {
    /// Create a page with explicit bounds.
    #[must_use]
    pub const fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    /// Build a page from optional query parameters, filling in the defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use guestlist_core::types::Page;
    ///
    /// assert_eq!(Page::from_query(None, None), Page::new(100, 0));
    /// assert_eq!(Page::from_query(Some(10), None), Page::new(10, 0));
    /// ```
    #[must_use]
    pub fn from_query(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT),
            offset: offset.unwrap_or(DEFAULT_OFFSET),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_OFFSET)
    }
}

/// Planned reservation fields, as returned by the guest list query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestListing {
    /// Guest name
    pub name: GuestName,
    /// Reserved table
    #[serde(rename = "table")]
    pub table_id: TableId,
    /// Planned companions
    #[serde(rename = "accompanying_guests")]
    pub planned_party_size: u32,
}

impl From<&GuestEntry> for GuestListing {
    fn from(entry: &GuestEntry) -> Self {
        Self {
            name: entry.name.clone(),
            table_id: entry.table_id,
            planned_party_size: entry.planned_party_size,
        }
    }
}

/// Arrival fields, as returned by the arrived guests query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivedGuest {
    /// Guest name
    pub name: GuestName,
    /// Companions the guest actually brought
    #[serde(rename = "accompanying_guests")]
    pub actual_party_size: u32,
    /// Arrival time
    #[serde(rename = "time_arrived")]
    pub arrived_at: DateTime<Utc>,
}

impl ArrivedGuest {
    /// Arrival view of an entry, or `None` if the guest has not arrived.
    #[must_use]
    pub fn from_entry(entry: &GuestEntry) -> Option<Self> {
        match entry.status {
            GuestStatus::Arrived {
                actual_party_size,
                arrived_at,
            } => Some(Self {
                name: entry.name.clone(),
                actual_party_size,
                arrived_at,
            }),
            GuestStatus::NotArrived => None,
        }
    }
}
