//! Error types for seating operations.

use crate::store::StoreError;
use crate::types::{GuestName, ParseInputError, TableId};
use thiserror::Error;

/// Result type alias for seating operations.
pub type Result<T> = std::result::Result<T, SeatingError>;

/// Caller-facing classification of a [`SeatingError`].
///
/// The request layer picks its response from the category alone, without
/// inspecting error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Admission conflict (the table is taken, the guest already arrived)
    Conflict,
    /// Capacity conflict (the table cannot seat the party)
    Capacity,
    /// A referenced guest or table does not exist
    NotFound,
    /// Malformed caller input
    InvalidInput,
    /// Storage or infrastructure failure
    Infrastructure,
}

/// Failures returned by the seating engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeatingError {
    // ═══════════════════════════════════════════════════════════
    // Admission
    // ═══════════════════════════════════════════════════════════

    /// The table already carries a reservation.
    #[error("Table {table_id} is already reserved")]
    TableAlreadyReserved {
        /// Table that was requested
        table_id: TableId,
    },

    /// The table cannot seat the party.
    #[error("Table {table_id} cannot seat {required} guests (capacity {capacity})")]
    InsufficientCapacity {
        /// Table that was checked
        table_id: TableId,
        /// Seats the party needs, including the named guest
        required: u64,
        /// Seats the table holds
        capacity: u32,
    },

    /// The table does not exist.
    #[error("Table {table_id} not found")]
    TableNotFound {
        /// Table that was requested
        table_id: TableId,
    },

    // ═══════════════════════════════════════════════════════════
    // Arrival
    // ═══════════════════════════════════════════════════════════

    /// No guest entry has this name.
    #[error("Guest not found: {name}")]
    GuestNotFound {
        /// Name that was looked up
        name: GuestName,
    },

    /// The guest has already been marked as arrived.
    #[error("Guest has already arrived: {name}")]
    GuestAlreadyArrived {
        /// Guest name
        name: GuestName,
    },

    // ═══════════════════════════════════════════════════════════
    // System
    // ═══════════════════════════════════════════════════════════

    /// Malformed input payload.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Persistence failure, passed through without further classification.
    #[error("Storage error: {0}")]
    Storage(#[source] StoreError),
}

impl SeatingError {
    /// Classify the error for the request layer.
    ///
    /// # Examples
    ///
    /// ```
    /// # use guestlist_core::{ErrorCategory, SeatingError, TableId};
    /// let error = SeatingError::TableAlreadyReserved { table_id: TableId::new(1) };
    /// assert_eq!(error.category(), ErrorCategory::Conflict);
    /// ```
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::TableAlreadyReserved { .. } | Self::GuestAlreadyArrived { .. } => {
                ErrorCategory::Conflict
            }
            Self::InsufficientCapacity { .. } => ErrorCategory::Capacity,
            Self::TableNotFound { .. } | Self::GuestNotFound { .. } => ErrorCategory::NotFound,
            Self::Decoding(_) => ErrorCategory::InvalidInput,
            Self::Storage(_) => ErrorCategory::Infrastructure,
        }
    }

    /// Returns `true` if the caller can fix the request and retry.
    ///
    /// # Examples
    ///
    /// ```
    /// # use guestlist_core::SeatingError;
    /// # use guestlist_core::store::StoreError;
    /// assert!(SeatingError::Decoding("bad json".into()).is_user_error());
    /// assert!(!SeatingError::Storage(StoreError::DatabaseError("down".into())).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self.category(), ErrorCategory::Infrastructure)
    }
}

impl From<StoreError> for SeatingError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::TableOccupied(table_id) => Self::TableAlreadyReserved { table_id },
            StoreError::UnknownTable(table_id) => Self::TableNotFound { table_id },
            other => Self::Storage(other),
        }
    }
}

impl From<ParseInputError> for SeatingError {
    fn from(error: ParseInputError) -> Self {
        Self::Decoding(error.reason().to_string())
    }
}
