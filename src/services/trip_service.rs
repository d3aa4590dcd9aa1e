//! Domain service for trip bookings and the passenger-count invariant.
//!
//! The count is a positive integer when present; increment and decrement go
//! through the store's atomic column update so concurrent calls on the same
//! trip never lose an update, and decrement refuses to go below 1.

use thiserror::Error;

use crate::entities::trips;

pub use crate::db::TripDraft;

/// Errors specific to trip operations.
#[derive(Debug, Error)]
pub enum TripError {
    #[error("Trip {0} not found")]
    NotFound(i32),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sea_orm::DbErr> for TripError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<anyhow::Error> for TripError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Domain service trait for trips.
#[async_trait::async_trait]
pub trait TripService: Send + Sync {
    /// Books a trip. The passenger count, when given, must be >= 1.
    async fn create(&self, draft: TripDraft) -> Result<trips::Model, TripError>;

    async fn get(&self, id: i32) -> Result<trips::Model, TripError>;

    async fn list(&self) -> Result<Vec<trips::Model>, TripError>;

    /// All trips referencing one passenger.
    async fn list_for_passenger(&self, passenger_id: i32) -> Result<Vec<trips::Model>, TripError>;

    /// Full update of the booking fields, including the confirmed flag.
    async fn update(
        &self,
        id: i32,
        draft: TripDraft,
        confirmed: bool,
    ) -> Result<trips::Model, TripError>;

    async fn delete(&self, id: i32) -> Result<(), TripError>;

    /// Adds 1 to the passenger count.
    ///
    /// # Errors
    ///
    /// Returns [`TripError::InvalidState`] if the trip has no count to
    /// increment.
    async fn increment_passengers(&self, id: i32) -> Result<trips::Model, TripError>;

    /// Subtracts 1 from the passenger count.
    ///
    /// # Errors
    ///
    /// Returns [`TripError::InvalidState`] if the count is already at the
    /// floor of 1 (or absent).
    async fn decrement_passengers(&self, id: i32) -> Result<trips::Model, TripError>;

    /// Overwrites the passenger count with a positive integer.
    async fn set_passengers(&self, id: i32, value: i32) -> Result<trips::Model, TripError>;

    /// Marks the trip confirmed. Confirmations are not revocable here.
    async fn confirm(&self, id: i32) -> Result<trips::Model, TripError>;

    /// Records the trip's position in one user's display ordering.
    async fn set_sort_order(
        &self,
        id: i32,
        email: &str,
        position: i32,
    ) -> Result<trips::Model, TripError>;
}
