//! Domain service for passenger records.
//!
//! Trips hold only a weak reference to their passenger, so referential
//! integrity on deletion is this service's job: deleting a passenger removes
//! every trip that references it first, inside one transaction.

use thiserror::Error;

use crate::entities::passengers;

pub use crate::db::PassengerDraft;

/// Errors specific to passenger operations.
#[derive(Debug, Error)]
pub enum PassengerError {
    #[error("Passenger {0} not found")]
    NotFound(i32),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The cascade was issued but its commit outcome is unknown; safe to
    /// retry because the delete is idempotent.
    #[error("Cascade delete partially completed: {0}")]
    PartialFailure(String),
}

impl From<sea_orm::DbErr> for PassengerError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<anyhow::Error> for PassengerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Summary returned by the cascade delete.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct CascadeSummary {
    pub trips_deleted: u64,
}

/// Domain service trait for passengers.
#[async_trait::async_trait]
pub trait PassengerService: Send + Sync {
    async fn create(&self, draft: PassengerDraft) -> Result<passengers::Model, PassengerError>;

    async fn get(&self, id: i32) -> Result<passengers::Model, PassengerError>;

    async fn list(&self) -> Result<Vec<passengers::Model>, PassengerError>;

    async fn update(
        &self,
        id: i32,
        draft: PassengerDraft,
    ) -> Result<passengers::Model, PassengerError>;

    /// Deletes the passenger and every trip referencing it, trips first.
    ///
    /// # Errors
    ///
    /// Returns [`PassengerError::PartialFailure`] if the transaction commit
    /// outcome is unknown.
    async fn delete_cascade(&self, id: i32) -> Result<CascadeSummary, PassengerError>;
}
