//! Domain service for site occupancy (POB) tracking.
//!
//! POB values are non-negative integers per named site. Updates deliberately
//! do not cap at the site's maximum: the maximum is advisory and the radio
//! operator records the real headcount, whatever it is.

use thiserror::Error;

use crate::entities::sites;

/// Errors specific to site occupancy operations.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sea_orm::DbErr> for SiteError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<anyhow::Error> for SiteError {
    fn from(err: anyhow::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Domain service trait for sites.
#[async_trait::async_trait]
pub trait SiteService: Send + Sync {
    /// Seeds the configured sites with POB 0, leaving existing sites alone.
    /// Idempotent. Returns the full resulting site list.
    async fn initialize(&self) -> Result<Vec<sites::Model>, SiteError>;

    /// Upserts the POB counter for a site, creating it with defaults when
    /// unknown.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidInput`] if `value` is negative.
    async fn set_pob(&self, site_name: &str, value: i32) -> Result<sites::Model, SiteError>;

    /// All sites ordered by name.
    async fn list(&self) -> Result<Vec<sites::Model>, SiteError>;
}
