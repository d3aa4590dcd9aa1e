use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use thiserror::Error;
use tracing::info;

use crate::entities::{passengers, prelude::*, trips};

/// Fields required to register a passenger.
#[derive(Debug, Clone)]
pub struct PassengerDraft {
    pub first_name: String,
    pub last_name: String,
    pub job_role: Option<String>,
}

/// Failure modes of the transactional cascade delete.
#[derive(Debug, Error)]
pub enum CascadeDeleteError {
    #[error(transparent)]
    Database(#[from] DbErr),

    /// Both deletes were issued but the commit outcome is unknown; the
    /// caller should retry.
    #[error("cascade commit failed: {0}")]
    Commit(DbErr),
}

pub struct PassengerRepository {
    conn: DatabaseConnection,
}

impl PassengerRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, draft: PassengerDraft) -> Result<passengers::Model> {
        let active = passengers::ActiveModel {
            first_name: Set(draft.first_name),
            last_name: Set(draft.last_name),
            job_role: Set(draft.job_role),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert passenger")
    }

    pub async fn get(&self, id: i32) -> Result<Option<passengers::Model>> {
        Passengers::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query passenger")
    }

    pub async fn list(&self) -> Result<Vec<passengers::Model>> {
        Passengers::find()
            .order_by_asc(passengers::Column::LastName)
            .all(&self.conn)
            .await
            .context("Failed to list passengers")
    }

    pub async fn count(&self) -> Result<u64> {
        Passengers::find()
            .count(&self.conn)
            .await
            .context("Failed to count passengers")
    }

    /// Update a passenger record. Returns `None` if the passenger is absent.
    pub async fn update(
        &self,
        id: i32,
        draft: PassengerDraft,
    ) -> Result<Option<passengers::Model>> {
        let Some(passenger) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: passengers::ActiveModel = passenger.into();
        active.first_name = Set(draft.first_name);
        active.last_name = Set(draft.last_name);
        active.job_role = Set(draft.job_role);

        let updated = active.update(&self.conn).await?;
        Ok(Some(updated))
    }

    /// Delete a passenger together with every trip that references it.
    ///
    /// Trips go first so a failure mid-way can only ever leave the passenger
    /// behind, never a dangling trip. Returns the number of trips removed, or
    /// `None` if no passenger matched.
    pub async fn delete_cascade(&self, id: i32) -> Result<Option<u64>, CascadeDeleteError> {
        let txn = self.conn.begin().await?;

        if Passengers::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(None);
        }

        let trips_result = Trips::delete_many()
            .filter(trips::Column::PassengerId.eq(id))
            .exec(&txn)
            .await?;

        Passengers::delete_by_id(id).exec(&txn).await?;

        txn.commit().await.map_err(CascadeDeleteError::Commit)?;

        info!(
            "Removed passenger {} and {} associated trip(s)",
            id, trips_result.rows_affected
        );
        Ok(Some(trips_result.rows_affected))
    }
}
