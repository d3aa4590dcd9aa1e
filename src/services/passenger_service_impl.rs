//! `SeaORM` implementation of the `PassengerService` trait.

use async_trait::async_trait;

use crate::db::{CascadeDeleteError, PassengerDraft, Store};
use crate::entities::passengers;
use crate::services::passenger_service::{CascadeSummary, PassengerError, PassengerService};

pub struct SeaOrmPassengerService {
    store: Store,
}

impl SeaOrmPassengerService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate_draft(draft: &PassengerDraft) -> Result<(), PassengerError> {
        if draft.first_name.trim().is_empty() || draft.last_name.trim().is_empty() {
            return Err(PassengerError::InvalidInput(
                "First name and last name are required".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PassengerService for SeaOrmPassengerService {
    async fn create(&self, draft: PassengerDraft) -> Result<passengers::Model, PassengerError> {
        Self::validate_draft(&draft)?;
        Ok(self.store.create_passenger(draft).await?)
    }

    async fn get(&self, id: i32) -> Result<passengers::Model, PassengerError> {
        self.store
            .get_passenger(id)
            .await?
            .ok_or(PassengerError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<passengers::Model>, PassengerError> {
        Ok(self.store.list_passengers().await?)
    }

    async fn update(
        &self,
        id: i32,
        draft: PassengerDraft,
    ) -> Result<passengers::Model, PassengerError> {
        Self::validate_draft(&draft)?;
        self.store
            .update_passenger(id, draft)
            .await?
            .ok_or(PassengerError::NotFound(id))
    }

    async fn delete_cascade(&self, id: i32) -> Result<CascadeSummary, PassengerError> {
        match self.store.delete_passenger_cascade(id).await {
            Ok(Some(trips_deleted)) => Ok(CascadeSummary { trips_deleted }),
            Ok(None) => Err(PassengerError::NotFound(id)),
            Err(CascadeDeleteError::Database(err)) => {
                Err(PassengerError::Unavailable(err.to_string()))
            }
            Err(CascadeDeleteError::Commit(err)) => {
                Err(PassengerError::PartialFailure(err.to_string()))
            }
        }
    }
}
