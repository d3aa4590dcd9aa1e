//! `SeaORM` implementation of the `TripService` trait.

use async_trait::async_trait;

use crate::db::{CounterUpdate, Store, TripDraft};
use crate::entities::trips;
use crate::services::trip_service::{TripError, TripService};

pub struct SeaOrmTripService {
    store: Store,
}

impl SeaOrmTripService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate_draft(draft: &TripDraft) -> Result<(), TripError> {
        if draft.origin.trim().is_empty() || draft.destination.trim().is_empty() {
            return Err(TripError::InvalidInput(
                "Origin and destination are required".to_string(),
            ));
        }
        if draft.trip_date.trim().is_empty() {
            return Err(TripError::InvalidInput("Trip date is required".to_string()));
        }
        if let Some(count) = draft.number_of_passengers
            && count < 1
        {
            return Err(TripError::InvalidInput(
                "Number of passengers must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TripService for SeaOrmTripService {
    async fn create(&self, draft: TripDraft) -> Result<trips::Model, TripError> {
        Self::validate_draft(&draft)?;
        Ok(self.store.create_trip(draft).await?)
    }

    async fn get(&self, id: i32) -> Result<trips::Model, TripError> {
        self.store
            .get_trip(id)
            .await?
            .ok_or(TripError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<trips::Model>, TripError> {
        Ok(self.store.list_trips().await?)
    }

    async fn list_for_passenger(&self, passenger_id: i32) -> Result<Vec<trips::Model>, TripError> {
        Ok(self.store.list_trips_for_passenger(passenger_id).await?)
    }

    async fn update(
        &self,
        id: i32,
        draft: TripDraft,
        confirmed: bool,
    ) -> Result<trips::Model, TripError> {
        Self::validate_draft(&draft)?;
        self.store
            .update_trip(id, draft, confirmed)
            .await?
            .ok_or(TripError::NotFound(id))
    }

    async fn delete(&self, id: i32) -> Result<(), TripError> {
        if self.store.remove_trip(id).await? {
            Ok(())
        } else {
            Err(TripError::NotFound(id))
        }
    }

    async fn increment_passengers(&self, id: i32) -> Result<trips::Model, TripError> {
        match self.store.increment_trip_passengers(id).await? {
            CounterUpdate::Updated(trip) => Ok(trip),
            CounterUpdate::NotFound => Err(TripError::NotFound(id)),
            CounterUpdate::Refused(_) => Err(TripError::InvalidState(
                "Trip has no passenger count to increment".to_string(),
            )),
        }
    }

    async fn decrement_passengers(&self, id: i32) -> Result<trips::Model, TripError> {
        match self.store.decrement_trip_passengers(id).await? {
            CounterUpdate::Updated(trip) => Ok(trip),
            CounterUpdate::NotFound => Err(TripError::NotFound(id)),
            CounterUpdate::Refused(trip) => match trip.number_of_passengers {
                Some(_) => Err(TripError::InvalidState(
                    "Passenger count cannot go below 1".to_string(),
                )),
                None => Err(TripError::InvalidState(
                    "Trip has no passenger count to decrement".to_string(),
                )),
            },
        }
    }

    async fn set_passengers(&self, id: i32, value: i32) -> Result<trips::Model, TripError> {
        if value < 1 {
            return Err(TripError::InvalidInput(
                "Number of passengers must be a positive integer".to_string(),
            ));
        }

        match self.store.set_trip_passengers(id, value).await? {
            CounterUpdate::Updated(trip) | CounterUpdate::Refused(trip) => Ok(trip),
            CounterUpdate::NotFound => Err(TripError::NotFound(id)),
        }
    }

    async fn confirm(&self, id: i32) -> Result<trips::Model, TripError> {
        self.store
            .confirm_trip(id)
            .await?
            .ok_or(TripError::NotFound(id))
    }

    async fn set_sort_order(
        &self,
        id: i32,
        email: &str,
        position: i32,
    ) -> Result<trips::Model, TripError> {
        if position < 0 {
            return Err(TripError::InvalidInput(
                "Sort position must be non-negative".to_string(),
            ));
        }

        self.store
            .set_trip_sort_order(id, email, position)
            .await?
            .ok_or(TripError::NotFound(id))
    }
}
