use std::collections::HashMap;

use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::entities::{prelude::*, trips};

/// Fields required to book a trip.
#[derive(Debug, Clone)]
pub struct TripDraft {
    pub passenger_id: i32,
    pub origin: String,
    pub destination: String,
    pub trip_date: String,
    pub number_of_passengers: Option<i32>,
}

/// Outcome of a guarded counter update.
///
/// The counter operations run as a single `UPDATE ... WHERE` so concurrent
/// calls on the same trip cannot lose increments. When zero rows match, the
/// trip is re-read once to tell "no such trip" apart from "the guard filter
/// refused the row".
#[derive(Debug)]
pub enum CounterUpdate {
    Updated(trips::Model),
    NotFound,
    Refused(trips::Model),
}

pub struct TripRepository {
    conn: DatabaseConnection,
}

impl TripRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, draft: TripDraft) -> Result<trips::Model> {
        let active = trips::ActiveModel {
            passenger_id: Set(draft.passenger_id),
            origin: Set(draft.origin),
            destination: Set(draft.destination),
            trip_date: Set(draft.trip_date),
            confirmed: Set(false),
            number_of_passengers: Set(draft.number_of_passengers),
            sort_order: Set(None),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let trip = active
            .insert(&self.conn)
            .await
            .context("Failed to insert trip")?;

        info!("Booked trip {} ({} -> {})", trip.id, trip.origin, trip.destination);
        Ok(trip)
    }

    pub async fn get(&self, id: i32) -> Result<Option<trips::Model>> {
        Trips::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query trip")
    }

    pub async fn list(&self) -> Result<Vec<trips::Model>> {
        Trips::find()
            .order_by_asc(trips::Column::TripDate)
            .all(&self.conn)
            .await
            .context("Failed to list trips")
    }

    pub async fn count(&self) -> Result<u64> {
        Trips::find()
            .count(&self.conn)
            .await
            .context("Failed to count trips")
    }

    pub async fn list_for_passenger(&self, passenger_id: i32) -> Result<Vec<trips::Model>> {
        Trips::find()
            .filter(trips::Column::PassengerId.eq(passenger_id))
            .order_by_asc(trips::Column::TripDate)
            .all(&self.conn)
            .await
            .context("Failed to list trips for passenger")
    }

    /// Full update of the booking fields. Returns `None` if the trip is absent.
    pub async fn update(&self, id: i32, draft: TripDraft, confirmed: bool) -> Result<Option<trips::Model>> {
        let Some(trip) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: trips::ActiveModel = trip.into();
        active.passenger_id = Set(draft.passenger_id);
        active.origin = Set(draft.origin);
        active.destination = Set(draft.destination);
        active.trip_date = Set(draft.trip_date);
        active.confirmed = Set(confirmed);
        active.number_of_passengers = Set(draft.number_of_passengers);

        let updated = active.update(&self.conn).await?;
        Ok(Some(updated))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Trips::delete_by_id(id).exec(&self.conn).await?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed trip with ID: {}", id);
        }
        Ok(removed)
    }

    /// Atomically add one to the passenger count.
    ///
    /// The guard requires an existing numeric count; a trip whose count was
    /// never set is refused.
    pub async fn increment_passengers(&self, id: i32) -> Result<CounterUpdate> {
        let result = Trips::update_many()
            .col_expr(
                trips::Column::NumberOfPassengers,
                Expr::col(trips::Column::NumberOfPassengers).add(1),
            )
            .filter(trips::Column::Id.eq(id))
            .filter(trips::Column::NumberOfPassengers.is_not_null())
            .exec(&self.conn)
            .await?;

        self.counter_outcome(id, result.rows_affected).await
    }

    /// Atomically subtract one from the passenger count.
    ///
    /// The guard keeps the count at or above 1; a trip already at the floor
    /// (or with no count at all) is refused.
    pub async fn decrement_passengers(&self, id: i32) -> Result<CounterUpdate> {
        let result = Trips::update_many()
            .col_expr(
                trips::Column::NumberOfPassengers,
                Expr::col(trips::Column::NumberOfPassengers).sub(1),
            )
            .filter(trips::Column::Id.eq(id))
            .filter(trips::Column::NumberOfPassengers.gt(1))
            .exec(&self.conn)
            .await?;

        self.counter_outcome(id, result.rows_affected).await
    }

    /// Overwrite the passenger count. Value validation happens in the service.
    pub async fn set_passengers(&self, id: i32, value: i32) -> Result<CounterUpdate> {
        let result = Trips::update_many()
            .col_expr(trips::Column::NumberOfPassengers, Expr::value(value))
            .filter(trips::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        self.counter_outcome(id, result.rows_affected).await
    }

    async fn counter_outcome(&self, id: i32, rows_affected: u64) -> Result<CounterUpdate> {
        let trip = self.get(id).await?;

        match (rows_affected, trip) {
            (0, None) => Ok(CounterUpdate::NotFound),
            (0, Some(trip)) => Ok(CounterUpdate::Refused(trip)),
            (_, Some(trip)) => Ok(CounterUpdate::Updated(trip)),
            (_, None) => anyhow::bail!("Trip {id} disappeared after counter update"),
        }
    }

    /// Mark a trip as confirmed. One-way: there is no unconfirm.
    pub async fn confirm(&self, id: i32) -> Result<Option<trips::Model>> {
        Trips::update_many()
            .col_expr(trips::Column::Confirmed, Expr::value(true))
            .filter(trips::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        self.get(id).await
    }

    /// Record the position of this trip in one user's display ordering.
    pub async fn set_sort_order(
        &self,
        id: i32,
        email: &str,
        position: i32,
    ) -> Result<Option<trips::Model>> {
        let Some(trip) = self.get(id).await? else {
            return Ok(None);
        };

        let mut order: HashMap<String, i32> = trip
            .sort_order
            .as_deref()
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default();
        order.insert(email.to_string(), position);

        let mut active: trips::ActiveModel = trip.into();
        active.sort_order = Set(Some(serde_json::to_string(&order)?));

        let updated = active.update(&self.conn).await?;
        Ok(Some(updated))
    }
}
