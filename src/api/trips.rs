use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{
    ApiError, ApiResponse, AppState, CreateTripRequest, DeletedDto, SetPassengersRequest,
    SortOrderRequest, TripDto, UpdateTripRequest,
};
use crate::api::validation::validate_id;
use crate::db::TripDraft;

pub async fn list_trips(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<TripDto>>>, ApiError> {
    let trips = state.trip_service.list().await?;
    Ok(Json(ApiResponse::success(
        trips.into_iter().map(TripDto::from).collect(),
    )))
}

pub async fn create_trip(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateTripRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TripDto>>), ApiError> {
    validate_id(payload.passenger_id)?;

    let trip = state
        .trip_service
        .create(TripDraft {
            passenger_id: payload.passenger_id,
            origin: payload.origin,
            destination: payload.destination,
            trip_date: payload.trip_date,
            number_of_passengers: payload.number_of_passengers,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(trip.into()))))
}

pub async fn get_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TripDto>>, ApiError> {
    let id = validate_id(id)?;
    let trip = state.trip_service.get(id).await?;
    Ok(Json(ApiResponse::success(trip.into())))
}

pub async fn list_trips_for_passenger(
    State(state): State<Arc<AppState>>,
    Path(passenger_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<TripDto>>>, ApiError> {
    let passenger_id = validate_id(passenger_id)?;
    let trips = state.trip_service.list_for_passenger(passenger_id).await?;

    if trips.is_empty() {
        return Err(ApiError::NotFound(
            "No trips found for this passenger".to_string(),
        ));
    }

    Ok(Json(ApiResponse::success(
        trips.into_iter().map(TripDto::from).collect(),
    )))
}

pub async fn update_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTripRequest>,
) -> Result<Json<ApiResponse<TripDto>>, ApiError> {
    let id = validate_id(id)?;
    validate_id(payload.passenger_id)?;

    let trip = state
        .trip_service
        .update(
            id,
            TripDraft {
                passenger_id: payload.passenger_id,
                origin: payload.origin,
                destination: payload.destination,
                trip_date: payload.trip_date,
                number_of_passengers: payload.number_of_passengers,
            },
            payload.confirmed,
        )
        .await?;

    Ok(Json(ApiResponse::success(trip.into())))
}

pub async fn delete_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<DeletedDto>>, ApiError> {
    let id = validate_id(id)?;
    state.trip_service.delete(id).await?;

    Ok(Json(ApiResponse::success(DeletedDto {
        message: "Trip deleted successfully".to_string(),
    })))
}

/// PATCH /trips/{id}/passengers/increment
pub async fn increment_passengers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TripDto>>, ApiError> {
    let id = validate_id(id)?;
    let trip = state.trip_service.increment_passengers(id).await?;
    Ok(Json(ApiResponse::success(trip.into())))
}

/// PATCH /trips/{id}/passengers/decrement
///
/// Refuses to take the count below 1.
pub async fn decrement_passengers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TripDto>>, ApiError> {
    let id = validate_id(id)?;
    let trip = state.trip_service.decrement_passengers(id).await?;
    Ok(Json(ApiResponse::success(trip.into())))
}

/// PATCH /trips/{id}/passengers/set
pub async fn set_passengers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<SetPassengersRequest>,
) -> Result<Json<ApiResponse<TripDto>>, ApiError> {
    let id = validate_id(id)?;
    let trip = state.trip_service.set_passengers(id, payload.value).await?;
    Ok(Json(ApiResponse::success(trip.into())))
}

/// POST /trips/{id}/confirm
pub async fn confirm_trip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<TripDto>>, ApiError> {
    let id = validate_id(id)?;
    let trip = state.trip_service.confirm(id).await?;
    Ok(Json(ApiResponse::success(trip.into())))
}

/// PUT /trips/{id}/sort-order
/// Stores the trip's position in the calling user's display ordering.
pub async fn set_sort_order(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(payload): Json<SortOrderRequest>,
) -> Result<Json<ApiResponse<TripDto>>, ApiError> {
    let id = validate_id(id)?;
    let trip = state
        .trip_service
        .set_sort_order(id, &current.email, payload.position)
        .await?;
    Ok(Json(ApiResponse::success(trip.into())))
}
