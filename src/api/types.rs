use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::db::User;
use crate::entities::{passengers, sites, trips};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Outward-facing user representation. The password hash never appears here.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: bool,
    pub is_verified: bool,
    pub home_location: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            is_admin: user.is_admin,
            is_verified: user.is_verified,
            home_location: user.home_location,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PassengerDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub job_role: Option<String>,
    pub created_at: String,
}

impl From<passengers::Model> for PassengerDto {
    fn from(model: passengers::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            job_role: model.job_role,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TripDto {
    pub id: i32,
    pub passenger_id: i32,
    pub origin: String,
    pub destination: String,
    pub trip_date: String,
    pub confirmed: bool,
    pub number_of_passengers: Option<i32>,
    pub sort_order: HashMap<String, i32>,
}

impl From<trips::Model> for TripDto {
    fn from(model: trips::Model) -> Self {
        Self {
            id: model.id,
            passenger_id: model.passenger_id,
            origin: model.origin,
            destination: model.destination,
            trip_date: model.trip_date,
            confirmed: model.confirmed,
            number_of_passengers: model.number_of_passengers,
            sort_order: model
                .sort_order
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SiteDto {
    pub id: i32,
    pub site_name: String,
    pub current_pob: i32,
    pub maximum_pob: i32,
    pub pob_updated_date: String,
}

impl From<sites::Model> for SiteDto {
    fn from(model: sites::Model) -> Self {
        Self {
            id: model.id,
            site_name: model.site_name,
            current_pob: model.current_pob,
            maximum_pob: model.maximum_pob,
            pob_updated_date: model.pob_updated_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    pub home_location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: Option<bool>,
    pub home_location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PassengerRequest {
    pub first_name: String,
    pub last_name: String,
    pub job_role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub passenger_id: i32,
    pub origin: String,
    pub destination: String,
    pub trip_date: String,
    pub number_of_passengers: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTripRequest {
    pub passenger_id: i32,
    pub origin: String,
    pub destination: String,
    pub trip_date: String,
    pub number_of_passengers: Option<i32>,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetPassengersRequest {
    pub value: i32,
}

#[derive(Debug, Deserialize)]
pub struct SortOrderRequest {
    pub position: i32,
}

#[derive(Debug, Deserialize)]
pub struct SetPobRequest {
    pub current_pob: i32,
}

#[derive(Debug, Serialize)]
pub struct DeletedDto {
    pub message: String,
}
