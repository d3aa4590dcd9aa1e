use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, patch, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use time;

use crate::config::Config;
use crate::services::{
    PassengerService, SeaOrmPassengerService, SeaOrmSiteService, SeaOrmTripService, SiteService,
    TripService,
};
use crate::state::SharedState;

pub mod auth;
mod error;
mod observability;
mod passengers;
mod sites;
mod system;
mod trips;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub trip_service: Arc<dyn TripService>,

    pub passenger_service: Arc<dyn PassengerService>,

    pub site_service: Arc<dyn SiteService>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }
}

pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let trip_service =
        Arc::new(SeaOrmTripService::new(shared.store.clone())) as Arc<dyn TripService>;
    let passenger_service =
        Arc::new(SeaOrmPassengerService::new(shared.store.clone())) as Arc<dyn PassengerService>;
    let site_service = Arc::new(SeaOrmSiteService::new(
        shared.store.clone(),
        shared.config.clone(),
    )) as Arc<dyn SiteService>;

    Arc::new(AppState {
        shared,
        trip_service,
        passenger_service,
        site_service,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (cors_origins, secure_cookies) = {
        let config = state.config().read().await;
        (
            config.server.cors_allowed_origins.clone(),
            config.server.secure_cookies,
        )
    };

    let protected_routes = create_protected_router(state.clone());

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(60)));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route(
            "/auth/password-reset/request",
            post(auth::request_password_reset),
        )
        .route(
            "/auth/password-reset/confirm",
            post(auth::confirm_password_reset),
        )
        .route("/health", get(system::health))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/password", put(auth::change_password))
        .route("/auth/api-key", get(auth::get_api_key))
        .route("/auth/api-key/regenerate", post(auth::regenerate_api_key))
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/users/{email}", get(users::get_user))
        .route("/users/{email}", put(users::update_user))
        .route("/users/{email}", delete(users::delete_user))
        .route("/users/{email}/verify", post(users::verify_user))
        .route("/passengers", get(passengers::list_passengers))
        .route("/passengers", post(passengers::create_passenger))
        .route("/passengers/{id}", get(passengers::get_passenger))
        .route("/passengers/{id}", put(passengers::update_passenger))
        .route("/passengers/{id}", delete(passengers::delete_passenger))
        .route("/trips", get(trips::list_trips))
        .route("/trips", post(trips::create_trip))
        .route("/trips/{id}", get(trips::get_trip))
        .route("/trips/{id}", put(trips::update_trip))
        .route("/trips/{id}", delete(trips::delete_trip))
        .route(
            "/trips/passenger/{passenger_id}",
            get(trips::list_trips_for_passenger),
        )
        .route(
            "/trips/{id}/passengers/increment",
            patch(trips::increment_passengers),
        )
        .route(
            "/trips/{id}/passengers/decrement",
            patch(trips::decrement_passengers),
        )
        .route("/trips/{id}/passengers/set", patch(trips::set_passengers))
        .route("/trips/{id}/confirm", post(trips::confirm_trip))
        .route("/trips/{id}/sort-order", put(trips::set_sort_order))
        .route("/sites", get(sites::list_sites))
        .route("/sites/initialize", post(sites::initialize_sites))
        .route("/sites/{name}/pob", put(sites::set_pob))
        .route("/system/status", get(system::get_status))
        .route("/system/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
