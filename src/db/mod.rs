use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::{passengers, sites, trips};

pub mod migrator;
pub mod repositories;

pub use repositories::passenger::{CascadeDeleteError, PassengerDraft};
pub use repositories::trip::{CounterUpdate, TripDraft};
pub use repositories::user::{NewUser, User, UserUpdate};

/// Explicitly owned handle to the database, injected into the services and
/// API state rather than reached through any global.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:");
        if !path_str.starts_with(":memory:") {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    /// Liveness probe for the readiness endpoint.
    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn passenger_repo(&self) -> repositories::passenger::PassengerRepository {
        repositories::passenger::PassengerRepository::new(self.conn.clone())
    }

    fn trip_repo(&self) -> repositories::trip::TripRepository {
        repositories::trip::TripRepository::new(self.conn.clone())
    }

    fn site_repo(&self) -> repositories::site::SiteRepository {
        repositories::site::SiteRepository::new(self.conn.clone())
    }

    // ========== User Repository Methods ==========

    pub async fn create_user(
        &self,
        new_user: NewUser,
        config: Option<&SecurityConfig>,
    ) -> Result<Option<User>> {
        self.user_repo().create(new_user, config).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn update_user(&self, email: &str, update: UserUpdate) -> Result<Option<User>> {
        self.user_repo().update(email, update).await
    }

    pub async fn verify_user(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().set_verified(email).await
    }

    pub async fn delete_user(&self, email: &str) -> Result<bool> {
        self.user_repo().delete(email).await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn update_user_password(
        &self,
        email: &str,
        new_password: &str,
        config: Option<&SecurityConfig>,
    ) -> Result<()> {
        self.user_repo()
            .update_password(email, new_password, config)
            .await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn get_user_api_key(&self, email: &str) -> Result<Option<String>> {
        self.user_repo().get_api_key(email).await
    }

    pub async fn regenerate_user_api_key(&self, email: &str) -> Result<String> {
        self.user_repo().regenerate_api_key(email).await
    }

    pub async fn create_password_reset_token(&self, email: &str) -> Result<Option<String>> {
        self.user_repo().create_reset_token(email).await
    }

    pub async fn reset_password_with_token(
        &self,
        token: &str,
        new_password: &str,
        config: Option<&SecurityConfig>,
    ) -> Result<bool> {
        self.user_repo()
            .reset_password_with_token(token, new_password, config)
            .await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // ========== Passenger Repository Methods ==========

    pub async fn create_passenger(&self, draft: PassengerDraft) -> Result<passengers::Model> {
        self.passenger_repo().create(draft).await
    }

    pub async fn get_passenger(&self, id: i32) -> Result<Option<passengers::Model>> {
        self.passenger_repo().get(id).await
    }

    pub async fn list_passengers(&self) -> Result<Vec<passengers::Model>> {
        self.passenger_repo().list().await
    }

    pub async fn update_passenger(
        &self,
        id: i32,
        draft: PassengerDraft,
    ) -> Result<Option<passengers::Model>> {
        self.passenger_repo().update(id, draft).await
    }

    pub async fn count_passengers(&self) -> Result<u64> {
        self.passenger_repo().count().await
    }

    pub async fn delete_passenger_cascade(
        &self,
        id: i32,
    ) -> Result<Option<u64>, CascadeDeleteError> {
        self.passenger_repo().delete_cascade(id).await
    }

    // ========== Trip Repository Methods ==========

    pub async fn create_trip(&self, draft: TripDraft) -> Result<trips::Model> {
        self.trip_repo().create(draft).await
    }

    pub async fn get_trip(&self, id: i32) -> Result<Option<trips::Model>> {
        self.trip_repo().get(id).await
    }

    pub async fn list_trips(&self) -> Result<Vec<trips::Model>> {
        self.trip_repo().list().await
    }

    pub async fn list_trips_for_passenger(&self, passenger_id: i32) -> Result<Vec<trips::Model>> {
        self.trip_repo().list_for_passenger(passenger_id).await
    }

    pub async fn count_trips(&self) -> Result<u64> {
        self.trip_repo().count().await
    }

    pub async fn update_trip(
        &self,
        id: i32,
        draft: TripDraft,
        confirmed: bool,
    ) -> Result<Option<trips::Model>> {
        self.trip_repo().update(id, draft, confirmed).await
    }

    pub async fn remove_trip(&self, id: i32) -> Result<bool> {
        self.trip_repo().remove(id).await
    }

    pub async fn increment_trip_passengers(&self, id: i32) -> Result<CounterUpdate> {
        self.trip_repo().increment_passengers(id).await
    }

    pub async fn decrement_trip_passengers(&self, id: i32) -> Result<CounterUpdate> {
        self.trip_repo().decrement_passengers(id).await
    }

    pub async fn set_trip_passengers(&self, id: i32, value: i32) -> Result<CounterUpdate> {
        self.trip_repo().set_passengers(id, value).await
    }

    pub async fn confirm_trip(&self, id: i32) -> Result<Option<trips::Model>> {
        self.trip_repo().confirm(id).await
    }

    pub async fn set_trip_sort_order(
        &self,
        id: i32,
        email: &str,
        position: i32,
    ) -> Result<Option<trips::Model>> {
        self.trip_repo().set_sort_order(id, email, position).await
    }

    // ========== Site Repository Methods ==========

    pub async fn initialize_sites(&self, site_names: &[String], default_max: i32) -> Result<u64> {
        self.site_repo().initialize(site_names, default_max).await
    }

    pub async fn set_site_pob(
        &self,
        site_name: &str,
        value: i32,
        default_max: i32,
    ) -> Result<sites::Model> {
        self.site_repo().set_pob(site_name, value, default_max).await
    }

    pub async fn get_site_by_name(&self, site_name: &str) -> Result<Option<sites::Model>> {
        self.site_repo().get_by_name(site_name).await
    }

    pub async fn list_sites(&self) -> Result<Vec<sites::Model>> {
        self.site_repo().list().await
    }
}
