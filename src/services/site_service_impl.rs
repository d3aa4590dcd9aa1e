//! `SeaORM` implementation of the `SiteService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::entities::sites;
use crate::services::site_service::{SiteError, SiteService};

pub struct SeaOrmSiteService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmSiteService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl SiteService for SeaOrmSiteService {
    async fn initialize(&self) -> Result<Vec<sites::Model>, SiteError> {
        let (names, default_max) = {
            let config = self.config.read().await;
            (
                config.sites.names.clone(),
                config.sites.default_maximum_pob,
            )
        };

        self.store.initialize_sites(&names, default_max).await?;

        Ok(self.store.list_sites().await?)
    }

    async fn set_pob(&self, site_name: &str, value: i32) -> Result<sites::Model, SiteError> {
        if site_name.trim().is_empty() {
            return Err(SiteError::InvalidInput(
                "Site name cannot be empty".to_string(),
            ));
        }
        if value < 0 {
            return Err(SiteError::InvalidInput(
                "currentPOB must be a non-negative integer".to_string(),
            ));
        }

        let default_max = self.config.read().await.sites.default_maximum_pob;

        Ok(self.store.set_site_pob(site_name, value, default_max).await?)
    }

    async fn list(&self) -> Result<Vec<sites::Model>, SiteError> {
        Ok(self.store.list_sites().await?)
    }
}
