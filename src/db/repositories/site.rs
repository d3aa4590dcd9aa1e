use anyhow::{Context, Result};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entities::{prelude::*, sites};

pub struct SiteRepository {
    conn: DatabaseConnection,
}

impl SiteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Seed the known sites, leaving any that already exist untouched.
    ///
    /// Insert-or-ignore on the unique site name gives setOnInsert semantics:
    /// running this twice with the same input changes nothing the second time.
    pub async fn initialize(&self, site_names: &[String], default_max: i32) -> Result<u64> {
        if site_names.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let models: Vec<sites::ActiveModel> = site_names
            .iter()
            .map(|name| sites::ActiveModel {
                site_name: Set(name.clone()),
                current_pob: Set(0),
                maximum_pob: Set(default_max),
                pob_updated_date: Set(now.clone()),
                ..Default::default()
            })
            .collect();

        let inserted = Sites::insert_many(models)
            .on_conflict(
                OnConflict::column(sites::Column::SiteName)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to initialize sites")?;

        if inserted > 0 {
            info!("Initialized {} site(s)", inserted);
        }
        Ok(inserted)
    }

    /// Upsert the POB counter for a site.
    ///
    /// A single insert-on-conflict statement so concurrent updates to the
    /// same site cannot interleave. A previously unknown site is created with
    /// the default maximum; an existing site keeps its maximum untouched.
    pub async fn set_pob(
        &self,
        site_name: &str,
        value: i32,
        default_max: i32,
    ) -> Result<sites::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let model = sites::ActiveModel {
            site_name: Set(site_name.to_string()),
            current_pob: Set(value),
            maximum_pob: Set(default_max),
            pob_updated_date: Set(now),
            ..Default::default()
        };

        Sites::insert(model)
            .on_conflict(
                OnConflict::column(sites::Column::SiteName)
                    .update_columns([
                        sites::Column::CurrentPob,
                        sites::Column::PobUpdatedDate,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to upsert site POB")?;

        self.get_by_name(site_name)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Site {site_name} missing after upsert"))
    }

    pub async fn get_by_name(&self, site_name: &str) -> Result<Option<sites::Model>> {
        Sites::find()
            .filter(sites::Column::SiteName.eq(site_name))
            .one(&self.conn)
            .await
            .context("Failed to query site")
    }

    pub async fn list(&self) -> Result<Vec<sites::Model>> {
        Sites::find()
            .order_by_asc(sites::Column::SiteName)
            .all(&self.conn)
            .await
            .context("Failed to list sites")
    }
}
