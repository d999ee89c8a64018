use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::db::repository;
use crate::error::AppError;
use crate::scheduling::{Catalog, CatalogSource};

/// Reads the catalog tables of the application database.
#[derive(Clone)]
pub struct SqliteCatalog {
    db: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogSource for SqliteCatalog {
    async fn snapshot(&self) -> Result<Catalog, AppError> {
        Ok(Catalog::new(
            repository::list(&self.db).await?,
            repository::list(&self.db).await?,
            repository::list(&self.db).await?,
            repository::list(&self.db).await?,
            repository::list(&self.db).await?,
        ))
    }
}
