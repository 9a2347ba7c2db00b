use std::sync::Arc;

use axum::extract::FromRef;

use crate::{site::SiteConfig, storage::DbPool};

/// Application context shared by every handler.
///
/// [`AppState`] carries the database pool and the site configuration; handlers
/// extract whichever part they need via `FromRef`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pool: DbPool,
    site: Arc<SiteConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, site: SiteConfig) -> Self {
        Self {
            pool,
            site: Arc::new(site),
        }
    }
}
