pub mod api;
pub mod content;
pub mod error;
pub mod helpers;
pub mod search;
pub mod site;
pub mod sitemap;
pub mod state;
pub mod storage;

use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal};

use crate::{site::SiteConfig, state::AppState};

pub async fn run() {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string()))
        .with_env_filter(EnvFilter::from_env("PREPFEED_LOG"))
        .init();

    let state = AppState::new(storage::init_db_from_env().await, SiteConfig::from_env());

    api::run_server(state).await
}
