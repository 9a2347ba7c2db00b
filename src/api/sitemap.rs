use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::Utc;

use crate::site::SiteConfig;
use crate::sitemap::{generate_post_sitemap, generate_taxonomy_sitemap};
use crate::state::AppState;
use crate::storage::{DbPool, PostQuery};

const SITEMAP_POST_LIMIT: i64 = 5000;

/// Sitemap XML routes. Every endpoint degrades to a valid empty `urlset`
/// when the database read fails; crawlers never see a 500 here.
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(post_sitemap))
        .route("/sitemap-categories.xml", get(category_sitemap))
        .route("/sitemap-examinations.xml", get(examination_sitemap))
}

async fn post_sitemap(
    State(pool): State<DbPool>,
    State(site): State<Arc<SiteConfig>>,
) -> Response {
    let posts = pool
        .sitemap_posts(SITEMAP_POST_LIMIT)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(%e, "post sitemap query failed, serving empty sitemap");
            Vec::new()
        });

    let xml = generate_post_sitemap(&site, Utc::now(), &posts);
    xml_response(xml, "public, max-age=86400, stale-while-revalidate=43200")
}

async fn category_sitemap(
    State(pool): State<DbPool>,
    State(site): State<Arc<SiteConfig>>,
) -> Response {
    let slugs: Vec<String> = pool
        .categories()
        .await
        .unwrap_or_else(|e| {
            tracing::error!(%e, "category sitemap query failed, serving empty sitemap");
            Vec::new()
        })
        .into_iter()
        .map(|t| t.slug)
        .collect();

    let xml = generate_taxonomy_sitemap(
        &site.base_url,
        "category",
        &slugs,
        "daily",
        "0.85",
        Utc::now().date_naive(),
    );
    xml_response(xml, "public, max-age=3600")
}

async fn examination_sitemap(
    State(pool): State<DbPool>,
    State(site): State<Arc<SiteConfig>>,
) -> Response {
    let slugs: Vec<String> = pool
        .examinations()
        .await
        .unwrap_or_else(|e| {
            tracing::error!(%e, "examination sitemap query failed, serving empty sitemap");
            Vec::new()
        })
        .into_iter()
        .map(|t| t.slug)
        .collect();

    let xml = generate_taxonomy_sitemap(
        &site.base_url,
        "examination",
        &slugs,
        "daily",
        "0.9",
        Utc::now().date_naive(),
    );
    xml_response(xml, "public, max-age=3600")
}

fn xml_response(xml: String, cache_control: &'static str) -> Response {
    (
        [
            (CONTENT_TYPE, "text/xml; charset=utf-8"),
            (CACHE_CONTROL, cache_control),
        ],
        xml,
    )
        .into_response()
}
