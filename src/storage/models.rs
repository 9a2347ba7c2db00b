use chrono::{DateTime, Utc};
use sqlx::types::Json;

/// Post listing entry: everything a feed or search result needs, no body.
#[derive(Debug, sqlx::FromRow)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub short_description: Option<String>,
    pub featured_image: Option<String>,
    pub published_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,

    pub author_name: Option<String>,
    /// Category names, empty when uncategorized.
    pub categories: Vec<String>,
    /// Exam names the post is mapped to.
    pub exams: Vec<String>,
}

/// Full post with its structured content body (JSONB block array).
#[derive(Debug, sqlx::FromRow)]
pub struct PostDetail {
    pub slug: String,
    pub title: String,
    pub short_description: Option<String>,
    pub content: Json<serde_json::Value>,
    pub featured_image: Option<String>,
    pub image_alt: Option<String>,
    pub language: Option<String>,
    pub published_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,

    pub author_name: Option<String>,
    pub author_bio: Option<String>,
    pub categories: Vec<String>,
    pub exams: Vec<String>,
    pub tags: Vec<String>,
}

/// Published post as the sitemap generator sees it.
#[derive(Debug, sqlx::FromRow)]
pub struct SitemapPost {
    pub slug: String,
    pub title: String,
    pub seo_title: Option<String>,
    pub seo_keywords: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub language: Option<String>,
    pub published_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    pub exams: Vec<String>,
}

/// One page of search results plus the overall hit count.
#[derive(Debug)]
pub struct SearchPage {
    pub total: i64,
    pub posts: Vec<PostSummary>,
}

/// Category or examination reference.
#[derive(Debug, sqlx::FromRow)]
pub struct TaxonomyInfo {
    pub slug: String,
    pub name: String,
}
