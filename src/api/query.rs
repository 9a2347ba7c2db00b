use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::Query;
use serde::{Deserialize, Serialize};

use crate::content::{FaqAccordion, document_to_html, parse_blocks, render_document};
use crate::error::{ApiError, Result};
use crate::helpers::slugify;
use crate::search;
use crate::state::AppState;
use crate::storage::{DbPool, PostQuery, PostSummary};

/// Content read routes:
/// - `GET /posts`: paginated listing with taxonomy filters
/// - `GET /posts/{slug}`: one post with its rendered body
/// - `GET /search`: title/description substring search
/// - `GET /categories`, `GET /examinations`, `GET /tags`
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/posts", get(posts_list))
        .route("/posts/{slug}", get(post_detail))
        .route("/search", get(posts_search))
        .route("/categories", get(category_list))
        .route("/examinations", get(examination_list))
        .route("/tags", get(tag_list))
}

/// Post metadata for feeds and search results.
#[derive(Debug, Serialize)]
pub struct PostMeta {
    pub slug: String,
    pub title: String,
    pub short_description: Option<String>,
    pub featured_image: Option<String>,
    pub author: Option<String>,
    pub categories: Vec<String>,
    pub exams: Vec<String>,
    pub published_at: i64,
    pub updated_at: Option<i64>,
}

impl From<PostSummary> for PostMeta {
    fn from(post: PostSummary) -> Self {
        Self {
            slug: post.slug,
            title: post.title,
            short_description: post.short_description,
            featured_image: post.featured_image,
            author: post.author_name,
            categories: post.categories,
            exams: post.exams,
            published_at: post.published_at.timestamp_millis(),
            updated_at: post.updated_at.map(|t| t.timestamp_millis()),
        }
    }
}

/// Full post: metadata plus the body rendered to HTML server-side.
#[derive(Debug, Serialize)]
pub struct PostPage {
    #[serde(flatten)]
    meta: PostMeta,

    image_alt: Option<String>,
    language: Option<String>,
    author_bio: Option<String>,
    tags: Vec<TagRef>,
    content_html: String,
}

/// A tag with the path segment its page lives under.
#[derive(Debug, Serialize)]
pub struct TagRef {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListParams {
    page: i32,
    limit: i32,
    category: Option<String>,
    exam: Option<String>,
    tag: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: search::PAGE_SIZE,
            category: None,
            exam: None,
            tag: None,
        }
    }
}

/// Paginated published-post listing, newest first.
async fn posts_list(
    Query(params): Query<ListParams>,
    State(pool): State<DbPool>,
) -> Result<Json<Vec<PostMeta>>> {
    let posts = pool
        .list(
            params.page,
            params.limit.clamp(1, 50),
            params.category.as_deref(),
            params.exam.as_deref(),
            params.tag.as_deref(),
        )
        .await?;

    Ok(Json(posts.into_iter().map(PostMeta::from).collect()))
}

/// One published post by slug, body rendered to HTML.
///
/// Content blocks the renderer does not recognize are logged and left out.
async fn post_detail(
    Path(slug): Path<String>,
    State(pool): State<DbPool>,
) -> Result<Json<PostPage>> {
    let post = pool.get_one(&slug).await?.ok_or(ApiError::NotFound)?;

    let doc = parse_blocks(&post.content.0);
    for skipped in &doc.skipped {
        tracing::warn!(
            slug = %post.slug,
            index = skipped.index,
            block_type = %skipped.block_type,
            "skipping unrecognized content block"
        );
    }
    let nodes = render_document(&doc.blocks);
    let content_html = document_to_html(&nodes, &FaqAccordion::default());

    let tags = post
        .tags
        .into_iter()
        .map(|name| TagRef {
            slug: slugify(&name),
            name,
        })
        .collect();

    Ok(Json(PostPage {
        meta: PostMeta {
            slug: post.slug,
            title: post.title,
            short_description: post.short_description,
            featured_image: post.featured_image,
            author: post.author_name,
            categories: post.categories,
            exams: post.exams,
            published_at: post.published_at.timestamp_millis(),
            updated_at: post.updated_at.map(|t| t.timestamp_millis()),
        },
        image_alt: post.image_alt,
        language: post.language,
        author_bio: post.author_bio,
        tags,
        content_html,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    q: String,
    page: i32,
    /// Client-issued token echoed back so stale responses can be discarded.
    seq: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            q: String::new(),
            page: 1,
            seq: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    query: String,
    page: i32,
    total: i64,
    total_pages: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seq: Option<u64>,
    results: Vec<PostMeta>,
}

/// Search published posts; an empty query matches everything, newest first.
async fn posts_search(
    Query(params): Query<SearchParams>,
    State(pool): State<DbPool>,
) -> Result<Json<SearchResponse>> {
    let page = params.page.max(1);
    let found = pool.search(&params.q, page, search::PAGE_SIZE).await?;

    Ok(Json(SearchResponse {
        query: params.q,
        page,
        total: found.total,
        total_pages: search::total_pages(found.total),
        seq: params.seq,
        results: found.posts.into_iter().map(PostMeta::from).collect(),
    }))
}

/// Category or examination reference.
#[derive(Debug, Serialize)]
pub struct Taxonomy {
    slug: String,
    name: String,
}

async fn category_list(State(pool): State<DbPool>) -> Result<Json<Vec<Taxonomy>>> {
    let rows = pool.categories().await?;
    Ok(Json(
        rows.into_iter()
            .map(|t| Taxonomy {
                slug: t.slug,
                name: t.name,
            })
            .collect(),
    ))
}

async fn examination_list(State(pool): State<DbPool>) -> Result<Json<Vec<Taxonomy>>> {
    let rows = pool.examinations().await?;
    Ok(Json(
        rows.into_iter()
            .map(|t| Taxonomy {
                slug: t.slug,
                name: t.name,
            })
            .collect(),
    ))
}

async fn tag_list(State(pool): State<DbPool>) -> Result<Json<Vec<String>>> {
    pool.tags().await.map(Json).map_err(Into::into)
}
