use axum::{
    Router,
    body::{Body, to_bytes},
    extract::Request,
    http::{Response, StatusCode},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use prepfeed::{
    api,
    site::SiteConfig,
    state::AppState,
    storage::{DbPool, init_db_from_env, migrate},
};

struct TestApp {
    router: Router,
    db: DbPool,
}

impl TestApp {
    async fn new() -> Self {
        let db = init_db_from_env().await;

        migrate(&db, "sql/01-CREATE_TABLE.sql")
            .await
            .expect("schema setup failed");

        let site = SiteConfig {
            base_url: "https://www.example.in".into(),
            publication: "PrepFeed".into(),
            default_language: "en".into(),
        };
        let router = api::setup_route(AppState::new(db.clone(), site));

        let app = Self { router, db };
        app.seed().await;
        app
    }

    async fn seed(&self) {
        for table in [
            "post_tag_map",
            "post_exam_map",
            "post_category_map",
            "contact_submissions",
            "posts",
            "tags",
            "examinations",
            "categories",
            "authors",
        ] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&self.db)
                .await
                .expect("table cleanup failed");
        }

        let author_id: i64 = sqlx::query_scalar(
            "INSERT INTO authors (slug, name, bio) VALUES ('asha', 'Asha', 'Staff writer') RETURNING id",
        )
        .fetch_one(&self.db)
        .await
        .expect("author insert failed");

        let category_id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (slug, name) VALUES ('admit-card', 'Admit Card') RETURNING id",
        )
        .fetch_one(&self.db)
        .await
        .expect("category insert failed");

        let exam_id: i64 = sqlx::query_scalar(
            "INSERT INTO examinations (slug, name) VALUES ('ssc-cgl', 'SSC CGL') RETURNING id",
        )
        .fetch_one(&self.db)
        .await
        .expect("exam insert failed");

        let tag_id: i64 =
            sqlx::query_scalar("INSERT INTO tags (name) VALUES ('Exam Dates') RETURNING id")
                .fetch_one(&self.db)
                .await
                .expect("tag insert failed");

        let content = json!([
            { "type": "heading", "level": 2, "text": "Important Dates" },
            { "type": "paragraph", "text": "Check the [official site](https://ssc.gov.in) daily." },
            { "type": "video_embed", "src": "https://example.com/v" },
            { "type": "faq", "question": "When is the exam?", "answer": "In June." }
        ]);

        let post_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO posts
                (slug, title, short_description, content, status, author_id, published_at)
            VALUES
                ('ssc-cgl-admit-card', 'SSC CGL Admit Card Released', 'Download now', $1,
                 'published', $2, $3)
            RETURNING id
            "#,
        )
        .bind(&content)
        .bind(author_id)
        .bind(Utc::now() - Duration::days(2))
        .fetch_one(&self.db)
        .await
        .expect("post insert failed");

        sqlx::query("INSERT INTO post_category_map (post_id, category_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(category_id)
            .execute(&self.db)
            .await
            .expect("category map insert failed");
        sqlx::query("INSERT INTO post_exam_map (post_id, exam_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(exam_id)
            .execute(&self.db)
            .await
            .expect("exam map insert failed");
        sqlx::query("INSERT INTO post_tag_map (post_id, tag_id) VALUES ($1, $2)")
            .bind(post_id)
            .bind(tag_id)
            .execute(&self.db)
            .await
            .expect("tag map insert failed");

        // a draft must never surface anywhere
        sqlx::query(
            r#"
            INSERT INTO posts (slug, title, content, status)
            VALUES ('unpublished-draft', 'Draft', '[]', 'draft')
            "#,
        )
        .execute(&self.db)
        .await
        .expect("draft insert failed");
    }

    async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("oneshot failed")
    }

    async fn get_json(&self, uri: &str, code: StatusCode, msg: &str) -> Value {
        let req = Request::get(uri).body(Body::empty()).expect("bad request");
        let resp = self.request(req).await;
        assert_eq!(resp.status(), code, "{}", msg);
        let data = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("body read failed");
        serde_json::from_slice(&data).unwrap_or(Value::Null)
    }

    async fn submissions(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM contact_submissions")
            .fetch_one(&self.db)
            .await
            .expect("count failed")
    }
}

#[tokio::test]
#[ignore = "integration test, needs a live Postgres (DATABASE_URL)"]
async fn test_api() {
    let app = TestApp::new().await;

    // listing: only the published post, with its taxonomy names
    {
        let posts = app
            .get_json("/api/posts", StatusCode::OK, "listing should answer 200")
            .await;
        let posts = posts.as_array().expect("listing should be an array");
        assert_eq!(posts.len(), 1, "drafts must not be listed");
        assert_eq!(posts[0]["slug"], "ssc-cgl-admit-card");
        assert_eq!(posts[0]["categories"][0], "Admit Card");
        assert_eq!(posts[0]["exams"][0], "SSC CGL");

        let filtered = app
            .get_json(
                "/api/posts?category=admit-card",
                StatusCode::OK,
                "category filter",
            )
            .await;
        assert_eq!(filtered.as_array().unwrap().len(), 1);

        let none = app
            .get_json("/api/posts?category=results", StatusCode::OK, "no match")
            .await;
        assert_eq!(none.as_array().unwrap().len(), 0);
    }

    // detail: rendered body, logged-and-skipped unknown block, tag slugs
    {
        let page = app
            .get_json(
                "/api/posts/ssc-cgl-admit-card",
                StatusCode::OK,
                "detail should answer 200",
            )
            .await;
        let html = page["content_html"].as_str().expect("content_html missing");
        assert!(html.contains("<h2"), "heading should be rendered");
        assert!(
            html.contains(r#"<a href="https://ssc.gov.in" target="_blank""#),
            "external inline link should open in a new context"
        );
        assert!(
            !html.contains("video_embed"),
            "unrecognized block must not leak into the output"
        );
        assert!(html.contains("aria-expanded=\"false\""), "faq starts closed");
        assert_eq!(page["tags"][0]["slug"], "exam-dates");

        app.get_json(
            "/api/posts/unpublished-draft",
            StatusCode::NOT_FOUND,
            "drafts answer 404",
        )
        .await;
        app.get_json(
            "/api/posts/missing",
            StatusCode::NOT_FOUND,
            "unknown slug answers 404",
        )
        .await;
    }

    // search: case-insensitive substring, seq echo
    {
        let found = app
            .get_json(
                "/api/search?q=admit%20card&seq=7",
                StatusCode::OK,
                "search should answer 200",
            )
            .await;
        assert_eq!(found["total"], 1);
        assert_eq!(found["total_pages"], 1);
        assert_eq!(found["seq"], 7);
        assert_eq!(found["results"][0]["slug"], "ssc-cgl-admit-card");

        let miss = app
            .get_json("/api/search?q=zzzz", StatusCode::OK, "no-hit search")
            .await;
        assert_eq!(miss["total"], 0);
        assert_eq!(miss["results"].as_array().unwrap().len(), 0);
    }

    // contact: validation rejects without persisting, success persists pending
    {
        let before = app.submissions().await;
        let req = Request::post("/api/contact")
            .header("Content-Type", "application/json")
            .body(Body::new(
                json!({ "name": "Ravi", "email": "ravi@example.com", "message": "" }).to_string(),
            ))
            .expect("bad request");
        let resp = app.request(req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(
            &to_bytes(resp.into_body(), usize::MAX).await.expect("body"),
        )
        .expect("envelope");
        assert_eq!(body["success"], false);
        assert!(
            body["error"].as_str().unwrap().contains("message"),
            "error should name the missing field"
        );
        assert_eq!(app.submissions().await, before, "no persistence on 400");

        let req = Request::post("/api/contact")
            .header("Content-Type", "application/json")
            .body(Body::new(
                json!({
                    "name": "Ravi",
                    "email": "ravi@example.com",
                    "exam": "SSC CGL",
                    "message": "Please cover the JE exam too."
                })
                .to_string(),
            ))
            .expect("bad request");
        let resp = app.request(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(app.submissions().await, before + 1);

        let status: String =
            sqlx::query_scalar("SELECT status FROM contact_submissions ORDER BY id DESC LIMIT 1")
                .fetch_one(&app.db)
                .await
                .expect("status read failed");
        assert_eq!(status, "pending");
    }

    // sitemaps: xml content type, cache headers, escaped payload
    {
        let req = Request::get("/sitemap.xml")
            .body(Body::empty())
            .expect("bad request");
        let resp = app.request(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["content-type"].to_str().unwrap(),
            "text/xml; charset=utf-8"
        );
        assert_eq!(
            resp.headers()["cache-control"].to_str().unwrap(),
            "public, max-age=86400, stale-while-revalidate=43200"
        );
        let xml = String::from_utf8(
            to_bytes(resp.into_body(), usize::MAX)
                .await
                .expect("body")
                .to_vec(),
        )
        .expect("utf8");
        assert!(xml.contains("<loc>https://www.example.in/posts/ssc-cgl-admit-card</loc>"));
        assert!(xml.contains("<news:title>SSC CGL Admit Card Released</news:title>"));
        assert!(!xml.contains("unpublished-draft"));

        let req = Request::get("/sitemap-categories.xml")
            .body(Body::empty())
            .expect("bad request");
        let resp = app.request(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["cache-control"].to_str().unwrap(),
            "public, max-age=3600"
        );
        let xml = String::from_utf8(
            to_bytes(resp.into_body(), usize::MAX)
                .await
                .expect("body")
                .to_vec(),
        )
        .expect("utf8");
        assert!(xml.contains("<loc>https://www.example.in/category/admit-card</loc>"));
    }
}
