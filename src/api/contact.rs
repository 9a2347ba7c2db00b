use std::sync::LazyLock;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use crate::error::Error;
use crate::state::AppState;
use crate::storage::{ContactStorage, DbPool, NewSubmission};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// `POST /contact`: validate and persist a contact-form submission.
pub fn setup_route() -> Router<AppState> {
    Router::new().route("/contact", post(submit))
}

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub exam: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ContactForm {
    /// Check required fields and the email shape; the error names the field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("The name field is required.");
        }
        if self.email.trim().is_empty() {
            return Err("The email field is required.");
        }
        if self.message.trim().is_empty() {
            return Err("The message field is required.");
        }
        if !EMAIL_RE.is_match(self.email.trim()) {
            return Err("Please enter a valid email address.");
        }
        Ok(())
    }
}

/// Validation failures answer 400 without touching the database; storage
/// failures answer 500. Both use the `{success, message|error}` envelope.
async fn submit(State(pool): State<DbPool>, Json(form): Json<ContactForm>) -> Response {
    if let Err(error) = form.validate() {
        return Error::Validation(error).into_response();
    }

    let submission = NewSubmission {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        grade: form.grade.filter(|g| !g.trim().is_empty()),
        exam: form.exam.filter(|e| !e.trim().is_empty()),
        message: form.message.trim().to_string(),
        submitted_at: Utc::now(),
    };

    match (&pool).insert_submission(&submission).await {
        Ok(id) => Json(json!({
            "success": true,
            "message": "Thank you! Your message has been submitted successfully.",
            "data": { "id": id },
        }))
        .into_response(),
        Err(e) => {
            tracing::error!(%e, "contact submission insert failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Database error. Please try again." })),
            )
                .into_response()
        }
    }
}
