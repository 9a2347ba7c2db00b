use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

use super::DbPool;

/// A validated contact-form submission ready to persist.
#[derive(Debug)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub grade: Option<String>,
    pub exam: Option<String>,
    pub message: String,
    pub submitted_at: DateTime<Utc>,
}

/// Write side of the contact-submission inbox.
///
/// New records always start in the `pending` status; review moves them along
/// outside this service.
pub trait ContactStorage {
    /// SQL executor for [`sqlx::query()`].
    fn executor<'t>(&'t mut self) -> impl PgExecutor<'t>;

    /// Persist a submission, returning its row id.
    fn insert_submission(
        &mut self,
        submission: &NewSubmission,
    ) -> impl Future<Output = Result<i64, sqlx::Error>> {
        async {
            sqlx::query_scalar(
                r#"
                INSERT INTO contact_submissions
                    (name, email, grade, exam, message, status, submitted_at)
                VALUES ($1, $2, $3, $4, $5, 'pending', $6)
                RETURNING id
                "#,
            )
            .bind(&submission.name)
            .bind(&submission.email)
            .bind(&submission.grade)
            .bind(&submission.exam)
            .bind(&submission.message)
            .bind(submission.submitted_at)
            .fetch_one(self.executor())
            .await
        }
    }
}

impl ContactStorage for &'_ DbPool {
    fn executor<'t>(&'t mut self) -> impl PgExecutor<'t> {
        *self
    }
}

impl ContactStorage for sqlx::PgTransaction<'_> {
    fn executor<'t>(&'t mut self) -> impl PgExecutor<'t> {
        self.as_mut()
    }
}
