use super::{DbPool, PostDetail, PostSummary, SearchPage, SitemapPost, TaxonomyInfo};

const SUMMARY_SELECT: &str = r#"
    SELECT p.slug, p.title, p.short_description, p.featured_image,
           p.published_at, p.updated_at,
           a.name AS author_name,
           COALESCE((SELECT array_agg(c.name ORDER BY c.name)
                     FROM post_category_map pcm
                     JOIN categories c ON c.id = pcm.category_id
                     WHERE pcm.post_id = p.id), ARRAY[]::text[]) AS categories,
           COALESCE((SELECT array_agg(e.name ORDER BY e.name)
                     FROM post_exam_map pem
                     JOIN examinations e ON e.id = pem.exam_id
                     WHERE pem.post_id = p.id), ARRAY[]::text[]) AS exams
    FROM posts p
    LEFT JOIN authors a ON a.id = p.author_id
    "#;

/// Read-side queries over published posts and their taxonomies.
///
/// Default methods on top of [`DbPool`]; only published posts with a publish
/// date are ever visible here.
pub trait PostQuery {
    fn db(&self) -> &DbPool;

    /// Fetch one published post by slug, `None` when absent or unpublished.
    fn get_one(
        &self,
        slug: impl AsRef<str>,
    ) -> impl Future<Output = Result<Option<PostDetail>, sqlx::Error>> {
        async move {
            let result = sqlx::query_as::<_, PostDetail>(
                r#"
                SELECT p.slug, p.title, p.short_description, p.content,
                       p.featured_image, p.image_alt, p.language,
                       p.published_at, p.updated_at,
                       a.name AS author_name,
                       a.bio AS author_bio,
                       COALESCE((SELECT array_agg(c.name ORDER BY c.name)
                                 FROM post_category_map pcm
                                 JOIN categories c ON c.id = pcm.category_id
                                 WHERE pcm.post_id = p.id), ARRAY[]::text[]) AS categories,
                       COALESCE((SELECT array_agg(e.name ORDER BY e.name)
                                 FROM post_exam_map pem
                                 JOIN examinations e ON e.id = pem.exam_id
                                 WHERE pem.post_id = p.id), ARRAY[]::text[]) AS exams,
                       COALESCE((SELECT array_agg(t.name ORDER BY t.name)
                                 FROM post_tag_map ptm
                                 JOIN tags t ON t.id = ptm.tag_id
                                 WHERE ptm.post_id = p.id), ARRAY[]::text[]) AS tags
                FROM posts p
                LEFT JOIN authors a ON a.id = p.author_id
                WHERE p.slug = $1
                AND p.status = 'published'
                AND p.published_at IS NOT NULL
                LIMIT 1
                "#,
            )
            .bind(slug.as_ref())
            .fetch_optional(self.db())
            .await?;
            Ok(result)
        }
    }

    /// Page through published posts, newest first, optionally narrowed to a
    /// category slug, an examination slug or a tag name.
    fn list(
        &self,
        page: i32,
        size: i32,
        category: Option<&str>,
        exam: Option<&str>,
        tag: Option<&str>,
    ) -> impl Future<Output = Result<Vec<PostSummary>, sqlx::Error>> {
        async move {
            let offset = (page.max(1) - 1) * size;
            let mut builder = sqlx::QueryBuilder::new(SUMMARY_SELECT);

            builder.push("WHERE p.status = 'published' AND p.published_at IS NOT NULL");
            if let Some(slug) = category {
                builder
                    .push(
                        " AND EXISTS (SELECT 1 FROM post_category_map pcm \
                         JOIN categories c ON c.id = pcm.category_id \
                         WHERE pcm.post_id = p.id AND c.slug = ",
                    )
                    .push_bind(slug)
                    .push(")");
            }
            if let Some(slug) = exam {
                builder
                    .push(
                        " AND EXISTS (SELECT 1 FROM post_exam_map pem \
                         JOIN examinations e ON e.id = pem.exam_id \
                         WHERE pem.post_id = p.id AND e.slug = ",
                    )
                    .push_bind(slug)
                    .push(")");
            }
            if let Some(name) = tag {
                builder
                    .push(
                        " AND EXISTS (SELECT 1 FROM post_tag_map ptm \
                         JOIN tags t ON t.id = ptm.tag_id \
                         WHERE ptm.post_id = p.id AND t.name = ",
                    )
                    .push_bind(name)
                    .push(")");
            }

            builder.push(" ORDER BY p.published_at DESC ");
            builder.push(" LIMIT ").push_bind(size);
            builder.push(" OFFSET ").push_bind(offset);

            let query = builder.build_query_as::<PostSummary>();
            let result = query.fetch_all(self.db()).await?;
            Ok(result)
        }
    }

    /// Case-insensitive substring search over title and short description,
    /// newest first, with the overall hit count.
    fn search(
        &self,
        query: &str,
        page: i32,
        size: i32,
    ) -> impl Future<Output = Result<SearchPage, sqlx::Error>> {
        async move {
            let pattern = format!("%{}%", escape_like(query.trim()));
            let offset = (page.max(1) - 1) * size;

            let total: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*)
                FROM posts p
                WHERE p.status = 'published'
                AND p.published_at IS NOT NULL
                AND (p.title ILIKE $1 OR p.short_description ILIKE $1)
                "#,
            )
            .bind(&pattern)
            .fetch_one(self.db())
            .await?;

            let sql = format!(
                "{SUMMARY_SELECT} \
                 WHERE p.status = 'published' AND p.published_at IS NOT NULL \
                 AND (p.title ILIKE $1 OR p.short_description ILIKE $1) \
                 ORDER BY p.published_at DESC LIMIT $2 OFFSET $3"
            );
            let posts = sqlx::query_as::<_, PostSummary>(&sql)
                .bind(&pattern)
                .bind(size)
                .bind(offset)
                .fetch_all(self.db())
                .await?;

            Ok(SearchPage { total, posts })
        }
    }

    /// Published posts with their SEO fields for the sitemap, newest first.
    fn sitemap_posts(
        &self,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<SitemapPost>, sqlx::Error>> {
        async move {
            sqlx::query_as::<_, SitemapPost>(
                r#"
                SELECT p.slug, p.title, p.seo_title, p.seo_keywords,
                       p.featured_image, p.language, p.published_at, p.updated_at,
                       COALESCE((SELECT array_agg(c.name ORDER BY c.name)
                                 FROM post_category_map pcm
                                 JOIN categories c ON c.id = pcm.category_id
                                 WHERE pcm.post_id = p.id), ARRAY[]::text[]) AS categories,
                       COALESCE((SELECT array_agg(e.name ORDER BY e.name)
                                 FROM post_exam_map pem
                                 JOIN examinations e ON e.id = pem.exam_id
                                 WHERE pem.post_id = p.id), ARRAY[]::text[]) AS exams
                FROM posts p
                WHERE p.status = 'published'
                AND p.published_at IS NOT NULL
                ORDER BY p.published_at DESC
                LIMIT $1
                "#,
            )
            .bind(limit)
            .fetch_all(self.db())
            .await
        }
    }

    /// All categories, for the taxonomy listing and sitemap.
    fn categories(&self) -> impl Future<Output = Result<Vec<TaxonomyInfo>, sqlx::Error>> + '_ {
        async move {
            sqlx::query_as::<_, TaxonomyInfo>(
                "SELECT slug, name FROM categories ORDER BY name",
            )
            .fetch_all(self.db())
            .await
        }
    }

    /// All examinations, for the taxonomy listing and sitemap.
    fn examinations(&self) -> impl Future<Output = Result<Vec<TaxonomyInfo>, sqlx::Error>> + '_ {
        async move {
            sqlx::query_as::<_, TaxonomyInfo>(
                "SELECT slug, name FROM examinations ORDER BY name",
            )
            .fetch_all(self.db())
            .await
        }
    }

    /// Distinct tag names carried by at least one published post.
    fn tags(&self) -> impl Future<Output = Result<Vec<String>, sqlx::Error>> + '_ {
        async move {
            sqlx::query_scalar(
                r#"
                SELECT DISTINCT t.name
                FROM tags t
                JOIN post_tag_map ptm ON ptm.tag_id = t.id
                JOIN posts p ON p.id = ptm.post_id
                WHERE p.status = 'published'
                ORDER BY t.name
                "#,
            )
            .fetch_all(self.db())
            .await
        }
    }
}

impl PostQuery for DbPool {
    fn db(&self) -> &DbPool {
        self
    }
}

/// Escape `ILIKE` metacharacters in user-supplied search text.
fn escape_like(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
        assert_eq!(escape_like(r"back\slash"), r"back\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
