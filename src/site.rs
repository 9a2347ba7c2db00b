use std::env;

/// Site-wide facts used for canonical URLs and sitemap metadata.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Canonical origin, no trailing slash.
    pub base_url: String,
    /// Publication name emitted in the news sitemap extension.
    pub publication: String,
    /// Language assumed when a post carries none.
    pub default_language: String,
}

impl SiteConfig {
    /// Read the config from `SITE_BASE_URL`, `SITE_PUBLICATION` and
    /// `SITE_DEFAULT_LANGUAGE`, with working defaults for each.
    pub fn from_env() -> Self {
        let base_url = env::var("SITE_BASE_URL")
            .unwrap_or_else(|_| "https://www.prepfeed.in".to_string());

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            publication: env::var("SITE_PUBLICATION").unwrap_or_else(|_| "PrepFeed".to_string()),
            default_language: env::var("SITE_DEFAULT_LANGUAGE")
                .unwrap_or_else(|_| "en".to_string()),
        }
    }
}
