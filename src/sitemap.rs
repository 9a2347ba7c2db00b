use std::fmt::Write;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::{site::SiteConfig, storage::SitemapPost};

const URLSET_OPEN: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8"?>"#,
    "\n",
    r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" "#,
    r#"xmlns:news="http://www.google.com/schemas/sitemap-news/0.9" "#,
    r#"xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">"#,
    "\n\n",
);

/// Category names that mark time-critical content.
const HIGH_VALUE_CATEGORIES: &[&str] = &[
    "syllabus",
    "exam pattern",
    "notification",
    "admit card",
    "result",
    "answer key",
];

/// Exam names with outsized search volume.
const HIGH_VALUE_EXAMS: &[&str] = &[
    "ssc", "upsc", "bank", "jee", "neet", "gate", "cat", "railway",
];

const MAX_NEWS_KEYWORDS: usize = 25;

/// Everything `encodeURIComponent` leaves alone.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the post sitemap with news and image extensions.
///
/// Zero posts still produce a well-formed empty `urlset`.
pub fn generate_post_sitemap(
    site: &SiteConfig,
    now: DateTime<Utc>,
    posts: &[SitemapPost],
) -> String {
    let mut xml = String::from(URLSET_OPEN);

    for post in posts {
        let loc = format!(
            "{}/posts/{}",
            site.base_url,
            utf8_percent_encode(&post.slug, COMPONENT)
        );
        let last_updated = post.updated_at.unwrap_or(post.published_at);
        let lastmod = last_updated.to_rfc3339_opts(SecondsFormat::Millis, true);
        let pub_date = post.published_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let news_title = post
            .seo_title
            .as_deref()
            .unwrap_or(&post.title)
            .trim()
            .to_string();

        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(&loc));
        let _ = writeln!(xml, "    <lastmod>{lastmod}</lastmod>");
        let _ = writeln!(
            xml,
            "    <changefreq>{}</changefreq>",
            change_frequency(now, last_updated)
        );
        let _ = writeln!(xml, "    <priority>{:.1}</priority>", priority(now, post));

        if !news_title.is_empty() {
            let language = if post.language.as_deref() == Some("hi") {
                "hi"
            } else {
                "en"
            };
            xml.push_str("    <news:news>\n");
            xml.push_str("      <news:publication>\n");
            let _ = writeln!(
                xml,
                "        <news:name>{}</news:name>",
                escape_xml(&site.publication)
            );
            let _ = writeln!(xml, "        <news:language>{language}</news:language>");
            xml.push_str("      </news:publication>\n");
            let _ = writeln!(
                xml,
                "      <news:publication_date>{pub_date}</news:publication_date>"
            );
            let _ = writeln!(
                xml,
                "      <news:title>{}</news:title>",
                escape_xml(&news_title)
            );
            let keywords = news_keywords(post.seo_keywords.as_deref().unwrap_or_default());
            if !keywords.is_empty() {
                let _ = writeln!(
                    xml,
                    "      <news:keywords>{}</news:keywords>",
                    escape_xml(&keywords.join(", "))
                );
            }
            xml.push_str("    </news:news>\n");
        }

        if let Some(image_url) = post.featured_image.as_deref().and_then(resolve_image_url) {
            let image_title = if news_title.is_empty() {
                format!("{} Exam Guide", site.publication)
            } else {
                news_title.clone()
            };
            xml.push_str("    <image:image>\n");
            let _ = writeln!(
                xml,
                "      <image:loc>{}</image:loc>",
                escape_xml(&image_url)
            );
            let _ = writeln!(
                xml,
                "      <image:caption>{}</image:caption>",
                escape_xml(&image_title)
            );
            let _ = writeln!(
                xml,
                "      <image:title>{}</image:title>",
                escape_xml(&image_title)
            );
            xml.push_str("    </image:image>\n");
        }

        xml.push_str("  </url>\n\n");
    }

    xml.push_str("</urlset>");
    xml
}

/// Build a plain sitemap of taxonomy pages (one `<loc>` per slug).
pub fn generate_taxonomy_sitemap(
    base_url: &str,
    prefix: &str,
    slugs: &[String],
    changefreq: &str,
    priority: &str,
    today: NaiveDate,
) -> String {
    let mut xml = String::from(concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        "\n",
        r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
        "\n",
    ));

    for slug in slugs.iter().filter(|s| !s.is_empty()) {
        xml.push_str("  <url>\n");
        let _ = writeln!(
            xml,
            "    <loc>{}/{}/{}</loc>",
            base_url,
            prefix,
            escape_xml(slug)
        );
        let _ = writeln!(xml, "    <lastmod>{}</lastmod>", today.format("%Y-%m-%d"));
        let _ = writeln!(xml, "    <changefreq>{changefreq}</changefreq>");
        let _ = writeln!(xml, "    <priority>{priority}</priority>");
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>");
    xml
}

/// Age-based step function on days since the last update.
fn change_frequency(now: DateTime<Utc>, last_updated: DateTime<Utc>) -> &'static str {
    let days = (now - last_updated).num_days();
    if days < 7 {
        "daily"
    } else if days < 30 {
        "weekly"
    } else if days < 90 {
        "monthly"
    } else {
        "yearly"
    }
}

/// Crawl priority in [0.6, 1.0]: recency plus category/exam keyword boosts.
fn priority(now: DateTime<Utc>, post: &SitemapPost) -> f64 {
    let mut priority: f64 = 0.6;

    let days = (now - post.published_at).num_days();
    if days < 30 {
        priority += 0.1;
    }
    if days < 7 {
        priority += 0.1;
    }

    if contains_keyword(&post.categories, HIGH_VALUE_CATEGORIES) {
        priority += 0.1;
    }
    if contains_keyword(&post.exams, HIGH_VALUE_EXAMS) {
        priority += 0.1;
    }

    priority.min(1.0)
}

fn contains_keyword(names: &[String], keywords: &[&str]) -> bool {
    names.iter().any(|name| {
        let name = name.to_lowercase();
        keywords.iter().any(|kw| name.contains(kw))
    })
}

/// Dedup, trim and cap the keyword list in source order.
fn news_keywords(raw: &[String]) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for keyword in raw {
        let keyword = keyword.trim();
        if !keyword.is_empty() && !keywords.iter().any(|k| k == keyword) {
            keywords.push(keyword.to_string());
        }
        if keywords.len() == MAX_NEWS_KEYWORDS {
            break;
        }
    }
    keywords
}

/// Resolve a stored featured-image reference to the original image URL.
///
/// Direct image URLs pass through; image-proxy URLs carrying a `url=` query
/// parameter are unwrapped and percent-decoded; anything else is used verbatim
/// after trimming.
fn resolve_image_url(raw: &str) -> Option<String> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }

    if has_image_extension(cleaned) {
        return Some(cleaned.to_string());
    }

    if let Some(pos) = cleaned.find("url=") {
        let inner = cleaned[pos + 4..].split('&').next().unwrap_or_default();
        if !inner.is_empty() {
            return Some(percent_decode_str(inner).decode_utf8_lossy().into_owned());
        }
    }

    Some(cleaned.to_string())
}

fn has_image_extension(url: &str) -> bool {
    let lower = url.to_lowercase();
    ["jpg", "jpeg", "png", "webp", "gif"]
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}

/// Entity-escape free text for XML (`&` first).
fn escape_xml(unsafe_text: &str) -> String {
    unsafe_text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
