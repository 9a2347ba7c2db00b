/// Derive a URL-safe slug from display text.
///
/// Lowercases, drops characters outside `[a-z0-9_ -]`, collapses whitespace to
/// single hyphens and trims leading/trailing hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_hyphen = true; // swallows leading separators
    for c in text.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            slug.push(c);
            last_hyphen = false;
        } else if (c.is_whitespace() || c == '-') && !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}
