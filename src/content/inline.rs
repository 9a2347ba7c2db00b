/// Text that may carry `[label](url)` inline links.
///
/// Link-free text stays borrowed as-is; nothing is allocated for the common
/// case of a plain string.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineText<'a> {
    Plain(&'a str),
    Rich(Vec<InlineSegment<'a>>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InlineSegment<'a> {
    Text(&'a str),
    Link {
        label: &'a str,
        url: &'a str,
        external: bool,
    },
}

/// Scan `text` for markdown-style links.
///
/// A link is `[label](url)` with a non-empty label (no `]`) and a non-empty URL
/// terminated by the first `)`. Segments interleave in source order and empty
/// text segments are never produced. A URL counts as external when it starts
/// with `http`.
pub fn parse_inline_links(text: &str) -> InlineText<'_> {
    if !text.contains('[') || !text.contains("](") {
        return InlineText::Plain(text);
    }

    let mut segments = Vec::new();
    let mut plain_start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'[' {
            if let Some((label, url, end)) = match_link(text, i) {
                if i > plain_start {
                    segments.push(InlineSegment::Text(&text[plain_start..i]));
                }
                segments.push(InlineSegment::Link {
                    label,
                    url,
                    external: url.starts_with("http"),
                });
                plain_start = end;
                i = end;
                continue;
            }
        }
        i += 1;
    }

    if segments.is_empty() {
        return InlineText::Plain(text);
    }
    if plain_start < text.len() {
        segments.push(InlineSegment::Text(&text[plain_start..]));
    }
    InlineText::Rich(segments)
}

/// Try to read a full link starting at the `[` at byte offset `open`.
/// Returns the label, the URL and the offset one past the closing `)`.
fn match_link(text: &str, open: usize) -> Option<(&str, &str, usize)> {
    let rest = &text[open + 1..];
    let label_end = rest.find(']')?;
    let label = &rest[..label_end];
    if label.is_empty() {
        return None;
    }

    let after = &rest[label_end + 1..];
    if !after.starts_with('(') {
        return None;
    }
    let url_end = after[1..].find(')')?;
    let url = &after[1..1 + url_end];
    if url.is_empty() {
        return None;
    }

    // open + '[' + label + ']' + '(' + url + ')'
    Some((label, url, open + 1 + label_end + 1 + 1 + url_end + 1))
}
