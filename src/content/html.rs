use std::fmt::Write;

use super::{FaqAccordion, InlineSegment, InlineText, RenderedNode};

/// Write a rendered document as an HTML fragment.
///
/// `faq` decides which FAQ block (by node index) renders expanded; the default
/// state renders every answer collapsed.
pub fn document_to_html(nodes: &[RenderedNode<'_>], faq: &FaqAccordion) -> String {
    let mut out = String::new();
    for (index, node) in nodes.iter().enumerate() {
        write_node(&mut out, index, node, faq);
    }
    out
}

fn write_node(out: &mut String, index: usize, node: &RenderedNode<'_>, faq: &FaqAccordion) {
    match node {
        RenderedNode::Heading { level, content } => {
            let _ = write!(out, r#"<h{level} id="content-heading-{index}">"#);
            write_inline(out, content);
            let _ = writeln!(out, "</h{level}>");
        }
        RenderedNode::Paragraph(content) => {
            out.push_str("<p>");
            write_inline(out, content);
            out.push_str("</p>\n");
        }
        RenderedNode::BulletList(items) => {
            out.push_str("<ul>\n");
            for item in items {
                out.push_str("<li>");
                write_inline(out, item);
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n");
        }
        RenderedNode::Table { headers, rows } => {
            out.push_str("<table>\n<thead>\n<tr>");
            for header in headers {
                out.push_str("<th>");
                write_inline(out, header);
                out.push_str("</th>");
            }
            out.push_str("</tr>\n</thead>\n<tbody>\n");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    out.push_str("<td>");
                    write_inline(out, cell);
                    out.push_str("</td>");
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</tbody>\n</table>\n");
        }
        RenderedNode::PdfLink { title, url, size } => {
            let _ = writeln!(
                out,
                concat!(
                    r#"<div class="pdf-link"><h4>{title}</h4>"#,
                    r#"<p>PDF Document &middot; {size}</p>"#,
                    r#"<a href="{url}" target="_blank" rel="noopener noreferrer">Download PDF</a></div>"#,
                ),
                title = escape_html(title),
                size = escape_html(size.unwrap_or("File size not specified")),
                url = escape_html(url),
            );
        }
        RenderedNode::InternalLink {
            title,
            url,
            description,
        } => {
            let _ = writeln!(
                out,
                concat!(
                    r#"<a class="internal-link" href="{url}"><h4>{title}</h4>"#,
                    r#"<p>{description}</p></a>"#,
                ),
                url = escape_html(url),
                title = escape_html(title),
                description = escape_html(description.unwrap_or("Read more about this topic")),
            );
        }
        RenderedNode::TextRun {
            content,
            bold,
            italic,
            highlight,
        } => {
            let mut classes = Vec::new();
            if *bold {
                classes.push("bold");
            }
            if *italic {
                classes.push("italic");
            }
            if *highlight {
                classes.push("highlight");
            }
            if classes.is_empty() {
                out.push_str("<span>");
            } else {
                let _ = write!(out, r#"<span class="{}">"#, classes.join(" "));
            }
            write_inline(out, content);
            out.push_str("</span>\n");
        }
        RenderedNode::Faq { question, answer } => {
            let expanded = faq.is_open(index);
            let _ = write!(
                out,
                concat!(
                    r#"<section class="faq" id="faq-{index}">"#,
                    r#"<button aria-expanded="{expanded}" aria-controls="faq-{index}-answer">"#,
                ),
                index = index,
                expanded = expanded,
            );
            write_inline(out, question);
            let _ = write!(
                out,
                r#"</button><div id="faq-{index}-answer"{hidden}>"#,
                index = index,
                hidden = if expanded { "" } else { " hidden" },
            );
            write_inline(out, answer);
            out.push_str("</div></section>\n");
        }
    }
}

fn write_inline(out: &mut String, text: &InlineText<'_>) {
    match text {
        InlineText::Plain(s) => out.push_str(&escape_html(s)),
        InlineText::Rich(segments) => {
            for segment in segments {
                match segment {
                    InlineSegment::Text(s) => out.push_str(&escape_html(s)),
                    InlineSegment::Link {
                        label,
                        url,
                        external,
                    } => {
                        if *external {
                            let _ = write!(
                                out,
                                concat!(
                                    r#"<a href="{url}" target="_blank" rel="noopener noreferrer">{label}"#,
                                    r#"<span class="external-indicator" aria-hidden="true">&#8599;</span></a>"#,
                                ),
                                url = escape_html(url),
                                label = escape_html(label),
                            );
                        } else {
                            let _ = write!(
                                out,
                                r#"<a href="{url}">{label}</a>"#,
                                url = escape_html(url),
                                label = escape_html(label),
                            );
                        }
                    }
                }
            }
        }
    }
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentBlock, render_document};

    fn html_for(blocks: &[ContentBlock]) -> String {
        document_to_html(&render_document(blocks), &FaqAccordion::default())
    }

    #[test]
    fn paragraph_text_is_escaped() {
        let html = html_for(&[ContentBlock::Paragraph {
            text: "cutoff <50% & \"general\"".into(),
        }]);
        assert_eq!(html, "<p>cutoff &lt;50% &amp; &quot;general&quot;</p>\n");
    }

    #[test]
    fn external_links_open_in_new_context_with_indicator() {
        let html = html_for(&[ContentBlock::Paragraph {
            text: "apply at [ssc.gov](https://ssc.gov.in)".into(),
        }]);
        assert!(html.contains(r#"<a href="https://ssc.gov.in" target="_blank" rel="noopener noreferrer">ssc.gov"#));
        assert!(html.contains("external-indicator"));
    }

    #[test]
    fn internal_links_have_no_indicator() {
        let html = html_for(&[ContentBlock::Paragraph {
            text: "see the [syllabus](/posts/syllabus)".into(),
        }]);
        assert!(html.contains(r#"<a href="/posts/syllabus">syllabus</a>"#));
        assert!(!html.contains("external-indicator"));
        assert!(!html.contains("target="));
    }

    #[test]
    fn faq_renders_collapsed_by_default_and_expanded_when_open() {
        let blocks = [ContentBlock::Faq {
            question: "When is the exam?".into(),
            answer: "In June.".into(),
        }];
        let nodes = render_document(&blocks);

        let closed = document_to_html(&nodes, &FaqAccordion::default());
        assert!(closed.contains(r#"aria-expanded="false""#));
        assert!(closed.contains(" hidden"));

        let mut faq = FaqAccordion::default();
        faq.toggle(0);
        let open = document_to_html(&nodes, &faq);
        assert!(open.contains(r#"aria-expanded="true""#));
        assert!(!open.contains(" hidden"));
    }

    #[test]
    fn table_renders_header_and_padded_cells() {
        let html = html_for(&[ContentBlock::Table {
            headers: vec!["Post".into(), "Vacancies".into()],
            rows: vec![vec!["Clerk".into()]],
        }]);
        assert!(html.contains("<th>Post</th><th>Vacancies</th>"));
        assert!(html.contains("<td>Clerk</td><td></td>"));
    }
}
