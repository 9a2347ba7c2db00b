use super::{ContentBlock, InlineText, parse_inline_links};

/// A content block after dispatch: inline links parsed, heading levels bounded,
/// table rows squared up against the header row.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedNode<'a> {
    Heading {
        level: u8,
        content: InlineText<'a>,
    },
    Paragraph(InlineText<'a>),
    BulletList(Vec<InlineText<'a>>),
    Table {
        headers: Vec<InlineText<'a>>,
        rows: Vec<Vec<InlineText<'a>>>,
    },
    PdfLink {
        title: &'a str,
        url: &'a str,
        size: Option<&'a str>,
    },
    InternalLink {
        title: &'a str,
        url: &'a str,
        description: Option<&'a str>,
    },
    TextRun {
        content: InlineText<'a>,
        bold: bool,
        italic: bool,
        highlight: bool,
    },
    Faq {
        question: InlineText<'a>,
        answer: InlineText<'a>,
    },
}

/// Map a block sequence to rendered nodes, one per block, in array order.
pub fn render_document(blocks: &[ContentBlock]) -> Vec<RenderedNode<'_>> {
    blocks.iter().map(render_block).collect()
}

fn render_block(block: &ContentBlock) -> RenderedNode<'_> {
    match block {
        ContentBlock::Heading { level, text } => RenderedNode::Heading {
            level: (*level).clamp(1, 6),
            content: parse_inline_links(text),
        },
        ContentBlock::Paragraph { text } => RenderedNode::Paragraph(parse_inline_links(text)),
        ContentBlock::BulletList { items } => {
            RenderedNode::BulletList(items.iter().map(|i| parse_inline_links(i)).collect())
        }
        ContentBlock::Table { headers, rows } => RenderedNode::Table {
            headers: headers.iter().map(|h| parse_inline_links(h)).collect(),
            rows: rows.iter().map(|row| render_row(row, headers.len())).collect(),
        },
        ContentBlock::PdfLink { title, url, size } => RenderedNode::PdfLink {
            title,
            url,
            size: size.as_deref(),
        },
        ContentBlock::InternalLink {
            title,
            url,
            description,
        } => RenderedNode::InternalLink {
            title,
            url,
            description: description.as_deref(),
        },
        ContentBlock::Text {
            text,
            bold,
            italic,
            highlight,
        } => RenderedNode::TextRun {
            content: parse_inline_links(text),
            bold: *bold,
            italic: *italic,
            highlight: *highlight,
        },
        ContentBlock::Faq { question, answer } => RenderedNode::Faq {
            question: parse_inline_links(question),
            answer: parse_inline_links(answer),
        },
    }
}

/// Rows shorter than the header row are padded with empty cells; extra cells in
/// longer rows are kept as authored.
fn render_row<'a>(row: &'a [String], width: usize) -> Vec<InlineText<'a>> {
    let mut cells: Vec<_> = row.iter().map(|c| parse_inline_links(c)).collect();
    while cells.len() < width {
        cells.push(InlineText::Plain(""));
    }
    cells
}

/// Single-select accordion state for the FAQ blocks of one rendered document.
///
/// Opening an index closes any other; toggling the open index closes it. State
/// never outlives the document instance it was created for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FaqAccordion {
    open: Option<usize>,
}

impl FaqAccordion {
    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    pub fn toggle(&mut self, index: usize) {
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
    }
}
