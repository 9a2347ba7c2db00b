use serde::Deserialize;
use serde_json::Value;

/// One unit of a structured article body.
///
/// Stored per post as a JSONB array; dispatch is on the `type` tag. The list is
/// flat: no variant carries child blocks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    BulletList {
        items: Vec<String>,
    },
    Table {
        #[serde(default)]
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    PdfLink {
        title: String,
        url: String,
        #[serde(default)]
        size: Option<String>,
    },
    InternalLink {
        title: String,
        url: String,
        #[serde(default)]
        description: Option<String>,
    },
    Text {
        text: String,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        italic: bool,
        #[serde(default)]
        highlight: bool,
    },
    Faq {
        question: String,
        answer: String,
    },
}

/// A block the parser could not turn into a [`ContentBlock`].
///
/// Carries the array index and the `type` tag so the caller can log it instead
/// of dropping it silently.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedBlock {
    pub index: usize,
    pub block_type: String,
}

/// Result of decoding a JSONB content column.
#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub blocks: Vec<ContentBlock>,
    pub skipped: Vec<SkippedBlock>,
}

/// Decode a content document from its stored JSON form.
///
/// Elements with an unrecognized or malformed `type` land in
/// [`ParsedDocument::skipped`]; anything that is not an array decodes to an
/// empty document.
pub fn parse_blocks(value: &Value) -> ParsedDocument {
    let Some(items) = value.as_array() else {
        return ParsedDocument::default();
    };

    let mut doc = ParsedDocument::default();
    for (index, item) in items.iter().enumerate() {
        match ContentBlock::deserialize(item) {
            Ok(block) => doc.blocks.push(block),
            Err(_) => {
                let block_type = item
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("<untagged>")
                    .to_string();
                doc.skipped.push(SkippedBlock { index, block_type });
            }
        }
    }
    doc
}
