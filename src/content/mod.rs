mod blocks;
mod html;
mod inline;
mod render;

pub use self::{
    blocks::{ContentBlock, ParsedDocument, SkippedBlock, parse_blocks},
    html::document_to_html,
    inline::{InlineSegment, InlineText, parse_inline_links},
    render::{FaqAccordion, RenderedNode, render_document},
};
