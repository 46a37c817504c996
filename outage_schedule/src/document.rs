use crate::extractor::blocks::{into_blocks, TextBlock};
use crate::extractor::scanner::Scanner;

/// Escape sequences the provider uses to embed markup inside a JSON string field.
const ESCAPES: [(&str, &str); 8] = [
    (r"\u003C", "<"),
    (r"\u003c", "<"),
    (r"\u003E", ">"),
    (r"\u003e", ">"),
    (r"\/", "/"),
    (r#"\""#, "\""),
    (r"\r\n", "\n"),
    (r"\n", "\n"),
];

/// Un-escapes a transport-encoded markup blob. Total: unknown or malformed
/// sequences are left as they are.
pub fn decode(raw: &str) -> String {
    ESCAPES
        .iter()
        .fold(raw.to_owned(), |text, (escaped, literal)| {
            text.replace(escaped, literal)
        })
}

/// A decoded document split into paragraph-like text blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    markup: String,
    blocks: Vec<TextBlock>,
}

impl DecodedDocument {
    pub fn decode(raw: &str) -> Self {
        let markup = decode(raw);
        let blocks = into_blocks(Scanner::new(&markup).scan());
        DecodedDocument { markup, blocks }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn blocks(&self) -> &[TextBlock] {
        &self.blocks
    }

    pub fn plain_text(&self) -> String {
        self.blocks.iter().map(|block| block.text.as_str()).collect::<Vec<_>>().join("\n")
    }
}

/// One candidate schedule document from the provider feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDocument {
    pub ordinal: Option<i64>,
    pub name: String,
    pub image_path: Option<String>,
    pub decoded: DecodedDocument,
}

impl ScheduleDocument {
    /// The provider flags its "current" entry with ordinal zero or the name `Today`.
    pub fn is_current(&self) -> bool {
        self.ordinal == Some(0) || self.name == "Today"
    }
}
