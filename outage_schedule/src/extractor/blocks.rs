use itertools::Itertools;

use super::scanner::Token;

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "td", "th",
    "table", "tbody", "thead", "section", "article", "header", "footer", "hr", "main",
    "blockquote",
];

/// Block tags without content; they end a block but never enclose text.
const VOID_BLOCK_TAGS: &[&str] = &["br", "hr"];

const EMPHASIS_TAGS: &[&str] = &["b", "strong"];

/// A paragraph-like run of text together with the runs that were emphasised inside it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextBlock {
    pub text: String,
    pub emphasised: Vec<String>,
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().join(" ")
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<TextBlock>,
    text: String,
    emphasised: Vec<String>,
    emphasis_depth: usize,
    current_emphasis: String,
    open_blocks: usize,
}

impl BlockBuilder {
    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
        if self.emphasis_depth > 0 {
            self.current_emphasis.push_str(text);
        }
    }

    fn end_emphasis(&mut self) {
        let run = collapse_whitespace(&std::mem::take(&mut self.current_emphasis));
        if !run.is_empty() {
            self.emphasised.push(run);
        }
    }

    fn flush(&mut self) {
        if self.emphasis_depth > 0 {
            self.end_emphasis();
        }
        let text = collapse_whitespace(&std::mem::take(&mut self.text));
        let emphasised = std::mem::take(&mut self.emphasised);
        if !text.is_empty() {
            self.blocks.push(TextBlock { text, emphasised });
        }
    }

    fn accept(&mut self, token: Token) {
        match token {
            Token::Text(text) => self.push_text(&text),
            // Inside an element a raw newline is source formatting, not a break.
            Token::LineBreak if self.open_blocks > 0 => self.push_text(" "),
            Token::LineBreak => self.flush(),
            Token::OpenTag(name) if EMPHASIS_TAGS.contains(&name.as_str()) => {
                self.emphasis_depth += 1;
            }
            Token::CloseTag(name) if EMPHASIS_TAGS.contains(&name.as_str()) => {
                if self.emphasis_depth > 0 {
                    self.emphasis_depth -= 1;
                    if self.emphasis_depth == 0 {
                        self.end_emphasis();
                    }
                }
            }
            Token::OpenTag(name) if BLOCK_TAGS.contains(&name.as_str()) => {
                self.flush();
                if !VOID_BLOCK_TAGS.contains(&name.as_str()) {
                    self.open_blocks += 1;
                }
            }
            Token::CloseTag(name) if BLOCK_TAGS.contains(&name.as_str()) => {
                self.flush();
                if !VOID_BLOCK_TAGS.contains(&name.as_str()) {
                    self.open_blocks = self.open_blocks.saturating_sub(1);
                }
            }
            Token::SelfClosingTag(name) if BLOCK_TAGS.contains(&name.as_str()) => self.flush(),
            Token::OpenTag(_) | Token::CloseTag(_) | Token::SelfClosingTag(_) => {}
        }
    }
}

/// Groups scanned tokens into text blocks. Block-level tags end a block, and so do line
/// breaks outside any block element. Whitespace is collapsed and empty blocks are dropped.
pub fn into_blocks(tokens: Vec<Token>) -> Vec<TextBlock> {
    let mut builder = BlockBuilder::default();
    for token in tokens {
        builder.accept(token);
    }
    builder.flush();
    builder.blocks
}
