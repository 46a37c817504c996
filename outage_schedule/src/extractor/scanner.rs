use multipeek::{multipeek, MultiPeek};
use std::str::Chars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    OpenTag(String),
    CloseTag(String),
    SelfClosingTag(String),
    Text(String),
    LineBreak,
}

pub struct Scanner<'a> {
    source: MultiPeek<Chars<'a>>,
    current_lexeme: String,
}

fn is_nextline(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

fn is_tag_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':')
}

fn is_text(c: char) -> bool {
    !matches!(c, '<' | '&') && !is_nextline(c)
}

fn entity_to_char(entity: &str) -> Option<char> {
    match entity {
        "nbsp" => Some(' '),
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        numeric => {
            let code = numeric.strip_prefix('#')?;
            let code = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

impl<'a> Scanner<'a> {
    pub fn new(markup: &'a str) -> Self {
        Self {
            source: multipeek(markup.chars()),
            current_lexeme: Default::default(),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let next = self.source.next();
        if let Some(c) = next {
            self.current_lexeme.push(c);
        }
        next
    }

    fn peek_check(&mut self, check: &dyn Fn(char) -> bool) -> bool {
        match self.source.peek() {
            Some(&c) => check(c),
            None => false,
        }
    }

    fn advance_while(&mut self, condition: &dyn Fn(char) -> bool) {
        while self.peek_check(condition) {
            self.advance();
        }
    }

    fn advance_but_discard(&mut self, condition: &dyn Fn(char) -> bool) {
        while self.peek_check(condition) {
            self.source.next();
        }
    }

    fn take_lexeme(&mut self) -> String {
        std::mem::take(&mut self.current_lexeme)
    }

    /// Looks ahead for the `>` closing a tag that started at the current `<`.
    fn tag_is_closed(&mut self) -> bool {
        let mut offset = 0;
        loop {
            match self.source.peek_nth(offset) {
                Some('>') => return true,
                Some('<') | None => return false,
                Some(_) => offset += 1,
            }
        }
    }

    fn skip_until_tag_end(&mut self) {
        self.advance_but_discard(&|c| c != '>');
        self.source.next();
    }

    fn skip_comment(&mut self) {
        let mut dashes = 0;
        while let Some(c) = self.source.next() {
            match c {
                '-' => dashes += 1,
                '>' if dashes >= 2 => return,
                _ => dashes = 0,
            }
        }
    }

    fn tag(&mut self) -> Option<Token> {
        if !self.tag_is_closed() {
            self.current_lexeme.push('<');
            return self.text();
        }

        match self.source.peek() {
            Some('!') => {
                let is_comment = self.source.peek_nth(1) == Some(&'-')
                    && self.source.peek_nth(2) == Some(&'-');
                if is_comment {
                    self.skip_comment();
                } else {
                    self.skip_until_tag_end();
                }
                return None;
            }
            Some('/') => {
                self.source.next();
                self.advance_while(&is_tag_name_char);
                let name = self.take_lexeme().to_ascii_lowercase();
                self.skip_until_tag_end();
                return Some(Token::CloseTag(name));
            }
            _ => {}
        }

        self.advance_while(&is_tag_name_char);
        let name = self.take_lexeme().to_ascii_lowercase();
        let mut self_closing = false;
        while let Some(c) = self.source.next() {
            match c {
                '>' => break,
                '/' => self_closing = true,
                '"' | '\'' => {
                    self.advance_but_discard(&|next| next != c);
                    self.source.next();
                }
                _ => self_closing = false,
            }
        }

        if name.is_empty() {
            return None;
        }
        if self_closing {
            Some(Token::SelfClosingTag(name))
        } else {
            Some(Token::OpenTag(name))
        }
    }

    fn entity(&mut self) {
        let mut offset = 0;
        let mut name = String::new();
        loop {
            match self.source.peek_nth(offset) {
                Some(';') => break,
                Some(&c) if c.is_ascii_alphanumeric() || c == '#' => {
                    name.push(c);
                    offset += 1;
                }
                _ => {
                    self.current_lexeme.push('&');
                    return;
                }
            }
        }

        match entity_to_char(&name) {
            Some(c) => {
                self.current_lexeme.push(c);
                for _ in 0..=offset {
                    self.source.next();
                }
            }
            None => self.current_lexeme.push('&'),
        }
    }

    fn text(&mut self) -> Option<Token> {
        loop {
            self.advance_while(&is_text);
            if self.source.peek() == Some(&'&') {
                self.source.next();
                self.entity();
            } else {
                break;
            }
        }
        Some(Token::Text(self.take_lexeme()))
    }

    fn scan_token(&mut self) -> Option<Token> {
        let c = self.source.peek().copied()?;
        match c {
            '<' => {
                self.source.next();
                self.tag()
            }
            c if is_nextline(c) => {
                self.advance_but_discard(&is_nextline);
                Some(Token::LineBreak)
            }
            _ => self.text(),
        }
    }

    pub fn scan(mut self) -> Vec<Token> {
        let mut tokens = vec![];
        while self.source.peek().is_some() {
            if let Some(token) = self.scan_token() {
                tokens.push(token);
            }
        }
        tokens
    }
}
