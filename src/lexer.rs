// File: src/lexer.rs
//
// Lexical analyzer (tokenizer) for the Emo language.
// Converts source code text into a flat stream of tokens for parsing.
//
// Supports:
// - Emoji glyphs and their canonical spellings (see glyphs.rs)
// - Identifiers, numbers and double-quoted strings (no escapes)
// - Line comments starting with 💩
//
// The lexer never fails: anything it does not recognize becomes a
// single-character operator token and is left for the parser to reject.

use crate::glyphs::{self, COMMENT, PRESENTATION_SELECTOR};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    String,
    Number,
    Name,
    Boolean,
    Operator,
    Keyword,
    Delimiter,
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Token { kind, text: text.into(), line, column }
    }

    pub fn eof(line: usize, column: usize) -> Self {
        Token::new(TokenKind::Eof, "", line, column)
    }
}

/// Tokens compare by kind and text; positions are informational only
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.text == other.text
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "\"{}\"", self.text),
            TokenKind::Eof => write!(f, "<eof>"),
            _ => write!(f, "{}", self.text),
        }
    }
}

/// Cursor over the source that keeps line/column bookkeeping in one place
struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Scanner { source, pos: 0, line: 1, column: 1 }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    /// Consume `len` bytes (always on a char boundary) and return them
    fn take(&mut self, len: usize) -> &'a str {
        let taken = &self.source[self.pos..self.pos + len];
        for ch in taken.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += len;
        taken
    }

    /// Consume characters while `pred` holds
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let len = self
            .rest()
            .char_indices()
            .find(|&(_, ch)| !pred(ch))
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len());
        self.take(len)
    }
}

/// Whitespace as C's `isspace` sees it: ASCII whitespace plus vertical tab
pub fn is_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0B'
}

/// Tokenizes Emo source code into a vector of tokens.
///
/// At each position the scanner tries, in order: whitespace, a 💩 line
/// comment, a string literal, a number, an identifier, and finally the
/// longest glyph or operator spelling from the glyph table. The result always
/// ends with a single `Eof` token.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut scanner = Scanner::new(source);

    while let Some(c) = scanner.peek() {
        if is_space(c) {
            scanner.take(c.len_utf8());
            continue;
        }

        if scanner.rest().starts_with(COMMENT) {
            scanner.take_while(|ch| ch != '\n');
            continue;
        }

        let (line, column) = (scanner.line, scanner.column);

        if c == '"' {
            scanner.take(1);
            let text = scanner.take_while(|ch| ch != '"');
            if scanner.peek() == Some('"') {
                scanner.take(1);
            }
            tokens.push(Token::new(TokenKind::String, text, line, column));
            continue;
        }

        let negative_number = c == '-' && scanner.peek_second().is_some_and(|d| d.is_ascii_digit());
        if c.is_ascii_digit() || negative_number {
            let sign = if negative_number { scanner.take(1) } else { "" };
            let digits = scanner.take_while(|ch| ch.is_ascii_digit() || ch == '.');
            tokens.push(Token::new(TokenKind::Number, format!("{}{}", sign, digits), line, column));
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let word = scanner.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
            tokens.push(Token::new(glyphs::word_kind(word), word, line, column));
            continue;
        }

        if let Some((spelling, kind)) = glyphs::longest_match(scanner.rest()) {
            scanner.take(spelling.len());
            if scanner.peek() == Some(PRESENTATION_SELECTOR) {
                scanner.take(PRESENTATION_SELECTOR.len_utf8());
            }
            tokens.push(Token::new(kind, spelling, line, column));
            continue;
        }

        let single = scanner.take(c.len_utf8());
        tokens.push(Token::new(TokenKind::Operator, single, line, column));
    }

    tokens.push(Token::eof(scanner.line, scanner.column));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_and_texts(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source).into_iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn empty_source_is_just_eof() {
        assert_eq!(kinds_and_texts(""), vec![(TokenKind::Eof, String::new())]);
        assert_eq!(kinds_and_texts("   \n\t "), vec![(TokenKind::Eof, String::new())]);
    }

    #[test]
    fn vertical_tab_and_form_feed_are_whitespace() {
        let tokens = kinds_and_texts("decl\x0Bx\x0C=\x0B1");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Keyword, "decl".to_string()),
                (TokenKind::Name, "x".to_string()),
                (TokenKind::Operator, "=".to_string()),
                (TokenKind::Number, "1".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn declaration_in_glyphs() {
        let tokens = kinds_and_texts("📢 x 😌 42");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Keyword, "📢".to_string()),
                (TokenKind::Name, "x".to_string()),
                (TokenKind::Operator, "😌".to_string()),
                (TokenKind::Number, "42".to_string()),
                (TokenKind::Eof, String::new()),
            ]
        );
    }

    #[test]
    fn two_glyph_operator_is_not_split() {
        let tokens = tokenize("a 😁😌 b 😌😌 c");
        assert_eq!(tokens[1].text, "😁😌");
        assert_eq!(tokens[3].text, "😌😌");
        assert_eq!(tokens.len(), 6);
    }

    #[test]
    fn canonical_symbols_are_matched_longest_first() {
        let texts: Vec<String> = tokenize("a<=b==c=d").into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["a", "<=", "b", "==", "c", "=", "d", ""]);
    }

    #[test]
    fn comments_run_to_end_of_line() {
        let tokens = kinds_and_texts("💩 ignored 😌 stuff\nx");
        assert_eq!(tokens[0], (TokenKind::Name, "x".to_string()));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn strings_have_no_escapes_and_may_be_unterminated() {
        let tokens = kinds_and_texts(r#""a\n" "open"#);
        assert_eq!(tokens[0], (TokenKind::String, "a\\n".to_string()));
        assert_eq!(tokens[1], (TokenKind::String, "open".to_string()));
    }

    #[test]
    fn minus_binds_to_a_following_digit_only() {
        let tokens = kinds_and_texts("-5 - 3 -x");
        assert_eq!(tokens[0], (TokenKind::Number, "-5".to_string()));
        assert_eq!(tokens[1], (TokenKind::Operator, "-".to_string()));
        assert_eq!(tokens[2], (TokenKind::Number, "3".to_string()));
        assert_eq!(tokens[3], (TokenKind::Operator, "-".to_string()));
        assert_eq!(tokens[4], (TokenKind::Name, "x".to_string()));
    }

    #[test]
    fn malformed_numbers_are_accepted_lexically() {
        let tokens = kinds_and_texts("1.2.3");
        assert_eq!(tokens[0], (TokenKind::Number, "1.2.3".to_string()));
    }

    #[test]
    fn canonical_words_are_classified() {
        let tokens = kinds_and_texts("if true and counter");
        assert_eq!(tokens[0].0, TokenKind::Keyword);
        assert_eq!(tokens[1].0, TokenKind::Boolean);
        assert_eq!(tokens[2].0, TokenKind::Operator);
        assert_eq!(tokens[3].0, TokenKind::Name);
    }

    #[test]
    fn presentation_selector_is_absorbed() {
        let tokens = kinds_and_texts("🖨\u{FE0F}👉1👈");
        assert_eq!(tokens[0], (TokenKind::Keyword, "🖨".to_string()));
        assert_eq!(tokens[1], (TokenKind::Delimiter, "👉".to_string()));
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn unknown_characters_become_operators() {
        let tokens = kinds_and_texts("@ 🦀");
        assert_eq!(tokens[0], (TokenKind::Operator, "@".to_string()));
        assert_eq!(tokens[1], (TokenKind::Operator, "🦀".to_string()));
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let tokens = tokenize("x\n  📢 y");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 5));
    }

    #[test]
    fn equality_ignores_position() {
        let a = Token::new(TokenKind::Name, "x", 1, 1);
        let b = Token::new(TokenKind::Name, "x", 9, 4);
        let c = Token::new(TokenKind::String, "x", 1, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
