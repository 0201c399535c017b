// File: src/glyphs.rs
//
// The fixed glyph table of the Emo language.
// Every keyword, delimiter and operator has an emoji spelling and a plain
// canonical spelling; the lexer, parser, transformer and interpreter all go
// through this table so both spellings are accepted everywhere.

use crate::lexer::{Token, TokenKind};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Marker that starts a line comment
pub const COMMENT: &str = "💩";

/// Emoji presentation selector that editors like to append to glyphs
pub const PRESENTATION_SELECTOR: char = '\u{FE0F}';

/// (glyph, canonical spelling, token kind)
pub const GLYPHS: &[(&str, &str, TokenKind)] = &[
    ("📢", "decl", TokenKind::Keyword),
    ("😌", "=", TokenKind::Operator),
    ("🗿", ",", TokenKind::Delimiter),
    ("👄", ";", TokenKind::Delimiter),
    ("🖨", "print", TokenKind::Keyword),
    ("👉", "(", TokenKind::Delimiter),
    ("👈", ")", TokenKind::Delimiter),
    ("🍽", "{", TokenKind::Delimiter),
    ("🥂", "}", TokenKind::Delimiter),
    ("💿", "while", TokenKind::Keyword),
    ("📀", "for", TokenKind::Keyword),
    ("🚩", "if", TokenKind::Keyword),
    ("🏳", "elif", TokenKind::Keyword),
    ("🏁", "else", TokenKind::Keyword),
    ("⏸", "break", TokenKind::Keyword),
    ("⏩", "continue", TokenKind::Keyword),
    ("✔", "true", TokenKind::Boolean),
    ("❌", "false", TokenKind::Boolean),
    ("➕", "+", TokenKind::Operator),
    ("➖", "-", TokenKind::Operator),
    ("✖", "*", TokenKind::Operator),
    ("➗", "/", TokenKind::Operator),
    ("📎", "%", TokenKind::Operator),
    ("😭", "<", TokenKind::Operator),
    ("😁", ">", TokenKind::Operator),
    ("😁😌", ">=", TokenKind::Operator),
    ("😭😌", "<=", TokenKind::Operator),
    ("😌😌", "==", TokenKind::Operator),
    ("❗😌", "!=", TokenKind::Operator),
    ("⚛", "&", TokenKind::Operator),
    ("☯", "|", TokenKind::Operator),
    ("⚓", "xor", TokenKind::Operator),
    ("😠", "and", TokenKind::Operator),
    ("😇", "or", TokenKind::Operator),
    ("❗", "!", TokenKind::Operator),
    ("〰", "~", TokenKind::Operator),
];

/// Canonical symbol spellings the lexer matches outside of identifiers
const SYMBOLS: &[(&str, TokenKind)] = &[
    ("==", TokenKind::Operator),
    ("!=", TokenKind::Operator),
    ("<=", TokenKind::Operator),
    (">=", TokenKind::Operator),
    ("&&", TokenKind::Operator),
    ("||", TokenKind::Operator),
    ("(", TokenKind::Delimiter),
    (")", TokenKind::Delimiter),
    ("{", TokenKind::Delimiter),
    ("}", TokenKind::Delimiter),
    (",", TokenKind::Delimiter),
    (";", TokenKind::Delimiter),
];

/// Canonical words that are not plain names
const WORDS: &[(&str, TokenKind)] = &[
    ("decl", TokenKind::Keyword),
    ("print", TokenKind::Keyword),
    ("while", TokenKind::Keyword),
    ("for", TokenKind::Keyword),
    ("if", TokenKind::Keyword),
    ("elif", TokenKind::Keyword),
    ("else", TokenKind::Keyword),
    ("break", TokenKind::Keyword),
    ("continue", TokenKind::Keyword),
    ("true", TokenKind::Boolean),
    ("false", TokenKind::Boolean),
    ("and", TokenKind::Operator),
    ("or", TokenKind::Operator),
    ("xor", TokenKind::Operator),
    ("not", TokenKind::Operator),
    ("mod", TokenKind::Operator),
];

/// Every spelling the lexer may match at a non-identifier position, longest first
static MATCH_ORDER: Lazy<Vec<(&'static str, TokenKind)>> = Lazy::new(|| {
    let mut entries: Vec<(&'static str, TokenKind)> = GLYPHS
        .iter()
        .map(|(glyph, _, kind)| (*glyph, *kind))
        .chain(SYMBOLS.iter().copied())
        .collect();
    entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    entries
});

static TO_CANONICAL: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| GLYPHS.iter().map(|(glyph, canonical, _)| (*glyph, *canonical)).collect());

/// Longest table spelling that `rest` starts with
pub fn longest_match(rest: &str) -> Option<(&'static str, TokenKind)> {
    MATCH_ORDER.iter().find(|(spelling, _)| rest.starts_with(spelling)).copied()
}

/// Classification of an identifier-shaped word
pub fn word_kind(word: &str) -> TokenKind {
    WORDS
        .iter()
        .find(|(spelling, _)| *spelling == word)
        .map(|(_, kind)| *kind)
        .unwrap_or(TokenKind::Name)
}

/// Canonical spelling of a glyph, or the text itself
pub fn canonical(text: &str) -> &str {
    TO_CANONICAL.get(text).copied().unwrap_or(text)
}

/// Glyph spelling of a canonical keyword or operator, if it has one
pub fn glyph_for(canonical_text: &str) -> Option<&'static str> {
    GLYPHS.iter().find(|(_, c, _)| *c == canonical_text).map(|(glyph, _, _)| *glyph)
}

/// True when a non-literal token spells `canonical_text` in either form.
///
/// Literal kinds never match, so the string literal `"if"` is not a keyword.
pub fn is(token: &Token, canonical_text: &str) -> bool {
    match token.kind {
        TokenKind::String | TokenKind::Number | TokenKind::Name | TokenKind::Eof => false,
        _ => canonical(&token.text) == canonical_text,
    }
}

/// True when the token spells any of the given canonical texts
pub fn is_any(token: &Token, canonical_texts: &[&str]) -> bool {
    canonical_texts.iter().any(|c| is(token, c))
}
