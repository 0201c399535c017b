// File: src/transformer.rs
//
// Glyph normalization pass.
// Rewrites every keyword, operator, delimiter and boolean leaf of a parse
// tree to its canonical spelling, so `😌😌` becomes `==` and `🚩` becomes
// `if`. Names and literals are never touched.

use crate::ast::Node;
use crate::glyphs;
use crate::lexer::TokenKind;
use tracing::debug;

/// Rewrite glyph leaf tokens in place; returns how many tokens changed
pub fn normalize(tree: &mut Node) -> usize {
    let mut rewritten = 0;
    tree.for_each_token_mut(&mut |token| {
        if !matches!(
            token.kind,
            TokenKind::Keyword | TokenKind::Operator | TokenKind::Delimiter | TokenKind::Boolean
        ) {
            return;
        }
        let canonical = glyphs::canonical(&token.text);
        if canonical != token.text {
            token.text = canonical.to_string();
            rewritten += 1;
        }
    });
    debug!(rewritten, "normalized glyph tokens");
    rewritten
}
