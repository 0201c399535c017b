// File: src/parser.rs
//
// Recursive descent parser for the Emo language.
// Transforms a sequence of tokens into a parse tree (see ast.rs).
//
// Expressions use explicit precedence climbing, lowest to highest:
// logical or, logical and, (inclusive or, exclusive or, bitwise and: these
// three levels consume nothing), equality, additive, multiplicative, cast,
// argument. Bitwise operators are accepted at the equality level, so they
// share precedence with the relational operators.
//
// The only hard failure is an argument position holding something that cannot
// start an argument. Missing delimiters and truncated statements are
// tolerated: an expected delimiter is consumed only when it is present.

use crate::ast::{Node, NodeKind};
use crate::errors::EmoError;
use crate::glyphs;
use crate::lexer::{self, Token, TokenKind};
use tracing::{debug, trace};

const LOGICAL_OR_OPS: &[&str] = &["or", "||"];
const LOGICAL_AND_OPS: &[&str] = &["and", "&&"];
const EQUALITY_OPS: &[&str] = &["<", ">", "<=", ">=", "==", "!=", "&", "|", "^", "xor"];
const ADDITIVE_OPS: &[&str] = &["+", "-"];
const MULTIPLICATIVE_OPS: &[&str] = &["*", "/", "%", "mod"];
const UNARY_OPS: &[&str] = &["!", "~", "not"];

type ParseResult = Result<Node, EmoError>;

/// Tokenizes and parses a whole source text
pub fn parse(source: &str) -> ParseResult {
    let tokens = lexer::tokenize(source);
    trace!(count = tokens.len(), "tokenized source");
    Parser::new(tokens).parse()
}

/// Parser maintains position in token stream and provides methods to parse statements and expressions
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Creates a new parser from a vector of tokens
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens.last().map(|t| (t.line, t.column)).unwrap_or((1, 1));
            tokens.push(Token::eof(line, column));
        }
        Parser { tokens, pos: 0 }
    }

    /// Current token; the trailing Eof once the stream is exhausted
    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    /// Consume and return the current token; never moves past Eof
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, canonical: &str) -> bool {
        glyphs::is(self.peek(), canonical)
    }

    fn check_any(&self, canonicals: &[&str]) -> bool {
        glyphs::is_any(self.peek(), canonicals)
    }

    /// Consume the current token if it spells `canonical`
    fn eat(&mut self, canonical: &str) -> bool {
        if self.check(canonical) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// `NAME =` ahead
    fn at_assignment(&self) -> bool {
        self.peek().kind == TokenKind::Name && glyphs::is(self.peek_at(1), "=")
    }

    /// Parse the entire token stream into a `Program` node
    pub fn parse(&mut self) -> ParseResult {
        let mut root = Node::new(NodeKind::Program);
        while !self.is_at_end() {
            root.push(self.parse_statement()?);
        }
        debug!(statements = root.len(), "parsed program");
        Ok(root)
    }

    fn parse_statement(&mut self) -> ParseResult {
        if self.check("decl") {
            return self.parse_declare();
        }
        if self.check("print") {
            return self.parse_print();
        }
        if self.check("if") {
            return self.parse_if();
        }
        if self.check("while") {
            return self.parse_while();
        }
        if self.check("for") {
            return self.parse_for();
        }
        if self.check_any(&["break", "continue"]) {
            let mut stmt = Node::new(NodeKind::FlowStatement);
            stmt.push(self.advance());
            return Ok(stmt);
        }
        if self.at_assignment() {
            return self.parse_assignment();
        }
        self.parse_expression()
    }

    fn parse_assignment(&mut self) -> ParseResult {
        let mut stmt = Node::new(NodeKind::AssignmentStatement);
        stmt.push(Node::leaf(NodeKind::Name, self.advance()));
        self.eat("=");
        stmt.push(self.parse_expression()?);
        Ok(stmt)
    }

    /// `decl NAME (= expr)? (, NAME (= expr)?)*`
    ///
    /// Each entry becomes either a bare `Name` or an `AssignmentStatement`.
    fn parse_declare(&mut self) -> ParseResult {
        let mut stmt = Node::new(NodeKind::DeclareStatement);
        self.advance(); // decl

        while self.peek().kind == TokenKind::Name {
            let name = Node::leaf(NodeKind::Name, self.advance());
            if self.eat("=") {
                let mut init = Node::new(NodeKind::AssignmentStatement);
                init.push(name);
                init.push(self.parse_expression()?);
                stmt.push(init);
            } else {
                stmt.push(name);
            }

            if !self.eat(",") {
                break;
            }
        }

        Ok(stmt)
    }

    fn parse_print(&mut self) -> ParseResult {
        let mut stmt = Node::new(NodeKind::PrintStatement);
        self.advance(); // print
        self.eat("(");
        stmt.push(self.parse_expression()?);
        self.eat(")");
        Ok(stmt)
    }

    /// `( expr ) { suite }` shared by if/elif/while
    fn parse_guarded_block(&mut self, stmt: &mut Node) -> Result<(), EmoError> {
        self.eat("(");
        stmt.push(self.parse_expression()?);
        self.eat(")");
        self.parse_block(stmt)
    }

    fn parse_block(&mut self, stmt: &mut Node) -> Result<(), EmoError> {
        self.eat("{");
        stmt.push(self.parse_suite()?);
        self.eat("}");
        Ok(())
    }

    fn parse_if(&mut self) -> ParseResult {
        let mut stmt = Node::new(NodeKind::IfStatement);

        stmt.push(self.advance()); // if
        self.parse_guarded_block(&mut stmt)?;

        while self.check("elif") {
            stmt.push(self.advance());
            self.parse_guarded_block(&mut stmt)?;
        }

        if self.check("else") {
            stmt.push(self.advance());
            self.parse_block(&mut stmt)?;
        }

        Ok(stmt)
    }

    fn parse_while(&mut self) -> ParseResult {
        let mut stmt = Node::new(NodeKind::WhileStatement);
        self.advance(); // while
        self.parse_guarded_block(&mut stmt)?;
        Ok(stmt)
    }

    fn parse_for(&mut self) -> ParseResult {
        let mut stmt = Node::new(NodeKind::ForStatement);
        self.advance(); // for
        self.eat("(");

        let mut decl = Node::new(NodeKind::ForDecl);
        if self.check("decl") {
            decl.push(self.parse_declare()?);
        } else if self.at_assignment() {
            decl.push(self.parse_assignment()?);
        }
        stmt.push(decl);
        self.eat(";");

        let mut test = Node::new(NodeKind::ForTest);
        if !self.check(";") {
            test.push(self.parse_expression()?);
        }
        stmt.push(test);
        self.eat(";");

        let mut updates = Node::new(NodeKind::ForUpdates);
        while self.at_assignment() {
            updates.push(self.parse_assignment()?);
            if !self.eat(",") {
                break;
            }
        }
        stmt.push(updates);
        self.eat(")");

        self.parse_block(&mut stmt)?;
        Ok(stmt)
    }

    /// Statements up to a closing brace or end of input
    fn parse_suite(&mut self) -> ParseResult {
        let mut suite = Node::new(NodeKind::Suite);
        while !self.check("}") && !self.is_at_end() {
            suite.push(self.parse_statement()?);
        }
        Ok(suite)
    }

    fn parse_expression(&mut self) -> ParseResult {
        self.parse_logical_or()
    }

    /// One precedence level: `operand (op operand)*` as a flat chain.
    /// A level that consumes no operator returns its operand unchanged.
    fn parse_chain(
        &mut self,
        kind: NodeKind,
        ops: &[&str],
        operand: fn(&mut Self) -> ParseResult,
    ) -> ParseResult {
        let first = operand(self)?;
        if !self.check_any(ops) {
            return Ok(first);
        }

        let mut chain = Node::new(kind);
        chain.push(first);
        while self.check_any(ops) {
            chain.push(self.advance());
            chain.push(operand(self)?);
        }
        Ok(chain)
    }

    fn parse_logical_or(&mut self) -> ParseResult {
        self.parse_chain(NodeKind::LogicalOrExpr, LOGICAL_OR_OPS, Self::parse_logical_and)
    }

    fn parse_logical_and(&mut self) -> ParseResult {
        self.parse_chain(NodeKind::LogicalAndExpr, LOGICAL_AND_OPS, Self::parse_inclusive_or)
    }

    fn parse_inclusive_or(&mut self) -> ParseResult {
        self.parse_exclusive_or()
    }

    fn parse_exclusive_or(&mut self) -> ParseResult {
        self.parse_bitwise_and()
    }

    fn parse_bitwise_and(&mut self) -> ParseResult {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> ParseResult {
        self.parse_chain(NodeKind::EqualityExpr, EQUALITY_OPS, Self::parse_additive)
    }

    fn parse_additive(&mut self) -> ParseResult {
        self.parse_chain(NodeKind::AdditiveExpr, ADDITIVE_OPS, Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> ParseResult {
        self.parse_chain(NodeKind::MultiplicativeExpr, MULTIPLICATIVE_OPS, Self::parse_cast)
    }

    fn parse_cast(&mut self) -> ParseResult {
        if self.check_any(UNARY_OPS) {
            let mut cast = Node::new(NodeKind::CastExpr);
            cast.push(self.advance());
            cast.push(self.parse_argument()?);
            return Ok(cast);
        }
        self.parse_argument()
    }

    fn parse_argument(&mut self) -> ParseResult {
        let current = self.peek().kind;
        let kind = match current {
            TokenKind::Boolean => NodeKind::Boolean,
            TokenKind::Number => NodeKind::Number,
            TokenKind::Name => NodeKind::Name,
            TokenKind::String => NodeKind::String,
            _ if self.check("(") => {
                self.advance();
                let expr = self.parse_expression()?;
                self.eat(")");
                return Ok(expr);
            }
            _ => return Err(EmoError::unexpected_token(self.peek())),
        };
        Ok(Node::leaf(kind, self.advance()))
    }
}
