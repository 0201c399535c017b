// File: src/ast.rs
//
// Parse tree definitions for the Emo language.
//
// Every node carries a closed `NodeKind` tag and an ordered list of children,
// each either a nested node or a leaf token. Leaf tokens keep their original
// spelling (glyph or canonical) so operators and keywords can be recognized
// in both forms by the interpreter.

use crate::lexer::Token;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root of a parsed file
    Program,
    Suite,
    DeclareStatement,
    AssignmentStatement,
    PrintStatement,
    IfStatement,
    WhileStatement,
    ForStatement,
    ForDecl,
    ForTest,
    ForUpdates,
    FlowStatement,
    LogicalOrExpr,
    LogicalAndExpr,
    EqualityExpr,
    AdditiveExpr,
    MultiplicativeExpr,
    CastExpr,
    Name,
    Number,
    Boolean,
    String,
}

impl NodeKind {
    /// Tag used by the tree printer
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Program => "stmt",
            NodeKind::Suite => "suite",
            NodeKind::DeclareStatement => "declare_stmt",
            NodeKind::AssignmentStatement => "assignment_stmt",
            NodeKind::PrintStatement => "print_stmt",
            NodeKind::IfStatement => "if_stmt",
            NodeKind::WhileStatement => "while_stmt",
            NodeKind::ForStatement => "for_stmt",
            NodeKind::ForDecl => "for_decl",
            NodeKind::ForTest => "for_test",
            NodeKind::ForUpdates => "for_updates",
            NodeKind::FlowStatement => "flow_stmt",
            NodeKind::LogicalOrExpr => "logicalorexpression",
            NodeKind::LogicalAndExpr => "logicalandexpression",
            NodeKind::EqualityExpr => "equalityexpression",
            NodeKind::AdditiveExpr => "additiveexpression",
            NodeKind::MultiplicativeExpr => "multiplicativeexpression",
            NodeKind::CastExpr => "castexpression",
            NodeKind::Name => "name",
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
            NodeKind::String => "string",
        }
    }

    /// Nodes that evaluate to a value rather than perform an action
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            NodeKind::LogicalOrExpr
                | NodeKind::LogicalAndExpr
                | NodeKind::EqualityExpr
                | NodeKind::AdditiveExpr
                | NodeKind::MultiplicativeExpr
                | NodeKind::CastExpr
                | NodeKind::Name
                | NodeKind::Number
                | NodeKind::Boolean
                | NodeKind::String
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeChild {
    Node(Node),
    Token(Token),
}

impl NodeChild {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            NodeChild::Node(node) => Some(node),
            NodeChild::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            NodeChild::Token(token) => Some(token),
            NodeChild::Node(_) => None,
        }
    }
}

impl From<Node> for NodeChild {
    fn from(node: Node) -> Self {
        NodeChild::Node(node)
    }
}

impl From<Token> for NodeChild {
    fn from(token: Token) -> Self {
        NodeChild::Token(token)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<NodeChild>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node { kind, children: Vec::new() }
    }

    /// A node holding a single leaf token (names and literals)
    pub fn leaf(kind: NodeKind, token: Token) -> Self {
        Node { kind, children: vec![NodeChild::Token(token)] }
    }

    pub fn push(&mut self, child: impl Into<NodeChild>) {
        self.children.push(child.into());
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.children.get(index).and_then(NodeChild::as_node)
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.children.get(index).and_then(NodeChild::as_token)
    }

    /// Mutable walk over every leaf token, depth first
    pub fn for_each_token_mut(&mut self, f: &mut impl FnMut(&mut Token)) {
        for child in &mut self.children {
            match child {
                NodeChild::Node(node) => node.for_each_token_mut(f),
                NodeChild::Token(token) => f(token),
            }
        }
    }

    /// Indented dump of the tree, two spaces per level
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.pretty_into(&mut out, 0);
        out
    }

    fn pretty_into(&self, out: &mut String, indent: usize) {
        out.push_str(&"  ".repeat(indent));
        out.push_str(self.kind.tag());
        out.push('\n');
        for child in &self.children {
            match child {
                NodeChild::Node(node) => node.pretty_into(out, indent + 1),
                NodeChild::Token(token) => {
                    out.push_str(&"  ".repeat(indent + 1));
                    out.push_str(&token.to_string());
                    out.push('\n');
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    #[test]
    fn pretty_indents_nested_children() {
        let mut print = Node::new(NodeKind::PrintStatement);
        print.push(Node::leaf(NodeKind::Number, Token::new(TokenKind::Number, "7", 1, 1)));
        let mut root = Node::new(NodeKind::Program);
        root.push(print);

        assert_eq!(root.pretty(), "stmt\n  print_stmt\n    number\n      7\n");
    }

    #[test]
    fn accessors_distinguish_nodes_and_tokens() {
        let name = Node::leaf(NodeKind::Name, Token::new(TokenKind::Name, "x", 1, 1));
        assert!(name.node(0).is_none());
        assert_eq!(name.token(0).map(|t| t.text.as_str()), Some("x"));
        assert!(name.token(1).is_none());
    }
}
