// File: src/errors.rs
//
// Error handling and reporting for the Emo language.
// Provides structured error types with source location information
// and pretty-printed error messages.

use crate::lexer::Token;
use colored::Colorize;
use std::fmt;

/// Source location information for tracking where code appears in a file
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub file: Option<String>,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column, file: None }
    }

    pub fn unknown() -> Self {
        Self { line: 0, column: 0, file: None }
    }

    /// Location of a token as produced by the lexer
    pub fn of(token: &Token) -> Self {
        Self::new(token.line, token.column)
    }

    pub fn is_known(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.file, self.is_known()) {
            (Some(file), true) => write!(f, "{}:{}:{}", file, self.line, self.column),
            (Some(file), false) => write!(f, "{}", file),
            (None, true) => write!(f, "{}:{}", self.line, self.column),
            (None, false) => write!(f, "<unknown>"),
        }
    }
}

/// Failures that abort the run of a single program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SyntaxError,
    UndeclaredVariable,
    Redeclaration,
    DivisionByZero,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::SyntaxError => write!(f, "Syntax Error"),
            ErrorKind::UndeclaredVariable => write!(f, "Undeclared Variable"),
            ErrorKind::Redeclaration => write!(f, "Redeclaration"),
            ErrorKind::DivisionByZero => write!(f, "Division By Zero"),
        }
    }
}

/// A structured error with location information
#[derive(Debug, Clone)]
pub struct EmoError {
    pub kind: ErrorKind,
    pub message: String,
    pub location: SourceLocation,
    pub source_line: Option<String>,
    pub suggestion: Option<String>,
    pub help: Option<String>,
    pub note: Option<String>,
}

impl EmoError {
    pub fn new(kind: ErrorKind, message: String, location: SourceLocation) -> Self {
        Self {
            kind,
            message,
            location,
            source_line: None,
            suggestion: None,
            help: None,
            note: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.note = Some(note);
        self
    }

    /// Attaches the file name and, when the location is known, the offending source line
    pub fn in_file(mut self, file: &str, source: &str) -> Self {
        self.location.file = Some(file.to_string());
        if self.source_line.is_none() && self.location.is_known() {
            if let Some(line) = source.lines().nth(self.location.line - 1) {
                self.source_line = Some(line.to_string());
            }
        }
        self
    }

    /// One uncolored line, used where output is compared as text
    pub fn summary(&self) -> String {
        format!("{}: {} ({})", self.kind, self.message, self.location)
    }

    /// The parser met a token that cannot start an argument
    pub fn unexpected_token(token: &Token) -> Self {
        let shown = if token.text.is_empty() { "end of input" } else { token.text.as_str() };
        Self::new(
            ErrorKind::SyntaxError,
            format!("Unexpected token: {}", shown),
            SourceLocation::of(token),
        )
        .with_help("expected a boolean, number, name, string or '(' here".to_string())
    }

    /// Read or assignment of a name that no active scope holds
    pub fn undeclared_variable(name: &str, location: SourceLocation) -> Self {
        Self::new(
            ErrorKind::UndeclaredVariable,
            format!("'{}' is undeclared", name),
            location,
        )
    }

    /// Declaration of a name already bound in the innermost scope
    pub fn redeclaration(name: &str, location: SourceLocation) -> Self {
        Self::new(
            ErrorKind::Redeclaration,
            format!("Redeclaration in same scope of '{}'", name),
            location,
        )
        .with_note("shadowing a name from an enclosing block is allowed".to_string())
    }

    pub fn division_by_zero(location: SourceLocation) -> Self {
        Self::new(
            ErrorKind::DivisionByZero,
            "Integer remainder by zero".to_string(),
            location,
        )
    }
}

impl fmt::Display for EmoError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind_str = format!("{}", self.kind);
        writeln!(f, "{}: {}", kind_str.red().bold(), self.message.bold())?;

        let location_str = format!("  --> {}", self.location);
        writeln!(f, "{}", location_str.bright_blue())?;

        if let Some(ref source) = self.source_line {
            let line_num = self.location.line;
            let col_num = self.location.column;

            writeln!(f, "   {}", "|".bright_blue())?;
            writeln!(
                f,
                "{} {} {}",
                format!("{:3}", line_num).bright_blue(),
                "|".bright_blue(),
                source
            )?;
            writeln!(
                f,
                "   {} {}{}",
                "|".bright_blue(),
                " ".repeat(col_num.saturating_sub(1)),
                "^".red().bold()
            )?;
            writeln!(f, "   {}", "|".bright_blue())?;
        }

        if let Some(ref help) = self.help {
            writeln!(
                f,
                "   {} {}",
                "=".bright_yellow(),
                format!("help: {}", help).bright_yellow()
            )?;
        }

        if let Some(ref suggestion) = self.suggestion {
            writeln!(
                f,
                "   {} {}",
                "=".bright_green(),
                format!("Did you mean '{}'?", suggestion).bright_green()
            )?;
        }

        if let Some(ref note) = self.note {
            writeln!(f, "   {} {}", "=".bright_cyan(), format!("note: {}", note).bright_cyan())?;
        }

        Ok(())
    }
}

impl std::error::Error for EmoError {}

/// Computes the Levenshtein distance between two strings
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for i in 1..=a.len() {
        let mut diagonal = row[0];
        row[0] = i;
        for j in 1..=b.len() {
            let above = row[j];
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            row[j] = (above + 1).min(row[j - 1] + 1).min(diagonal + cost);
            diagonal = above;
        }
    }

    row[b.len()]
}

/// Closest candidate within distance 3, used for "Did you mean?" hints
pub fn find_closest_match<'a, I>(target: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for candidate in candidates {
        let distance = levenshtein_distance(target, candidate);
        if distance <= 3 && distance < best_distance {
            best_distance = distance;
            best_match = Some(candidate);
        }
    }

    best_match
}
