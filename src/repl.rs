// File: src/repl.rs
//
// Interactive REPL (Read-Eval-Print Loop) for the Emo language.
// Provides an interactive shell for executing Emo code with features like:
// - Multi-line input while braces or parentheses are unclosed
// - Command history with up/down arrow navigation
// - Special commands (:help, :quit, :vars, :reset, :tree)
// - Persistent root scope across inputs

use crate::ast::Node;
use crate::interpreter::{Interpreter, Value};
use crate::lexer::{self, TokenKind};
use crate::runner::RunOptions;
use crate::{glyphs, parser, transformer};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// REPL session that maintains interpreter state and handles user interaction
pub struct Repl {
    interpreter: Interpreter,
    editor: DefaultEditor,
    show_tree: bool,
    normalize: bool,
}

impl Repl {
    /// Creates a new REPL session with a fresh interpreter
    pub fn new(options: &RunOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let editor = DefaultEditor::new()?;
        let mut interpreter = Interpreter::new();
        interpreter.set_debug_scopes(options.debug_scopes);
        Ok(Repl { interpreter, editor, show_tree: options.show_tree, normalize: options.normalize })
    }

    /// Displays the welcome banner with version and help information
    fn show_banner(&self) {
        println!("{}", format!("Emo REPL v{} 📢 🖨 🚩 💿", env!("CARGO_PKG_VERSION")).bright_cyan().bold());
        println!(
            "  {} Use {} for commands or {} to exit",
            "Welcome!".bright_green(),
            ":help".bright_yellow(),
            ":quit".bright_yellow()
        );
        println!("  {} Multi-line input: leave a 🍽 or 👉 unclosed", "Tip:".bright_magenta());
        println!();
    }

    /// Starts the REPL loop
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.show_banner();

        let mut buffer = String::new();

        loop {
            let prompt = if buffer.is_empty() {
                "emo> ".bright_green().to_string()
            } else {
                "...> ".bright_blue().to_string()
            };

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let _ = self.editor.add_history_entry(line.as_str());

                    // Commands are only recognized outside multi-line input
                    if buffer.is_empty() && line.trim().starts_with(':') {
                        if self.handle_command(line.trim()) {
                            continue;
                        }
                        break;
                    }

                    buffer.push_str(&line);
                    buffer.push('\n');

                    if is_input_complete(&buffer) {
                        self.eval_input(&buffer);
                        buffer.clear();
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C (Ctrl+D or :quit to exit)".bright_yellow());
                    buffer.clear();
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "\nGoodbye!".bright_cyan());
                    break;
                }
                Err(err) => {
                    eprintln!("{} {}", "Error:".bright_red(), err);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handles special REPL commands starting with ':'
    /// Returns true to continue REPL, false to quit
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":help" | ":h" => self.show_help(),
            ":quit" | ":q" | ":exit" => {
                println!("{}", "Goodbye!".bright_cyan());
                return false;
            }
            ":vars" | ":v" => self.show_variables(),
            ":reset" | ":r" => {
                let debug_scopes = self.interpreter.debug_scopes();
                self.interpreter = Interpreter::new();
                self.interpreter.set_debug_scopes(debug_scopes);
                println!("{}", "✓ Environment reset".bright_green());
            }
            ":tree" | ":t" => {
                self.show_tree = !self.show_tree;
                let state = if self.show_tree { "on" } else { "off" };
                println!("{} tree printing {}", "✓".bright_green(), state);
            }
            _ => {
                println!(
                    "{} Unknown command: {}. Type {} for available commands.",
                    "Error:".bright_red(),
                    cmd.bright_yellow(),
                    ":help".bright_yellow()
                );
            }
        }
        true
    }

    /// Displays help information about available commands
    fn show_help(&self) {
        println!();
        println!("{}", "REPL Commands:".bright_cyan().bold());
        println!();
        println!("  {}{}  Display this help message", ":help".bright_yellow(), " or :h     ".dimmed());
        println!("  {}{}  Exit the REPL", ":quit".bright_yellow(), " or :q     ".dimmed());
        println!("  {}{}  Show variables in every scope", ":vars".bright_yellow(), " or :v     ".dimmed());
        println!("  {}{}  Reset environment", ":reset".bright_yellow(), " or :r    ".dimmed());
        println!("  {}{}  Toggle parse tree printing", ":tree".bright_yellow(), " or :t     ".dimmed());
        println!();
        println!("{}", "Examples:".bright_cyan().bold());
        println!();
        println!("  {}", "emo> 📢 x 😌 41".dimmed());
        println!("  {}", "emo> 🖨👉x ➕ 1👈".dimmed());
        println!("  {}", "42".dimmed());
        println!("  {}", "emo> 🚩👉x 😁 40👈🍽".dimmed());
        println!("  {}", "...>     🖨👉\"big\"👈".dimmed());
        println!("  {}", "...> 🥂".dimmed());
        println!();
    }

    /// Displays all currently defined variables, outermost scope first
    fn show_variables(&self) {
        println!();
        println!("{}", "Defined Variables:".bright_cyan().bold());
        println!();

        let scopes = self.interpreter.env.scopes();
        if scopes.iter().all(|scope| scope.is_empty()) {
            println!("  {}", "(none)".dimmed());
        }
        for (depth, scope) in scopes.iter().enumerate() {
            let mut names: Vec<(&String, &Value)> = scope.iter().collect();
            names.sort_by(|a, b| a.0.cmp(b.0));
            for (name, value) in names {
                println!(
                    "  {} {} = {} {}",
                    format!("[{}]", depth).dimmed(),
                    name.bright_yellow(),
                    value,
                    format!("({})", value.type_name()).dimmed()
                );
            }
        }
        println!();
    }

    /// Parses and runs one complete input, echoing the value of a trailing expression
    fn eval_input(&mut self, input: &str) {
        if input.trim().is_empty() {
            return;
        }

        let mut tree = match parser::parse(input) {
            Ok(tree) => tree,
            Err(err) => {
                eprint!("{}", err.in_file("<repl>", input));
                return;
            }
        };

        if self.show_tree {
            print!("{}", tree.pretty());
        }
        if self.normalize {
            transformer::normalize(&mut tree);
        }

        match self.interpreter.execute_in_place(&tree) {
            Ok(value) if ends_with_expression(&tree) => {
                println!("{} {}", "=>".bright_blue(), value.to_string().bright_white());
            }
            Ok(_) => {}
            Err(err) => eprint!("{}", err.in_file("<repl>", input)),
        }
    }
}

fn ends_with_expression(tree: &Node) -> bool {
    tree.children.last().and_then(|child| child.as_node()).is_some_and(|node| node.kind.is_expression())
}

/// True when every brace and parenthesis opened in `input` is closed.
///
/// Goes through the lexer, so delimiters inside strings and 💩 comments are
/// ignored and both glyph and canonical spellings count.
pub fn is_input_complete(input: &str) -> bool {
    let mut depth: i64 = 0;
    for token in lexer::tokenize(input).iter().filter(|t| t.kind == TokenKind::Delimiter) {
        match glyphs::canonical(&token.text) {
            "{" | "(" => depth += 1,
            "}" | ")" => depth -= 1,
            _ => {}
        }
    }
    depth <= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_input_is_complete() {
        assert!(is_input_complete(""));
        assert!(is_input_complete("decl x = 1\n"));
        assert!(is_input_complete("if (x) { print(x) }\n"));
        assert!(is_input_complete("🚩👉x👈🍽 🖨👉x👈 🥂\n"));
    }

    #[test]
    fn open_blocks_need_more_input() {
        assert!(!is_input_complete("while (x < 3) {\n"));
        assert!(!is_input_complete("💿👉x 😭 3👈🍽\n"));
        assert!(!is_input_complete("print(\n"));
    }

    #[test]
    fn strings_and_comments_do_not_count() {
        assert!(is_input_complete("print(\"{\")\n"));
        assert!(is_input_complete("decl x 💩 {\n"));
    }

    #[test]
    fn trailing_expression_is_detected() {
        assert!(ends_with_expression(&parser::parse("decl x = 1\nx + 1\n").unwrap()));
        assert!(!ends_with_expression(&parser::parse("decl x = 1\n").unwrap()));
        assert!(!ends_with_expression(&parser::parse("").unwrap()));
    }
}
