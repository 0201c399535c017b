// File: src/runner.rs
//
// Program driver used by the CLI and by the snapshot tests.
//
// Each file runs in its own interpreter: read, append a newline, parse,
// optionally print and normalize the tree, then execute. A failing file is
// reported and the driver moves on to the next one.

use crate::ast::Node;
use crate::config::Config;
use crate::errors::EmoError;
use crate::interpreter::{Environment, Interpreter};
use crate::parser;
use crate::transformer;
use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::debug;

/// File extension of Emo programs
pub const EXTENSION: &str = "emo";

/// Printed after every file that ran to completion
pub const SEPARATOR: &str = "--------------------------------------------------";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub normalize: bool,
    pub show_tree: bool,
    pub debug_scopes: bool,
    pub banners: bool,
    /// Collect printed output in the outcome instead of writing to stdout
    pub capture: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions { normalize: true, show_tree: false, debug_scopes: false, banners: true, capture: false }
    }
}

impl From<&Config> for RunOptions {
    fn from(config: &Config) -> Self {
        RunOptions {
            normalize: config.normalize_glyphs,
            show_tree: config.show_tree,
            debug_scopes: config.debug_scopes,
            banners: config.banners,
            capture: false,
        }
    }
}

/// Result of running one program to completion
#[derive(Debug)]
pub struct Outcome {
    /// Scopes left after the run; the root scope holds the top-level names
    pub env: Environment,
    /// Captured output, empty unless `RunOptions::capture` was set
    pub output: String,
}

/// Files that ran to completion versus files that failed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

/// Parse a program, printing and normalizing the tree as requested
pub fn parse_source(source: &str, options: &RunOptions) -> Result<Node, EmoError> {
    let mut text = String::with_capacity(source.len() + 1);
    text.push_str(source);
    text.push('\n');

    let mut tree = parser::parse(&text)?;
    debug!(statements = tree.len(), "parsed program");

    if options.show_tree {
        print!("{}", tree.pretty());
    }
    if options.normalize {
        transformer::normalize(&mut tree);
    }
    Ok(tree)
}

fn execute(tree: &Node, options: &RunOptions, output: Option<Arc<Mutex<Vec<u8>>>>) -> Result<Interpreter, EmoError> {
    let mut interpreter = Interpreter::new();
    interpreter.set_debug_scopes(options.debug_scopes);
    if let Some(buffer) = output {
        interpreter.set_output(buffer);
    }
    interpreter.execute(tree)?;
    Ok(interpreter)
}

fn read_buffer(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
    buffer.lock().map(|bytes| String::from_utf8_lossy(&bytes).into_owned()).unwrap_or_default()
}

/// Run one program in a fresh interpreter. Errors carry `name` and the
/// offending source line.
pub fn run_source(name: &str, source: &str, options: &RunOptions) -> Result<Outcome, EmoError> {
    let buffer = options.capture.then(|| Arc::new(Mutex::new(Vec::new())));

    let tree = parse_source(source, options).map_err(|err| err.in_file(name, source))?;
    let interpreter = execute(&tree, options, buffer.clone()).map_err(|err| err.in_file(name, source))?;

    Ok(Outcome {
        env: interpreter.env,
        output: buffer.as_ref().map(read_buffer).unwrap_or_default(),
    })
}

/// Printed output of a program followed by a one-line summary of the error
/// that stopped it, if any. This is the text the snapshot files hold.
pub fn capture_program(source: &str) -> String {
    let options = RunOptions { banners: false, ..RunOptions::default() };
    let buffer = Arc::new(Mutex::new(Vec::new()));

    let result = parse_source(source, &options).and_then(|tree| execute(&tree, &options, Some(buffer.clone())));

    let mut text = read_buffer(&buffer);
    if let Err(err) = result {
        text.push_str(&err.summary());
        text.push('\n');
    }
    text.trim().to_string()
}

fn report(name: &str, err: &EmoError) {
    eprint!("{} {}: {}", "ERROR in".bright_red().bold(), name, err);
}

fn run_file(path: &Path, options: &RunOptions) -> bool {
    let name = path.display().to_string();

    if path.extension().map_or(true, |ext| ext != EXTENSION) {
        eprintln!("{} {} is not a .{} file", "ERROR:".bright_red().bold(), name, EXTENSION);
        return false;
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{} {}: cannot read file: {}", "ERROR in".bright_red().bold(), name, err);
            return false;
        }
    };

    let tree = match parse_source(&source, options) {
        Ok(tree) => tree,
        Err(err) => {
            report(&name, &err.in_file(&name, &source));
            return false;
        }
    };
    if options.banners {
        println!("STATUS: {} Parsed Successfully", name);
    }

    match execute(&tree, options, None) {
        Ok(_) => {
            if options.banners {
                println!("STATUS: {} ran without any interrupt", name);
                println!("{}", SEPARATOR);
            }
            true
        }
        Err(err) => {
            report(&name, &err.in_file(&name, &source));
            false
        }
    }
}

/// Run every path in order; a failure never stops the files after it
pub fn run_files(paths: &[PathBuf], options: &RunOptions) -> Summary {
    let mut summary = Summary::default();
    for path in paths {
        if run_file(path, options) {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }
    }
    debug!(succeeded = summary.succeeded, failed = summary.failed, "run finished");
    summary
}

/// The `.emo` files directly inside `dir`, sorted by path
pub fn collect_programs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut programs: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
        .collect();
    programs.sort();
    Ok(programs)
}

/// Run every program in `dir` and compare its output with the sibling
/// `.out` file. Missing `.out` files are written, and `update` rewrites all
/// of them. Returns `(passed, total)`.
pub fn run_snapshots(dir: &Path, update: bool) -> (usize, usize) {
    let programs = match collect_programs(dir) {
        Ok(programs) => programs,
        Err(_) => {
            eprintln!("[!] Failed to read test directory: {}", dir.display());
            return (0, 0);
        }
    };

    let mut passed = 0;
    let total = programs.len();

    for path in programs {
        let expected_path = path.with_extension("out");
        let start = Instant::now();

        let actual = match fs::read_to_string(&path) {
            Ok(source) => capture_program(&source),
            Err(err) => format!("cannot read file: {}", err),
        };

        let expected = if expected_path.exists() && !update {
            fs::read_to_string(&expected_path).unwrap_or_default().trim().to_string()
        } else if let Err(err) = fs::write(&expected_path, format!("{}\n", actual)) {
            eprintln!("[!] Failed to write snapshot {}: {}", expected_path.display(), err);
            println!("{} {}", "[✗]".bright_red(), path.display());
            continue;
        } else {
            actual.clone()
        };

        if actual == expected {
            println!("{} {} ({:.2?})", "[✓]".bright_green(), path.display(), start.elapsed());
            passed += 1;
        } else {
            println!("{} {}", "[✗]".bright_red(), path.display());
            println!("Expected:\n{}\nGot:\n{}\n", expected, actual);
        }
    }

    println!("\n[✓] Passed {}/{} tests", passed, total);
    (passed, total)
}
