// File: src/main.rs
//
// Main entry point for the Emo language interpreter.
// Handles command-line argument parsing and dispatches to the appropriate
// subcommand (run, repl, test or tokens).

use clap::{Parser as ClapParser, Subcommand};
use colored::Colorize;
use emo::config::{Config, CONFIG_FILE};
use emo::repl::Repl;
use emo::runner::{self, RunOptions};
use emo::{lexer, logging};
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(ClapParser)]
#[command(
    name = "emo",
    about = "Emo: a tiny scripting language spelled in emoji",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None
)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[command(arg_required_else_help = true)]
enum Commands {
    /// Run .emo files (every .emo file in the tests directory when none are given)
    Run {
        /// Paths to .emo files
        files: Vec<PathBuf>,

        /// Print the parse tree before running
        #[arg(long)]
        tree: bool,

        /// Dump the symbol table after each declaration and assignment
        #[arg(long)]
        debug_scopes: bool,

        /// Keep glyph spellings in the tree
        #[arg(long)]
        no_normalize: bool,

        /// Suppress the STATUS banners
        #[arg(long, short)]
        quiet: bool,
    },

    /// Launch interactive Emo REPL
    Repl,

    /// Run all snapshot programs in a directory
    Test {
        /// Directory holding .emo programs and their .out files
        dir: Option<PathBuf>,

        /// Regenerate all .out files based on actual output
        #[arg(long)]
        update: bool,
    },

    /// Print the token stream of a file
    Tokens {
        /// Path to the .emo file
        file: PathBuf,
    },
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let config = Config::load(&cli.config);

    match cli.command {
        Commands::Run { files, tree, debug_scopes, no_normalize, quiet } => {
            let mut options = RunOptions::from(&config);
            options.show_tree |= tree;
            options.debug_scopes |= debug_scopes;
            options.normalize &= !no_normalize;
            options.banners &= !quiet;

            let files = if files.is_empty() {
                match runner::collect_programs(&config.tests_dir) {
                    Ok(programs) => programs,
                    Err(err) => {
                        eprintln!(
                            "{} cannot read {}: {}",
                            "ERROR:".bright_red().bold(),
                            config.tests_dir.display(),
                            err
                        );
                        process::exit(1);
                    }
                }
            } else {
                files
            };

            let summary = runner::run_files(&files, &options);
            process::exit(summary.exit_code());
        }

        Commands::Repl => {
            let options = RunOptions::from(&config);
            let result = Repl::new(&options).and_then(|mut repl| repl.run());
            if let Err(err) = result {
                eprintln!("{} {}", "Error:".bright_red(), err);
                process::exit(1);
            }
        }

        Commands::Test { dir, update } => {
            let dir = dir.unwrap_or(config.tests_dir);
            let (passed, total) = runner::run_snapshots(&dir, update);
            if passed != total {
                process::exit(1);
            }
        }

        Commands::Tokens { file } => match fs::read_to_string(&file) {
            Ok(source) => {
                for token in lexer::tokenize(&source) {
                    println!("{:>4}:{:<4} {:<10} {}", token.line, token.column, format!("{:?}", token.kind), token);
                }
            }
            Err(err) => {
                eprintln!("{} {}: cannot read file: {}", "ERROR in".bright_red().bold(), file.display(), err);
                process::exit(1);
            }
        },
    }
}
