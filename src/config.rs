// File: src/config.rs
//
// Optional `emo.toml` project configuration.
//
// ```toml
// normalize_glyphs = true
// show_tree = false
// debug_scopes = false
// banners = true
// tests_dir = "tests"
// ```
//
// Every key is optional. Command-line flags override what the file says.

use colored::Colorize;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "emo.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rewrite glyph tokens to canonical spellings before running
    pub normalize_glyphs: bool,
    /// Print the parse tree of every file before running it
    pub show_tree: bool,
    /// Dump the symbol table to stderr after each declaration and assignment
    pub debug_scopes: bool,
    /// Print the STATUS banners around each file
    pub banners: bool,
    /// Directory scanned when no files are given
    pub tests_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            normalize_glyphs: true,
            show_tree: false,
            debug_scopes: false,
            banners: true,
            tests_dir: PathBuf::from("tests"),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load `path` if it exists. A missing file gives the defaults; a
    /// malformed one is reported on stderr and also gives the defaults.
    pub fn load(path: &Path) -> Self {
        let Ok(text) = fs::read_to_string(path) else {
            debug!(path = %path.display(), "no config file");
            return Config::default();
        };

        match Config::from_toml(&text) {
            Ok(config) => {
                debug!(path = %path.display(), ?config, "loaded config");
                config
            }
            Err(err) => {
                eprintln!(
                    "{} ignoring {}: {}",
                    "warning:".bright_yellow().bold(),
                    path.display(),
                    err.message()
                );
                Config::default()
            }
        }
    }
}
