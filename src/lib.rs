// File: src/lib.rs
//
// Library interface for the Emo interpreter.
// Exposes modules for integration testing and external use.

pub mod ast;
pub mod config;
pub mod errors;
pub mod glyphs;
pub mod interpreter;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod transformer;
