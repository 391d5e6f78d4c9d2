//! Incremental lexer.
//!
//! Turns chunks of markup into a flat stream of [`LexEvent`]s. The lexer
//! knows nothing about nesting; that is the parser's job.

/// Character reference states.
pub mod character_reference;
/// State machine and public lexer API.
pub mod core;
mod entity_table;
/// Lexical events and their sink.
pub mod event;
/// Helper methods for state transitions and emission.
pub mod helpers;
/// Character reference tables.
pub mod named_character_references;

pub use core::{Lexer, LexerState, RawTextElement};
pub use event::{LexEvent, LexSink, Span};
