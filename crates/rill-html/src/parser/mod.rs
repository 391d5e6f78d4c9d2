//! Structural parser.
//!
//! Sits between the lexer and a [`Handler`](crate::Handler): folds name
//! case, tracks open elements, and repairs nesting the way browsers do for
//! common cases (implied closes, void elements, stray `</p>` and `</br>`).

/// Streaming parser front end.
pub mod core;
mod structure;
/// Void element and implied-close tables.
pub mod tables;

pub use core::Parser;
pub use tables::{implied_closes, is_void_element};
