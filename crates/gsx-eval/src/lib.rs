//! A small embedded expression engine with a persistent namespace.
//!
//! This is the collaborator a delegated-computation external function
//! routes its arithmetic through: `exec` runs assignment snippets,
//! `eval` returns a typed value, and every failure is a structured
//! [`EvalError`] that formats into a single diagnostic line; callers
//! at a C boundary log the diagnostic instead of letting anything
//! propagate.

pub mod engine;
pub use engine::{Engine, Value};

pub mod error;
pub use error::{ErrorKind, EvalError};

mod lexer;
mod parser;
