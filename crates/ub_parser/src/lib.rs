//! JavaScript/TypeScript parsing and printing for unbrace.
//!
//! Wraps the standard SWC parser and code generator. The unbrace pass
//! never parses or prints itself; the driver and the tests go through
//! this crate on both ends:
//!
//! - [`parse_source`] turns text into a `Program` plus its comment store
//! - [`emit_program`] prints a (possibly rewritten) `Program` back out
//! - [`requote`] switches string literals to one quote style before printing

pub mod emit;
pub mod parse;
pub mod quote;

pub use emit::emit_program;
pub use parse::{parse_source, ParseResult};
pub use quote::requote;
