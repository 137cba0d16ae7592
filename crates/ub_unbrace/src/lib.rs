//! AST-to-AST pass that removes braces around single-statement bodies.
//!
//! Transforms:
//! - `if (c) { a(); }`             → `if (c) a();`
//! - `if (c) { a(); } else { b(); }` → `if (c) a(); else b();`
//! - `for (..) { a(); }` (also `for-in`, `for-of`, `while`, `do-while`) → `for (..) a();`
//!
//! Blocks holding zero or several statements, function/class bodies, nested
//! blocks and labeled blocks are left alone, as are bodies whose removal
//! would change meaning (lexical declarations, a dangling `else`).

pub mod classify;
pub mod substitute;
pub mod unbrace;

pub use classify::{body_followed_by_else, classify, Classification, KeepReason, Verdict};
pub use substitute::Unbrace;
pub use unbrace::{unbrace_program, unbrace_to_fixpoint, UnbraceReport};
