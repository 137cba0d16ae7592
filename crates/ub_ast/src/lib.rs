//! ECMAScript/TypeScript AST for unbrace.
//!
//! Re-exports the standard SWC AST and adds the small vocabulary the
//! unbrace pass uses to talk about statement bodies:
//! - [`ParentKind`]: the statement kinds whose bodies may be unwrapped
//! - [`BodySlot`]: which field of the parent holds the body
//! - [`Role`]: how a block relates to its parent
//! - [`InputSyntax`]: which grammar a source file is parsed with
//! - [`QuoteStyle`]: which quote string literals are printed with

pub use swc_ecma_ast::*;

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Relationship between a block statement and the statement that holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// `if (c) { .. }`
    IfConsequent,
    /// `.. else { .. }`
    IfAlternate,
    /// Body of `for`, `for-in`, `for-of`, `while` or `do-while`.
    LoopBody,
    /// Anything else: function bodies, nested blocks, labels, `try`, ...
    Other,
}

impl Role {
    /// Whether a single-statement block in this role may lose its braces.
    pub fn is_unwrappable(self) -> bool {
        !matches!(self, Role::Other)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::IfConsequent => write!(f, "if-consequent"),
            Role::IfAlternate => write!(f, "if-alternate"),
            Role::LoopBody => write!(f, "loop-body"),
            Role::Other => write!(f, "other"),
        }
    }
}

/// Statement-typed field of a parent statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodySlot {
    Consequent,
    Alternate,
    Body,
}

/// Statement kinds that own a statement-typed body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentKind {
    If,
    For,
    ForIn,
    ForOf,
    While,
    DoWhile,
}

impl ParentKind {
    /// Kind of `stmt`, or `None` for statements that own no unwrappable body.
    pub fn of(stmt: &Stmt) -> Option<Self> {
        match stmt {
            Stmt::If(_) => Some(ParentKind::If),
            Stmt::For(_) => Some(ParentKind::For),
            Stmt::ForIn(_) => Some(ParentKind::ForIn),
            Stmt::ForOf(_) => Some(ParentKind::ForOf),
            Stmt::While(_) => Some(ParentKind::While),
            Stmt::DoWhile(_) => Some(ParentKind::DoWhile),
            _ => None,
        }
    }
}

/// The field of `parent` named by `slot`, if the parent has one.
///
/// Labeled and `with` statements expose their body too; they are not a
/// [`ParentKind`], so blocks there classify as [`Role::Other`].
///
/// Resolution is by field, never by value: two identical blocks in the
/// consequent and alternate of the same `if` are distinct slots.
pub fn body_slot(parent: &Stmt, slot: BodySlot) -> Option<&Stmt> {
    match (parent, slot) {
        (Stmt::If(s), BodySlot::Consequent) => Some(&*s.cons),
        (Stmt::If(s), BodySlot::Alternate) => s.alt.as_deref(),
        (Stmt::For(s), BodySlot::Body) => Some(&*s.body),
        (Stmt::ForIn(s), BodySlot::Body) => Some(&*s.body),
        (Stmt::ForOf(s), BodySlot::Body) => Some(&*s.body),
        (Stmt::While(s), BodySlot::Body) => Some(&*s.body),
        (Stmt::DoWhile(s), BodySlot::Body) => Some(&*s.body),
        (Stmt::Labeled(s), BodySlot::Body) => Some(&*s.body),
        (Stmt::With(s), BodySlot::Body) => Some(&*s.body),
        _ => None,
    }
}

/// Mutable counterpart of [`body_slot`].
pub fn body_slot_mut(parent: &mut Stmt, slot: BodySlot) -> Option<&mut Box<Stmt>> {
    match (parent, slot) {
        (Stmt::If(s), BodySlot::Consequent) => Some(&mut s.cons),
        (Stmt::If(s), BodySlot::Alternate) => s.alt.as_mut(),
        (Stmt::For(s), BodySlot::Body) => Some(&mut s.body),
        (Stmt::ForIn(s), BodySlot::Body) => Some(&mut s.body),
        (Stmt::ForOf(s), BodySlot::Body) => Some(&mut s.body),
        (Stmt::While(s), BodySlot::Body) => Some(&mut s.body),
        (Stmt::DoWhile(s), BodySlot::Body) => Some(&mut s.body),
        (Stmt::Labeled(s), BodySlot::Body) => Some(&mut s.body),
        (Stmt::With(s), BodySlot::Body) => Some(&mut s.body),
        _ => None,
    }
}

/// Grammar used to parse a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSyntax {
    pub typescript: bool,
    pub jsx: bool,
}

impl InputSyntax {
    /// Pick the grammar from a file extension: `.ts` is TypeScript, `.tsx`
    /// TypeScript with JSX, everything else ECMAScript with JSX enabled.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") | Some("mts") | Some("cts") => Self {
                typescript: true,
                jsx: false,
            },
            Some("tsx") => Self {
                typescript: true,
                jsx: true,
            },
            _ => Self::default(),
        }
    }
}

impl Default for InputSyntax {
    fn default() -> Self {
        Self {
            typescript: false,
            jsx: true,
        }
    }
}

/// Quote character for string literals in printed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Single,
    Double,
    /// Leave every literal as it was written.
    Preserve,
}

impl QuoteStyle {
    pub fn quote_char(self) -> Option<char> {
        match self {
            QuoteStyle::Single => Some('\''),
            QuoteStyle::Double => Some('"'),
            QuoteStyle::Preserve => None,
        }
    }
}

impl std::str::FromStr for QuoteStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(QuoteStyle::Single),
            "double" => Ok(QuoteStyle::Double),
            "preserve" => Ok(QuoteStyle::Preserve),
            other => Err(format!(
                "unknown quote style `{other}` (expected single, double or preserve)"
            )),
        }
    }
}

impl std::fmt::Display for QuoteStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteStyle::Single => write!(f, "single"),
            QuoteStyle::Double => write!(f, "double"),
            QuoteStyle::Preserve => write!(f, "preserve"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_from_extension() {
        assert_eq!(InputSyntax::from_path(Path::new("a.js")), InputSyntax::default());
        assert!(InputSyntax::from_path(Path::new("a.ts")).typescript);
        assert!(!InputSyntax::from_path(Path::new("a.ts")).jsx);
        let tsx = InputSyntax::from_path(Path::new("dir/a.tsx"));
        assert!(tsx.typescript && tsx.jsx);
    }

    #[test]
    fn only_other_role_is_excluded() {
        assert!(Role::IfConsequent.is_unwrappable());
        assert!(Role::IfAlternate.is_unwrappable());
        assert!(Role::LoopBody.is_unwrappable());
        assert!(!Role::Other.is_unwrappable());
    }

    #[test]
    fn quote_style_names() {
        assert_eq!("single".parse::<QuoteStyle>(), Ok(QuoteStyle::Single));
        assert_eq!("preserve".parse::<QuoteStyle>(), Ok(QuoteStyle::Preserve));
        assert!("backtick".parse::<QuoteStyle>().is_err());
        assert_eq!(QuoteStyle::Double.to_string(), "double");
        assert_eq!(QuoteStyle::default().quote_char(), Some('\''));
        assert_eq!(QuoteStyle::Preserve.quote_char(), None);
    }
}
