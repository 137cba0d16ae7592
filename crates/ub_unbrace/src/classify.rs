//! Block classification.
//!
//! Decides, for one body slot of one parent statement, which [`Role`] the
//! slot plays and whether the block sitting there may be unwrapped. Pure:
//! nothing here mutates the tree.

use swc_ecma_ast as ast;
use ub_ast::{body_slot, BodySlot, ParentKind, Role, Stmt};

/// Body slots of every parent kind, with the role a block in that slot plays.
///
/// Extending the set of unwrappable constructs means adding a row here (and
/// teaching [`ParentKind`] and `body_slot` about the new statement).
pub const ELIGIBLE_SLOTS: &[(ParentKind, &[(BodySlot, Role)])] = &[
    (
        ParentKind::If,
        &[
            (BodySlot::Consequent, Role::IfConsequent),
            (BodySlot::Alternate, Role::IfAlternate),
        ],
    ),
    (ParentKind::For, &[(BodySlot::Body, Role::LoopBody)]),
    (ParentKind::ForIn, &[(BodySlot::Body, Role::LoopBody)]),
    (ParentKind::ForOf, &[(BodySlot::Body, Role::LoopBody)]),
    (ParentKind::While, &[(BodySlot::Body, Role::LoopBody)]),
    (ParentKind::DoWhile, &[(BodySlot::Body, Role::LoopBody)]),
];

/// Slots of `kind` in visiting order.
pub fn slots_of(kind: ParentKind) -> &'static [(BodySlot, Role)] {
    ELIGIBLE_SLOTS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, slots)| *slots)
        .unwrap_or(&[])
}

/// Role of a block referenced through `slot` of a parent of kind `parent`.
///
/// Unknown combinations resolve to [`Role::Other`] instead of failing.
pub fn role_of(parent: Option<ParentKind>, slot: BodySlot) -> Role {
    parent
        .map(slots_of)
        .and_then(|slots| slots.iter().find(|(s, _)| *s == slot))
        .map(|(_, role)| *role)
        .unwrap_or(Role::Other)
}

/// Why a slot is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepReason {
    /// The slot is empty or holds a bare statement already.
    NotABlock,
    /// The block holds zero or several statements.
    StatementCount(usize),
    /// The block is not the body of an `if` or loop.
    IneligibleRole,
    /// `let`, `const`, `class`, `function`... cannot be an `if`/loop body.
    LexicalDeclaration,
    /// Removing the braces would rebind the parent's `else`.
    DanglingElse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Unwrap,
    Keep(KeepReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub role: Role,
    pub verdict: Verdict,
}

impl Classification {
    pub fn is_eligible(&self) -> bool {
        self.verdict == Verdict::Unwrap
    }

    fn keep(role: Role, reason: KeepReason) -> Self {
        Self {
            role,
            verdict: Verdict::Keep(reason),
        }
    }
}

/// Whether the statement in `slot` of `parent` is directly followed by an
/// `else` once printed without braces.
///
/// `parent_followed` is the same property for `parent` itself: a loop that
/// is the unbraced consequent of an `if`/`else` passes it on to its body.
pub fn body_followed_by_else(parent: &Stmt, slot: BodySlot, parent_followed: bool) -> bool {
    match (parent, slot) {
        (Stmt::If(s), BodySlot::Consequent) => s.alt.is_some() || parent_followed,
        (Stmt::DoWhile(_), _) => false,
        _ => parent_followed,
    }
}

/// Classify whatever `parent` holds in `slot`.
///
/// `followed_by_else` tells whether `parent` itself is directly followed by
/// an `else` (see [`body_followed_by_else`]); it only matters for the
/// dangling-else check.
pub fn classify(parent: &Stmt, slot: BodySlot, followed_by_else: bool) -> Classification {
    let role = role_of(ParentKind::of(parent), slot);

    let block = match body_slot(parent, slot) {
        Some(Stmt::Block(block)) => block,
        _ => return Classification::keep(role, KeepReason::NotABlock),
    };

    if !role.is_unwrappable() {
        return Classification::keep(role, KeepReason::IneligibleRole);
    }

    let inner = match block.stmts.as_slice() {
        [inner] => inner,
        stmts => return Classification::keep(role, KeepReason::StatementCount(stmts.len())),
    };

    if is_lexical_declaration(inner) {
        return Classification::keep(role, KeepReason::LexicalDeclaration);
    }

    if body_followed_by_else(parent, slot, followed_by_else) && ends_in_open_if(inner) {
        return Classification::keep(role, KeepReason::DanglingElse);
    }

    Classification {
        role,
        verdict: Verdict::Unwrap,
    }
}

fn is_lexical_declaration(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Decl(ast::Decl::Var(var)) => var.kind != ast::VarDeclKind::Var,
        Stmt::Decl(_) => true,
        _ => false,
    }
}

/// Whether `stmt`, printed without braces, ends in an `if` that has no
/// `else` and would therefore capture a following `else`.
fn ends_in_open_if(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::If(s) => match &s.alt {
            None => true,
            Some(alt) => ends_in_open_if(alt),
        },
        Stmt::For(ast::ForStmt { body, .. })
        | Stmt::ForIn(ast::ForInStmt { body, .. })
        | Stmt::ForOf(ast::ForOfStmt { body, .. })
        | Stmt::While(ast::WhileStmt { body, .. })
        | Stmt::Labeled(ast::LabeledStmt { body, .. })
        | Stmt::With(ast::WithStmt { body, .. }) => ends_in_open_if(body),
        _ => false,
    }
}
