//! Traversal and substitution.
//!
//! `{ stmt }` → `stmt` for every eligible body slot, pre-order. A statement
//! exposed by a substitution is not descended into during the same pass:
//! `while (c) { if (d) { s; } }` becomes `while (c) if (d) { s; }` and the
//! inner block waits for the next pass.
//!
//! The visitor also tracks whether the statement it is in is directly
//! followed by an `else`, so that a body ending in an `if` without `else`
//! is never unbraced into a position where it would capture that `else`.

use swc_common::Spanned;
use swc_ecma_visit::{VisitMut, VisitMutWith};
use tracing::{debug, trace};
use ub_ast::{body_slot_mut, BlockStmt, BodySlot, ParentKind, Role, Stmt};
use ub_trivia::{BlockLayout, Trivia};

use crate::classify::{body_followed_by_else, classify, slots_of, Verdict};
use crate::unbrace::UnbraceReport;

/// Visitor that unwraps single-statement `if`/loop bodies.
pub struct Unbrace<'a> {
    trivia: Option<Trivia<'a>>,
    report: UnbraceReport,
    /// The statement being visited is directly followed by an `else`.
    followed_by_else: bool,
}

impl<'a> Unbrace<'a> {
    /// Without `trivia` the pass only rewrites the tree; comments attached
    /// to removed braces are then left where the parser put them.
    pub fn new(trivia: Option<Trivia<'a>>) -> Self {
        Self {
            trivia,
            report: UnbraceReport::default(),
            followed_by_else: false,
        }
    }

    pub fn into_report(self) -> UnbraceReport {
        self.report
    }

    /// Unwrap every eligible body of `parent`, returning the slots that were
    /// substituted.
    fn unwrap_bodies(&mut self, parent: &mut Stmt, kind: ParentKind) -> Vec<BodySlot> {
        let mut exposed = Vec::new();
        for &(slot, role) in slots_of(kind) {
            let class = classify(parent, slot, self.followed_by_else);
            match class.verdict {
                Verdict::Unwrap => {
                    if let Some(body) = body_slot_mut(parent, slot) {
                        if self.substitute(body, role) {
                            exposed.push(slot);
                        }
                    }
                }
                Verdict::Keep(reason) => {
                    trace!(%role, ?reason, "keeping block");
                    self.report.note_kept(reason);
                }
            }
        }
        exposed
    }

    /// Repoint `body` from its block to the block's sole statement.
    fn substitute(&mut self, body: &mut Box<Stmt>, role: Role) -> bool {
        let Stmt::Block(block) = &mut **body else {
            return false;
        };
        if block.stmts.len() != 1 {
            return false;
        }
        let Some(inner) = block.stmts.pop() else {
            return false;
        };

        let layout = BlockLayout::new(block.span, inner.span());
        if let Some(trivia) = &self.trivia {
            self.report.note_comments(trivia.rehome(&layout));
        }

        debug!(%role, lo = layout.block.lo.0, "unwrapped block");
        self.report.note_unwrapped(role);
        **body = inner;
        true
    }

    fn visit_body(&mut self, body: &mut Stmt, slot: BodySlot, followed_by_else: bool, exposed: &[BodySlot]) {
        if exposed.contains(&slot) {
            return;
        }
        let outer = std::mem::replace(&mut self.followed_by_else, followed_by_else);
        self.visit_mut_stmt(body);
        self.followed_by_else = outer;
    }

    /// Visit `node` as something no `else` can follow into.
    fn visit_enclosed<N: VisitMutWith<Self>>(&mut self, node: &mut N) {
        let outer = std::mem::replace(&mut self.followed_by_else, false);
        node.visit_mut_children_with(self);
        self.followed_by_else = outer;
    }
}

impl VisitMut for Unbrace<'_> {
    fn visit_mut_block_stmt(&mut self, block: &mut BlockStmt) {
        self.visit_enclosed(block);
    }

    fn visit_mut_stmt(&mut self, stmt: &mut Stmt) {
        let Some(kind) = ParentKind::of(stmt) else {
            match stmt {
                // Their body sits where the statement itself sits.
                Stmt::Labeled(_) | Stmt::With(_) => stmt.visit_mut_children_with(self),
                _ => self.visit_enclosed(stmt),
            }
            return;
        };

        let exposed = self.unwrap_bodies(stmt, kind);

        let followed = self.followed_by_else;
        let cons_followed = body_followed_by_else(stmt, BodySlot::Consequent, followed);
        let body_followed = body_followed_by_else(stmt, BodySlot::Body, followed);
        let outer = std::mem::replace(&mut self.followed_by_else, false);

        match stmt {
            Stmt::If(s) => {
                self.visit_mut_expr(&mut s.test);
                self.visit_body(&mut s.cons, BodySlot::Consequent, cons_followed, &exposed);
                if let Some(alt) = &mut s.alt {
                    self.visit_body(alt, BodySlot::Alternate, followed, &exposed);
                }
            }
            Stmt::For(s) => {
                if let Some(init) = &mut s.init {
                    self.visit_mut_var_decl_or_expr(init);
                }
                if let Some(test) = &mut s.test {
                    self.visit_mut_expr(test);
                }
                if let Some(update) = &mut s.update {
                    self.visit_mut_expr(update);
                }
                self.visit_body(&mut s.body, BodySlot::Body, body_followed, &exposed);
            }
            Stmt::ForIn(s) => {
                self.visit_mut_for_head(&mut s.left);
                self.visit_mut_expr(&mut s.right);
                self.visit_body(&mut s.body, BodySlot::Body, body_followed, &exposed);
            }
            Stmt::ForOf(s) => {
                self.visit_mut_for_head(&mut s.left);
                self.visit_mut_expr(&mut s.right);
                self.visit_body(&mut s.body, BodySlot::Body, body_followed, &exposed);
            }
            Stmt::While(s) => {
                self.visit_mut_expr(&mut s.test);
                self.visit_body(&mut s.body, BodySlot::Body, body_followed, &exposed);
            }
            Stmt::DoWhile(s) => {
                self.visit_body(&mut s.body, BodySlot::Body, body_followed, &exposed);
                self.visit_mut_expr(&mut s.test);
            }
            _ => stmt.visit_mut_children_with(self),
        }

        self.followed_by_else = outer;
    }
}
