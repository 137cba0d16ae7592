//! Top-level entry points.

use serde::Serialize;
use swc_ecma_visit::VisitMutWith;
use tracing::debug;
use ub_ast::{Program, Role};
use ub_trivia::{Rehomed, Trivia};

use crate::classify::KeepReason;
use crate::substitute::Unbrace;

/// Upper bound on repeated passes; each pass strips one brace level per
/// nesting chain, so real inputs converge long before this.
const MAX_PASSES: usize = 1000;

/// What a run of the pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct UnbraceReport {
    pub if_consequent: usize,
    pub if_alternate: usize,
    pub loop_body: usize,
    /// Single-statement bodies kept because the statement is a lexical
    /// declaration.
    pub kept_declaration: usize,
    /// Consequents kept because unwrapping would rebind an `else`.
    pub kept_dangling_else: usize,
    pub comments_kept: usize,
    pub comments_dropped: usize,
    pub passes: usize,
}

impl UnbraceReport {
    pub fn unwrapped(&self) -> usize {
        self.if_consequent + self.if_alternate + self.loop_body
    }

    pub fn changed(&self) -> bool {
        self.unwrapped() > 0
    }

    pub(crate) fn note_unwrapped(&mut self, role: Role) {
        match role {
            Role::IfConsequent => self.if_consequent += 1,
            Role::IfAlternate => self.if_alternate += 1,
            Role::LoopBody => self.loop_body += 1,
            Role::Other => {}
        }
    }

    pub(crate) fn note_kept(&mut self, reason: KeepReason) {
        match reason {
            KeepReason::LexicalDeclaration => self.kept_declaration += 1,
            KeepReason::DanglingElse => self.kept_dangling_else += 1,
            KeepReason::NotABlock | KeepReason::StatementCount(_) | KeepReason::IneligibleRole => {}
        }
    }

    pub(crate) fn note_comments(&mut self, moved: Rehomed) {
        self.comments_kept += moved.kept;
        self.comments_dropped += moved.dropped;
    }

    fn absorb(&mut self, other: UnbraceReport) {
        self.if_consequent += other.if_consequent;
        self.if_alternate += other.if_alternate;
        self.loop_body += other.loop_body;
        self.kept_declaration = other.kept_declaration;
        self.kept_dangling_else = other.kept_dangling_else;
        self.comments_kept += other.comments_kept;
        self.comments_dropped += other.comments_dropped;
        self.passes += other.passes;
    }
}

/// Run one pass over `program`.
///
/// Every single-statement block that is the consequent or alternate of an
/// `if`, or the body of a `for`/`for-in`/`for-of`/`while`/`do-while`, is
/// replaced by its statement. Statements exposed this way are not searched
/// again until the next pass.
///
/// With `trivia`, comments around the removed braces are moved onto the
/// statement or dropped (see [`ub_trivia::fate_of`]).
pub fn unbrace_program(program: &mut Program, trivia: Option<Trivia<'_>>) -> UnbraceReport {
    let mut visitor = Unbrace::new(trivia);
    program.visit_mut_with(&mut visitor);
    let mut report = visitor.into_report();
    report.passes = 1;
    debug!(unwrapped = report.unwrapped(), "unbrace pass done");
    report
}

/// Repeat [`unbrace_program`] until a pass unwraps nothing.
///
/// The returned report sums the unwrap and comment counts of all passes;
/// the `kept_*` counts describe the final tree.
pub fn unbrace_to_fixpoint(program: &mut Program, trivia: Option<Trivia<'_>>) -> UnbraceReport {
    let mut total = UnbraceReport::default();
    for _ in 0..MAX_PASSES {
        let report = unbrace_program(program, trivia);
        let changed = report.changed();
        total.absorb(report);
        if !changed {
            break;
        }
    }
    total
}
