//! String literal quote normalization.
//!
//! The printer reuses each literal's `raw` text, so the quote style is
//! changed by rewriting `raw` before emitting. JSX attribute strings have no
//! escape sequences and are left alone.

use swc_ecma_visit::{VisitMut, VisitMutWith};
use tracing::debug;
use ub_ast::{JSXAttr, JSXExprContainer, Program, QuoteStyle, Str};

/// Rewrite string literals in `program` to use `style`. Returns how many
/// literals changed.
pub fn requote(program: &mut Program, style: QuoteStyle) -> usize {
    let Some(quote) = style.quote_char() else {
        return 0;
    };
    let mut requote = Requote {
        quote,
        in_jsx_attr: false,
        rewritten: 0,
    };
    program.visit_mut_with(&mut requote);
    debug!(%style, rewritten = requote.rewritten, "requoted string literals");
    requote.rewritten
}

/// Re-quote one raw string literal (quotes included) with `quote`.
///
/// Returns `None` when `raw` already uses `quote` or is not a quoted
/// literal. Escapes of the old quote are dropped, bare occurrences of the
/// new quote are escaped, and every other escape is kept verbatim.
pub fn switch_quotes(raw: &str, quote: char) -> Option<String> {
    let open = raw.chars().next()?;
    if raw.len() < 2 || open == quote || !matches!(open, '"' | '\'') || !raw.ends_with(open) {
        return None;
    }

    let body = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(raw.len() + 2);
    out.push(quote);
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(e) if e == open => out.push(e),
                Some(e) => {
                    out.push('\\');
                    out.push(e);
                }
                None => out.push('\\'),
            },
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    Some(out)
}

struct Requote {
    quote: char,
    in_jsx_attr: bool,
    rewritten: usize,
}

impl VisitMut for Requote {
    fn visit_mut_jsx_attr(&mut self, attr: &mut JSXAttr) {
        let outer = std::mem::replace(&mut self.in_jsx_attr, true);
        attr.visit_mut_children_with(self);
        self.in_jsx_attr = outer;
    }

    fn visit_mut_jsx_expr_container(&mut self, container: &mut JSXExprContainer) {
        let outer = std::mem::replace(&mut self.in_jsx_attr, false);
        container.visit_mut_children_with(self);
        self.in_jsx_attr = outer;
    }

    fn visit_mut_str(&mut self, lit: &mut Str) {
        if self.in_jsx_attr {
            return;
        }
        let Some(raw) = lit.raw.as_deref() else {
            return;
        };
        if let Some(requoted) = switch_quotes(raw, self.quote) {
            lit.raw = Some(requoted.into());
            self.rewritten += 1;
        }
    }
}
