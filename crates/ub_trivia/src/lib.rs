//! Comment attachment policy for unwrapped blocks.
//!
//! When `{ stmt }` is replaced by `stmt`, every comment the parser attached
//! around the two braces has to go somewhere. SWC stores comments by byte
//! position (leading comments at a token's start, trailing comments at the
//! previous token's end), so once the brace tokens are gone the printer has
//! nothing to hang them on.
//!
//! The policy:
//!
//! - comments that belong to the statement (directly above it, on its own
//!   line, or on the same line as its start or end) stay with it;
//! - comments that only belong to a brace (the rest of the `{` line, or the
//!   lines just before `}`) are dropped together with the braces;
//! - a comment trailing the closing `}` moves to the end of the statement.
//!
//! Dropping brace-only comments loses data. That is accepted behaviour.

use swc_common::{
    comments::{Comment, Comments},
    BytePos, SourceMap, Span,
};
use tracing::debug;

/// Line lookup for byte positions.
pub trait LineIndex {
    /// Zero- or one-based line of `pos`; only equality between lines matters.
    fn line_of(&self, pos: BytePos) -> usize;
}

impl LineIndex for SourceMap {
    fn line_of(&self, pos: BytePos) -> usize {
        self.lookup_char_pos(pos).line
    }
}

/// Spans of a block and of the one statement it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    /// From `{` up to and including `}`.
    pub block: Span,
    /// The sole inner statement.
    pub stmt: Span,
}

impl BlockLayout {
    pub fn new(block: Span, stmt: Span) -> Self {
        Self { block, stmt }
    }

    pub fn open_brace(&self) -> Span {
        Span::new(self.block.lo, BytePos(self.block.lo.0 + 1))
    }

    pub fn close_brace(&self) -> Span {
        Span::new(BytePos(self.block.hi.0 - 1), self.block.hi)
    }

    /// Layouts of synthesized nodes carry no source positions.
    fn is_dummy(&self) -> bool {
        self.block.is_dummy() || self.stmt.is_dummy()
    }
}

/// What happens to one comment when the braces around a statement go away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    /// Re-attach before the statement.
    Leading,
    /// Re-attach after the statement.
    Trailing,
    Discard,
}

/// Decide the fate of `comment` found around the block described by `layout`.
///
/// Pure in its inputs: the comment's span, the two layout spans, and line
/// numbers from `lines`.
pub fn fate_of(comment: &Comment, layout: &BlockLayout, lines: &dyn LineIndex) -> Fate {
    let span = comment.span;
    let open = layout.open_brace();
    let close = layout.close_brace();

    if span.hi <= open.lo {
        // Attached to the block node itself, before `{`.
        return Fate::Discard;
    }

    if span.lo >= close.hi {
        return Fate::Trailing;
    }

    if span.hi <= layout.stmt.lo {
        let on_brace_line = lines.line_of(span.lo) == lines.line_of(open.lo);
        let touches_stmt = lines.line_of(span.hi) == lines.line_of(layout.stmt.lo);
        return if on_brace_line && !touches_stmt {
            Fate::Discard
        } else {
            Fate::Leading
        };
    }

    if span.lo >= layout.stmt.hi {
        return if lines.line_of(span.lo) == lines.line_of(layout.stmt.hi) {
            Fate::Trailing
        } else {
            Fate::Discard
        };
    }

    // Inside the statement: never one of ours, leave it where it is.
    Fate::Leading
}

/// Outcome of [`Trivia::rehome`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rehomed {
    pub kept: usize,
    pub dropped: usize,
}

impl std::ops::AddAssign for Rehomed {
    fn add_assign(&mut self, rhs: Self) {
        self.kept += rhs.kept;
        self.dropped += rhs.dropped;
    }
}

/// Comment store plus the line table needed to apply [`fate_of`].
#[derive(Clone, Copy)]
pub struct Trivia<'a> {
    comments: &'a dyn Comments,
    lines: &'a dyn LineIndex,
}

impl<'a> Trivia<'a> {
    pub fn new(comments: &'a dyn Comments, lines: &'a dyn LineIndex) -> Self {
        Self { comments, lines }
    }

    /// Move every comment attached around the braces of `layout` to the
    /// statement, or drop it, according to [`fate_of`].
    ///
    /// Must run while the statement still has its original span. Comments
    /// inside the statement are not touched.
    pub fn rehome(&self, layout: &BlockLayout) -> Rehomed {
        if layout.is_dummy() {
            return Rehomed::default();
        }

        let open = layout.open_brace();
        let close = layout.close_brace();

        let mut found: Vec<Comment> = Vec::new();
        found.extend(self.comments.take_leading(open.lo).unwrap_or_default());
        found.extend(self.comments.take_trailing(open.hi).unwrap_or_default());
        found.extend(self.comments.take_leading(layout.stmt.lo).unwrap_or_default());
        found.extend(self.comments.take_trailing(layout.stmt.hi).unwrap_or_default());
        found.extend(self.comments.take_leading(close.lo).unwrap_or_default());
        found.extend(self.comments.take_trailing(close.hi).unwrap_or_default());
        found.sort_by_key(|c| c.span.lo);

        let mut leading = Vec::new();
        let mut trailing = Vec::new();
        let mut outcome = Rehomed::default();

        for comment in found {
            match fate_of(&comment, layout, self.lines) {
                Fate::Leading => leading.push(comment),
                Fate::Trailing => trailing.push(comment),
                Fate::Discard => {
                    debug!(text = %comment.text, lo = comment.span.lo.0, "dropping brace comment");
                    outcome.dropped += 1;
                }
            }
        }

        outcome.kept = leading.len() + trailing.len();
        if !leading.is_empty() {
            self.comments.add_leading_comments(layout.stmt.lo, leading);
        }
        if !trailing.is_empty() {
            self.comments.add_trailing_comments(layout.stmt.hi, trailing);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use swc_common::comments::{CommentKind, SingleThreadedComments};

    /// Line table over a plain string, positions are byte offsets + 1.
    struct TextLines(Vec<usize>);

    impl TextLines {
        fn new(src: &str) -> Self {
            let starts = std::iter::once(0)
                .chain(src.match_indices('\n').map(|(i, _)| i + 1))
                .collect();
            Self(starts)
        }
    }

    impl LineIndex for TextLines {
        fn line_of(&self, pos: BytePos) -> usize {
            let offset = (pos.0 - 1) as usize;
            self.0.partition_point(|&start| start <= offset)
        }
    }

    fn pos(src: &str, needle: &str) -> BytePos {
        BytePos(src.find(needle).expect("needle present") as u32 + 1)
    }

    fn span_of(src: &str, needle: &str) -> Span {
        let lo = pos(src, needle);
        Span::new(lo, BytePos(lo.0 + needle.len() as u32))
    }

    fn comment(src: &str, text: &str) -> Comment {
        let kind = if text.starts_with("//") {
            CommentKind::Line
        } else {
            CommentKind::Block
        };
        Comment {
            kind,
            span: span_of(src, text),
            text: text.trim_start_matches("//").into(),
        }
    }

    fn layout(src: &str, stmt: &str) -> BlockLayout {
        let lo = pos(src, "{");
        let hi = BytePos(src.rfind('}').expect("closing brace") as u32 + 2);
        BlockLayout::new(Span::new(lo, hi), span_of(src, stmt))
    }

    #[test]
    fn comment_next_to_statement_is_kept() {
        let src = "for (;;) { /* keep */ doThing(); }";
        let lines = TextLines::new(src);
        let fate = fate_of(&comment(src, "/* keep */"), &layout(src, "doThing();"), &lines);
        assert_eq!(fate, Fate::Leading);
    }

    #[test]
    fn comment_on_open_brace_line_is_dropped() {
        let src = "for (;;) { // brace comment\n  doThing();\n}";
        let lines = TextLines::new(src);
        let fate = fate_of(
            &comment(src, "// brace comment"),
            &layout(src, "doThing();"),
            &lines,
        );
        assert_eq!(fate, Fate::Discard);
    }

    #[test]
    fn comment_above_statement_is_kept() {
        let src = "while (x) {\n  // explain\n  step();\n}";
        let lines = TextLines::new(src);
        let fate = fate_of(&comment(src, "// explain"), &layout(src, "step();"), &lines);
        assert_eq!(fate, Fate::Leading);
    }

    #[test]
    fn tail_comments_split_by_line() {
        let src = "if (a) {\n  b(); // same line\n  // before brace\n}";
        let lines = TextLines::new(src);
        let l = layout(src, "b();");
        assert_eq!(fate_of(&comment(src, "// same line"), &l, &lines), Fate::Trailing);
        assert_eq!(fate_of(&comment(src, "// before brace"), &l, &lines), Fate::Discard);
    }

    #[test]
    fn comments_outside_the_braces() {
        let src = "if (a) /* before */ { b(); } // after";
        let lines = TextLines::new(src);
        let l = layout(src, "b();");
        assert_eq!(fate_of(&comment(src, "/* before */"), &l, &lines), Fate::Discard);
        assert_eq!(fate_of(&comment(src, "// after"), &l, &lines), Fate::Trailing);
    }

    #[test]
    fn rehome_moves_and_drops() {
        let src = "for (;;) { // brace comment\n  /* keep */ doThing();\n} // done";
        let lines = TextLines::new(src);
        let l = layout(src, "doThing();");
        let comments = SingleThreadedComments::default();

        let brace = comment(src, "// brace comment");
        let keep = comment(src, "/* keep */");
        let done = comment(src, "// done");
        comments.add_trailing(l.open_brace().hi, brace);
        comments.add_leading(l.stmt.lo, keep.clone());
        comments.add_trailing(l.block.hi, done.clone());

        let outcome = Trivia::new(&comments, &lines).rehome(&l);

        assert_eq!(outcome, Rehomed { kept: 2, dropped: 1 });
        assert_eq!(comments.get_leading(l.stmt.lo), Some(vec![keep]));
        assert_eq!(comments.get_trailing(l.stmt.hi), Some(vec![done]));
        assert!(!comments.has_trailing(l.open_brace().hi));
        assert!(!comments.has_trailing(l.block.hi));
    }

    #[test]
    fn rehome_ignores_synthesized_layout() {
        let comments = SingleThreadedComments::default();
        let lines = TextLines::new("");
        let l = BlockLayout::new(Span::default(), Span::default());
        assert_eq!(Trivia::new(&comments, &lines).rehome(&l), Rehomed::default());
    }
}
