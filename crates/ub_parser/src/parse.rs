use anyhow::Result;
use swc_common::{
    comments::SingleThreadedComments, errors::Handler, sync::Lrc, FileName, SourceMap,
};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::{EsSyntax, Syntax, TsSyntax};
use tracing::debug;
use ub_ast::{InputSyntax, Program};

/// Result of parsing a source file.
pub struct ParseResult {
    pub program: Program,
    pub comments: SingleThreadedComments,
    pub source_map: Lrc<SourceMap>,
}

/// Parse a JavaScript/TypeScript source string.
///
/// The file is parsed as a program, so both modules and sloppy-mode scripts
/// are accepted. Errors the parser recovered from are reported like fatal
/// ones: a tree that only approximates the input is not safe to rewrite.
pub fn parse_source(source: &str, filename: &str, syntax: &InputSyntax) -> Result<ParseResult> {
    let source_map: Lrc<SourceMap> = Default::default();
    let source_file = source_map.new_source_file(
        Lrc::new(FileName::Custom(filename.to_string())),
        source.to_string(),
    );

    let comments = SingleThreadedComments::default();

    let handler = Handler::with_emitter_writer(Box::new(std::io::stderr()), Some(source_map.clone()));

    let swc_syntax = if syntax.typescript {
        Syntax::Typescript(TsSyntax {
            tsx: syntax.jsx,
            decorators: true,
            ..Default::default()
        })
    } else {
        Syntax::Es(EsSyntax {
            jsx: syntax.jsx,
            decorators: true,
            ..Default::default()
        })
    };

    let mut recovered = vec![];
    let program = swc_ecma_parser::parse_file_as_program(
        &source_file,
        swc_syntax,
        EsVersion::latest(),
        Some(&comments),
        &mut recovered,
    )
    .map_err(|e| {
        e.into_diagnostic(&handler).emit();
        anyhow::anyhow!("failed to parse {filename}")
    })?;

    if !recovered.is_empty() {
        let count = recovered.len();
        for e in recovered {
            e.into_diagnostic(&handler).emit();
        }
        anyhow::bail!("failed to parse {filename}: {count} syntax error(s)");
    }

    debug!(filename, "parsed");

    Ok(ParseResult {
        program,
        comments,
        source_map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script_and_module() {
        let syntax = InputSyntax::default();
        let module = parse_source("import a from 'a';\nif (a) { a(); }", "m.js", &syntax).unwrap();
        assert!(matches!(module.program, Program::Module(_)));

        let script = parse_source("var a = 1;\nif (a) { a(); }", "s.js", &syntax).unwrap();
        assert!(matches!(script.program, Program::Script(_)));
    }

    #[test]
    fn collects_comments() {
        let parsed = parse_source(
            "// header\nwhile (x) { /* inner */ step(); }",
            "c.js",
            &InputSyntax::default(),
        )
        .unwrap();
        let (leading, trailing) = parsed.comments.borrow_all();
        let count = leading.values().chain(trailing.values()).map(Vec::len).sum::<usize>();
        assert_eq!(count, 2);
    }

    #[test]
    fn rejects_malformed_input() {
        let err = parse_source("if (a { b(); }", "bad.js", &InputSyntax::default());
        assert!(err.is_err());
    }

    #[test]
    fn parses_typescript() {
        let syntax = InputSyntax {
            typescript: true,
            jsx: false,
        };
        let parsed = parse_source("for (const x of xs as number[]) { use(x); }", "t.ts", &syntax);
        assert!(parsed.is_ok());
    }
}
