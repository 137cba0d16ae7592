//! Printing through `swc_ecma_codegen`.

use anyhow::Result;
use swc_common::{comments::Comments, sync::Lrc, SourceMap};
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};
use ub_ast::{EsVersion, Program};

/// Print `program` as source text.
///
/// Pass the comment store from parsing to keep comments in the output; with
/// `None` the output is comment-free.
pub fn emit_program(
    program: &Program,
    source_map: &Lrc<SourceMap>,
    comments: Option<&dyn Comments>,
) -> Result<String> {
    let mut buf = Vec::new();
    {
        let writer = JsWriter::new(source_map.clone(), "\n", &mut buf, None);
        let mut emitter = Emitter {
            cfg: swc_ecma_codegen::Config::default().with_target(EsVersion::latest()),
            cm: source_map.clone(),
            comments,
            wr: writer,
        };
        program.emit_with(&mut emitter)?;
    }

    Ok(String::from_utf8(buf)?)
}
