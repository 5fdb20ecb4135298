//! Output buffer and line layout for the transpiler.
//!
//! Every emitted item (a statement header, a simple statement or a closing
//! brace) carries the source line it came from. Items that share a source
//! line are joined with one space; an item from a later line starts a new
//! output line.

use rover_lexer::Token;
use rover_parser::parse;
use rover_types::ast::Program;
use rover_types::Span;

use crate::source_map::SourceMap;

/// Transpile a token stream: parse, then emit.
///
/// Parse warnings are dropped here; callers that want them run the parser
/// themselves (see `rover-compiler`).
pub fn transpile(tokens: Vec<Token>) -> String {
    emit(&parse(tokens).program)
}

/// Emit JavaScript for a parsed program.
pub fn emit(program: &Program) -> String {
    emit_with_source_map(program).0
}

/// Emit JavaScript for a parsed program together with its source map.
pub fn emit_with_source_map(program: &Program) -> (String, SourceMap) {
    let mut emitter = Emitter::new();
    for stmt in &program.stmts {
        emitter.emit_stmt(stmt);
    }
    emitter.finish()
}

pub(crate) struct Emitter {
    out: String,
    /// Source line of the last emitted item.
    last_line: Option<u32>,
    /// Current 1-based output line.
    js_line: u32,
    source_map: SourceMap,
}

impl Emitter {
    fn new() -> Self {
        Self {
            out: String::new(),
            last_line: None,
            js_line: 1,
            source_map: SourceMap::new(),
        }
    }

    /// Append one item that originated at `span`.
    pub(crate) fn item(&mut self, span: Span, text: &str) {
        let line = span.start_line;
        match self.last_line {
            None => self.source_map.push(self.js_line, span),
            Some(last) if last == line => self.out.push(' '),
            Some(_) => {
                self.out.push('\n');
                self.js_line += 1;
                self.source_map.push(self.js_line, span);
            }
        }
        self.out.push_str(text);
        self.js_line += text.matches('\n').count() as u32;
        self.last_line = Some(span.end_line);
    }

    fn finish(self) -> (String, SourceMap) {
        (self.out, self.source_map)
    }
}
