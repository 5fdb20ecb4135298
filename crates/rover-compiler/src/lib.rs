//! RoverScript compiler: orchestrates the full transpilation pipeline.
//!
//! ```text
//! Source → Lexer → Structural check → Parser → Emitter → JavaScript
//! ```
//!
//! Only unbalanced braces stop compilation. Lexer and parser diagnostics are
//! warnings; the code they describe is kept as malformed nodes and fails
//! when it runs.

use rover_codegen::{emit_with_source_map, SourceMap};
use rover_lexer::Lexer;
use rover_parser::{validate, Parser};
use rover_types::ast::Program;
use rover_types::{CompileErrors, SourceFile};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Serialisable outcome of [`compile_to_result`], in the shape the mission
/// editor reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileResult {
    pub success: bool,
    /// Generated statement text, present when `success` is true.
    pub javascript: Option<String>,
    /// Hex SHA-256 of `javascript`.
    pub javascript_hash: Option<String>,
    pub source_map: Option<SourceMap>,
    pub errors: CompileErrors,
}

/// Output of a successful compilation.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub program: Program,
    pub javascript: String,
    pub source_map: SourceMap,
    /// Warnings only; a compilation with errors does not produce this.
    pub warnings: CompileErrors,
}

/// Lex, check and parse `source`.
///
/// Returns the program with its warnings, or the structural errors that
/// stopped compilation.
pub fn parse_program(
    source: &str,
    filename: &str,
) -> Result<(Program, CompileErrors), CompileErrors> {
    let file = SourceFile::new(filename, source);
    let lexed = Lexer::new(&file).lex();

    let mut diagnostics = CompileErrors::empty();
    if let Err(err) = validate(&lexed.tokens) {
        diagnostics.push(err.to_diagnostic(&file));
        diagnostics.extend(lexed.errors);
        return Err(diagnostics);
    }

    let parsed = Parser::new(lexed.tokens, &file).parse();
    diagnostics.extend(lexed.errors);
    diagnostics.extend(parsed.errors);
    Ok((parsed.program, diagnostics))
}

/// Run the full pipeline.
pub fn compile_program(source: &str, filename: &str) -> Result<Compiled, CompileErrors> {
    let (program, warnings) = parse_program(source, filename)?;
    let (javascript, source_map) = emit_with_source_map(&program);
    Ok(Compiled {
        program,
        javascript,
        source_map,
        warnings,
    })
}

/// Compile to JavaScript text.
pub fn compile(source: &str, filename: &str) -> Result<String, CompileErrors> {
    compile_program(source, filename).map(|c| c.javascript)
}

/// Compile and wrap the outcome in a [`CompileResult`].
pub fn compile_to_result(source: &str, filename: &str) -> CompileResult {
    match compile_program(source, filename) {
        Ok(compiled) => CompileResult {
            success: true,
            javascript_hash: Some(hash_hex(compiled.javascript.as_bytes())),
            javascript: Some(compiled.javascript),
            source_map: Some(compiled.source_map),
            errors: compiled.warnings,
        },
        Err(errors) => CompileResult {
            success: false,
            javascript: None,
            javascript_hash: None,
            source_map: None,
            errors,
        },
    }
}

/// Diagnostics only, without emitting code.
pub fn check(source: &str, filename: &str) -> CompileErrors {
    match parse_program(source, filename) {
        Ok((_, warnings)) => warnings,
        Err(errors) => errors,
    }
}

fn hash_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
