pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod ops;
pub mod passes;
pub mod pipeline;
pub mod runtime;
pub mod syntax;
pub mod verify;

// Re-exports: short `beautify::X` paths used by the CLI and tests
pub use config::project;
pub use pipeline::{beautify, Pipeline};
pub use syntax::format;
pub use syntax::lexeme;
pub use syntax::lexer;
pub use syntax::parser;
pub use syntax::span;
pub use verify::equiv;

use diagnostic::{render_diagnostics, Diagnostic};
use lexer::Lexer;
use parser::Parser;

/// Parse `source`, rendering any diagnostics to stderr against `filename`.
pub fn parse_source(source: &str, filename: &str) -> Result<ast::Module, Vec<Diagnostic>> {
    parse_source_silent(source).map_err(|errors| {
        render_diagnostics(&errors, filename, source);
        errors
    })
}

/// Parse `source` without rendering. Lexer errors stop before parsing.
pub fn parse_source_silent(source: &str) -> Result<ast::Module, Vec<Diagnostic>> {
    let (tokens, lex_errors) = Lexer::new(source).tokenize();
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }
    Parser::new(tokens).parse_module()
}

/// Parse and re-print `source` in canonical form.
pub fn format_source(source: &str, filename: &str) -> Result<String, Vec<Diagnostic>> {
    let module = parse_source(source, filename)?;
    Ok(format::format_module(&module))
}
