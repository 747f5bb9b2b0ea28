mod expr;
mod stmt;
#[cfg(test)]
mod tests;

use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

const MAX_NESTING_DEPTH: u32 = 128;

pub(crate) struct Parser {
    tokens: Vec<Spanned<Lexeme>>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    depth: u32,
    ids: NodeIds,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Spanned<Lexeme>>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            depth: 0,
            ids: NodeIds::default(),
        }
    }

    pub(crate) fn parse_module(mut self) -> Result<Module, Vec<Diagnostic>> {
        let mut body = Vec::new();
        while !self.at(&Lexeme::Eof) {
            if self.eat(&Lexeme::Newline) || self.eat(&Lexeme::Dedent) {
                continue;
            }
            body.push(self.parse_stmt());
        }

        if !self.diagnostics.is_empty() {
            return Err(self.diagnostics);
        }
        Ok(Module {
            body,
            ids: self.ids,
        })
    }

    fn enter_nesting(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            self.error_with_help(
                "nesting depth exceeded (maximum 128 levels)",
                "flatten the expression or split deeply nested blocks",
            );
            return false;
        }
        true
    }

    fn exit_nesting(&mut self) {
        self.depth -= 1;
    }

    // --- Token helpers ---

    fn peek(&self) -> &Lexeme {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Lexeme {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].node
    }

    fn at(&self, token: &Lexeme) -> bool {
        self.peek() == token
    }

    fn eat(&mut self, token: &Lexeme) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) -> &Spanned<Lexeme> {
        let idx = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    fn expect(&mut self, token: &Lexeme) -> Span {
        if self.at(token) {
            let span = self.current_span();
            self.advance();
            span
        } else {
            self.error(&format!(
                "expected {}, found {}",
                token.description(),
                self.peek().description()
            ));
            self.current_span()
        }
    }

    fn expect_ident(&mut self) -> Spanned<String> {
        let span = self.current_span();
        if let Lexeme::Ident(name) = self.peek() {
            let name = name.clone();
            self.advance();
            Spanned::new(name, span)
        } else {
            self.error(&format!(
                "expected identifier, found {}",
                self.peek().description()
            ));
            Spanned::new("_error_".to_string(), span)
        }
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos.min(self.tokens.len() - 1)].span
    }

    fn prev_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::dummy()
        }
    }

    /// Skip the rest of the current logical line, including its newline.
    fn synchronize(&mut self) {
        while !self.at(&Lexeme::Newline) && !self.at(&Lexeme::Eof) {
            self.advance();
        }
        self.eat(&Lexeme::Newline);
    }

    fn error(&mut self, msg: &str) {
        self.diagnostics
            .push(Diagnostic::error(msg.to_string(), self.current_span()));
    }

    fn error_with_help(&mut self, msg: &str, help: &str) {
        self.diagnostics.push(
            Diagnostic::error(msg.to_string(), self.current_span()).with_help(help.to_string()),
        );
    }
}
