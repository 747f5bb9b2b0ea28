use crate::ast::*;
use crate::lexeme::Lexeme;

use super::Parser;

impl Parser {
    pub(super) fn parse_stmt(&mut self) -> Stmt {
        match self.peek() {
            Lexeme::If => self.parse_if(),
            Lexeme::For => self.parse_for(),
            Lexeme::Indent => {
                self.error_with_help(
                    "unexpected indent",
                    "only the body of an `if`, `elif`, `else` or `for` may be indented",
                );
                self.advance();
                self.parse_stmt()
            }
            Lexeme::Elif | Lexeme::Else => self.parse_dangling_branch(),
            _ => self.parse_simple_stmt(),
        }
    }

    /// `pass`, `name = expr`, or a bare expression, terminated by a newline.
    pub(super) fn parse_simple_stmt(&mut self) -> Stmt {
        let start = self.current_span();
        let errors_before = self.diagnostics.len();

        let kind = if self.eat(&Lexeme::Pass) {
            StmtKind::Pass
        } else if matches!(self.peek(), Lexeme::Ident(_)) && self.peek_at(1) == &Lexeme::Eq {
            let target = self.expect_ident();
            self.advance(); // consume '='
            let value = self.parse_expr();
            StmtKind::Assign { target, value }
        } else {
            StmtKind::Expr(self.parse_expr())
        };

        let span = start.merge(self.prev_span());
        self.end_of_line(errors_before);
        self.ids.stmt(kind, span)
    }

    fn end_of_line(&mut self, errors_before: usize) {
        if self.eat(&Lexeme::Newline) || self.at(&Lexeme::Eof) {
            return;
        }
        if self.diagnostics.len() == errors_before {
            self.error(&format!(
                "expected end of line, found {}",
                self.peek().description()
            ));
        }
        self.synchronize();
    }

    /// `if test: body (elif test: body)* (else: body)?`. An `elif` becomes a
    /// nested `If` as the sole statement of `orelse`.
    fn parse_if(&mut self) -> Stmt {
        let start = self.current_span();
        self.advance(); // `if` or `elif`
        let test = self.parse_expr();
        let body = self.parse_block();
        let orelse = if self.at(&Lexeme::Elif) {
            vec![self.parse_if()]
        } else if self.eat(&Lexeme::Else) {
            self.parse_block()
        } else {
            Vec::new()
        };
        let span = start.merge(self.prev_span());
        self.ids.stmt(StmtKind::If { test, body, orelse }, span)
    }

    fn parse_for(&mut self) -> Stmt {
        let start = self.current_span();
        self.expect(&Lexeme::For);
        let target = self.expect_ident();
        self.expect(&Lexeme::In);
        let iter = self.parse_expr();
        let body = self.parse_block();
        let orelse = if self.eat(&Lexeme::Else) {
            self.parse_block()
        } else {
            Vec::new()
        };
        let span = start.merge(self.prev_span());
        self.ids.stmt(
            StmtKind::For {
                target,
                iter,
                body,
                orelse,
            },
            span,
        )
    }

    /// `elif`/`else` with no preceding `if`: report once and consume the
    /// whole branch so its body does not cascade into more errors.
    fn parse_dangling_branch(&mut self) -> Stmt {
        let start = self.current_span();
        let keyword = self.peek().description();
        self.error_with_help(
            &format!("{} without a matching 'if'", keyword),
            "attach the branch to the `if` statement directly above it",
        );
        if self.eat(&Lexeme::Elif) {
            self.parse_expr();
        } else {
            self.advance();
        }
        self.parse_block();
        self.ids.stmt(StmtKind::Pass, start)
    }

    /// `: NEWLINE INDENT stmt+ DEDENT` or `: simple_stmt` on the same line.
    pub(super) fn parse_block(&mut self) -> Vec<Stmt> {
        self.expect(&Lexeme::Colon);
        if !self.enter_nesting() {
            self.synchronize();
            self.exit_nesting();
            return Vec::new();
        }

        let body = if self.eat(&Lexeme::Newline) {
            if self.eat(&Lexeme::Indent) {
                let mut stmts = Vec::new();
                while !self.at(&Lexeme::Dedent) && !self.at(&Lexeme::Eof) {
                    if self.eat(&Lexeme::Newline) {
                        continue;
                    }
                    stmts.push(self.parse_stmt());
                }
                self.eat(&Lexeme::Dedent);
                stmts
            } else {
                self.error_with_help(
                    "expected an indented block",
                    "indent the statements that belong to this block",
                );
                Vec::new()
            }
        } else {
            vec![self.parse_simple_stmt()]
        };

        self.exit_nesting();
        body
    }
}
