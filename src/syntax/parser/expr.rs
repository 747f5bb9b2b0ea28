use crate::ast::*;
use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::Spanned;

use super::Parser;

impl Parser {
    pub(super) fn parse_expr(&mut self) -> Spanned<Expr> {
        if !self.enter_nesting() {
            let span = self.current_span();
            self.exit_nesting();
            return Spanned::new(Expr::default(), span);
        }
        let expr = self.parse_or();
        self.exit_nesting();
        expr
    }

    fn parse_or(&mut self) -> Spanned<Expr> {
        self.parse_connective(Lexeme::Or, Self::parse_and)
    }

    fn parse_and(&mut self) -> Spanned<Expr> {
        self.parse_connective(Lexeme::And, Self::parse_not)
    }

    /// A run of operands joined by one connective becomes a single N-ary
    /// `BoolOp`: `a or b or c` has three values, not a nested pair.
    fn parse_connective(
        &mut self,
        keyword: Lexeme,
        operand: fn(&mut Self) -> Spanned<Expr>,
    ) -> Spanned<Expr> {
        let first = operand(self);
        if !self.at(&keyword) {
            return first;
        }

        let op_span = self.current_span();
        let op = match BoolOp::from_symbol(keyword.symbol().unwrap_or_default(), op_span) {
            Ok(op) => op,
            Err(err) => {
                self.diagnostics.push(Diagnostic::from(err));
                return first;
            }
        };

        let mut values = vec![first];
        while self.eat(&keyword) {
            values.push(operand(self));
        }
        let span = values[0].span.merge(self.prev_span());
        Spanned::new(Expr::BoolOp { op, values }, span)
    }

    fn parse_not(&mut self) -> Spanned<Expr> {
        if !self.at(&Lexeme::Not) {
            return self.parse_comparison();
        }
        let start = self.current_span();
        self.advance();
        let operand = self.parse_not();
        let span = start.merge(operand.span);
        Spanned::new(
            Expr::UnaryOp {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            },
            span,
        )
    }

    fn parse_comparison(&mut self) -> Spanned<Expr> {
        let left = self.parse_arith(0);
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        while let Some(op) = self.parse_cmp_op() {
            ops.push(op);
            comparators.push(self.parse_arith(0));
        }
        if ops.is_empty() {
            return left;
        }
        let span = left.span.merge(self.prev_span());
        Spanned::new(
            Expr::Compare {
                left: Box::new(left),
                ops,
                comparators,
            },
            span,
        )
    }

    /// Assemble a comparison operator, joining the two-word forms
    /// (`is not`, `not in`) before looking the text up.
    fn parse_cmp_op(&mut self) -> Option<CmpOp> {
        let first = match self.peek() {
            Lexeme::EqEq
            | Lexeme::NotEq
            | Lexeme::Lt
            | Lexeme::LtE
            | Lexeme::Gt
            | Lexeme::GtE
            | Lexeme::In
            | Lexeme::Is
            | Lexeme::Not => self.peek().symbol()?,
            _ => return None,
        };
        let start = self.current_span();
        self.advance();

        let mut symbol = first.to_string();
        if matches!(first, "is" | "not")
            && matches!(self.peek(), Lexeme::Not | Lexeme::In | Lexeme::Is)
        {
            if let Some(second) = self.peek().symbol() {
                symbol.push(' ');
                symbol.push_str(second);
            }
            self.advance();
        }

        let span = start.merge(self.prev_span());
        match CmpOp::from_symbol(&symbol, span) {
            Ok(op) => Some(op),
            Err(err) => {
                self.diagnostics.push(
                    Diagnostic::from(err)
                        .with_help("comparison operators are ==, !=, <, <=, >, >=, is, is not, in, not in".to_string()),
                );
                Some(CmpOp::Eq)
            }
        }
    }

    fn parse_arith(&mut self, min_bp: u8) -> Spanned<Expr> {
        let mut lhs = self.parse_unary();

        loop {
            let op = match self.peek() {
                Lexeme::Plus => BinOp::Add,
                Lexeme::Minus => BinOp::Sub,
                Lexeme::Star => BinOp::Mul,
                Lexeme::Slash => BinOp::Div,
                Lexeme::SlashSlash => BinOp::FloorDiv,
                Lexeme::Percent => BinOp::Mod,
                _ => break,
            };

            let (l_bp, r_bp) = op.binding_power();
            if l_bp < min_bp {
                break;
            }

            self.advance(); // consume operator
            let rhs = self.parse_arith(r_bp);
            let span = lhs.span.merge(rhs.span);
            lhs = Spanned::new(
                Expr::BinOp {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }

        lhs
    }

    fn parse_unary(&mut self) -> Spanned<Expr> {
        let op = match self.peek() {
            Lexeme::Minus => UnaryOp::Neg,
            Lexeme::Plus => UnaryOp::Pos,
            _ => {
                let primary = self.parse_primary();
                return self.parse_postfix(primary);
            }
        };
        let start = self.current_span();
        self.advance();
        let operand = self.parse_unary();
        let span = start.merge(operand.span);
        Spanned::new(
            Expr::UnaryOp {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    /// Parse call suffixes: `f(a)(b)`.
    fn parse_postfix(&mut self, mut expr: Spanned<Expr>) -> Spanned<Expr> {
        while self.eat(&Lexeme::LParen) {
            let args = self.parse_comma_list(&Lexeme::RParen);
            let span = expr.span.merge(self.prev_span());
            expr = Spanned::new(
                Expr::Call {
                    func: Box::new(expr),
                    args,
                },
                span,
            );
        }
        expr
    }

    /// Comma-separated expressions up to and including `close`; a trailing
    /// comma is allowed.
    fn parse_comma_list(&mut self, close: &Lexeme) -> Vec<Spanned<Expr>> {
        let mut items = Vec::new();
        while !self.at(close) && !self.at(&Lexeme::Eof) {
            items.push(self.parse_expr());
            if !self.eat(&Lexeme::Comma) {
                break;
            }
        }
        self.expect(close);
        items
    }

    fn parse_primary(&mut self) -> Spanned<Expr> {
        let start = self.current_span();

        let literal = match self.peek().clone() {
            Lexeme::Integer(n) => Literal::Int(n),
            Lexeme::Float(x) => Literal::Float(x),
            Lexeme::Str(s) => Literal::Str(s),
            Lexeme::True => Literal::Bool(true),
            Lexeme::False => Literal::Bool(false),
            Lexeme::None => Literal::None,
            Lexeme::Ident(name) => {
                self.advance();
                return Spanned::new(Expr::Name(name), start);
            }
            Lexeme::LParen => {
                self.advance();
                let inner = self.parse_expr();
                if self.at(&Lexeme::Comma) {
                    self.error_with_help(
                        "tuples are not supported",
                        "use a list literal `[a, b]` instead",
                    );
                }
                self.expect(&Lexeme::RParen);
                return inner;
            }
            Lexeme::LBracket => {
                self.advance();
                let elements = self.parse_comma_list(&Lexeme::RBracket);
                let span = start.merge(self.prev_span());
                return Spanned::new(Expr::List(elements), span);
            }
            other => {
                self.error(&format!("expected expression, found {}", other.description()));
                // Leave layout tokens in place so the statement can resync.
                if !matches!(
                    other,
                    Lexeme::Newline | Lexeme::Indent | Lexeme::Dedent | Lexeme::Eof
                ) {
                    self.advance();
                }
                return Spanned::new(Expr::default(), start);
            }
        };
        self.advance();
        Spanned::new(Expr::Literal(literal), start)
    }
}
