#[cfg(test)]
mod tests;

use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

const TAB_WIDTH: u32 = 8;

/// Indentation-aware lexer. Emits `Newline` at the end of each logical
/// line and `Indent`/`Dedent` pairs around nested blocks. Newlines inside
/// brackets are insignificant.
pub(crate) struct Lexer<'src> {
    source: &'src [u8],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    indent_stack: Vec<u32>,
    bracket_depth: u32,
    at_line_start: bool,
}

impl<'src> Lexer<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
            diagnostics: Vec::new(),
            indent_stack: vec![0],
            bracket_depth: 0,
            at_line_start: true,
        }
    }

    pub(crate) fn tokenize(mut self) -> (Vec<Spanned<Lexeme>>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            if self.at_line_start && self.bracket_depth == 0 {
                let line_start = self.pos;
                let width = self.measure_indent();
                if self.pos >= self.source.len() {
                    break;
                }
                match self.source[self.pos] {
                    b'\n' | b'\r' => {
                        self.pos += 1;
                        continue;
                    }
                    b'#' => {
                        self.skip_comment();
                        continue;
                    }
                    _ => {}
                }
                self.at_line_start = false;
                self.apply_indent(width, Span::new(line_start as u32, self.pos as u32), &mut tokens);
            }

            self.skip_inline_whitespace();
            if self.pos >= self.source.len() {
                break;
            }

            let start = self.pos;
            let ch = self.source[self.pos];

            if ch == b'\n' {
                self.pos += 1;
                if self.bracket_depth == 0 {
                    tokens.push(self.make_token(Lexeme::Newline, start, self.pos));
                    self.at_line_start = true;
                }
                continue;
            }

            if is_ident_start(ch) {
                tokens.push(self.scan_ident_or_keyword());
            } else if ch.is_ascii_digit() {
                tokens.push(self.scan_number());
            } else if ch == b'"' || ch == b'\'' {
                tokens.push(self.scan_string(ch));
            } else if let Some(tok) = self.scan_symbol(start) {
                tokens.push(tok);
            }
        }

        let end = self.source.len();
        if tokens.last().is_some_and(|t| t.node != Lexeme::Newline) {
            tokens.push(self.make_token(Lexeme::Newline, end, end));
        }
        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            tokens.push(self.make_token(Lexeme::Dedent, end, end));
        }
        tokens.push(self.make_token(Lexeme::Eof, end, end));
        (tokens, self.diagnostics)
    }

    /// Advance over leading spaces/tabs and return the indentation width.
    fn measure_indent(&mut self) -> u32 {
        let mut width = 0;
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b' ' => width += 1,
                b'\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
                0x0c => width = 0,
                _ => break,
            }
            self.pos += 1;
        }
        width
    }

    fn apply_indent(&mut self, width: u32, span: Span, tokens: &mut Vec<Spanned<Lexeme>>) {
        let top = self.current_indent();
        if width > top {
            self.indent_stack.push(width);
            tokens.push(Spanned::new(Lexeme::Indent, span));
            return;
        }
        while width < self.current_indent() {
            self.indent_stack.pop();
            tokens.push(Spanned::new(Lexeme::Dedent, span));
        }
        if width != self.current_indent() {
            self.diagnostics.push(
                Diagnostic::error(
                    "unindent does not match any outer indentation level".to_string(),
                    span,
                )
                .with_help("align this line with an enclosing block".to_string()),
            );
        }
    }

    fn current_indent(&self) -> u32 {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    fn skip_inline_whitespace(&mut self) {
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b' ' | b'\t' | b'\r' | 0x0c => self.pos += 1,
                b'\n' if self.bracket_depth > 0 => self.pos += 1,
                b'#' => self.skip_comment(),
                _ => break,
            }
        }
    }

    fn skip_comment(&mut self) {
        while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn scan_ident_or_keyword(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.source[start..self.pos]);
        let token = Lexeme::from_keyword(&text).unwrap_or_else(|| Lexeme::Ident(text.into_owned()));
        self.make_token(token, start, self.pos)
    }

    fn scan_number(&mut self) -> Spanned<Lexeme> {
        let start = self.pos;
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        let is_float = self.pos + 1 < self.source.len()
            && self.source[self.pos] == b'.'
            && self.source[self.pos + 1].is_ascii_digit();
        if is_float {
            self.pos += 1;
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }

        let text = String::from_utf8_lossy(&self.source[start..self.pos]);
        let token = if is_float {
            match text.parse::<f64>() {
                Ok(v) if v.is_finite() => Lexeme::Float(v),
                Ok(_) => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            "float literal is too large".to_string(),
                            Span::new(start as u32, self.pos as u32),
                        )
                        .with_note(format!("the maximum float is {:e}", f64::MAX)),
                    );
                    Lexeme::Float(0.0)
                }
                Err(_) => {
                    self.error_at("invalid float literal", start, self.pos);
                    Lexeme::Float(0.0)
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(n) => Lexeme::Integer(n),
                Err(_) => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            format!("integer literal '{}' is too large", text),
                            Span::new(start as u32, self.pos as u32),
                        )
                        .with_note(format!("the maximum integer is {}", i64::MAX)),
                    );
                    Lexeme::Integer(0)
                }
            }
        };
        self.make_token(token, start, self.pos)
    }

    fn scan_string(&mut self, quote: u8) -> Spanned<Lexeme> {
        let start = self.pos;
        self.pos += 1; // opening quote
        let mut bytes = Vec::new();
        loop {
            if self.pos >= self.source.len() || self.source[self.pos] == b'\n' {
                self.error_at("unterminated string literal", start, self.pos);
                break;
            }
            let b = self.source[self.pos];
            self.pos += 1;
            if b == quote {
                break;
            }
            if b != b'\\' {
                bytes.push(b);
                continue;
            }
            let Some(&esc) = self.source.get(self.pos) else {
                continue;
            };
            self.pos += 1;
            match esc {
                b'n' => bytes.push(b'\n'),
                b't' => bytes.push(b'\t'),
                b'r' => bytes.push(b'\r'),
                b'0' => bytes.push(0),
                b'\\' | b'\'' | b'"' => bytes.push(esc),
                other => {
                    bytes.push(b'\\');
                    bytes.push(other);
                }
            }
        }
        let text = String::from_utf8_lossy(&bytes).into_owned();
        self.make_token(Lexeme::Str(text), start, self.pos)
    }

    fn scan_symbol(&mut self, start: usize) -> Option<Spanned<Lexeme>> {
        let ch = self.source[self.pos];
        let next = self.source.get(self.pos + 1).copied();
        self.pos += 1;

        let tok = match ch {
            b'(' => {
                self.bracket_depth += 1;
                Lexeme::LParen
            }
            b')' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                Lexeme::RParen
            }
            b'[' => {
                self.bracket_depth += 1;
                Lexeme::LBracket
            }
            b']' => {
                self.bracket_depth = self.bracket_depth.saturating_sub(1);
                Lexeme::RBracket
            }
            b',' => Lexeme::Comma,
            b':' => Lexeme::Colon,
            b'+' => Lexeme::Plus,
            b'-' => Lexeme::Minus,
            b'*' => Lexeme::Star,
            b'%' => Lexeme::Percent,
            b'=' if next == Some(b'=') => {
                self.pos += 1;
                Lexeme::EqEq
            }
            b'=' => Lexeme::Eq,
            b'!' if next == Some(b'=') => {
                self.pos += 1;
                Lexeme::NotEq
            }
            b'<' if next == Some(b'=') => {
                self.pos += 1;
                Lexeme::LtE
            }
            b'<' => Lexeme::Lt,
            b'>' if next == Some(b'=') => {
                self.pos += 1;
                Lexeme::GtE
            }
            b'>' => Lexeme::Gt,
            b'/' if next == Some(b'/') => {
                self.pos += 1;
                Lexeme::SlashSlash
            }
            b'/' => Lexeme::Slash,
            _ => {
                // Skip the rest of a multi-byte character.
                while self.pos < self.source.len() && (self.source[self.pos] & 0xC0) == 0x80 {
                    self.pos += 1;
                }
                let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
                self.diagnostics.push(
                    Diagnostic::error(
                        format!("unexpected character '{}'", text),
                        Span::new(start as u32, self.pos as u32),
                    )
                    .with_help("only the statement and expression forms of the supported subset can be used".to_string()),
                );
                return None;
            }
        };
        Some(self.make_token(tok, start, self.pos))
    }

    fn error_at(&mut self, message: &str, start: usize, end: usize) {
        self.diagnostics.push(Diagnostic::error(
            message.to_string(),
            Span::new(start as u32, end as u32),
        ));
    }

    fn make_token(&self, token: Lexeme, start: usize, end: usize) -> Spanned<Lexeme> {
        Spanned::new(token, Span::new(start as u32, end as u32))
    }
}

fn is_ident_start(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_ident_continue(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}
