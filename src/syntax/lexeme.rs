/// All lexemes of the host surface syntax.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    // Keywords
    If,
    Elif,
    Else,
    For,
    In,
    Not,
    And,
    Or,
    Is,
    Pass,
    True,
    False,
    None,

    // Symbols
    LParen,     // (
    RParen,     // )
    LBracket,   // [
    RBracket,   // ]
    Comma,      // ,
    Colon,      // :
    Eq,         // =
    EqEq,       // ==
    NotEq,      // !=
    Lt,         // <
    LtE,        // <=
    Gt,         // >
    GtE,        // >=
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    SlashSlash, // //
    Percent,    // %

    // Literals
    Integer(i64),
    Float(f64),
    Str(String),
    Ident(String),

    // Layout
    Newline,
    Indent,
    Dedent,

    // End of file
    Eof,
}

impl Lexeme {
    /// Try to match an identifier string to a keyword lexeme.
    pub fn from_keyword(s: &str) -> Option<Lexeme> {
        match s {
            "if" => Some(Lexeme::If),
            "elif" => Some(Lexeme::Elif),
            "else" => Some(Lexeme::Else),
            "for" => Some(Lexeme::For),
            "in" => Some(Lexeme::In),
            "not" => Some(Lexeme::Not),
            "and" => Some(Lexeme::And),
            "or" => Some(Lexeme::Or),
            "is" => Some(Lexeme::Is),
            "pass" => Some(Lexeme::Pass),
            "True" => Some(Lexeme::True),
            "False" => Some(Lexeme::False),
            "None" => Some(Lexeme::None),
            _ => None,
        }
    }

    /// Source text of operator lexemes; used to assemble multi-word
    /// comparison operators such as `not in`.
    pub fn symbol(&self) -> Option<&'static str> {
        let s = match self {
            Lexeme::In => "in",
            Lexeme::Not => "not",
            Lexeme::And => "and",
            Lexeme::Or => "or",
            Lexeme::Is => "is",
            Lexeme::EqEq => "==",
            Lexeme::NotEq => "!=",
            Lexeme::Lt => "<",
            Lexeme::LtE => "<=",
            Lexeme::Gt => ">",
            Lexeme::GtE => ">=",
            _ => return None,
        };
        Some(s)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Lexeme::If => "'if'",
            Lexeme::Elif => "'elif'",
            Lexeme::Else => "'else'",
            Lexeme::For => "'for'",
            Lexeme::In => "'in'",
            Lexeme::Not => "'not'",
            Lexeme::And => "'and'",
            Lexeme::Or => "'or'",
            Lexeme::Is => "'is'",
            Lexeme::Pass => "'pass'",
            Lexeme::True => "'True'",
            Lexeme::False => "'False'",
            Lexeme::None => "'None'",
            Lexeme::LParen => "'('",
            Lexeme::RParen => "')'",
            Lexeme::LBracket => "'['",
            Lexeme::RBracket => "']'",
            Lexeme::Comma => "','",
            Lexeme::Colon => "':'",
            Lexeme::Eq => "'='",
            Lexeme::EqEq => "'=='",
            Lexeme::NotEq => "'!='",
            Lexeme::Lt => "'<'",
            Lexeme::LtE => "'<='",
            Lexeme::Gt => "'>'",
            Lexeme::GtE => "'>='",
            Lexeme::Plus => "'+'",
            Lexeme::Minus => "'-'",
            Lexeme::Star => "'*'",
            Lexeme::Slash => "'/'",
            Lexeme::SlashSlash => "'//'",
            Lexeme::Percent => "'%'",
            Lexeme::Integer(_) => "integer literal",
            Lexeme::Float(_) => "float literal",
            Lexeme::Str(_) => "string literal",
            Lexeme::Ident(_) => "identifier",
            Lexeme::Newline => "end of line",
            Lexeme::Indent => "indent",
            Lexeme::Dedent => "dedent",
            Lexeme::Eof => "end of file",
        }
    }
}
