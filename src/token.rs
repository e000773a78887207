use std::fmt::{self, Display};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::literal::Literal;

/// The kind of a token.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Type {
    // Grouping and punctuation.
    LeftParen, RightParen, LeftBrace, RightBrace, Comma, Dot, Semicolon,

    // Arithmetic.
    Minus, Plus, Slash, Star,

    // Comparison and equality, with their one-character prefixes.
    Bang, BangEqual, Equal, EqualEqual,
    Greater, GreaterEqual, Less, LessEqual,

    // Literals.
    Identifier, String, Number,

    // Keywords.
    And, Class, Else, False, Fun, For, If, Nil, Or,
    Print, Return, Super, This, True, Var, While,

    EOF
}

// Every token minted gets the next number from here, across the whole
// process, so a serial is never reused between prompt lines.
static NEXT_SERIAL: AtomicUsize = AtomicUsize::new(0);

/// A lexical unit: its kind, the exact source text it was scanned from, the
/// attached value for number and string literals, and the 1-based line for
/// diagnostics.
///
/// Each token also carries a serial number naming the occurrence itself.
/// Two scans of the same lexeme, even on the same line, produce different
/// serials, while clones of one token share theirs. The resolver keys its
/// scope-distance table by serial, which is exactly the identity it needs:
/// every distinct variable reference gets its own entry.
#[derive(Debug, Clone)]
pub struct Token {
    pub r#type: Type,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: usize,
    serial: usize,
}

impl Token {
    /// Mints a new token with a fresh serial.
    pub fn new(r#type: Type, lexeme: String, literal: Option<Literal>, line: usize) -> Token {
        Token {
            r#type,
            lexeme,
            literal,
            line,
            serial: NEXT_SERIAL.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// The occurrence identity of this token.
    pub fn serial(&self) -> usize {
        self.serial
    }
}

// Tokens compare by occurrence, not by content. The syntax tree is cloned
// freely (function declarations keep a copy of their body), and a clone must
// keep referring to the same resolved variable as its original.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.serial == other.serial
    }
}

impl Eq for Token {}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} '{}' on line {}", self.r#type, self.lexeme, self.line)
    }
}
