use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};
use substring::Substring;

use crate::error::{Diagnostics, Report, ScanError};
use crate::literal::Literal;
use crate::token::{Token, Type};

pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    text: &'a str,
    diagnostics: &'a mut Diagnostics,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a new scanner.
    pub fn new(source: &'a str, diagnostics: &'a mut Diagnostics) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            text: source,
            diagnostics,
            tokens: vec!(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scans the source code and returns the tokens, ending with `EOF`.
    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens.push(Token::new(Type::EOF, String::from(""), None, self.line));

        self.tokens
    }

    /// Consumes and returns the next character.
    fn advance(&mut self) -> char {
        match self.source.next() {
            Some(char) => {
                self.current += 1;
                char
            },
            None => unreachable!("advanced past the end of the source"),
        }
    }

    /// Returns the next character without consuming it.
    fn peek(&mut self) -> Option<char> {
        // The peek cursor sticks where the last multi-char peek left it, so
        // rewind before every look.
        self.source.reset_cursor();
        self.source.peek().copied()
    }

    /// Returns the character after the next one without consuming anything.
    fn peek_next(&mut self) -> Option<char> {
        self.source.reset_cursor();
        self.source.peek_next().copied()
    }

    /// Returns if the character after the next one is the expected character.
    fn match_next(&mut self, expected: char) -> bool {
        self.peek_next() == Some(expected)
    }

    /// Adds a new token to the list of tokens.
    fn add_token(&mut self, r#type: Type, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(Token::new(r#type, lexeme, literal, self.line));
    }

    /// Adds a new single char token to the list of tokens.
    fn add_single_char_token(&mut self, r#type: Type) {
        let c = self.advance();
        self.add_token(r#type, c.to_string(), None);
    }

    /// Adds a new double char token to the list of tokens.
    fn add_double_char_token(&mut self, r#type: Type) {
        let first = self.advance();
        let second = self.advance();

        self.add_token(r#type, format!("{first}{second}"), None);
    }

    /// Returns if the scanner has reached the end of the source.
    fn is_at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Handles a string literal. Strings may span lines.
    fn string(&mut self) {
        let line = self.line;

        self.advance(); // Move past the opening double quote.

        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }

            self.advance();

            if c == '\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            ScanError {
                line,
                message: String::from("Unterminated string"),
            }.report(self.diagnostics);
            return;
        }

        self.advance(); // Move past the closing double quote.

        // The literal value is the inner text, taken as-is; the lexeme keeps
        // the quotes. Slicing is by char index, hence `substring`.
        let lexeme = self.text.substring(self.start, self.current).to_string();
        let value = self.text.substring(self.start + 1, self.current - 1).to_string();

        self.add_token(Type::String, lexeme, Some(Literal::String(value)));
    }

    /// Handles a number literal.
    fn number(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }

        // A dot is only part of the number when digits follow it; `123.` is
        // the number 123 and a Dot token.
        if self.peek() == Some('.') && matches!(self.peek_next(), Some(c) if c.is_ascii_digit()) {
            self.advance(); // Consume the dot.

            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }

        let lexeme = self.text.substring(self.start, self.current).to_string();
        let value: f64 = lexeme.parse().expect("scanned number to be a valid float");

        self.add_token(Type::Number, lexeme, Some(Literal::Number(value)));
    }

    /// Handles an identifier or a keyword.
    fn identifier(&mut self) {
        // is_alphanumeric does not include underscores.
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }

        let lexeme = self.text.substring(self.start, self.current).to_string();
        let token_type = match lexeme.as_str() {
            "and"      => Type::And,
            "class"    => Type::Class,
            "else"     => Type::Else,
            "false"    => Type::False,
            "for"      => Type::For,
            "fun"      => Type::Fun,
            "if"       => Type::If,
            "nil"      => Type::Nil,
            "or"       => Type::Or,
            "print"    => Type::Print,
            "return"   => Type::Return,
            "super"    => Type::Super,
            "this"     => Type::This,
            "true"     => Type::True,
            "var"      => Type::Var,
            "while"    => Type::While,
            _          => Type::Identifier,
        };

        self.add_token(token_type, lexeme, None);
    }

    /// Scans the next token.
    fn scan_token(&mut self) {
        let c = self.peek().expect("scan_token to be called before the end of the source");
        match c {
            // One character tokens
            '(' => self.add_single_char_token(Type::LeftParen),
            ')' => self.add_single_char_token(Type::RightParen),
            '{' => self.add_single_char_token(Type::LeftBrace),
            '}' => self.add_single_char_token(Type::RightBrace),
            ',' => self.add_single_char_token(Type::Comma),
            '.' => self.add_single_char_token(Type::Dot),
            '-' => self.add_single_char_token(Type::Minus),
            '+' => self.add_single_char_token(Type::Plus),
            ';' => self.add_single_char_token(Type::Semicolon),
            '*' => self.add_single_char_token(Type::Star),

            // Two character tokens
            '!' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::BangEqual);
                } else {
                    self.add_single_char_token(Type::Bang)
                };
            },
            '=' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::EqualEqual);
                } else {
                    self.add_single_char_token(Type::Equal)
                };
            },
            '<' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::LessEqual);
                } else {
                    self.add_single_char_token(Type::Less)
                };
            },
            '>' => {
                if self.match_next('=') {
                    self.add_double_char_token(Type::GreaterEqual);
                } else {
                    self.add_single_char_token(Type::Greater)
                };
            },
            '/' => {
                if self.match_next('/') {
                    // A comment runs until the end of the line.
                    while matches!(self.peek(), Some(c) if c != '\n') {
                        self.advance();
                    }
                } else {
                    self.add_single_char_token(Type::Slash);
                }
            },

            // Ignore whitespace
            ' ' | '\r' | '\t' => {
                self.advance();
            },

            // Update line counter
            '\n' => {
                self.advance();
                self.line += 1;
            },

            // String
            '"' => self.string(),

            // Numbers
            c if c.is_ascii_digit() => self.number(),

            // Identifiers
            c if c.is_alphabetic() || c == '_' => self.identifier(),

            _ => {
                self.advance();

                ScanError {
                    line: self.line,
                    message: format!("Unexpected character '{c}'"),
                }.report(self.diagnostics);
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(source, &mut diagnostics).scan_tokens();
        assert!(!diagnostics.had_error(), "unexpected scan error in {source:?}");
        tokens
    }

    fn types(source: &str) -> Vec<Type> {
        scan(source).iter().map(|token| token.r#type).collect()
    }

    #[test]
    fn scans_operators() {
        assert_eq!(
            types("(){},.-+;*/ ! != = == > >= < <="),
            vec![
                Type::LeftParen, Type::RightParen, Type::LeftBrace, Type::RightBrace,
                Type::Comma, Type::Dot, Type::Minus, Type::Plus, Type::Semicolon,
                Type::Star, Type::Slash, Type::Bang, Type::BangEqual, Type::Equal,
                Type::EqualEqual, Type::Greater, Type::GreaterEqual, Type::Less,
                Type::LessEqual, Type::EOF,
            ],
        );
    }

    #[test]
    fn scans_keywords_and_identifiers() {
        assert_eq!(
            types("var nil fun clazz _tmp9"),
            vec![Type::Var, Type::Nil, Type::Fun, Type::Identifier, Type::Identifier, Type::EOF],
        );
    }

    #[test]
    fn scans_numbers() {
        let tokens = scan("12 3.25");
        assert_eq!(tokens[0].literal, Some(Literal::Number(12.0)));
        assert_eq!(tokens[1].literal, Some(Literal::Number(3.25)));
    }

    #[test]
    fn trailing_dot_is_not_part_of_a_number() {
        assert_eq!(types("123."), vec![Type::Number, Type::Dot, Type::EOF]);
    }

    #[test]
    fn scans_strings_with_quotes_in_lexeme() {
        let tokens = scan("\"hello\"");
        assert_eq!(tokens[0].lexeme, "\"hello\"");
        assert_eq!(tokens[0].literal, Some(Literal::from("hello")));
    }

    #[test]
    fn multiline_string_advances_line() {
        let tokens = scan("\"a\nb\" x");
        assert_eq!(tokens[0].literal, Some(Literal::from("a\nb")));
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        assert_eq!(types("// nothing here\nprint"), vec![Type::Print, Type::EOF]);
    }

    #[test]
    fn division_is_not_a_comment() {
        assert_eq!(types("1 / 2"), vec![Type::Number, Type::Slash, Type::Number, Type::EOF]);
    }

    #[test]
    fn unterminated_string_reports_error() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new("\"oops", &mut diagnostics).scan_tokens();
        assert!(diagnostics.had_error());
        assert_eq!(tokens.len(), 1); // Only EOF.
    }

    #[test]
    fn unexpected_character_is_skipped() {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new("1 @ 2", &mut diagnostics).scan_tokens();
        assert!(diagnostics.had_error());
        assert_eq!(
            tokens.iter().map(|token| token.r#type).collect::<Vec<_>>(),
            vec![Type::Number, Type::Number, Type::EOF],
        );
    }

    #[test]
    fn lines_are_one_based() {
        let tokens = scan("a\nb");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn every_scanned_token_gets_its_own_serial() {
        let tokens = scan("a a a");
        assert_ne!(tokens[0].serial(), tokens[1].serial());
        assert_ne!(tokens[1].serial(), tokens[2].serial());
        assert_eq!(tokens[0].lexeme, tokens[1].lexeme);
    }
}
