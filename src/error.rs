use crate::object::Object;
use crate::token::{Token, Type};

/// Accumulates the outcome of a run. The driver owns one of these and lends
/// it to each pipeline stage; stages record errors through [`Report`] and the
/// driver checks the flags between stages to decide whether to continue.
#[derive(Debug, Default)]
pub struct Diagnostics {
    had_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics::default()
    }

    /// Returns if a syntax or resolution error was reported.
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    /// Returns if a runtime error was reported.
    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Clears both flags. The prompt does this before every new line.
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }
}

/// Every error type must implement this trait.
pub trait Report {
    /// Prints the error message to stderr and flips the matching flag.
    fn report(&self, diagnostics: &mut Diagnostics);
}

/// Represents an error that occurs during scanning.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Report for ScanError {
    fn report(&self, diagnostics: &mut Diagnostics) {
        eprintln!("[line {line}] Error: {message}", line = self.line, message = self.message);
        diagnostics.had_error = true;
    }
}

/// Represents an error that occurs during parsing.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Report for ParseError {
    fn report(&self, diagnostics: &mut Diagnostics) {
        if self.token.r#type == Type::EOF {
            eprintln!(
                "[line {line}] Error at end: {message}",
                line = self.token.line,
                message = self.message
            );
        } else {
            eprintln!(
                "[line {line}] Error at '{lexeme}': {message}",
                line = self.token.line,
                lexeme = self.token.lexeme,
                message = self.message
            );
        }

        diagnostics.had_error = true;
    }
}

/// Represents an error that occurs during resolution.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Report for ResolveError {
    fn report(&self, diagnostics: &mut Diagnostics) {
        eprintln!(
            "[line {line}] Error at '{lexeme}': {message}",
            line = self.token.line,
            lexeme = self.token.lexeme,
            message = self.message
        );

        diagnostics.had_error = true;
    }
}

/// Represents an error that occurs during runtime.
#[derive(Debug)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Report for RuntimeError {
    fn report(&self, diagnostics: &mut Diagnostics) {
        eprintln!("{message}\n[line {line}]", message = self.message, line = self.token.line);
        diagnostics.had_runtime_error = true;
    }
}

/// A non-local exit unwinding out of statement execution: either a `return`
/// carrying its value back to the enclosing call, or a runtime error on its
/// way to the top-level driver. Only the function call boundary catches the
/// `Return` variant.
#[derive(Debug)]
pub enum Unwind {
    Return(Object),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}
