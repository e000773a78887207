//! Slate is a small dynamically typed scripting language with lexical
//! scoping, first-class functions and classes, interpreted by walking the
//! syntax tree directly.
//!
//! ## Scanning
//! The first step is scanning: the source text becomes a flat list of
//! [`tokens`](token::Token), ending with a synthetic `EOF`. The scanner is a
//! small state machine in the [`scanner`] module that walks the source one
//! character at a time with a little lookahead. Trivial problems like an
//! unterminated string or a stray character are reported as a
//! [`ScanError`](error::ScanError) and scanning keeps going, so several
//! mistakes surface in one run.
//!
//! ## Parsing
//! The [`parser`] module turns the tokens into a syntax tree by recursive
//! descent over the operator precedence ladder. [`Expressions`](expr::Expr)
//! produce a value when evaluated; [`statements`](stmt::Stmt) act through
//! their side effects. A [`ParseError`](error::ParseError) makes the parser
//! skip ahead to the next statement boundary and continue, so one malformed
//! statement does not hide errors in the rest of the file.
//!
//! ## Resolving
//! Before anything runs, the [`resolver`] walks the tree once and computes,
//! for each variable reference inside a local scope, how many environments
//! separate the reference from its binding. The interpreter later uses these
//! distances to read exactly the binding the source text meant, no matter
//! what has been defined since. Semantically invalid but parseable code,
//! like reading a variable in its own initializer or returning at the top
//! level, is caught here as a [`ResolveError`](error::ResolveError).
//!
//! ## Interpreting
//! The [`interpreter`] module evaluates the tree against a chain of
//! [`environments`](environment::Environment), one frame per active scope.
//! Functions capture the frame they were declared in, which is all it takes
//! for closures to work. Type mistakes that only show up with live values,
//! like adding a number to a string, are reported as a
//! [`RuntimeError`](error::RuntimeError) and abort the rest of the run.
//!
//! The pipeline is driven by [`slate`], which owns the interpreter and a
//! [`Diagnostics`](error::Diagnostics) accumulator shared by every stage.

use std::fs;
use std::io::Write;
use std::process;

use rustyline::error::ReadlineError;

pub mod error;
pub mod token;
pub mod scanner;
pub mod expr;
pub mod stmt;
pub mod environment;
pub mod parser;
pub mod ast;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod function;
pub mod resolver;
pub mod class;

use error::Diagnostics;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The outcome of running a piece of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub had_syntax_error: bool,
    pub had_runtime_error: bool,
}

#[allow(non_camel_case_types)]
pub struct slate<'a> {
    interpreter: Interpreter<'a>,
    diagnostics: Diagnostics,
}

impl<'a> slate<'a> {
    /// Creates an interpreter session. Program output (the `print`
    /// statement) goes to the given writer; diagnostics go to stderr.
    pub fn new(output: &'a mut dyn Write) -> Self {
        slate {
            interpreter: Interpreter::new(output),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Interprets a file. Exits the process with 65 on a syntax or
    /// resolution error and with 70 on a runtime error.
    pub fn run_file(&mut self, path: String) {
        let contents = fs::read_to_string(path)
            .expect("Should have been able to read the file");

        let status = self.run(&contents);

        if status.had_syntax_error {
            process::exit(65);
        }
        if status.had_runtime_error {
            process::exit(70);
        }
    }

    /// Runs the interactive prompt. Each line is a little program of its
    /// own, except that globals persist between lines. `quit` or end of
    /// input leaves the loop.
    pub fn run_prompt(&mut self) {
        let mut editor = rustyline::DefaultEditor::new()
            .expect("terminal to support line editing");

        let history = home::home_dir().map(|dir| dir.join(".slate_history"));
        if let Some(path) = &history {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if line.trim() == "quit" {
                        break;
                    }

                    let _ = editor.add_history_entry(&line);
                    self.run(&line);

                    // A failed line must not poison the next one.
                    self.diagnostics.reset();
                },
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(error) => {
                    eprintln!("{error}");
                    break;
                },
            }
        }

        if let Some(path) = &history {
            let _ = editor.save_history(path);
        }
    }

    /// Runs source through the pipeline: scan, parse, resolve, interpret.
    /// Each stage only runs when the previous stages reported no errors.
    pub fn run(&mut self, source: &str) -> RunStatus {
        let tokens = Scanner::new(source, &mut self.diagnostics).scan_tokens();

        if self.diagnostics.had_error() {
            return self.status();
        }

        let statements = Parser::new(tokens, &mut self.diagnostics).parse();

        if self.diagnostics.had_error() {
            return self.status();
        }

        Resolver::new(&mut self.interpreter, &mut self.diagnostics).resolve(&statements);

        if self.diagnostics.had_error() {
            return self.status();
        }

        self.interpreter.interpret(&statements, &mut self.diagnostics);

        self.status()
    }

    fn status(&self) -> RunStatus {
        RunStatus {
            had_syntax_error: self.diagnostics.had_error(),
            had_runtime_error: self.diagnostics.had_runtime_error(),
        }
    }
}
