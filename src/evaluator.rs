use crate::ast::{Command, Expression, Term};
use crate::config::Config;
use crate::error::{Span, StrpError};
use crate::parser::Executor;
use crate::symbols::{SymbolError, SymbolTable};
use crate::text;
use std::io::Write;

/// Runs commands against the session's symbol table, writing results to `out`.
pub struct Evaluator<W: Write> {
    config: Config,
    symbols: SymbolTable,
    out: W,
    running: bool,
}

impl<W: Write> Evaluator<W> {
    pub fn new(out: W, config: Config) -> Self {
        Self {
            config,
            symbols: SymbolTable::with_constants(),
            out,
            running: true,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// False once `exit` has run.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Concatenates the terms of `expr` left to right.
    pub fn evaluate(&self, expr: &Expression) -> Result<String, StrpError> {
        let mut value = String::new();
        for term in &expr.terms {
            match term {
                Term::Literal { text, .. } => value.push_str(text),
                Term::Symbol { name, span } => {
                    let resolved = self.symbols.get(name).map_err(|_| {
                        StrpError::undefined_symbol(
                            span.clone(),
                            format!(
                                "Cannot retrieve value of {} symbol referenced inside the expression as it doesn't exist",
                                name
                            ),
                        )
                    })?;
                    value.push_str(resolved);
                }
            }
        }
        Ok(value)
    }

    pub fn append(&mut self, name: &str, expr: &Expression, span: &Span) -> Result<(), StrpError> {
        let current = self.symbols.get(name).map_err(|_| {
            StrpError::undefined_symbol(
                span.clone(),
                format!("Cannot append to {} as it doesn't exist", name),
            )
            .with_help(format!("Create it first with: set {} <expression>;", name))
        })?;
        let value = format!("{}{}", current, self.evaluate(expr)?);
        self.store(name, value, span)
    }

    pub fn set(&mut self, name: &str, expr: &Expression, span: &Span) -> Result<(), StrpError> {
        let value = self.evaluate(expr)?;
        self.store(name, value, span)
    }

    pub fn reverse(&mut self, name: &str, span: &Span) -> Result<(), StrpError> {
        let current = self.symbols.get(name).map_err(|_| {
            StrpError::undefined_symbol(
                span.clone(),
                format!("Cannot reverse contents of {} as it doesn't exist", name),
            )
        })?;
        let reversed = text::reverse_words(current);
        self.store(name, reversed, span)
    }

    pub fn print(&mut self, expr: &Expression, span: &Span) -> Result<(), StrpError> {
        let value = self.evaluate(expr)?;
        self.write_line(&value, span)
    }

    pub fn print_length(&mut self, expr: &Expression, span: &Span) -> Result<(), StrpError> {
        let value = self.evaluate(expr)?;
        self.write_line(&value.chars().count().to_string(), span)
    }

    pub fn print_words(&mut self, expr: &Expression, span: &Span) -> Result<(), StrpError> {
        let value = self.evaluate(expr)?;
        self.write_line("Expression provided following words:", span)?;
        self.write_line(&text::words(&value).join("\n"), span)
    }

    pub fn print_word_count(&mut self, expr: &Expression, span: &Span) -> Result<(), StrpError> {
        let value = self.evaluate(expr)?;
        let count = text::words(&value).len();
        self.write_line(&format!("Expression provided n={} words:", count), span)
    }

    pub fn list(&mut self, span: &Span) -> Result<(), StrpError> {
        let mut lines = vec!["Symbol table (special chars escaped):".to_string()];
        lines.extend(self.symbols.list().map(|entry| entry.to_string()));
        for line in lines {
            self.write_line(&line, span)?;
        }
        Ok(())
    }

    pub fn exit(&mut self) {
        if self.config.basic() {
            log::debug!("Exit requested; session will stop after this batch");
        }
        self.running = false;
    }

    fn store(&mut self, name: &str, value: String, span: &Span) -> Result<(), StrpError> {
        if self.config.verbose() {
            log::trace!("Storing {:?} into {}", value, name);
        }
        self.symbols.set(name, value).map_err(|error| match error {
            SymbolError::ReadOnly { .. } => StrpError::read_only_symbol(
                span.clone(),
                format!("Command cannot be executed - {}", error),
            ),
            SymbolError::Undefined { .. } => StrpError::undefined_symbol(span.clone(), error.to_string()),
        })
    }

    /// Writes `line`, adding a newline only when it does not already end in one.
    fn write_line(&mut self, line: &str, span: &Span) -> Result<(), StrpError> {
        let result = if line.ends_with('\n') {
            write!(self.out, "{}", line)
        } else {
            writeln!(self.out, "{}", line)
        };
        result.map_err(|error| StrpError::io_error(span.clone(), error))
    }
}

impl<W: Write> Executor for Evaluator<W> {
    fn execute(&mut self, command: Command) -> Result<(), StrpError> {
        if self.config.basic() {
            log::debug!("Executing {} command", command.keyword());
        }

        match command {
            Command::Append { name, expr, span } => self.append(&name, &expr, &span),
            Command::Set { name, expr, span } => self.set(&name, &expr, &span),
            Command::Reverse { name, span } => self.reverse(&name, &span),
            Command::Print { expr, span } => self.print(&expr, &span),
            Command::PrintLength { expr, span } => self.print_length(&expr, &span),
            Command::PrintWords { expr, span } => self.print_words(&expr, &span),
            Command::PrintWordCount { expr, span } => self.print_word_count(&expr, &span),
            Command::List { span } => self.list(&span),
            Command::Exit { .. } => {
                self.exit();
                Ok(())
            }
        }
    }
}
