use crate::config::Config;
use crate::error::StrpError;
use crate::evaluator::Evaluator;
use crate::lexer::Lexer;
use crate::parser::Parser;
use std::io::Write;

/// One interpreter instance: its own lexer, parser and symbol table.
/// Sessions share nothing, so several can live side by side.
pub struct Session<W: Write> {
    lexer: Lexer,
    parser: Parser,
    evaluator: Evaluator<W>,
}

impl<W: Write> Session<W> {
    pub fn new(out: W, config: Config) -> Self {
        Self {
            lexer: Lexer::new(config),
            parser: Parser::new(config),
            evaluator: Evaluator::new(out, config),
        }
    }

    /// Lexes one line and runs every statement it completes.
    pub fn run_line(&mut self, line: &str) -> Result<(), StrpError> {
        let tokens = self.lexer.process(line)?;
        if tokens.is_empty() {
            return Ok(());
        }
        self.parser.parse(tokens, &mut self.evaluator)
    }

    /// Ends the input. Fails if a string literal is still open.
    pub fn finish(&mut self) -> Result<(), StrpError> {
        self.lexer.finish()
    }

    /// Text the most recent error's span refers to.
    pub fn source(&self) -> &str {
        self.lexer.source()
    }

    pub fn is_pending(&self) -> bool {
        self.lexer.is_pending()
    }

    pub fn is_running(&self) -> bool {
        self.evaluator.is_running()
    }

    pub fn evaluator(&self) -> &Evaluator<W> {
        &self.evaluator
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn into_output(self) -> W {
        self.evaluator.into_output()
    }
}
