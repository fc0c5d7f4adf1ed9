use crate::ast::{Command, Expression, Term};
use crate::config::Config;
use crate::error::{ParseContext, Span, StrpError};
use crate::lexer::{Keyword, Token, TokenKind};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// No statement batch in flight.
    Ready,
    /// Between statements, expecting a keyword.
    Root,
    /// Reading the operands of the given command.
    Command(Keyword),
}

impl fmt::Display for ParserState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParserState::Ready => write!(f, "ready"),
            ParserState::Root => write!(f, "root"),
            ParserState::Command(keyword) => write!(f, "command({})", keyword),
        }
    }
}

/// Receives each statement as soon as it has been parsed.
pub trait Executor {
    fn execute(&mut self, command: Command) -> Result<(), StrpError>;
}

/// Collects statements without running them.
impl Executor for Vec<Command> {
    fn execute(&mut self, command: Command) -> Result<(), StrpError> {
        self.push(command);
        Ok(())
    }
}

/// Malformed expression. Never leaves the parser; it is turned into a
/// parse error naming the command being read.
#[derive(Debug, Error)]
enum ExpressionError {
    #[error("Expression definition incomplete.. more terms expected")]
    Incomplete { span: Span },

    #[error("Expected terminator (;) or operator (+) following {after} in expression")]
    MissingSeparator { after: String, span: Span },

    #[error("Unexpected {found} inside expression; expected name or string")]
    UnexpectedTerm { found: String, span: Span },

    #[error("Unexpected {found} inside expression; expected terminator (;) or operator (+)")]
    UnexpectedToken { found: String, span: Span },
}

impl ExpressionError {
    fn span(&self) -> &Span {
        match self {
            ExpressionError::Incomplete { span }
            | ExpressionError::MissingSeparator { span, .. }
            | ExpressionError::UnexpectedTerm { span, .. }
            | ExpressionError::UnexpectedToken { span, .. } => span,
        }
    }
}

fn usage(keyword: Keyword) -> &'static str {
    match keyword {
        Keyword::Append => "Usage: append <name> <expression>;",
        Keyword::Set => "Usage: set <name> <expression>;",
        Keyword::Reverse => "Usage: reverse <name>;",
        Keyword::Print => "Usage: print <expression>;",
        Keyword::PrintLength => "Usage: printlength <expression>;",
        Keyword::PrintWords => "Usage: printwords <expression>;",
        Keyword::PrintWordCount => "Usage: printwordcount <expression>;",
        Keyword::List => "Usage: list;",
        Keyword::Exit => "Usage: exit;",
    }
}

fn describe(token: Option<&Token>) -> String {
    match token {
        Some(token) => format!("{} token ({})", token.kind(), token.text()),
        None => "END OF INPUT".to_string(),
    }
}

pub struct Parser {
    config: Config,
    state: ParserState,
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: ParserState::Ready,
            tokens: Vec::new(),
            current: 0,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Parses every statement in `tokens`, handing each one to `executor`
    /// as soon as its terminator is reached. The first failure stops the
    /// batch; statements already executed keep their effects.
    pub fn parse<E: Executor + ?Sized>(
        &mut self,
        tokens: Vec<Token>,
        executor: &mut E,
    ) -> Result<(), StrpError> {
        if self.state != ParserState::Ready {
            let error = self.error(
                Span::single(0),
                format!(
                    "Attempting to start parser while already running/not in ready state (state found {})",
                    self.state
                ),
            );
            self.state = ParserState::Ready;
            return Err(error);
        }

        if self.config.basic() {
            log::debug!("Starting parse of {} token(s)", tokens.len());
        }

        self.tokens = tokens;
        self.current = 0;
        self.state = ParserState::Root;

        let result = self.statements(executor);

        self.state = ParserState::Ready;
        self.tokens.clear();
        self.current = 0;

        if self.config.basic() && result.is_ok() {
            log::debug!("Parsing complete");
        }
        result
    }

    fn statements<E: Executor + ?Sized>(&mut self, executor: &mut E) -> Result<(), StrpError> {
        loop {
            match self.state {
                ParserState::Ready => return Ok(()),
                ParserState::Root => {
                    let Some(token) = self.peek() else {
                        return Ok(());
                    };
                    match token.keyword() {
                        Some(keyword) => {
                            self.advance();
                            self.state = ParserState::Command(keyword);
                        }
                        None => {
                            let span = token.span().clone();
                            let message = format!(
                                "Unexpected {} found. Expected keyword",
                                describe(Some(token))
                            );
                            return Err(self.error(span, message).with_help(
                                "Every statement starts with a command such as set, print or list.".to_string(),
                            ));
                        }
                    }
                }
                ParserState::Command(keyword) => {
                    let command = self.command(keyword)?;
                    executor.execute(command)?;
                    if self.config.basic() {
                        log::debug!("Command for {} completed. Resetting parser state.", keyword);
                    }
                    self.state = ParserState::Root;
                }
            }
        }
    }

    fn command(&mut self, keyword: Keyword) -> Result<Command, StrpError> {
        let start = self.previous().map_or(0, |token| token.span().start);

        let command = match keyword {
            Keyword::Append => {
                let name = self.expect(keyword, &[TokenKind::Name])?;
                let expr = self.expression()?;
                let span = self.terminator(keyword, start)?;
                Command::Append {
                    name: name.text().to_string(),
                    expr,
                    span,
                }
            }
            Keyword::Set => {
                let name = self.expect(keyword, &[TokenKind::Name])?;
                let expr = self.expression()?;
                let span = self.terminator(keyword, start)?;
                Command::Set {
                    name: name.text().to_string(),
                    expr,
                    span,
                }
            }
            Keyword::Reverse => {
                let name = self.expect(keyword, &[TokenKind::Name])?;
                let span = self.terminator(keyword, start)?;
                Command::Reverse {
                    name: name.text().to_string(),
                    span,
                }
            }
            Keyword::Print => {
                let expr = self.expression()?;
                let span = self.terminator(keyword, start)?;
                Command::Print { expr, span }
            }
            Keyword::PrintLength => {
                let expr = self.expression()?;
                let span = self.terminator(keyword, start)?;
                Command::PrintLength { expr, span }
            }
            Keyword::PrintWords => {
                let expr = self.expression()?;
                let span = self.terminator(keyword, start)?;
                Command::PrintWords { expr, span }
            }
            Keyword::PrintWordCount => {
                let expr = self.expression()?;
                let span = self.terminator(keyword, start)?;
                Command::PrintWordCount { expr, span }
            }
            Keyword::List => Command::List {
                span: self.terminator(keyword, start)?,
            },
            Keyword::Exit => Command::Exit {
                span: self.terminator(keyword, start)?,
            },
        };

        Ok(command)
    }

    fn terminator(&mut self, keyword: Keyword, start: usize) -> Result<Span, StrpError> {
        let token = self.expect(keyword, &[TokenKind::Terminator])?;
        Ok(Span::new(start, token.span().end))
    }

    fn expression(&mut self) -> Result<Expression, StrpError> {
        self.terms().map_err(|error| {
            let active = match self.state {
                ParserState::Command(keyword) => Some(keyword),
                _ => None,
            };
            let message = match active {
                Some(keyword) => format!("Expression error for {} command: {}", keyword, error),
                None => format!("Failed to parse expression: {}", error),
            };
            let parse_error = self.error(error.span().clone(), message);
            match active {
                Some(keyword) => parse_error.with_help(usage(keyword).to_string()),
                None => parse_error,
            }
        })
    }

    fn terms(&mut self) -> Result<Expression, ExpressionError> {
        let mut terms = Vec::new();

        loop {
            let Some(token) = self.peek() else {
                return Err(ExpressionError::Incomplete {
                    span: self.end_span(),
                });
            };

            let term = Term::from_token(token).ok_or_else(|| ExpressionError::UnexpectedTerm {
                found: describe(Some(token)),
                span: token.span().clone(),
            })?;
            let after = token.to_string();
            self.advance();

            if self.config.basic() {
                log::debug!("Expression term found as {:?}", term);
            }
            terms.push(term);

            match self.peek().map(Token::kind) {
                None => {
                    return Err(ExpressionError::MissingSeparator {
                        after,
                        span: self.end_span(),
                    })
                }
                Some(TokenKind::Terminator) => break,
                Some(TokenKind::Operator) => self.advance(),
                Some(_) => {
                    return Err(ExpressionError::UnexpectedToken {
                        found: describe(self.peek()),
                        span: self.peek().map_or_else(|| self.end_span(), |t| t.span().clone()),
                    })
                }
            }
        }

        Ok(Expression::new(terms))
    }

    /// Consumes the current token if it is one of `kinds`.
    fn expect(&mut self, keyword: Keyword, kinds: &[TokenKind]) -> Result<Token, StrpError> {
        self.dump_tokens();

        if let Some(token) = self.peek() {
            if kinds.contains(&token.kind()) {
                let token = token.clone();
                self.advance();
                return Ok(token);
            }
        }

        let expected: Vec<&str> = kinds.iter().map(TokenKind::name).collect();
        let span = match self.peek() {
            Some(token) => token.span().clone(),
            None => self.end_span(),
        };
        let message = format!(
            "Unexpected {}, expected {} token",
            describe(self.peek()),
            expected.join(" or ")
        );
        Err(self.error(span, message).with_help(usage(keyword).to_string()))
    }

    fn error(&self, span: Span, message: String) -> StrpError {
        self.dump_tokens();
        let command = match self.state {
            ParserState::Command(keyword) => Some(keyword.to_string()),
            _ => None,
        };
        StrpError::parse_error(
            span,
            message,
            ParseContext {
                state: self.state.to_string(),
                command,
                position: self.current,
            },
        )
    }

    fn dump_tokens(&self) {
        if !self.config.verbose() {
            return;
        }
        log::trace!("Token stack:");
        for (index, token) in self.tokens.iter().enumerate() {
            let marker = if index == self.current { " <- current" } else { "" };
            log::trace!("{}: {}{}", index, token, marker);
        }
    }

    /// Points just past the last token when input runs out.
    fn end_span(&self) -> Span {
        match self.tokens.last() {
            Some(token) => Span::single(token.span().end),
            None => Span::single(0),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn previous(&self) -> Option<&Token> {
        self.current.checked_sub(1).and_then(|index| self.tokens.get(index))
    }

    fn advance(&mut self) {
        if self.current < self.tokens.len() {
            self.current += 1;
        }
    }
}
