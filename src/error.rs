use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

/// Character offsets into the source text of the batch being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A character that cannot start any token.
    Tokenize,
    /// A token was built from an unknown kind tag.
    InvalidTokenKind,
    /// Input ended while a string literal was still open.
    UnterminatedString,
    Parse,
    UndefinedSymbol,
    ReadOnlySymbol,
    Io,
}

impl ErrorKind {
    pub fn category(&self) -> &'static str {
        match self {
            ErrorKind::Tokenize => "Tokenizer Error",
            ErrorKind::InvalidTokenKind => "Token Error",
            ErrorKind::UnterminatedString => "Unterminated String",
            ErrorKind::Parse => "Parse Error",
            ErrorKind::UndefinedSymbol => "Undefined Symbol",
            ErrorKind::ReadOnlySymbol => "Read-only Symbol",
            ErrorKind::Io => "I/O Error",
        }
    }

    fn color(&self) -> Color {
        match self {
            ErrorKind::Tokenize | ErrorKind::InvalidTokenKind | ErrorKind::UnterminatedString => {
                Color::Red
            }
            ErrorKind::Parse => Color::Yellow,
            ErrorKind::UndefinedSymbol | ErrorKind::ReadOnlySymbol => Color::Magenta,
            ErrorKind::Io => Color::Blue,
        }
    }
}

/// Where the parser was when it gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseContext {
    pub state: String,
    pub command: Option<String>,
    pub position: usize,
}

impl fmt::Display for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "state: {}, command: {}, token position: {}",
            self.state,
            self.command.as_deref().unwrap_or("None"),
            self.position
        )
    }
}

#[derive(Debug, Clone)]
pub struct StrpError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
    pub context: Option<ParseContext>,
}

impl StrpError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
            context: None,
        }
    }

    pub fn new_with_help(kind: ErrorKind, span: Span, message: String, help: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: Some(help),
            context: None,
        }
    }

    pub fn tokenize_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::Tokenize, span, message)
    }

    pub fn invalid_token_kind(span: Span, tag: &str) -> Self {
        Self::new_with_help(
            ErrorKind::InvalidTokenKind,
            span,
            format!("Unknown token type '{}' provided", tag),
            "Valid token types are keyword, string, name, operator and terminator.".to_string(),
        )
    }

    pub fn unterminated_string(span: Span, delimiter: char) -> Self {
        Self::new_with_help(
            ErrorKind::UnterminatedString,
            span,
            "Unterminated string".to_string(),
            format!("Close the string literal with a matching {} before the input ends.", delimiter),
        )
    }

    pub fn parse_error(span: Span, message: String, context: ParseContext) -> Self {
        Self {
            context: Some(context),
            ..Self::new(ErrorKind::Parse, span, message)
        }
    }

    pub fn undefined_symbol(span: Span, message: String) -> Self {
        Self::new(ErrorKind::UndefinedSymbol, span, message)
    }

    pub fn read_only_symbol(span: Span, message: String) -> Self {
        Self::new_with_help(
            ErrorKind::ReadOnlySymbol,
            span,
            message,
            "SPACE, TAB and NEWLINE are constants; copy them into a new symbol instead.".to_string(),
        )
    }

    pub fn io_error(span: Span, error: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, span, format!("Failed to write output: {}", error))
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    pub fn report(&self, source: &str, filename: Option<&str>) -> std::io::Result<()> {
        let filename = filename.unwrap_or("<repl>");
        let color = self.kind.color();

        let mut report_builder = Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(format!("{}: {}", self.kind.category().fg(color), self.message))
            .with_label(
                Label::new((filename, self.span.start..self.span.end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref context) = self.context {
            report_builder = report_builder.with_note(format!("{}", context));
        }

        if let Some(ref help_text) = self.help {
            report_builder = report_builder.with_help(format!("{}", help_text.as_str().fg(Color::Cyan)));
        }

        report_builder
            .finish()
            .print((filename, Source::from(source)))
    }
}

impl fmt::Display for StrpError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StrpError {}
