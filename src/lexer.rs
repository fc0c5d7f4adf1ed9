use crate::config::Config;
use crate::error::{Span, StrpError};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    String,
    Name,
    Operator,
    Terminator,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::String => "string",
            TokenKind::Name => "name",
            TokenKind::Operator => "operator",
            TokenKind::Terminator => "terminator",
        }
    }
}

impl FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keyword" => Ok(TokenKind::Keyword),
            "string" => Ok(TokenKind::String),
            "name" => Ok(TokenKind::Name),
            "operator" => Ok(TokenKind::Operator),
            "terminator" => Ok(TokenKind::Terminator),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The commands of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Append,
    List,
    Exit,
    Print,
    PrintLength,
    PrintWords,
    PrintWordCount,
    Set,
    Reverse,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "append" => Some(Keyword::Append),
            "list" => Some(Keyword::List),
            "exit" => Some(Keyword::Exit),
            "print" => Some(Keyword::Print),
            "printlength" => Some(Keyword::PrintLength),
            "printwords" => Some(Keyword::PrintWords),
            "printwordcount" => Some(Keyword::PrintWordCount),
            "set" => Some(Keyword::Set),
            "reverse" => Some(Keyword::Reverse),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Append => "append",
            Keyword::List => "list",
            Keyword::Exit => "exit",
            Keyword::Print => "print",
            Keyword::PrintLength => "printlength",
            Keyword::PrintWords => "printwords",
            Keyword::PrintWordCount => "printwordcount",
            Keyword::Set => "set",
            Keyword::Reverse => "reverse",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lexed token. Fields are only readable once the token exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: String, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// Builds a token from a textual kind tag such as `"name"`.
    pub fn from_tag(tag: &str, text: String, span: Span) -> Result<Self, StrpError> {
        let kind = tag
            .parse::<TokenKind>()
            .map_err(|tag| StrpError::invalid_token_kind(span.clone(), &tag))?;
        Ok(Self::new(kind, text, span))
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword => Keyword::from_word(&self.text),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Token [kind: {}, text: {}]", self.kind, self.text)
    }
}

/// A string literal that has been opened but not yet closed.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialString {
    pub delimiter: char,
    pub escaping: bool,
    pub accumulated: String,
    start: usize,
}

impl PartialString {
    fn open(delimiter: char, start: usize) -> Self {
        Self {
            delimiter,
            escaping: false,
            accumulated: String::new(),
            start,
        }
    }
}

fn escape_char(c: char) -> char {
    match c {
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0B}',
        other => other,
    }
}

/// Names start with an ASCII letter; after that digits and '_' are allowed too.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Line-at-a-time tokenizer.
///
/// Tokens are collected per batch: normally a batch is one line, but while a
/// string literal is left open the batch keeps growing with each following
/// line and nothing is handed out until the literal closes.
pub struct Lexer {
    config: Config,
    line: Vec<char>,
    batch: String,
    batch_len: usize,
    base: usize,
    start: usize,
    current: usize,
    tokens: Vec<Token>,
    partial: Option<PartialString>,
}

impl Lexer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            line: Vec::new(),
            batch: String::new(),
            batch_len: 0,
            base: 0,
            start: 0,
            current: 0,
            tokens: Vec::new(),
            partial: None,
        }
    }

    /// Tokenizes one line of input.
    ///
    /// Returns the tokens of the batch once it is complete. While a string
    /// literal is still open the result is empty and the tokens seen so far
    /// stay with the lexer.
    pub fn process(&mut self, line: &str) -> Result<Vec<Token>, StrpError> {
        if self.partial.is_none() {
            self.batch.clear();
            self.batch_len = 0;
            self.tokens.clear();
        } else {
            self.batch.push('\n');
            self.batch_len += 1;
        }

        if self.config.basic() {
            log::debug!("Beginning tokenization of input: {:?}", line);
        }

        self.base = self.batch_len;
        self.batch.push_str(line);
        self.line = line.chars().collect();
        self.batch_len += self.line.len();
        self.current = 0;

        if let Err(error) = self.scan_line() {
            self.partial = None;
            self.tokens.clear();
            return Err(error);
        }

        if let Some(ref partial) = self.partial {
            if self.config.basic() {
                log::debug!(
                    "String literal still open (delimiter {}), holding {} token(s)",
                    partial.delimiter,
                    self.tokens.len()
                );
            }
            return Ok(Vec::new());
        }

        Ok(std::mem::take(&mut self.tokens))
    }

    /// Source text of the current batch; spans point into it.
    pub fn source(&self) -> &str {
        &self.batch
    }

    pub fn is_pending(&self) -> bool {
        self.partial.is_some()
    }

    pub fn partial(&self) -> Option<&PartialString> {
        self.partial.as_ref()
    }

    /// Called when no more input will arrive. An open literal is an error.
    pub fn finish(&mut self) -> Result<(), StrpError> {
        self.tokens.clear();
        match self.partial.take() {
            Some(partial) => Err(StrpError::unterminated_string(
                Span::new(partial.start, self.batch_len.max(partial.start + 1)),
                partial.delimiter,
            )),
            None => Ok(()),
        }
    }

    fn scan_line(&mut self) -> Result<(), StrpError> {
        while !self.is_at_end() {
            if self.partial.is_some() {
                self.string();
                continue;
            }

            if self.peek().is_some_and(char::is_whitespace) {
                self.advance();
                continue;
            }

            self.start = self.current;
            self.scan_token()?;
        }
        Ok(())
    }

    fn scan_token(&mut self) -> Result<(), StrpError> {
        let c = match self.advance() {
            Some(c) => c,
            None => return Ok(()),
        };

        match c {
            '"' | '\'' => {
                if self.config.basic() {
                    log::debug!("Opening string literal with delimiter {}", c);
                }
                self.partial = Some(PartialString::open(c, self.base + self.start));
            }
            ';' => self.add_token(TokenKind::Terminator),
            '+' => self.add_token(TokenKind::Operator),
            c if c.is_ascii_alphabetic() => self.word(),
            _ => {
                return Err(StrpError::tokenize_error(
                    Span::single(self.base + self.start),
                    format!(
                        "Illegal character '{}' - unable to form a token with this character",
                        c
                    ),
                ));
            }
        }

        Ok(())
    }

    fn word(&mut self) {
        while self.peek().is_some_and(is_name_char) {
            self.advance();
        }

        let text: String = self.line[self.start..self.current].iter().collect();
        let kind = match Keyword::from_word(&text) {
            Some(_) => TokenKind::Keyword,
            None => TokenKind::Name,
        };
        self.add_token_with_content(kind, text);
    }

    fn string(&mut self) {
        let Some(mut partial) = self.partial.take() else {
            return;
        };

        while let Some(c) = self.advance() {
            if self.config.verbose() {
                log::trace!(
                    "String char {:?}, escaping: {}, built so far: {:?}",
                    c,
                    partial.escaping,
                    partial.accumulated
                );
            }

            if partial.escaping {
                partial.accumulated.push(escape_char(c));
                partial.escaping = false;
            } else if c == '\\' {
                partial.escaping = true;
            } else if c == partial.delimiter {
                let end = self.base + self.current;
                self.push_token(Token::new(
                    TokenKind::String,
                    partial.accumulated,
                    Span::new(partial.start, end),
                ));
                return;
            } else {
                partial.accumulated.push(c);
            }
        }

        self.partial = Some(partial);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.line.len()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.line.get(self.current).copied();
        if c.is_some() {
            self.current += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.line.get(self.current).copied()
    }

    fn add_token(&mut self, kind: TokenKind) {
        let text: String = self.line[self.start..self.current].iter().collect();
        self.add_token_with_content(kind, text);
    }

    fn add_token_with_content(&mut self, kind: TokenKind, text: String) {
        let span = Span::new(self.base + self.start, self.base + self.current);
        self.push_token(Token::new(kind, text, span));
    }

    fn push_token(&mut self, token: Token) {
        if self.config.basic() {
            log::debug!("Creating {}", token);
        }
        self.tokens.push(token);
    }
}
