use crate::error::Span;
use crate::lexer::{Keyword, Token, TokenKind};

/// One operand of an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Literal text from a string token.
    Literal { text: String, span: Span },
    /// Reference to a symbol, resolved when the expression is evaluated.
    Symbol { name: String, span: Span },
}

impl Term {
    /// Only string and name tokens can become terms.
    pub fn from_token(token: &Token) -> Option<Self> {
        match token.kind() {
            TokenKind::String => Some(Term::Literal {
                text: token.text().to_string(),
                span: token.span().clone(),
            }),
            TokenKind::Name => Some(Term::Symbol {
                name: token.text().to_string(),
                span: token.span().clone(),
            }),
            _ => None,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Term::Literal { span, .. } => span,
            Term::Symbol { span, .. } => span,
        }
    }
}

/// Terms joined by `+`, concatenated left to right.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
    pub terms: Vec<Term>,
}

impl Expression {
    pub fn new(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn literal(text: &str) -> Self {
        Self::new(vec![Term::Literal {
            text: text.to_string(),
            span: Span::single(0),
        }])
    }
}

/// A fully parsed statement, ready to run.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Append {
        name: String,
        expr: Expression,
        span: Span,
    },
    Set {
        name: String,
        expr: Expression,
        span: Span,
    },
    Reverse {
        name: String,
        span: Span,
    },
    Print {
        expr: Expression,
        span: Span,
    },
    PrintLength {
        expr: Expression,
        span: Span,
    },
    PrintWords {
        expr: Expression,
        span: Span,
    },
    PrintWordCount {
        expr: Expression,
        span: Span,
    },
    List {
        span: Span,
    },
    Exit {
        span: Span,
    },
}

impl Command {
    pub fn keyword(&self) -> Keyword {
        match self {
            Command::Append { .. } => Keyword::Append,
            Command::Set { .. } => Keyword::Set,
            Command::Reverse { .. } => Keyword::Reverse,
            Command::Print { .. } => Keyword::Print,
            Command::PrintLength { .. } => Keyword::PrintLength,
            Command::PrintWords { .. } => Keyword::PrintWords,
            Command::PrintWordCount { .. } => Keyword::PrintWordCount,
            Command::List { .. } => Keyword::List,
            Command::Exit { .. } => Keyword::Exit,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Command::Append { span, .. } => span,
            Command::Set { span, .. } => span,
            Command::Reverse { span, .. } => span,
            Command::Print { span, .. } => span,
            Command::PrintLength { span, .. } => span,
            Command::PrintWords { span, .. } => span,
            Command::PrintWordCount { span, .. } => span,
            Command::List { span } => span,
            Command::Exit { span } => span,
        }
    }
}
