// String Processor Interpreter Library
//
// Lexer, parser and symbol table for a small line-oriented language that
// builds and inspects named string values: `set x "a" + SPACE + y;`.

// Public modules
pub mod ast;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod session;
pub mod symbols;
pub mod text;

// Re-export commonly used items
pub use ast::{Command, Expression, Term};
pub use config::{Config, DebugLevel};
pub use error::{ErrorKind, ParseContext, Span, StrpError};
pub use evaluator::Evaluator;
pub use lexer::{Keyword, Lexer, Token, TokenKind};
pub use parser::{Executor, Parser, ParserState};
pub use session::Session;
pub use symbols::{SymbolEntry, SymbolError, SymbolTable};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;
