// Session-level tests: statements are lexed, parsed and executed against a
// fresh symbol table, with output captured in memory.

use std::panic::{self, AssertUnwindSafe};
use strp::{
    Command, Config, ErrorKind, Evaluator, Executor, Expression, Lexer, Parser, ParserState,
    Session, StrpError,
};

fn session() -> Session<Vec<u8>> {
    let _ = env_logger::builder().is_test(true).try_init();
    Session::new(Vec::new(), Config::default())
}

fn run(session: &mut Session<Vec<u8>>, line: &str) -> Result<(), StrpError> {
    let result = session.run_line(line);
    assert_eq!(session.parser().state(), ParserState::Ready);
    result
}

fn output(session: &Session<Vec<u8>>) -> String {
    String::from_utf8(session.evaluator().output().clone()).unwrap()
}

fn value(session: &Session<Vec<u8>>, name: &str) -> Option<String> {
    session
        .evaluator()
        .symbols()
        .get(name)
        .ok()
        .map(str::to_string)
}

#[test]
fn set_overwrites_previous_value() {
    let mut s = session();
    run(&mut s, r#"set x "ab"; set x "cd";"#).unwrap();
    assert_eq!(value(&s, "x").as_deref(), Some("cd"));
    assert_eq!(s.evaluator().symbols().len(), 4);
}

#[test]
fn append_concatenates() {
    let mut s = session();
    run(&mut s, r#"set x "ab"; append x "cd"; print x;"#).unwrap();
    assert_eq!(output(&s), "abcd\n");
}

#[test]
fn append_to_undefined_symbol_fails() {
    let mut s = session();
    let err = run(&mut s, r#"append undefined "x";"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UndefinedSymbol);
    assert!(err.message.contains("Cannot append to undefined"));
    assert!(!s.evaluator().symbols().exists("undefined"));
}

#[test]
fn constants_are_readonly() {
    let mut s = session();
    let err = run(&mut s, r#"set SPACE "y";"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReadOnlySymbol);
    assert_eq!(value(&s, "SPACE").as_deref(), Some(" "));

    let err = run(&mut s, r#"append TAB "y";"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReadOnlySymbol);

    let err = run(&mut s, "reverse NEWLINE;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReadOnlySymbol);
    assert_eq!(value(&s, "NEWLINE").as_deref(), Some("\n"));
}

#[test]
fn reverse_moves_trailing_spacing_with_each_word() {
    let mut s = session();
    run(&mut s, r#"set x "The cat sat"; reverse x; print x;"#).unwrap();
    assert_eq!(output(&s), "sat cat The \n");
}

#[test]
fn reverse_of_undefined_symbol_fails() {
    let mut s = session();
    let err = run(&mut s, "reverse ghost;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UndefinedSymbol);
    assert!(err.message.contains("Cannot reverse contents of ghost"));
}

#[test]
fn undefined_term_aborts_set_without_mutation() {
    let mut s = session();
    let err = run(&mut s, r#"set x "a" + "b" + name_sym;"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UndefinedSymbol);
    assert!(err.message.contains("name_sym"));
    assert!(!s.evaluator().symbols().exists("x"));

    run(&mut s, r#"set x "old";"#).unwrap();
    let err = run(&mut s, r#"set x "a" + name_sym;"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UndefinedSymbol);
    assert_eq!(value(&s, "x").as_deref(), Some("old"));

    run(&mut s, r#"set name_sym "c"; set x "a" + "b" + name_sym; print x;"#).unwrap();
    assert_eq!(output(&s), "abc\n");
}

#[test]
fn expressions_concatenate_left_to_right() {
    let mut s = session();
    run(&mut s, r#"set a "1"; set b "2"; print a + SPACE + b + TAB + 'end';"#).unwrap();
    assert_eq!(output(&s), "1 2\tend\n");
}

#[test]
fn dot_joins_words_when_counting() {
    let mut s = session();
    run(&mut s, r#"printwordcount "one two.three";"#).unwrap();
    assert_eq!(output(&s), "Expression provided n=2 words:\n");
}

#[test]
fn printwords_lists_each_word() {
    let mut s = session();
    run(&mut s, r#"set x "hello, big world."; printwords x;"#).unwrap();
    assert_eq!(
        output(&s),
        "Expression provided following words:\nhello\nbig\nworld.\n"
    );
}

#[test]
fn printwords_without_words_still_ends_the_list() {
    let mut s = session();
    run(&mut s, "printwords ' , ';").unwrap();
    assert_eq!(output(&s), "Expression provided following words:\n\n");
}

#[test]
fn print_adds_newline_only_when_missing() {
    let mut s = session();
    run(&mut s, "print NEWLINE; print 'a' + NEWLINE; print '';").unwrap();
    assert_eq!(output(&s), "\na\n\n");
}

#[test]
fn printlength_counts_characters() {
    let mut s = session();
    run(&mut s, r#"printlength "héllo" + TAB;"#).unwrap();
    assert_eq!(output(&s), "6\n");
}

#[test]
fn list_shows_entries_in_insertion_order() {
    let mut s = session();
    run(&mut s, r#"set x "a\tb"; set y 'say "hi"'; list;"#).unwrap();
    assert_eq!(
        output(&s),
        concat!(
            "Symbol table (special chars escaped):\n",
            "SPACE -> \" \" [readonly]\n",
            "TAB -> \"\\t\" [readonly]\n",
            "NEWLINE -> \"\\n\" [readonly]\n",
            "x -> \"a\\tb\" \n",
            "y -> \"say \\\"hi\\\"\" \n",
        )
    );
}

#[test]
fn literal_spanning_lines_completes_without_loss() {
    let mut s = session();
    run(&mut s, r#"set x "unterm"#).unwrap();
    assert!(s.is_pending());
    assert!(!s.evaluator().symbols().exists("x"));

    run(&mut s, r#"inated"; print x;"#).unwrap();
    assert!(!s.is_pending());
    assert_eq!(value(&s, "x").as_deref(), Some("unterminated"));
    assert_eq!(output(&s), "unterminated\n");
}

#[test]
fn unterminated_literal_at_end_of_input_is_reported() {
    let mut s = session();
    run(&mut s, "print 'open").unwrap();
    let err = s.finish().unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnterminatedString);
    assert_eq!(output(&s), "");
}

#[test]
fn earlier_statements_survive_a_later_failure() {
    let mut s = session();
    let err = run(&mut s, r#"set a "1"; set b c; set d "2";"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UndefinedSymbol);
    assert_eq!(value(&s, "a").as_deref(), Some("1"));
    assert!(!s.evaluator().symbols().exists("d"));

    let err = run(&mut s, r#"set e "3"; set f;"#).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parse);
    assert_eq!(value(&s, "e").as_deref(), Some("3"));
}

#[test]
fn errors_do_not_poison_the_session() {
    let mut s = session();
    assert_eq!(run(&mut s, "set x #;").unwrap_err().kind, ErrorKind::Tokenize);
    assert_eq!(run(&mut s, "print;").unwrap_err().kind, ErrorKind::Parse);
    run(&mut s, "set x 'ok'; print x;").unwrap();
    assert_eq!(output(&s), "ok\n");
}

#[test]
fn exit_stops_the_session_after_the_batch() {
    let mut s = session();
    assert!(s.is_running());
    run(&mut s, "exit; print 'still';").unwrap();
    assert!(!s.is_running());
    assert_eq!(output(&s), "still\n");
}

#[test]
fn parse_errors_carry_state_and_position() {
    let mut s = session();
    let err = run(&mut s, "set x 'a' 'b';").unwrap_err();
    let context = err.context.expect("parse errors carry context");
    assert_eq!(context.state, "command(set)");
    assert_eq!(context.command.as_deref(), Some("set"));
    assert_eq!(context.position, 3);
    assert!(err.message.starts_with("Expression error for set command"));
    assert_eq!(err.help.as_deref(), Some("Usage: set <name> <expression>;"));

    let err = run(&mut s, "x;").unwrap_err();
    let context = err.context.unwrap();
    assert_eq!(context.state, "root");
    assert_eq!(context.command, None);
    assert_eq!(context.position, 0);
}

#[test]
fn literal_expressions_evaluate_to_themselves() {
    let evaluator = Evaluator::new(Vec::<u8>::new(), Config::default());
    for text in ["", "plain", "with spaces  ", "tab\there", "ünïcödé", "a.b,c;d"] {
        assert_eq!(evaluator.evaluate(&Expression::literal(text)).unwrap(), text);
    }
}

#[test]
fn sessions_do_not_share_symbols() {
    let mut first = session();
    let mut second = session();
    run(&mut first, "set x 'one';").unwrap();
    run(&mut second, "set x 'two';").unwrap();
    assert_eq!(value(&first, "x").as_deref(), Some("one"));
    assert_eq!(value(&second, "x").as_deref(), Some("two"));
}

struct Exploding;

impl Executor for Exploding {
    fn execute(&mut self, _command: Command) -> Result<(), StrpError> {
        panic!("executor blew up");
    }
}

#[test]
fn interrupted_parser_refuses_once_then_recovers() {
    let tokens = Lexer::new(Config::default()).process("print 'a';").unwrap();
    let mut parser = Parser::new(Config::default());

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let _ = parser.parse(tokens.clone(), &mut Exploding);
    }));
    assert!(outcome.is_err());
    assert_eq!(parser.state(), ParserState::Command(strp::Keyword::Print));

    let err = parser
        .parse(tokens.clone(), &mut Vec::<Command>::new())
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Parse);
    assert!(err.message.contains("already running"));
    assert_eq!(err.context.unwrap().state, "command(print)");
    assert_eq!(parser.state(), ParserState::Ready);

    let mut commands: Vec<Command> = Vec::new();
    parser.parse(tokens, &mut commands).unwrap();
    assert_eq!(commands.len(), 1);
}
