use crate::config::Config;
use crate::runner::report;
use crate::session::Session;
use std::io::{self, BufRead, Write};

/// Interactive loop. The session and its symbol table persist across lines;
/// `exit;` or end of input ends the loop.
pub fn start(config: Config, banner: bool) {
    if banner {
        println!("String Processor v{}", env!("CARGO_PKG_VERSION"));
        println!("Type 'exit;' or press Ctrl+D to quit");
        println!();
    }

    let mut session = Session::new(io::stdout(), config);
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        print!("{}", if session.is_pending() { "… " } else { "> " });
        if let Err(error) = io::stdout().flush() {
            log::warn!("Failed to flush prompt: {}", error);
        }

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                if let Err(error) = session.finish() {
                    report(&error, session.source(), None);
                }
                break;
            }
            Ok(_) => {
                let line = line.trim_end_matches(['\n', '\r']);
                if let Err(error) = session.run_line(line) {
                    report(&error, session.source(), None);
                }
                if !session.is_running() {
                    println!("Goodbye!");
                    break;
                }
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}
