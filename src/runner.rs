use crate::config::Config;
use crate::error::StrpError;
use crate::session::Session;
use std::io::{self, Write};

/// Runs a script line by line, reporting errors and carrying on.
/// Stops early on `exit;`. Returns how many errors were reported.
pub fn run(source: &str, filename: Option<&str>, config: Config) -> usize {
    let mut session = Session::new(io::stdout(), config);
    let mut errors = 0;

    for line in source.lines() {
        if let Err(error) = session.run_line(line) {
            errors += 1;
            report(&error, session.source(), filename);
        }
        if !session.is_running() {
            break;
        }
    }

    if let Err(error) = session.finish() {
        errors += 1;
        report(&error, session.source(), filename);
    }

    let mut out = session.into_output();
    if let Err(error) = out.flush() {
        log::warn!("Failed to flush output: {}", error);
    }
    errors
}

pub(crate) fn report(error: &StrpError, source: &str, filename: Option<&str>) {
    if let Err(io_error) = error.report(source, filename) {
        log::warn!("Failed to render error report ({}): {}", io_error, error);
    }
}
