use clap::{Arg, Command};
use std::fs;
use std::path::Path;
use strp::{Config, DebugLevel};

fn main() {
    let matches = Command::new("strp")
        .about("An interpreter for a small line-oriented string processing language")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("file")
                .help("The script file to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Debug output written to stderr")
                .value_name("LEVEL")
                .value_parser(clap::value_parser!(DebugLevel))
                .default_value("off"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Do not print the REPL banner")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let debug = matches
        .get_one::<DebugLevel>("debug")
        .copied()
        .unwrap_or_default();
    init_logging(debug);
    let config = Config::new(debug);

    match matches.get_one::<String>("file") {
        Some(file_path) if !matches.get_flag("interactive") => run_file(file_path, config),
        _ => strp::start_repl(config, !matches.get_flag("quiet")),
    }
}

/// RUST_LOG, when set, takes precedence over `--debug`.
fn init_logging(debug: DebugLevel) {
    env_logger::Builder::new()
        .filter_level(debug.log_filter())
        .parse_default_env()
        .init();
}

fn run_file(path: &str, config: Config) {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        std::process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            let filename = path.display().to_string();
            if strp::run(&source, Some(&filename), config) > 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
