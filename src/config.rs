use std::fmt;
use std::str::FromStr;

/// How much the interpreter narrates about its own work.
///
/// `Basic` covers token creation, command dispatch and parse start/end;
/// `Verbose` adds character-level string accumulation and token-stack dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DebugLevel {
    #[default]
    Off,
    Basic,
    Verbose,
}

impl DebugLevel {
    pub fn admits(&self, level: DebugLevel) -> bool {
        level != DebugLevel::Off && *self >= level
    }

    pub fn log_filter(&self) -> log::LevelFilter {
        match self {
            DebugLevel::Off => log::LevelFilter::Warn,
            DebugLevel::Basic => log::LevelFilter::Debug,
            DebugLevel::Verbose => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for DebugLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(DebugLevel::Off),
            "basic" => Ok(DebugLevel::Basic),
            "verbose" => Ok(DebugLevel::Verbose),
            other => Err(format!(
                "Cannot set debug level to '{}'; only off, basic and verbose are valid debug levels",
                other
            )),
        }
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            DebugLevel::Off => "off",
            DebugLevel::Basic => "basic",
            DebugLevel::Verbose => "verbose",
        };
        write!(f, "{}", name)
    }
}

/// Settings handed to each component when it is built.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    pub debug: DebugLevel,
}

impl Config {
    pub fn new(debug: DebugLevel) -> Self {
        Self { debug }
    }

    pub fn basic(&self) -> bool {
        self.debug.admits(DebugLevel::Basic)
    }

    pub fn verbose(&self) -> bool {
        self.debug.admits(DebugLevel::Verbose)
    }
}
