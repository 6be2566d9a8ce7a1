use std::fmt;

use stash_util::{find_exact, CaseSensitivity};

/// Severity of a log message, from most to least severe.
///
/// Ordering follows verbosity: `Error < Warn < Info < Debug`. A target at
/// level `Info` accepts every message whose level is `<= Info`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::Error, Level::Warn, Level::Info, Level::Debug];

    const NAMES: [&'static str; 4] = ["error", "warn", "info", "debug"];

    /// Parse a level name, ignoring case. Unknown names fall back to `Info`.
    pub fn parse(name: &str) -> Self {
        find_exact(&Self::NAMES, name.trim(), CaseSensitivity::Insensitive)
            .map(|i| Self::ALL[i])
            .unwrap_or(Level::Info)
    }

    /// Upper-case label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
        }
    }

    /// Map a `tracing` level. `TRACE` has no counterpart.
    pub fn from_tracing(level: &tracing::Level) -> Option<Self> {
        if *level == tracing::Level::ERROR {
            Some(Level::Error)
        } else if *level == tracing::Level::WARN {
            Some(Level::Warn)
        } else if *level == tracing::Level::INFO {
            Some(Level::Info)
        } else if *level == tracing::Level::DEBUG {
            Some(Level::Debug)
        } else {
            None
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::NAMES[*self as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_case() {
        assert_eq!(Level::parse("error"), Level::Error);
        assert_eq!(Level::parse("WARN"), Level::Warn);
        assert_eq!(Level::parse("Info"), Level::Info);
        assert_eq!(Level::parse(" debug "), Level::Debug);
    }

    #[test]
    fn unknown_names_fall_back_to_info() {
        assert_eq!(Level::parse("verbose"), Level::Info);
        assert_eq!(Level::parse(""), Level::Info);
    }

    #[test]
    fn ordering_follows_verbosity() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Warn < Level::Info);
        assert!(Level::Info < Level::Debug);
    }

    #[test]
    fn display_round_trips_through_parse() {
        for level in Level::ALL {
            assert_eq!(Level::parse(&level.to_string()), level);
        }
    }

    #[test]
    fn tracing_levels_map() {
        assert_eq!(Level::from_tracing(&tracing::Level::WARN), Some(Level::Warn));
        assert_eq!(Level::from_tracing(&tracing::Level::TRACE), None);
    }
}
