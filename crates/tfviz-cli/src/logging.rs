//! Logger setup for the CLI.
//!
//! Every record is printed with a severity tag (`[ERROR]`, `[WARNING]`,
//! `[INFO]`, `[VERBOSE]`, `[TRACE]`) followed by the message and its
//! structured key/values.

use std::{
    fmt::Write as _,
    io::{self, Write},
};

use env_logger::{Builder, Env};
use log::{
    Level, LevelFilter, Record,
    kv::{self, Key, Value, VisitSource},
};

/// Tag printed in front of records of `level`.
pub fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "[ERROR]",
        Level::Warn => "[WARNING]",
        Level::Info => "[INFO]",
        Level::Debug => "[VERBOSE]",
        Level::Trace => "[TRACE]",
    }
}

/// Installs the global logger at `level`.
pub fn init(level: LevelFilter) {
    Builder::from_env(Env::default())
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}", format_record(record)))
        .init();
}

fn format_record(record: &Record<'_>) -> String {
    let mut line = format!("{} {}", level_tag(record.level()), record.args());
    let mut visitor = KeyValues(&mut line);
    // Writing into a String cannot fail.
    let _ = record.key_values().visit(&mut visitor);
    line
}

/// Appends ` key=value` pairs to a line.
struct KeyValues<'a>(&'a mut String);

impl<'kvs> VisitSource<'kvs> for KeyValues<'_> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), kv::Error> {
        write!(self.0, " {key}={value}").map_err(|_| kv::Error::msg("formatting failed"))
    }
}

/// Parses a `--log-level` value, raised to debug in verbose mode.
///
/// # Errors
///
/// Returns an error naming the value if it is not a level.
pub fn resolve_level(log_level: &str, verbose: bool) -> io::Result<LevelFilter> {
    let level = log_level.parse::<LevelFilter>().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid log level `{log_level}`"),
        )
    })?;
    if verbose && level < LevelFilter::Debug {
        Ok(LevelFilter::Debug)
    } else {
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_tags() {
        assert_eq!(level_tag(Level::Warn), "[WARNING]");
        assert_eq!(level_tag(Level::Debug), "[VERBOSE]");
    }

    #[test]
    fn test_format_record_with_key_values() {
        let kvs = [("path", "main.tf")];
        let line = format_record(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("Loading module"))
                .key_values(&kvs)
                .build(),
        );

        assert_eq!(line, "[INFO] Loading module path=main.tf");
    }

    #[test]
    fn test_resolve_level() {
        assert_eq!(resolve_level("info", false).unwrap(), LevelFilter::Info);
        assert_eq!(resolve_level("info", true).unwrap(), LevelFilter::Debug);
        assert_eq!(resolve_level("trace", true).unwrap(), LevelFilter::Trace);
        assert!(resolve_level("loud", false).is_err());
    }
}
