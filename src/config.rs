//! Runtime settings for the hierchat binaries.
//!
//! Precedence: command-line flag, then environment variable, then default.
//! Unparseable values are ignored rather than fatal.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/sales_stores_hierarchy_merged.parquet";
pub const DEFAULT_HTTP_PORT: u16 = 7878;

pub const ENV_DATA_PATH: &str = "HIERCHAT_DATA_PATH";
pub const ENV_HTTP_PORT: &str = "HIERCHAT_HTTP_PORT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub http_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self { data_path: PathBuf::from(DEFAULT_DATA_PATH), http_port: DEFAULT_HTTP_PORT }
    }
}

impl Settings {
    /// Resolve settings from the process environment and the given arguments
    /// (program name already stripped).
    pub fn from_env_and_args(args: &[String]) -> Self {
        Self::resolve(args, |name| env::var(name).ok())
    }

    /// Same as [`Settings::from_env_and_args`] with an injectable environment lookup.
    pub fn resolve<F>(args: &[String], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();
        let data_path = parse_value_arg(args, "--data")
            .or_else(|| lookup(ENV_DATA_PATH).filter(|v| !v.trim().is_empty()))
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let http_port = parse_port_arg(args, "--port")
            .or_else(|| lookup(ENV_HTTP_PORT).and_then(|v| v.trim().parse::<u16>().ok()))
            .unwrap_or(defaults.http_port);
        Self { data_path, http_port }
    }
}

pub fn parse_value_arg(args: &[String], flag: &str) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}

pub fn parse_port_arg(args: &[String], flag: &str) -> Option<u16> {
    parse_value_arg(args, flag).and_then(|v| v.parse::<u16>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> { v.iter().map(|s| s.to_string()).collect() }

    #[test]
    fn defaults_when_nothing_set() {
        let s = Settings::resolve(&[], |_| None);
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn env_overrides_defaults() {
        let s = Settings::resolve(&[], |name| match name {
            ENV_DATA_PATH => Some("/srv/data.parquet".into()),
            ENV_HTTP_PORT => Some("9000".into()),
            _ => None,
        });
        assert_eq!(s.data_path, PathBuf::from("/srv/data.parquet"));
        assert_eq!(s.http_port, 9000);
    }

    #[test]
    fn flags_override_env_and_bad_values_fall_back() {
        let s = Settings::resolve(&args(&["--port", "8080", "--data", "x.parquet"]), |name| match name {
            ENV_HTTP_PORT => Some("9000".into()),
            _ => None,
        });
        assert_eq!(s.http_port, 8080);
        assert_eq!(s.data_path, PathBuf::from("x.parquet"));

        let s = Settings::resolve(&args(&["--port", "notaport"]), |name| match name {
            ENV_HTTP_PORT => Some("99999".into()),
            _ => None,
        });
        assert_eq!(s.http_port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn flag_without_value_is_ignored() {
        let a = args(&["--port", "8080", "--data"]);
        assert_eq!(parse_value_arg(&a, "--data"), None);
        let s = Settings::resolve(&a, |name| match name {
            ENV_DATA_PATH => Some("/srv/env.parquet".into()),
            _ => None,
        });
        assert_eq!(s.data_path, PathBuf::from("/srv/env.parquet"));
    }
}
