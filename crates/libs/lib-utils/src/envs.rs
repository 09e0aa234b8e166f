//! # Environment Variables
//!
//! Utilities for reading and parsing environment variables.

use std::env;
use std::str::FromStr;

/// Get an environment variable, treating unset and blank the same.
pub fn get_env_opt(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable or a default.
pub fn get_env_or(name: &'static str, default: &str) -> String {
    get_env_opt(name).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, using `default` when it is unset.
/// A value that is set but malformed is still an error.
pub fn get_env_parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, Error> {
    match get_env_opt(name) {
        Some(val) => val.trim().parse::<T>().map_err(|_| Error::WrongFormat(name)),
        None => Ok(default),
    }
}

// region:    --- Error
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    WrongFormat(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::WrongFormat(name) => write!(fmt, "{name} has an invalid format"),
        }
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable name; the process environment is shared.

    #[test]
    fn test_get_env_parse_or_default_when_unset() {
        env::remove_var("LIB_UTILS_TEST_UNSET");
        assert_eq!(get_env_parse_or("LIB_UTILS_TEST_UNSET", 30u64), Ok(30));
    }

    #[test]
    fn test_get_env_parse_or_rejects_malformed() {
        env::set_var("LIB_UTILS_TEST_MALFORMED", "thirty");
        assert_eq!(
            get_env_parse_or("LIB_UTILS_TEST_MALFORMED", 30u64),
            Err(Error::WrongFormat("LIB_UTILS_TEST_MALFORMED"))
        );
    }

    #[test]
    fn test_blank_is_unset() {
        env::set_var("LIB_UTILS_TEST_BLANK", "   ");
        assert_eq!(get_env_opt("LIB_UTILS_TEST_BLANK"), None);
        assert_eq!(get_env_or("LIB_UTILS_TEST_BLANK", "fallback"), "fallback");
    }
}
