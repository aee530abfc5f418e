//! Environment variable parsing utilities.
//!
//! Credentials, endpoints and timeouts are all read from the process
//! environment. These helpers keep that parsing in one place:
//!
//! ```
//! use gads_types::env_utils::{env_bool, env_nonempty, env_var_or};
//!
//! let timeout: u64 = env_var_or("GADS_HTTP_TIMEOUT_SECS", 60);
//! let version = env_nonempty("GOOGLE_ADS_API_VERSION").unwrap_or_else(|| "v19".into());
//! let logging_off = env_bool("GADS_LOG_DISABLED");
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable with a default value.
///
/// ```
/// use gads_types::env_utils::env_var_or;
///
/// let rotation_mb: u64 = env_var_or("GADS_LOG_ROTATION_MB", 50);
/// assert!(rotation_mb > 0);
/// ```
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// Read a string variable, treating blank values as unset.
pub fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Check if an environment variable is set to a truthy value.
///
/// Returns `true` for "1", "true", "yes" or "on" (case-insensitive).
pub fn env_bool(key: &str) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parses_and_defaults() {
        std::env::set_var("GADS_TEST_ENV_U64", " 42 ");
        assert_eq!(env_var::<u64>("GADS_TEST_ENV_U64"), Some(42));
        assert_eq!(env_var_or::<u64>("GADS_TEST_ENV_MISSING", 7), 7);
        std::env::remove_var("GADS_TEST_ENV_U64");
    }

    #[test]
    fn test_env_nonempty_ignores_blank() {
        std::env::set_var("GADS_TEST_ENV_BLANK", "   ");
        assert_eq!(env_nonempty("GADS_TEST_ENV_BLANK"), None);
        std::env::set_var("GADS_TEST_ENV_BLANK", " abc ");
        assert_eq!(env_nonempty("GADS_TEST_ENV_BLANK").as_deref(), Some("abc"));
        std::env::remove_var("GADS_TEST_ENV_BLANK");
    }

    #[test]
    fn test_env_bool() {
        std::env::set_var("GADS_TEST_ENV_BOOL", "Yes");
        assert!(env_bool("GADS_TEST_ENV_BOOL"));
        std::env::set_var("GADS_TEST_ENV_BOOL", "0");
        assert!(!env_bool("GADS_TEST_ENV_BOOL"));
        std::env::remove_var("GADS_TEST_ENV_BOOL");
    }
}
