//! `${VAR}` and `${VAR:-default}` references in `rr.toml` string values.

use std::env::VarError;

use crate::ConfigError;

/// Resolve the variable references in `value`, naming `field` on failure.
///
/// Values without `${` are returned as they are, so a cache path such as
/// `build/$digests.json` is never touched.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    match shellexpand::env_with_context(value, lookup_var) {
        Ok(expanded) => Ok(expanded.into_owned()),
        Err(e) => {
            let reason = match e.cause {
                VarError::NotPresent => "not set",
                VarError::NotUnicode(_) => "not valid UTF-8",
            };
            Err(ConfigError::EnvVar {
                field: field.to_owned(),
                message: format!("${{{}}} {reason}", e.var_name),
            })
        }
    }
}

/// Look up `name` in the process environment; unset is an error.
fn lookup_var(name: &str) -> Result<Option<String>, VarError> {
    std::env::var(name).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_expand_whole_value() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("RR_TEST_RENDER_HOST", "rr.internal");
        }
        let result = expand_env("https://${RR_TEST_RENDER_HOST}/rr/ui", "render.url").unwrap();
        assert_eq!(result, "https://rr.internal/rr/ui");
        unsafe {
            std::env::remove_var("RR_TEST_RENDER_HOST");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("RR_TEST_UNSET_URL");
        }
        let result = expand_env("${RR_TEST_UNSET_URL:-http://localhost:8080/rr/ui}", "render.url")
            .unwrap();
        assert_eq!(result, "http://localhost:8080/rr/ui");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("RR_TEST_MISSING");
        }
        let err = expand_env("${RR_TEST_MISSING}", "cache.path").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("RR_TEST_MISSING"));
        assert!(err.to_string().contains("cache.path"));
    }

    #[test]
    fn test_expand_missing_var_message() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("RR_TEST_MISSING_HOST");
        }
        let err = expand_env("https://${RR_TEST_MISSING_HOST}/rr/ui", "render.url").unwrap_err();

        let ConfigError::EnvVar { field, message } = err else {
            panic!("expected EnvVar error");
        };
        assert_eq!(field, "render.url");
        assert_eq!(message, "${RR_TEST_MISSING_HOST} not set");
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("build/$digests.json", "cache.path").unwrap();
        assert_eq!(result, "build/$digests.json");
    }
}
