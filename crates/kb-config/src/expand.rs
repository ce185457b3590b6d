//! `${VAR}` and `${VAR:-default}` expansion for string settings.

use crate::ConfigError;

/// Variable referenced by a setting but absent from the environment.
struct UnsetVar(String);

/// Expand `${VAR}` references in `value`.
///
/// `${VAR:-default}` falls back to `default` when `VAR` is unset; a bare
/// `${VAR}` that is unset is an error naming `field`. Values without `${`
/// are returned untouched, so a lone `$` is never interpreted.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| {
        std::env::var(name)
            .map(Some)
            .map_err(|_| UnsetVar(name.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("KB_EXPAND_SET", "0.0.0.0");
        }

        assert_eq!(expand_env("${KB_EXPAND_SET}", "server.host").unwrap(), "0.0.0.0");
        assert_eq!(
            expand_env("${KB_EXPAND_SET:-127.0.0.1}", "server.host").unwrap(),
            "0.0.0.0"
        );

        unsafe {
            std::env::remove_var("KB_EXPAND_SET");
        }
    }

    #[test]
    fn test_expand_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("KB_EXPAND_UNSET");
        }

        assert_eq!(
            expand_env("${KB_EXPAND_UNSET:-data}/subjects", "content.data_dir").unwrap(),
            "data/subjects"
        );
    }

    #[test]
    fn test_expand_unset_is_error() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("KB_EXPAND_MISSING");
        }

        let err = expand_env("${KB_EXPAND_MISSING}", "store.dir").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "Environment variable error in store.dir: ${KB_EXPAND_MISSING} not set"
        );
    }

    #[test]
    fn test_values_without_braces_untouched() {
        assert_eq!(expand_env("plain", "server.host").unwrap(), "plain");
        assert_eq!(expand_env("$HOME/data", "content.data_dir").unwrap(), "$HOME/data");
    }
}
