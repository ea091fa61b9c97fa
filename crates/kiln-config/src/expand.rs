//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in `value`.
///
/// `field` names the config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_passes_through() {
        assert_eq!(
            expand_env("https://example.com/", "site.url").unwrap(),
            "https://example.com/"
        );
    }

    #[test]
    fn test_default_used_when_unset() {
        let value = expand_env("${KILN_EXPAND_UNSET_VAR:-https://fallback.dev/}", "site.url");
        assert_eq!(value.unwrap(), "https://fallback.dev/");
    }

    #[test]
    fn test_missing_var_names_field() {
        let err = expand_env("${KILN_EXPAND_MISSING_VAR}", "site.url").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("site.url"));
        assert!(message.contains("KILN_EXPAND_MISSING_VAR"));
    }
}
