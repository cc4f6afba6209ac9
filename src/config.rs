//! Configuration management for ktx_portal
//!
//! Layers, lowest precedence first: built-in defaults, an optional `ktx.toml`
//! (or the file named by `KTX_CONFIG_FILE`), then `KTX_*` environment
//! variables.

use crate::auth::password::validator::{LetterRule, PasswordRules};
use crate::types::{ApiError, AppConfig};
use config::{Config, Environment, File};
use std::env;

const ENV_PREFIX: &str = "KTX";
const DEFAULT_CONFIG_FILE: &str = "ktx";

/// Load complete client configuration
pub fn load_config() -> Result<AppConfig, ApiError> {
    let defaults = AppConfig::default();

    let file = match env::var("KTX_CONFIG_FILE") {
        Ok(path) => File::with_name(&path).required(true),
        Err(_) => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings = Config::builder()
        .set_default("api_base_url", defaults.api_base_url)
        .and_then(|b| b.set_default("request_timeout_secs", defaults.request_timeout_secs as i64))
        .and_then(|b| b.set_default("session_file", defaults.session_file.to_string_lossy().to_string()))
        .and_then(|b| b.set_default("letter_rule", letter_rule_name(defaults.letter_rule)))
        .and_then(|b| b.set_default("min_password_length", defaults.min_password_length as i64))
        .and_then(|b| b.set_default("require_confirmation", defaults.require_confirmation))
        .and_then(|b| b.set_default("log_level", defaults.log_level))
        .map_err(config_error)?
        .add_source(file)
        .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .build()
        .map_err(config_error)?;

    let config: AppConfig = settings.try_deserialize().map_err(config_error)?;
    validate_config(&config)?;
    Ok(config)
}

fn config_error(error: config::ConfigError) -> ApiError {
    ApiError::Config(error.to_string())
}

fn letter_rule_name(rule: LetterRule) -> &'static str {
    match rule {
        LetterRule::UpperAndLower => "upper_and_lower",
        LetterRule::AnyLetter => "any_letter",
    }
}

/// Password rules selected by the configuration
pub fn password_rules(config: &AppConfig) -> PasswordRules {
    PasswordRules::new(config.min_password_length, config.letter_rule)
}

pub fn validate_config(config: &AppConfig) -> Result<(), ApiError> {
    let url = config.api_base_url.trim();
    if url.is_empty() {
        return Err(ApiError::Config("API base URL can't be empty".to_string()));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ApiError::Config(format!("API base URL must be http(s): {}", url)));
    }
    if config.request_timeout_secs == 0 {
        return Err(ApiError::Config("Request timeout must be at least 1 second".to_string()));
    }
    if config.min_password_length == 0 {
        return Err(ApiError::Config("Minimum password length must be positive".to_string()));
    }
    Ok(())
}
