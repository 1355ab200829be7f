//! Embedded exception lists with caching

use std::collections::HashMap;
use std::sync::OnceLock;

use log::warn;

use super::types::ExceptionConfig;
use crate::error::{EngineError, Result};

static EMBEDDED: OnceLock<HashMap<String, ExceptionConfig>> = OnceLock::new();

/// Language names accepted in place of codes
const ALIASES: &[(&str, &str)] = &[("english", "en")];

macro_rules! embed_exception_config {
    ($code:expr, $path:expr) => {
        ($code, include_str!($path))
    };
}

fn load_embedded_configs() -> HashMap<String, ExceptionConfig> {
    let mut configs = HashMap::new();

    let embedded = [embed_exception_config!(
        "en",
        "../../configs/exceptions/english.toml"
    )];

    for (code, content) in embedded {
        match load_embedded_config(code, content) {
            Ok(config) => {
                configs.insert(code.to_string(), config);
            }
            Err(e) => {
                warn!("failed to load embedded {code} exception list: {e}");
            }
        }
    }

    configs
}

fn load_embedded_config(code: &str, content: &str) -> Result<ExceptionConfig> {
    let config = ExceptionConfig::from_toml_str(content)?;
    if config.metadata.code != code {
        return Err(EngineError::InvalidConfig(format!(
            "config code mismatch: expected {}, got {}",
            code, config.metadata.code
        )));
    }
    Ok(config)
}

/// Embedded exception list for a language code or name (`"en"`, `"english"`)
pub fn get_exception_config(code: &str) -> Result<&'static ExceptionConfig> {
    let configs = EMBEDDED.get_or_init(load_embedded_configs);
    let lowered = code.to_ascii_lowercase();
    let key = ALIASES
        .iter()
        .find(|&&(alias, _)| alias == lowered)
        .map_or(lowered.as_str(), |&(_, code)| code);
    configs
        .get(key)
        .ok_or_else(|| EngineError::UnsupportedLanguage {
            code: code.to_string(),
        })
}

/// Codes of the embedded exception lists, sorted
pub fn list_available_languages() -> Vec<&'static str> {
    let configs = EMBEDDED.get_or_init(load_embedded_configs);
    let mut codes: Vec<&'static str> = configs.keys().map(String::as_str).collect();
    codes.sort_unstable();
    codes
}
