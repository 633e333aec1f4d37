//! Application configuration, constructed once at startup from the
//! environment (after the secrets file has been loaded) and passed by
//! reference into the components that need it.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

const DEFAULT_DOCUMENTS_DIR: &str = "docs";
const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub documents_dir: PathBuf,
    pub chat_model: String,
    pub top_k: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("GEMINI_API_KEY not found"))?;

        let documents_dir = lookup("DOCUMENTS_DIR")
            .unwrap_or_else(|| DEFAULT_DOCUMENTS_DIR.to_string())
            .into();

        let chat_model =
            lookup("GEMINI_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());

        let top_k = match lookup("RAG_TOP_K") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|k| *k > 0)
                .with_context(|| format!("RAG_TOP_K must be a positive integer, got '{raw}'"))?,
            None => DEFAULT_TOP_K,
        };

        Ok(Self {
            gemini_api_key,
            documents_dir,
            chat_model,
            top_k,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let result = AppConfig::from_lookup(lookup_from(&[]));
        assert!(result.is_err());
    }

    #[test]
    fn blank_api_key_is_an_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "   ")]));
        assert!(result.is_err());
    }

    #[test]
    fn defaults_apply_when_only_the_key_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[("GEMINI_API_KEY", "k-123")])).unwrap();
        assert_eq!(config.gemini_api_key, "k-123");
        assert_eq!(config.documents_dir, PathBuf::from("docs"));
        assert_eq!(config.chat_model, "gemini-2.5-flash");
        assert_eq!(config.top_k, 5);
    }

    #[test]
    fn explicit_values_override_the_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "k-123"),
            ("DOCUMENTS_DIR", "papers"),
            ("GEMINI_CHAT_MODEL", "gemini-2.5-pro"),
            ("RAG_TOP_K", "8"),
        ]))
        .unwrap();
        assert_eq!(config.documents_dir, PathBuf::from("papers"));
        assert_eq!(config.chat_model, "gemini-2.5-pro");
        assert_eq!(config.top_k, 8);
    }

    #[test]
    fn non_numeric_or_zero_top_k_is_rejected() {
        for bad in ["zero", "0", "-3"] {
            let result = AppConfig::from_lookup(lookup_from(&[
                ("GEMINI_API_KEY", "k-123"),
                ("RAG_TOP_K", bad),
            ]));
            assert!(result.is_err(), "RAG_TOP_K='{bad}' should be rejected");
        }
    }
}
