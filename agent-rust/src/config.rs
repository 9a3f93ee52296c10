use crate::{
    preview::{is_valid_entry_point, PreviewOptions},
    ConfigError, ProviderModelFactory,
};
use axum::http::HeaderValue;
use std::{env, net::SocketAddr, str::FromStr, time::Duration};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_APP_URL: &str = "http://localhost:3000";

/// Server settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlimpseConfig {
    pub addr: SocketAddr,
    /// Origin allowed by the CORS layer.
    pub app_origin: HeaderValue,
    pub preview: PreviewOptions,
    pub openai_base_url: Option<String>,
    pub groq_base_url: Option<String>,
    pub google_base_url: Option<String>,
}

impl GlimpseConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PreviewOptions::default();

        let addr = parse_or(&lookup, "GLIMPSE_ADDR", || DEFAULT_ADDR.parse())?;
        let app_url = lookup("APP_URL").unwrap_or_else(|| DEFAULT_APP_URL.to_string());
        let app_origin = HeaderValue::from_str(&app_url).map_err(|_| ConfigError::Invalid {
            key: "APP_URL",
            value: app_url.clone(),
        })?;

        let width = parse_or(&lookup, "PREVIEW_WIDTH", || Ok(defaults.width))?;
        let height = parse_or(&lookup, "PREVIEW_HEIGHT", || Ok(defaults.height))?;
        let load_timeout_ms = parse_or(&lookup, "SKETCH_LOAD_TIMEOUT_MS", || {
            Ok(u64::try_from(defaults.load_timeout.as_millis()).unwrap_or(u64::MAX))
        })?;
        let entry_point = lookup("REACT_ENTRY_POINT").unwrap_or(defaults.entry_point);
        if !is_valid_entry_point(&entry_point) {
            return Err(ConfigError::Invalid {
                key: "REACT_ENTRY_POINT",
                value: entry_point,
            });
        }

        Ok(Self {
            addr,
            app_origin,
            preview: PreviewOptions {
                width,
                height,
                load_timeout: Duration::from_millis(load_timeout_ms),
                entry_point,
                running: defaults.running,
            },
            openai_base_url: lookup("OPENAI_BASE_URL"),
            groq_base_url: lookup("GROQ_BASE_URL"),
            google_base_url: lookup("GOOGLE_BASE_URL"),
        })
    }

    #[must_use]
    pub fn model_factory(&self) -> ProviderModelFactory {
        ProviderModelFactory {
            openai_base_url: self.openai_base_url.clone(),
            groq_base_url: self.groq_base_url.clone(),
            google_base_url: self.google_base_url.clone(),
        }
    }
}

fn parse_or<F, T, D>(lookup: &F, key: &'static str, default: D) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    D: FnOnce() -> Result<T, T::Err>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => default().map_err(|_| ConfigError::Invalid {
            key,
            value: String::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<GlimpseConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        GlimpseConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.app_origin, "http://localhost:3000");
        assert_eq!(config.preview, PreviewOptions::default());
        assert!(config.model_factory().openai_base_url.is_none());
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("GLIMPSE_ADDR", "0.0.0.0:8080"),
            ("APP_URL", "https://glimpse.example"),
            ("PREVIEW_WIDTH", "640"),
            ("PREVIEW_HEIGHT", "480"),
            ("SKETCH_LOAD_TIMEOUT_MS", "1200"),
            ("REACT_ENTRY_POINT", "Main"),
            ("GOOGLE_BASE_URL", "http://127.0.0.1:9000/v1beta"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_origin, "https://glimpse.example");
        assert_eq!(config.preview.width, 640);
        assert_eq!(config.preview.height, 480);
        assert_eq!(config.preview.load_timeout, Duration::from_millis(1200));
        assert_eq!(config.preview.entry_point, "Main");
        assert_eq!(
            config.model_factory().google_base_url.as_deref(),
            Some("http://127.0.0.1:9000/v1beta")
        );
    }

    #[test]
    fn unparsable_values_name_the_key() {
        let err = config_from(&[("PREVIEW_WIDTH", "wide")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { key: "PREVIEW_WIDTH", ref value } if value == "wide"
        ));
        assert_eq!(err.to_string(), "Invalid value \"wide\" for PREVIEW_WIDTH");
    }

    #[test]
    fn entry_point_must_be_an_identifier() {
        let err = config_from(&[("REACT_ENTRY_POINT", "my-app")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { key: "REACT_ENTRY_POINT", ref value } if value == "my-app"
        ));
    }
}
