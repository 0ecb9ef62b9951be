use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINT_URL: &str = "https://script.google.com/macros/s/AKfycbyWWTmP4gC3Xa4pc59hH1tCzy3PGMuQ-c66mbzAmgd9LpZcCNSmtYdi5hwGqFEqetpgvA/exec";
pub const DEFAULT_AGE_MIN: u32 = 10;
pub const DEFAULT_AGE_MAX: u32 = 18;
pub const SETTINGS_FILE: &str = "enrollment.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub endpoint_url: String,
    pub age_min: u32,
    pub age_max: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.into(),
            age_min: DEFAULT_AGE_MIN,
            age_max: DEFAULT_AGE_MAX,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid endpoint url '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("age range is empty: min {min} > max {max}")]
    InvertedAgeRange { min: u32, max: u32 },
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let parsed = Url::parse(&self.endpoint_url).map_err(|err| SettingsError::InvalidEndpoint {
            url: self.endpoint_url.clone(),
            reason: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SettingsError::InvalidEndpoint {
                url: self.endpoint_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        if self.age_min > self.age_max {
            return Err(SettingsError::InvertedAgeRange {
                min: self.age_min,
                max: self.age_max,
            });
        }
        Ok(())
    }

    pub fn age_in_range(&self, age: u32) -> bool {
        (self.age_min..=self.age_max).contains(&age)
    }

    pub fn age_warning(&self) -> String {
        format!(
            "La edad debe estar entre {} y {} años.",
            self.age_min, self.age_max
        )
    }
}

/// Defaults, then `enrollment.toml` in the working directory, then the environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();
    apply_file(&mut settings, Path::new(SETTINGS_FILE));
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file(settings: &mut Settings, path: &Path) {
    let Ok(raw) = fs::read_to_string(path) else {
        return;
    };
    match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
        Ok(file_cfg) => {
            if let Some(v) = file_cfg.get("endpoint_url").and_then(toml::Value::as_str) {
                settings.endpoint_url = v.to_string();
            }
            if let Some(v) = file_cfg.get("age_min").and_then(toml::Value::as_integer) {
                if let Ok(v) = u32::try_from(v) {
                    settings.age_min = v;
                }
            }
            if let Some(v) = file_cfg.get("age_max").and_then(toml::Value::as_integer) {
                if let Ok(v) = u32::try_from(v) {
                    settings.age_max = v;
                }
            }
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring malformed settings file");
        }
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("ENROLLMENT_ENDPOINT_URL") {
        settings.endpoint_url = v;
    }
    if let Some(v) = var("APP__ENDPOINT_URL") {
        settings.endpoint_url = v;
    }
    if let Some(v) = var("APP__AGE_MIN") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.age_min = parsed;
        }
    }
    if let Some(v) = var("APP__AGE_MAX") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.age_max = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
