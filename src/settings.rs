//! Engine configuration loaded from TOML.
//!
//! - `Settings::load(path)` reads a TOML file; a missing file yields the
//!   embedded defaults so a bare `ime_init` still works.
//! - Default values are embedded via `include_str!("default_settings.toml")`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::scheme::Scheme;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("io error reading settings: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub engine: EngineSettings,
    pub ranker: RankerSettings,
    pub llm: LlmSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    pub dict_dir: String,
    pub user_dict_path: String,
    pub default_scheme: String,
    pub max_candidates: usize,
    pub composition_cap: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankerSettings {
    pub user_boost: i64,
    pub recency_max_bonus: i64,
    pub recency_half_life_secs: f64,
    pub length_bonus_per_atom: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub enabled: bool,
    pub endpoint: String,
    pub timeout_ms: u64,
    pub top_k: usize,
    pub context_window: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogSettings {
    #[serde(default)]
    pub dir: String,
}

impl Settings {
    /// Embedded defaults.
    pub fn default_settings() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("embedded settings TOML must be valid")
    }

    /// Load from a TOML file; a missing file falls back to the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default_settings());
        }
        let content = fs::read_to_string(path)?;
        parse_settings_toml(&content)
    }

    pub fn default_scheme(&self) -> Scheme {
        Scheme::from_name(&self.engine.default_scheme).unwrap_or(Scheme::Bopomofo)
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }
    macro_rules! check_non_negative {
        ($section:ident . $field:ident) => {
            if s.$section.$field < 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be non-negative".to_string(),
                });
            }
        };
    }

    check_positive!(engine.max_candidates);
    check_positive!(engine.composition_cap);
    if Scheme::from_name(&s.engine.default_scheme).is_none() {
        return Err(SettingsError::InvalidValue {
            field: "engine.default_scheme".to_string(),
            reason: format!("unknown scheme '{}'", s.engine.default_scheme),
        });
    }

    check_non_negative!(ranker.user_boost);
    check_non_negative!(ranker.recency_max_bonus);
    check_non_negative!(ranker.length_bonus_per_atom);
    if s.ranker.recency_half_life_secs <= 0.0 {
        return Err(SettingsError::InvalidValue {
            field: "ranker.recency_half_life_secs".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    check_positive!(llm.timeout_ms);
    check_positive!(llm.top_k);
    if s.llm.endpoint.is_empty() {
        return Err(SettingsError::InvalidValue {
            field: "llm.endpoint".to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.engine.max_candidates, 9);
        assert_eq!(s.engine.composition_cap, 64);
        assert_eq!(s.engine.default_scheme, "bopomofo");
        assert_eq!(s.ranker.user_boost, 2000);
        assert_eq!(s.llm.timeout_ms, 2000);
        assert_eq!(s.llm.top_k, 10);
        assert!(!s.llm.enabled);
        assert!(s.log.dir.is_empty());
    }

    #[test]
    fn error_zero_max_candidates() {
        let toml = DEFAULT_SETTINGS_TOML.replace("max_candidates = 9", "max_candidates = 0");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("engine.max_candidates"));
    }

    #[test]
    fn error_unknown_scheme() {
        let toml =
            DEFAULT_SETTINGS_TOML.replace("default_scheme = \"bopomofo\"", "default_scheme = \"qwerty\"");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("default_scheme"));
    }

    #[test]
    fn error_zero_half_life() {
        let toml = DEFAULT_SETTINGS_TOML
            .replace("recency_half_life_secs = 3600.0", "recency_half_life_secs = 0.0");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(err.to_string().contains("recency_half_life_secs"));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let s = Settings::load(Path::new("/nonexistent/maidos-ime.toml")).unwrap();
        assert_eq!(s.engine.max_candidates, 9);
    }
}
