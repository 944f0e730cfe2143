use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_ACTIVITY_MIN_PERCENT: u32 = 1;
pub const DEFAULT_INACTIVITY_DAYS_AFTER_WATCH: u32 = 30;
pub const DEFAULT_NEVER_WATCHED_DAYS_SINCE_ADDED: u32 = 180;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tautulli: ServiceConfig,
    #[serde(default)]
    pub sonarr: ServiceConfig,
    #[serde(default)]
    pub radarr: ServiceConfig,
    #[serde(default)]
    pub rules: Rules,
    #[serde(default)]
    pub exceptions: Exceptions,
}

/// Connection settings for one *arr / Tautulli instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Rules {
    /// History events below this completion percent are ignored (0 = unknown is always kept)
    #[serde(default)]
    pub activity_min_percent: u32,
    #[serde(default)]
    pub inactivity_days_after_watch: u32,
    #[serde(default)]
    pub never_watched_days_since_added: u32,
    #[serde(default)]
    pub low_watch_min_added_days: u32,
    #[serde(default)]
    pub low_watch_max_hours: f64,
    /// Only flag items that also satisfy the low-watch rule
    #[serde(default)]
    pub low_watch_require: bool,
    #[serde(default)]
    pub series_ended_only: bool,
}

impl Rules {
    pub fn low_watch_enabled(&self) -> bool {
        self.low_watch_min_added_days > 0 && self.low_watch_max_hours > 0.0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Exceptions {
    #[serde(default)]
    pub movies: MovieExceptions,
    #[serde(default)]
    pub series: SeriesExceptions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieExceptions {
    #[serde(default)]
    pub radarr_ids: Vec<i64>,
    #[serde(default)]
    pub tmdb_ids: Vec<u32>,
    #[serde(default)]
    pub imdb_ids: Vec<String>,
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub path_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeriesExceptions {
    #[serde(default)]
    pub sonarr_ids: Vec<i64>,
    #[serde(default)]
    pub tvdb_ids: Vec<u32>,
    #[serde(default)]
    pub imdb_ids: Vec<String>,
    #[serde(default)]
    pub titles: Vec<String>,
    #[serde(default)]
    pub path_prefixes: Vec<String>,
}

impl Config {
    /// Read, parse and fill rule defaults. Validation is left to the caller.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read config {}: {}", path.display(), e))?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("parse config {}: {}", path.display(), e))?;
        config.apply_defaults();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// A starter config with placeholder service settings
    pub fn template() -> Self {
        let service = |port: u16| ServiceConfig {
            base_url: format!("http://localhost:{}", port),
            api_key: "YOUR_API_KEY".to_string(),
        };
        let mut config = Config {
            tautulli: service(8181),
            sonarr: service(8989),
            radarr: service(7878),
            ..Config::default()
        };
        config.apply_defaults();
        config
    }

    pub fn apply_defaults(&mut self) {
        if self.rules.activity_min_percent == 0 {
            self.rules.activity_min_percent = DEFAULT_ACTIVITY_MIN_PERCENT;
        }
        if self.rules.inactivity_days_after_watch == 0 {
            self.rules.inactivity_days_after_watch = DEFAULT_INACTIVITY_DAYS_AFTER_WATCH;
        }
        if self.rules.never_watched_days_since_added == 0 {
            self.rules.never_watched_days_since_added = DEFAULT_NEVER_WATCHED_DAYS_SINCE_ADDED;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        validate_service("tautulli", &self.tautulli)?;
        validate_service("sonarr", &self.sonarr)?;
        validate_service("radarr", &self.radarr)?;

        let rules = &self.rules;
        if rules.activity_min_percent == 0 || rules.activity_min_percent > 100 {
            return Err(anyhow::anyhow!("rules: activity_min_percent must be between 1 and 100"));
        }
        if rules.inactivity_days_after_watch == 0 {
            return Err(anyhow::anyhow!("rules: inactivity_days_after_watch must be positive"));
        }
        if rules.never_watched_days_since_added == 0 {
            return Err(anyhow::anyhow!("rules: never_watched_days_since_added must be positive"));
        }
        if !rules.low_watch_max_hours.is_finite() || rules.low_watch_max_hours < 0.0 {
            return Err(anyhow::anyhow!("rules: low watch thresholds must be non-negative"));
        }
        let days_set = rules.low_watch_min_added_days > 0;
        let hours_set = rules.low_watch_max_hours > 0.0;
        if days_set != hours_set {
            return Err(anyhow::anyhow!(
                "rules: low_watch_min_added_days and low_watch_max_hours must both be set to enable"
            ));
        }

        Ok(())
    }
}

fn validate_service(name: &str, service: &ServiceConfig) -> anyhow::Result<()> {
    if service.base_url.is_empty() {
        return Err(anyhow::anyhow!("{}: base_url is required", name));
    }
    let parsed = url::Url::parse(&service.base_url)
        .map_err(|e| anyhow::anyhow!("{}: base_url is invalid: {}", name, e))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(anyhow::anyhow!(
            "{}: base_url must be an absolute http(s) URL, got {}",
            name,
            service.base_url
        ));
    }
    if service.api_key.is_empty() {
        return Err(anyhow::anyhow!("{}: api_key is required", name));
    }
    Ok(())
}

/// Append `value` unless it is zero or already present
pub fn add_unique_int<T>(list: &mut Vec<T>, value: T) -> bool
where
    T: PartialEq + Default + Copy,
{
    if value == T::default() || list.contains(&value) {
        return false;
    }
    list.push(value);
    true
}

/// Append `value` unless it is empty or already present
pub fn add_unique_string(list: &mut Vec<String>, value: &str) -> bool {
    if value.is_empty() || list.iter().any(|existing| existing == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn valid_config() -> Config {
        let mut config = Config::template();
        config.tautulli.api_key = "t".to_string();
        config.sonarr.api_key = "s".to_string();
        config.radarr.api_key = "r".to_string();
        config
    }

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = valid_config();
        config.exceptions.movies.tmdb_ids = vec![603];
        config.exceptions.series.titles = vec!["The Wire".to_string()];
        config.rules.series_ended_only = true;

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_defaults_fill_zero_rules() {
        let config: Config = toml::from_str(
            r#"
            [radarr]
            base_url = "http://radarr:7878"
            api_key = "abc"

            [rules]
            inactivity_days_after_watch = 0
            never_watched_days_since_added = 90
            "#,
        )
        .unwrap();
        let mut config = config;
        config.apply_defaults();

        assert_eq!(config.rules.activity_min_percent, 1);
        assert_eq!(config.rules.inactivity_days_after_watch, 30);
        assert_eq!(config.rules.never_watched_days_since_added, 90);
        assert!(config.exceptions.movies.radarr_ids.is_empty());
    }

    #[test]
    fn test_config_validate() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.sonarr.api_key.clear();
        assert!(config.validate().is_err());

        config = valid_config();
        config.radarr.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config = valid_config();
        config.tautulli.base_url = "ftp://host".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_low_watch_thresholds_must_be_paired() {
        let mut config = valid_config();
        config.rules.low_watch_min_added_days = 30;
        assert!(config.validate().is_err());

        config.rules.low_watch_max_hours = 2.0;
        assert!(config.validate().is_ok());
        assert!(config.rules.low_watch_enabled());

        config.rules.low_watch_max_hours = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_add_unique_helpers() {
        let mut ids = vec![1i64];
        assert!(!add_unique_int(&mut ids, 0));
        assert!(!add_unique_int(&mut ids, 1));
        assert!(add_unique_int(&mut ids, 2));
        assert_eq!(ids, vec![1, 2]);

        let mut titles = Vec::new();
        assert!(!add_unique_string(&mut titles, ""));
        assert!(add_unique_string(&mut titles, "Heat"));
        assert!(!add_unique_string(&mut titles, "Heat"));
        assert_eq!(titles, vec!["Heat".to_string()]);
    }
}
