use crate::error::{CoffeeLogError, Result};
use coffee_log_common::MatchThresholds;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// カタログパスを上書きする環境変数
pub const CATALOG_ENV: &str = "COFFEE_LOG_CATALOG";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub catalog_path: Option<PathBuf>,
    pub thresholds: MatchThresholds,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// 指定パスから読み込み（なければ既定値）
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoffeeLogError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("coffee-log").join("config.json"))
    }

    /// カタログの場所
    ///
    /// 優先順位: 引数 → 環境変数 → 設定ファイル → データディレクトリ
    pub fn resolve_catalog_path(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path);
        }

        if let Ok(path) = std::env::var(CATALOG_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }

        if let Some(path) = &self.catalog_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| CoffeeLogError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data_dir.join("coffee-log").join("catalog.json"))
    }

    /// CLI引数で閾値を上書きする（範囲外・NaNはエラー）
    pub fn thresholds_with(&self, coffee: Option<f64>, name: Option<f64>) -> Result<MatchThresholds> {
        let mut thresholds = self.thresholds;
        if let Some(t) = coffee {
            thresholds.coffee = t;
        }
        if let Some(t) = name {
            thresholds.name = t;
        }
        validate_thresholds(&thresholds)?;
        Ok(thresholds)
    }

    /// 閾値はすべて 0.0〜1.0
    pub fn validate(&self) -> Result<()> {
        validate_thresholds(&self.thresholds)
    }
}

fn validate_thresholds(t: &MatchThresholds) -> Result<()> {
    for (label, value) in [("coffee", t.coffee), ("name", t.name), ("roaster", t.roaster)] {
        // NaN もここで弾かれる
        if !(0.0..=1.0).contains(&value) {
            return Err(CoffeeLogError::Config(format!(
                "閾値 {} は 0.0〜1.0 で指定してください: {}",
                label, value
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.catalog_path.is_none());
        assert_eq!(config.thresholds, MatchThresholds::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_gives_default() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.json")).unwrap();
        assert_eq!(config.thresholds.coffee, 0.8);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.thresholds.coffee = 0.75;
        config.catalog_path = Some(PathBuf::from("/tmp/catalog.json"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.thresholds.coffee, 0.75);
        assert_eq!(loaded.thresholds.name, 0.7);
        assert_eq!(loaded.catalog_path, Some(PathBuf::from("/tmp/catalog.json")));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"thresholds": {"name": 0.6}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.thresholds.name, 0.6);
        assert_eq!(config.thresholds.coffee, 0.8);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut config = Config::default();
        config.thresholds.roaster = 1.5;
        assert!(matches!(config.validate(), Err(CoffeeLogError::Config(_))));
    }

    #[test]
    fn test_threshold_overrides_are_validated() {
        let config = Config::default();

        let thresholds = config.thresholds_with(Some(0.9), None).unwrap();
        assert_eq!(thresholds.coffee, 0.9);
        assert_eq!(thresholds.name, 0.7);

        let thresholds = config.thresholds_with(None, Some(0.5)).unwrap();
        assert_eq!(thresholds.coffee, 0.8);
        assert_eq!(thresholds.name, 0.5);

        for bad in [f64::NAN, -1.0, 1.5, f64::INFINITY] {
            assert!(config.thresholds_with(Some(bad), None).is_err(), "coffee {}", bad);
            assert!(config.thresholds_with(None, Some(bad)).is_err(), "name {}", bad);
        }
    }

    #[test]
    fn test_nan_threshold_not_saved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.thresholds.coffee = f64::NAN;
        assert!(config.save_to(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_catalog_env_overrides_config_but_not_argument() {
        let config = Config {
            catalog_path: Some(PathBuf::from("from-config.json")),
            ..Default::default()
        };

        std::env::set_var(CATALOG_ENV, "from-env.json");
        let from_env = config.resolve_catalog_path(None);
        let explicit = config.resolve_catalog_path(Some(PathBuf::from("explicit.json")));
        std::env::set_var(CATALOG_ENV, "   ");
        let blank = config.resolve_catalog_path(None);
        std::env::remove_var(CATALOG_ENV);

        assert_eq!(from_env.unwrap(), PathBuf::from("from-env.json"));
        assert_eq!(explicit.unwrap(), PathBuf::from("explicit.json"));
        // 空白だけの値は無視して設定ファイルへ
        assert_eq!(blank.unwrap(), PathBuf::from("from-config.json"));
    }

    #[test]
    fn test_explicit_catalog_path_wins() {
        let config = Config {
            catalog_path: Some(PathBuf::from("from-config.json")),
            ..Default::default()
        };
        let path = config
            .resolve_catalog_path(Some(PathBuf::from("explicit.json")))
            .unwrap();
        assert_eq!(path, PathBuf::from("explicit.json"));
    }
}
