//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::redisearch::RediSearchConfig;

/// Global configuration instance / 全局配置实例
static CONFIG: OnceCell<Arc<RwLock<AppConfig>>> = OnceCell::new();

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Redis connection / Redis连接配置
    #[serde(default)]
    pub redis: RediSearchConfig,
    /// Adapter selection / 适配器配置
    #[serde(default)]
    pub adapter: AdapterConfig,
    /// Logging configuration / 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// Adapter configuration / 适配器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Registered adapter type / 适配器类型
    pub adapter_type: String,
}

/// Logging configuration / 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset / 未设置RUST_LOG时的默认过滤器
    pub filter: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            adapter_type: "redisearch".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "redisearch_adapter=info".to_string(),
        }
    }
}

impl AppConfig {
    /// Adapter config passed to the factory / 传给适配器工厂的配置
    pub fn adapter_config(&self) -> serde_json::Value {
        serde_json::to_value(&self.redis).unwrap_or_default()
    }
}

/// Get the config file path / 获取配置文件路径
pub fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&get_config_path())
}

/// Load configuration from a given path / 从指定路径加载配置
pub fn load_config_from(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        // Load existing config / 加载现有配置
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))
    } else {
        // Create default config / 创建默认配置
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
pub fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

/// Initialize global configuration / 初始化全局配置
pub fn init_config() -> Result<Arc<RwLock<AppConfig>>, String> {
    init_config_from(&get_config_path())
}

/// Initialize global configuration from a given path / 从指定路径初始化全局配置
pub fn init_config_from(config_path: &Path) -> Result<Arc<RwLock<AppConfig>>, String> {
    let config = load_config_from(config_path)?;

    let config_arc = Arc::new(RwLock::new(config));

    CONFIG.set(config_arc.clone())
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(config_arc)
}

/// Get global configuration instance / 获取全局配置实例
pub fn get_config() -> Arc<RwLock<AppConfig>> {
    CONFIG.get_or_init(|| {
        let config = load_config().unwrap_or_default();
        Arc::new(RwLock::new(config))
    }).clone()
}

/// Get a read-only snapshot of current config / 获取当前配置的只读快照
pub fn config() -> AppConfig {
    get_config().read().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_written_on_first_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = load_config_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.redis.url, "redis://127.0.0.1:6379");
        assert_eq!(config.adapter.adapter_type, "redisearch");
        assert_eq!(config.log.filter, "redisearch_adapter=info");
    }

    #[test]
    fn test_round_trip_and_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.redis.url = "redis://search:6379/1".to_string();
        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap().redis.url, "redis://search:6379/1");

        std::fs::write(&path, r#"{"redis": {"url": "redis://other"}}"#).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.redis.url, "redis://other");
        assert_eq!(loaded.adapter.adapter_type, "redisearch");
        assert_eq!(loaded.adapter_config(), serde_json::json!({"url": "redis://other"}));

        std::fs::write(&path, "{").unwrap();
        assert!(load_config_from(&path).is_err());
    }

    // 全局配置只能初始化一次，所有相关断言放在同一个测试里
    #[test]
    fn test_global_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"redis": {"url": "redis://global:6379"}}"#).unwrap();

        let shared = init_config_from(&path).unwrap();
        assert_eq!(config().redis.url, "redis://global:6379");
        assert!(Arc::ptr_eq(&shared, &get_config()));

        shared.write().log.filter = "redisearch_adapter=debug".to_string();
        assert_eq!(config().log.filter, "redisearch_adapter=debug");

        assert!(init_config_from(&path).is_err());
    }
}
