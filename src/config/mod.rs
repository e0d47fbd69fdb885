use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::core::error::{ConfigError, ConfigResult};
use crate::utils::retry::RetryConfig;

/// 分配器配置
///
/// `batch_size` 必须在共享同一计数器的所有实例之间保持一致
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AllocatorConfig {
    pub counter_key: String,
    pub batch_size: i64,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            counter_key: "short-url-counter".to_string(),
            batch_size: 1000,
        }
    }
}

/// 计数器传输层配置：单次调用超时与连接重试
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct CounterConfig {
    pub timeout_ms: u64,
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            max_attempts: 3,
            initial_delay_ms: 50,
            max_delay_ms: 1000,
            backoff_multiplier: 2.0,
        }
    }
}

impl CounterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new()
            .with_max_attempts(self.max_attempts)
            .with_initial_delay(self.initial_delay_ms)
            .with_max_delay(self.max_delay_ms)
            .with_backoff_multiplier(self.backoff_multiplier)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "data/seqalloc.redb".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "seqalloc".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub allocator: AllocatorConfig,
    pub counter: CounterConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.allocator.counter_key.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "allocator.counter_key",
                reason: "计数器名称不能为空".to_string(),
            });
        }
        if self.allocator.batch_size <= 0 {
            return Err(ConfigError::Invalid {
                field: "allocator.batch_size",
                reason: format!("必须为正整数，当前为 {}", self.allocator.batch_size),
            });
        }
        if self.counter.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "counter.timeout_ms",
                reason: "超时时间必须大于 0".to_string(),
            });
        }
        if self.counter.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "counter.max_attempts",
                reason: "至少需要尝试一次".to_string(),
            });
        }
        Ok(())
    }
}
