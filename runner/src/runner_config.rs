use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use common::games::snake::{EngineSettings, LevelConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE_NAME: &str = "snake_runner_config.yaml";
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub level: LevelConfig,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<(), String> {
        self.engine.validate_for(&self.level)
    }
}

pub fn get_config_manager(
    path: &str,
) -> ConfigManager<FileContentConfigProvider, RunnerConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}
