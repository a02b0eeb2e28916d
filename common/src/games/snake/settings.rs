use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Validate;
use super::board::DEFAULT_BOARD_SIZE;
use super::types::GameMode;

/// Parameters supplied when a round starts or restarts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub mode: GameMode,
    pub obstacle_count: usize,
    pub barrier_count: usize,
    pub board_size: i32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Classic,
            obstacle_count: 10,
            barrier_count: 8,
            board_size: DEFAULT_BOARD_SIZE,
        }
    }
}

impl Validate for LevelConfig {
    fn validate(&self) -> Result<(), String> {
        if !(5..=100).contains(&self.board_size) {
            return Err("board_size must be between 5 and 100".to_string());
        }
        let quarter = (self.board_size * self.board_size / 4) as usize;
        if self.obstacle_count > quarter {
            return Err(format!("obstacle_count must not exceed {}", quarter));
        }
        if self.barrier_count > quarter {
            return Err(format!("barrier_count must not exceed {}", quarter));
        }
        Ok(())
    }
}

/// Engine tuning shared by every level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub initial_length: usize,
    pub max_length: usize,
    pub apple_sample_attempts: usize,
    pub victory_fill_ratio: f32,
    pub placement_attempts_per_entity: usize,
    pub obstacle_relocate_every: u32,
    pub audit_interval_ms: u64,
    pub base_tick_ms: u64,
    pub tick_step_ms: u64,
    pub min_tick_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            initial_length: 5,
            max_length: 100,
            apple_sample_attempts: 100,
            victory_fill_ratio: 0.9,
            placement_attempts_per_entity: 50,
            obstacle_relocate_every: 3,
            audit_interval_ms: 2000,
            base_tick_ms: 150,
            tick_step_ms: 2,
            min_tick_ms: 70,
        }
    }
}

impl EngineSettings {
    /// Tick interval after `apples_eaten` pickups; shrinks towards the floor.
    pub fn tick_interval(&self, apples_eaten: u32) -> Duration {
        let reduction = self.tick_step_ms.saturating_mul(apples_eaten as u64);
        let ms = self.base_tick_ms.saturating_sub(reduction).max(self.min_tick_ms);
        Duration::from_millis(ms)
    }

    pub fn audit_interval(&self) -> Duration {
        Duration::from_millis(self.audit_interval_ms)
    }

    /// Checks that the starting snake fits between the board center and
    /// the edge of the given level.
    pub fn validate_for(&self, level: &LevelConfig) -> Result<(), String> {
        self.validate()?;
        level.validate()?;
        let room = ((level.board_size - 1) / 2 + 1) as usize;
        if self.initial_length > room {
            return Err(format!(
                "initial_length {} does not fit a {}x{} board",
                self.initial_length, level.board_size, level.board_size
            ));
        }
        Ok(())
    }
}

impl Validate for EngineSettings {
    fn validate(&self) -> Result<(), String> {
        if self.initial_length < 1 {
            return Err("initial_length must be at least 1".to_string());
        }
        if self.max_length < 2 {
            return Err("max_length must be at least 2".to_string());
        }
        if self.initial_length > self.max_length {
            return Err("initial_length must not exceed max_length".to_string());
        }
        if self.apple_sample_attempts < 100 {
            return Err("apple_sample_attempts must be at least 100".to_string());
        }
        if self.victory_fill_ratio <= 0.0 || self.victory_fill_ratio > 1.0 {
            return Err("victory_fill_ratio must be greater than 0 and at most 1".to_string());
        }
        if self.placement_attempts_per_entity < 1 {
            return Err("placement_attempts_per_entity must be at least 1".to_string());
        }
        if self.audit_interval_ms == 0 {
            return Err("audit_interval_ms must be greater than 0".to_string());
        }
        if self.min_tick_ms == 0 {
            return Err("min_tick_ms must be greater than 0".to_string());
        }
        if self.min_tick_ms > self.base_tick_ms {
            return Err("min_tick_ms must not exceed base_tick_ms".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LevelConfig::default().validate().is_ok());
        assert!(EngineSettings::default().validate().is_ok());
        assert!(EngineSettings::default().validate_for(&LevelConfig::default()).is_ok());
    }

    #[test]
    fn test_tick_interval_ramps_to_floor() {
        let settings = EngineSettings::default();
        assert_eq!(settings.tick_interval(0), Duration::from_millis(150));
        assert_eq!(settings.tick_interval(10), Duration::from_millis(130));
        assert_eq!(settings.tick_interval(40), Duration::from_millis(70));
        assert_eq!(settings.tick_interval(10_000), Duration::from_millis(70));
    }

    #[test]
    fn test_rejects_small_board() {
        let level = LevelConfig {
            board_size: 4,
            ..LevelConfig::default()
        };
        assert!(level.validate().is_err());
    }

    #[test]
    fn test_rejects_snake_longer_than_half_board() {
        let level = LevelConfig {
            board_size: 6,
            obstacle_count: 0,
            barrier_count: 0,
            ..LevelConfig::default()
        };
        let settings = EngineSettings::default();
        assert!(settings.validate_for(&level).is_err());

        let short = EngineSettings {
            initial_length: 3,
            ..EngineSettings::default()
        };
        assert!(short.validate_for(&level).is_ok());
    }

    #[test]
    fn test_rejects_too_few_apple_samples() {
        let settings = EngineSettings {
            apple_sample_attempts: 10,
            ..EngineSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings: EngineSettings = serde_yaml_ng::from_str("max_length: 40\n").unwrap();
        assert_eq!(settings.max_length, 40);
        assert_eq!(settings.initial_length, 5);
    }
}
