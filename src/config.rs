use crate::brain::{Activation, NetworkShape};
use crate::error::ConfigError;
use crate::sensor::PERCEPTION_LEN;
use crate::snake::{Action, INITIAL_LENGTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters fixed for the lifetime of one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    pub width: u16,
    pub height: u16,
    /// Steps allowed between two apples before the episode is cut short.
    pub max_steps_per_apple: u32,
    /// Seeds the apple stream.
    pub seed: u64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            width: 15,
            height: 15,
            max_steps_per_apple: 1000,
            seed: 0,
        }
    }
}

impl EpisodeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if usize::from(self.width) < INITIAL_LENGTH {
            return Err(ConfigError::Invalid("width must fit the initial snake"));
        }
        if self.height == 0 {
            return Err(ConfigError::Invalid("height must be at least 1"));
        }
        if self.max_steps_per_apple == 0 {
            return Err(ConfigError::Invalid("max_steps_per_apple must be positive"));
        }
        Ok(())
    }

    pub fn with_seed(&self, seed: u64) -> Self {
        Self { seed, ..self.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub hidden: Vec<usize>,
    pub activation: Activation,
    /// Seeds the random kernel draw of fresh networks.
    pub seed: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            hidden: vec![32, 32],
            activation: Activation::Tanh,
            seed: 0,
        }
    }
}

impl NetworkConfig {
    /// Shape wired to the distance sensor and the four snake actions.
    pub fn shape(&self) -> NetworkShape {
        NetworkShape::new(PERCEPTION_LEN, &self.hidden, Action::COUNT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub cell_px: u32,
    pub tick_ms: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { cell_px: 32, tick_ms: 60 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub episode: EpisodeConfig,
    pub network: NetworkConfig,
    pub window: WindowConfig,
}

impl AppConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.episode.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_board() {
        let config = AppConfig::default();
        assert_eq!((config.episode.width, config.episode.height), (15, 15));
        assert_eq!(config.episode.max_steps_per_apple, 1000);
        assert_eq!(config.network.shape().layer_dims(), vec![(32, 24), (32, 32), (4, 32)]);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            AppConfig::from_json(r#"{"episode": {"seed": 9}, "network": {"activation": "relu"}}"#).unwrap();
        assert_eq!(config.episode.seed, 9);
        assert_eq!(config.episode.width, 15);
        assert_eq!(config.network.activation, Activation::Relu);
        assert_eq!(config.network.hidden, vec![32, 32]);
    }

    #[test]
    fn invalid_episode_is_rejected() {
        assert!(matches!(
            AppConfig::from_json(r#"{"episode": {"width": 2}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{"episode": {"max_steps_per_apple": 0}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(AppConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }
}
