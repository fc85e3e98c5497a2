use crate::audio::vad::VadMode;
use crate::defaults;
use crate::error::{Result, ScribedError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub audio: AudioConfig,
    pub segmentation: SegmentationConfig,
    pub stt: SttConfig,
}

/// Server listen configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

/// Audio framing and classification configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub frame_duration_ms: u32,
    pub vad_mode: VadMode,
}

/// Speech-run segmentation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmentationConfig {
    pub min_speech_secs: f64,
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SttConfig {
    pub model_path: PathBuf,
    pub language: String,
    pub threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: defaults::LISTEN_ADDR.to_string(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: defaults::SAMPLE_RATE,
            frame_duration_ms: defaults::FRAME_DURATION_MS,
            vad_mode: VadMode::VeryAggressive,
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_speech_secs: defaults::MIN_SPEECH_SECS,
        }
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(defaults::DEFAULT_MODEL_PATH),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            threads: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ScribedError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - SCRIBED_LISTEN → server.listen
    /// - SCRIBED_MODEL → stt.model_path
    /// - SCRIBED_LANGUAGE → stt.language
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(listen) = std::env::var("SCRIBED_LISTEN")
            && !listen.is_empty()
        {
            self.server.listen = listen;
        }

        if let Ok(model) = std::env::var("SCRIBED_MODEL")
            && !model.is_empty()
        {
            self.stt.model_path = PathBuf::from(model);
        }

        if let Ok(language) = std::env::var("SCRIBED_LANGUAGE")
            && !language.is_empty()
        {
            self.stt.language = language;
        }

        self
    }

    /// Default configuration file path: `$XDG_CONFIG_HOME/scribed/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scribed")
            .join("config.toml")
    }

    /// Check configuration values for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(ScribedError::ConfigInvalidValue {
                key: "audio.sample_rate".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.audio.frame_duration_ms == 0 {
            return Err(ScribedError::ConfigInvalidValue {
                key: "audio.frame_duration_ms".to_string(),
                message: "must be positive".to_string(),
            });
        }
        // A frame must hold a whole number of samples.
        if (self.audio.sample_rate * self.audio.frame_duration_ms) % 1000 != 0 {
            return Err(ScribedError::ConfigInvalidValue {
                key: "audio.frame_duration_ms".to_string(),
                message: format!(
                    "{}ms does not yield whole samples at {}Hz",
                    self.audio.frame_duration_ms, self.audio.sample_rate
                ),
            });
        }
        if self.segmentation.min_speech_secs < 0.0 {
            return Err(ScribedError::ConfigInvalidValue {
                key: "segmentation.min_speech_secs".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if self.server.listen.parse::<std::net::SocketAddr>().is_err() {
            return Err(ScribedError::ConfigInvalidValue {
                key: "server.listen".to_string(),
                message: format!("'{}' is not a valid socket address", self.server.listen),
            });
        }
        Ok(())
    }

    /// Number of samples in one classification frame.
    pub fn frame_len_samples(&self) -> usize {
        defaults::frame_len_samples(self.audio.sample_rate, self.audio.frame_duration_ms)
    }
}
