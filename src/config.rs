//! Configuration management for the face-mouse application

use crate::{
    constants::{
        DEFAULT_BLINK_THRESHOLD, DEFAULT_CALIBRATION_RETRY_SECS, DEFAULT_CURSOR_GAIN,
        DEFAULT_GESTURE_COOLDOWN_SECS, DEFAULT_MOVE_DURATION_SECS,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model configuration
    pub models: ModelConfig,

    /// Gesture classification configuration
    pub gesture: GestureConfig,

    /// Cursor mapping configuration
    pub cursor: CursorConfig,

    /// Calibration configuration
    pub calibration: CalibrationConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Model file paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to face detection ONNX model
    pub face_detector: PathBuf,

    /// Path to face mesh landmark ONNX model
    pub face_mesh: PathBuf,

    /// Confidence threshold for face detection (0.0-1.0)
    pub confidence_threshold: f32,
}

/// Gesture classification parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Openness ratio below which an eye counts as closed
    pub blink_threshold: f64,

    /// Minimum seconds between two firings of the same gesture
    pub cooldown_secs: f64,
}

/// Cursor mapping parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorConfig {
    /// Enable pointer injection (disable for a dry run)
    pub enabled: bool,

    /// Multiplier applied to nose displacement
    pub gain: f64,

    /// Smoothing duration for each cursor move, in seconds
    pub move_duration_secs: f64,
}

/// Calibration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Delay between samples while no face is found, in seconds
    pub retry_delay_secs: f64,

    /// Give up after this many failed samples (None retries forever)
    pub max_retries: Option<u32>,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Show the camera preview window
    pub preview: bool,

    /// Mirror the frame horizontally before detection
    pub mirror: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            gesture: GestureConfig::default(),
            cursor: CursorConfig::default(),
            calibration: CalibrationConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            face_detector: PathBuf::from("assets/face_detector.onnx"),
            face_mesh: PathBuf::from("assets/face_mesh.onnx"),
            confidence_threshold: 0.5,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            blink_threshold: DEFAULT_BLINK_THRESHOLD,
            cooldown_secs: DEFAULT_GESTURE_COOLDOWN_SECS,
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gain: DEFAULT_CURSOR_GAIN,
            move_duration_secs: DEFAULT_MOVE_DURATION_SECS,
        }
    }
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            retry_delay_secs: DEFAULT_CALIBRATION_RETRY_SECS,
            max_retries: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            preview: true,
            mirror: true,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.models.confidence_threshold) {
            return Err(Error::Config(
                "Confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !self.gesture.blink_threshold.is_finite() || self.gesture.blink_threshold <= 0.0 {
            return Err(Error::Config(
                "Blink threshold must be a positive finite value".to_string(),
            ));
        }
        if self.gesture.cooldown_secs < 0.0 {
            return Err(Error::Config("Gesture cooldown must be non-negative".to_string()));
        }
        if !self.cursor.gain.is_finite() {
            return Err(Error::Config("Cursor gain must be finite".to_string()));
        }
        if self.cursor.move_duration_secs < 0.0 {
            return Err(Error::Config("Move duration must be non-negative".to_string()));
        }
        if self.calibration.retry_delay_secs < 0.0 {
            return Err(Error::Config(
                "Calibration retry delay must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Face Mouse Configuration

# Model paths
models:
  face_detector: "assets/face_detector.onnx"
  face_mesh: "assets/face_mesh.onnx"
  confidence_threshold: 0.5

# Gesture classification
gesture:
  blink_threshold: 0.45
  cooldown_secs: 1.0

# Cursor mapping
cursor:
  enabled: true
  gain: 2.5
  move_duration_secs: 0.1

# Calibration
calibration:
  retry_delay_secs: 1.0
  max_retries: null

# Display
display:
  preview: true
  mirror: true
"#;
