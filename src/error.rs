//! Error types for the face-mouse library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model input configuration error
    #[error("Model input error: {0}")]
    ModelInput(String),

    /// Model output processing error
    #[error("Model output error: {0}")]
    ModelOutput(String),

    /// Model data shape or format error
    #[error("Model data format error: {0}")]
    ModelFormat(String),

    /// Landmark set violated the detector contract (wrong count, bad index)
    #[error("Landmark error: {0}")]
    Landmark(String),

    /// Calibration could not produce a baseline
    #[error("Calibration error: {0}")]
    Calibration(String),

    /// Cursor control operation failed
    #[error("Cursor control error: {0}")]
    CursorControl(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
