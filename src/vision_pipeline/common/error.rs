use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Frame capture failed: {0}")]
    CaptureFailed(String),

    #[error("Sensor unavailable: {0}")]
    SensorReadFailed(String),

    #[error("Invalid frame dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Frame buffer holds {actual} samples, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to decode frame: {0}")]
    FrameDecode(String),

    #[error("Failed to encode frame: {0}")]
    FrameEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VisionError>;
