//! Central error handling for the memory-properties probe
//!
//! Provides a unified ProbeError enum with consistent categorization so the
//! binary can report every failure with the same `[Category] message` shape.

use ash::vk;

/// Centralized error type for all probe operations
#[derive(thiserror::Error, Debug)]
pub enum ProbeError {
    #[error("failed to load the Vulkan loader: {0}")]
    Loader(#[from] ash::LoadingError),

    #[error("{call} failed: {result}")]
    Vulkan {
        call: &'static str,
        result: vk::Result,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl ProbeError {
    /// Short label used as the `[Category]` prefix when reporting.
    pub fn category(&self) -> &'static str {
        match self {
            ProbeError::Loader(_) => "Loader",
            ProbeError::Vulkan { .. } => "Vulkan",
            ProbeError::Io(_) => "IO",
            ProbeError::Json(_) => "JSON",
            ProbeError::Config(_) => "Config",
        }
    }

    /// Wrap a driver result code together with the entry point that produced it.
    pub fn vulkan(call: &'static str, result: vk::Result) -> Self {
        ProbeError::Vulkan { call, result }
    }

    /// Invalid flag or environment value.
    pub fn config<T: ToString>(msg: T) -> Self {
        ProbeError::Config(msg.to_string())
    }
}

/// Result type alias for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;
