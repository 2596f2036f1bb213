//! Layered error definitions
//!
//! Categorized by source: config / sensor / renderer

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sensor Errors =====
    /// Sample source could not produce a reading
    #[error("sensor '{source_name}' unavailable: {message}")]
    SensorUnavailable {
        source_name: String,
        message: String,
    },

    /// Register bus transaction failed
    #[error("sensor bus error at 0x{address:02X} register 0x{register:02X}: {message}")]
    SensorBus {
        address: u8,
        register: u8,
        message: String,
    },

    // ===== Renderer Errors =====
    /// Renderer write error
    #[error("renderer '{renderer}' write error: {message}")]
    RendererWrite { renderer: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sensor unavailable error
    pub fn sensor_unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SensorUnavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create sensor bus error
    pub fn sensor_bus(address: u8, register: u8, message: impl Into<String>) -> Self {
        Self::SensorBus {
            address,
            register,
            message: message.into(),
        }
    }

    /// Create renderer write error
    pub fn renderer_write(renderer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RendererWrite {
            renderer: renderer.into(),
            message: message.into(),
        }
    }

    /// Whether the error comes from the sample acquisition path
    pub fn is_sensor_fault(&self) -> bool {
        matches!(self, Self::SensorUnavailable { .. } | Self::SensorBus { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_bus_display() {
        let err = ContractError::sensor_bus(0x68, 0x3B, "nack");
        assert_eq!(
            err.to_string(),
            "sensor bus error at 0x68 register 0x3B: nack"
        );
        assert!(err.is_sensor_fault());
    }

    #[test]
    fn test_renderer_error_is_not_sensor_fault() {
        let err = ContractError::renderer_write("jsonl", "disk full");
        assert!(!err.is_sensor_fault());
        assert!(err.to_string().contains("jsonl"));
    }
}
