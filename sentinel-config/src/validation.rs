//! Custom validation functions for configuration.
//!
//! Cross-field checks that the `validator` attribute set cannot express on its own.

use validator::ValidationError;

use crate::generator::{GeneratorConfig, ProtocolWeights};

/// Interval and packet-size bounds must not be inverted.
pub fn validate_generator_bounds(config: &GeneratorConfig) -> Result<(), ValidationError> {
    if config.min_interval_ms > config.max_interval_ms {
        return Err(ValidationError::new("inverted_interval_bounds")
            .with_message("min_interval_ms must not exceed max_interval_ms".into()));
    }
    if config.min_packet_size > config.max_packet_size {
        return Err(ValidationError::new("inverted_size_bounds")
            .with_message("min_packet_size must not exceed max_packet_size".into()));
    }
    Ok(())
}

/// Weights must sum to a finite, strictly positive total.
pub fn validate_weight_sum(weights: &ProtocolWeights) -> Result<(), ValidationError> {
    let values = weights.as_array();
    if values.iter().any(|w| !w.is_finite()) {
        return Err(ValidationError::new("non_finite_weight"));
    }
    let sum: f64 = values.iter().sum();
    if sum > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("weights_not_positive")
            .with_message("protocol weights must sum to a positive value".into()))
    }
}

/// An address pool must hold at least one non-blank entry and no blank ones.
pub fn validate_address_pool(pool: &[String]) -> Result<(), ValidationError> {
    if pool.is_empty() {
        return Err(ValidationError::new("empty_address_pool"));
    }
    if pool.iter().any(|entry| entry.trim().is_empty()) {
        return Err(ValidationError::new("blank_address"));
    }
    Ok(())
}

/// File extensions are bare alphanumerics, without the leading dot.
pub fn validate_extension(extension: &str) -> Result<(), ValidationError> {
    if !extension.is_empty() && extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_extension"))
    }
}

/// Log level must be one `tracing` understands.
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid = ["trace", "debug", "info", "warn", "error", "off"]
        .contains(&level.to_lowercase().as_str());
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_rules() {
        assert!(validate_extension("csv").is_ok());
        assert!(validate_extension(".csv").is_err());
        assert!(validate_extension("").is_err());
    }

    #[test]
    fn log_levels() {
        assert!(validate_log_level("DEBUG").is_ok());
        assert!(validate_log_level("verbose").is_err());
    }

    #[test]
    fn nan_weight_rejected() {
        let weights = ProtocolWeights {
            tcp: f64::NAN,
            ..ProtocolWeights::default()
        };
        assert!(validate_weight_sum(&weights).is_err());
    }
}
