use thiserror::Error;

/// Everything that can go wrong before the simulation starts.
/// Once running, the core never fails: anomalies degrade to wandering.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}: range {min}..{max} is inverted or negative")]
    InvalidSpan { name: &'static str, min: f32, max: f32 },

    #[error("{name}: chance {value} is outside 0..=1")]
    InvalidChance { name: &'static str, value: f32 },

    #[error("{name} must be positive")]
    NonPositive { name: &'static str },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
