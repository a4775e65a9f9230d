use thiserror::Error;

#[derive(Error, Debug)]
pub enum SavannaError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Entity capacity exhausted ({0} entities)")]
    EntityLimit(usize),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SavannaError>;
