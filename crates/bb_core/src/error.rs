use std::fmt;

#[derive(Debug)]
pub enum GameError {
    InvalidLineupSize { expected: usize, found: usize },
    InvalidSchemaVersion { expected: u8, found: u8 },
    MissingPitcher(String),
    ValidationError(String),
    SerializationError(String),
    DeserializationError(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GameError::InvalidLineupSize { expected, found } => {
                write!(f, "Invalid lineup size: expected {}, found {}", expected, found)
            }
            GameError::InvalidSchemaVersion { expected, found } => {
                write!(f, "Invalid schema version: expected {}, found {}", expected, found)
            }
            GameError::MissingPitcher(side) => {
                write!(f, "Missing pitcher for {} side", side)
            }
            GameError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
            GameError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            GameError::DeserializationError(msg) => {
                write!(f, "Deserialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for GameError {}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            GameError::DeserializationError(err.to_string())
        } else {
            GameError::SerializationError(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
