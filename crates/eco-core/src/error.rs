//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Coordinate ({row}, {col}) is outside the {height}x{width} field")]
    OutOfBounds {
        row: i32,
        col: i32,
        height: usize,
        width: usize,
    },

    #[error("Unknown trait: {0}")]
    UnknownTrait(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_message() {
        let err = Error::OutOfBounds {
            row: -1,
            col: 3,
            height: 4,
            width: 5,
        };
        assert_eq!(
            err.to_string(),
            "Coordinate (-1, 3) is outside the 4x5 field"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let err: Error = serde_json::from_str::<u32>("not a number")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
