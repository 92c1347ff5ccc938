//! Error types for board construction and row manipulation.

use thiserror::Error;

/// Broad category of a [`BoardError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A dimension was not an integer
    Type,
    /// A dimension was outside the accepted range
    Range,
    /// A row index did not address a row of the grid
    Index,
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum BoardError {
    #[error("invalid board dimension {value:?}: expected an integer")]
    InvalidDimensionType { value: String },

    #[error("invalid board dimensions {width}x{height}: each side must be within {min}..={max}")]
    DimensionOutOfRange {
        width: i64,
        height: i64,
        min: usize,
        max: usize,
    },

    #[error("row index {index} out of range for a board of height {height}")]
    RowIndexOutOfRange { index: isize, height: usize },
}

impl BoardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BoardError::InvalidDimensionType { .. } => ErrorKind::Type,
            BoardError::DimensionOutOfRange { .. } => ErrorKind::Range,
            BoardError::RowIndexOutOfRange { .. } => ErrorKind::Index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        let err = BoardError::InvalidDimensionType {
            value: "10.5".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Type);

        let err = BoardError::DimensionOutOfRange {
            width: -1,
            height: 10,
            min: 4,
            max: 50,
        };
        assert_eq!(err.kind(), ErrorKind::Range);

        let err = BoardError::RowIndexOutOfRange {
            index: 20,
            height: 20,
        };
        assert_eq!(err.kind(), ErrorKind::Index);
    }

    #[test]
    fn messages_name_the_offending_values() {
        let err = BoardError::DimensionOutOfRange {
            width: 3,
            height: 51,
            min: 4,
            max: 50,
        };
        assert_eq!(
            err.to_string(),
            "invalid board dimensions 3x51: each side must be within 4..=50"
        );
    }
}
