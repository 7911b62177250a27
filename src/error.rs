// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use thiserror::Error;

/// 向量运算错误 (Vector operation errors)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorError {
    /// Binary element-wise operation on operands of unequal length.
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// Strict reduction over an empty sequence.
    #[error("cannot compute {0} of an empty vector")]
    EmptyInput(&'static str),

    #[error("invalid slice range {start}..{end} for vector of length {len}")]
    InvalidRange {
        start: usize,
        end: usize,
        len: usize,
    },
}

/// MOT 文本记录解析错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotParseError {
    #[error("expected {expected} comma-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("field `{field}` is not numeric: {value:?}")]
    InvalidField { field: &'static str, value: String },
}
