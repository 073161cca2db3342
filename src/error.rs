use thiserror::Error;

use crate::ost::Key;

/// OstError enumerates over all possible errors that this package
/// shall return.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OstError {
    /// Fatal case, index entries are not in sort-order. Carries the
    /// offending key and the ancestor bound it violates.
    #[error("sort error: {0} violates bound {1}")]
    SortError(Key, Key),
    /// Fatal case, cached height does not match the subtree.
    #[error("height mismatch at {key}: cached {cached} actual {actual}")]
    HeightMismatch {
        key: Key,
        cached: usize,
        actual: usize,
    },
    /// Fatal case, cached subtree size does not match the subtree.
    #[error("size mismatch at {key}: cached {cached} actual {actual}")]
    SizeMismatch {
        key: Key,
        cached: usize,
        actual: usize,
    },
    /// Fatal case, breaking the AVL rule, children heights differ by
    /// more than one.
    #[error("unbalanced node {key}: balance {balance}")]
    Unbalanced { key: Key, balance: isize },
    /// Returned while parsing command line configuration.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
