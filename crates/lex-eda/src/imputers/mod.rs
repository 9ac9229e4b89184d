//! Imputation module for handling missing values.
//!
//! Only statistical imputation of numeric columns is provided: the mean or
//! the median of a column's non-missing values.

mod statistical;

pub use statistical::StatisticalImputer;
