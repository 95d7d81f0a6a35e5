//! Comparison report generation.

mod comparison;

pub use comparison::{
    ComparisonBuilder, PairSelection, INSUFFICIENT_DATA, NO_DIFFERENCES, PLACEHOLDER,
};
