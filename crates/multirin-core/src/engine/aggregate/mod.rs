//! Registration of per-structure contact graphs on a shared alignment.

pub mod aggregator;
pub mod tensor;
