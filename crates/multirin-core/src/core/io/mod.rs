//! Readers for the tabular and sequence inputs of a batch.
//!
//! Structural models are supplied by the caller already parsed; this module only covers
//! the sequence alignment (FASTA) and the optional per-structure metadata table (CSV),
//! both behind the common [`traits::InputFile`] interface.

pub mod fasta;
pub mod metadata;
pub mod traits;
