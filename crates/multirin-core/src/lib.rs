//! # multirin
//!
//! Residue interaction networks built from the alternate conformers of multiconformer
//! protein models, registered on a multiple sequence alignment so that networks of
//! homologous structures can be compared cell by cell.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data: the structural model (`Structure`),
//!   the backbone topology across a peptide bond, sequence alignments with their
//!   residue/column mapper, and readers for FASTA alignments and CSV metadata.
//!
//! - **[`engine`]: The Logic Core.** Builds one weighted contact graph per structure from
//!   its alternate conformers and aggregates many graphs into a dense
//!   `(structure, column, column)` tensor with normalization, scaling and integrity checks.
//!
//! - **[`workflows`]: The Public API.** Batch construction of the multi-structure tensor and
//!   its division into metadata-defined subsets.

pub mod core;
pub mod engine;
pub mod workflows;
