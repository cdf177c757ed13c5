//! Multiple sequence alignments and the residue/column translation built on them.
//!
//! The alignment is the shared coordinate system of the multi-structure analysis: every
//! structure's residue numbering is projected onto its columns before aggregation.

pub mod mapper;
pub mod msa;
