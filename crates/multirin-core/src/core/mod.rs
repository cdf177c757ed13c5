//! # Core Module
//!
//! Stateless building blocks shared by the engine: the structural model, the backbone
//! topology, the sequence alignment and the readers for tabular inputs.
//!
//! ## Architecture
//!
//! - **Structural Model** ([`models`]) - Chains, residues and atoms with alternate-location labels
//! - **Backbone Topology** ([`topology`]) - Peptide-bond graph used for backbone coupling
//! - **Alignment** ([`alignment`]) - Multiple sequence alignment and residue/column mapping
//! - **Inputs** ([`io`]) - FASTA alignment and metadata table readers

pub mod alignment;
pub mod io;
pub mod models;
pub mod topology;
