//! # Core Models Module
//!
//! In-memory representation of a single macromolecular model: chains, residues and
//! atoms, including the alternate-location labels that the contact builder keys on.
//!
//! ## Overview
//!
//! File parsing is left to the caller. A reader for PDB, mmCIF or any other format
//! populates a [`structure::Structure`] through its builder-style methods, after which
//! the model is treated as read-only by the rest of the library.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom name, position and optional alternate-location label
//! - [`residue`] - Residue number, name, amino acid classification and polymer flag
//! - [`chain`] - Ordered residue membership per chain
//! - [`structure`] - Owning container with stable slot-map identifiers
//! - [`ids`] - Identifier types for atoms, residues and chains
//!
//! ## Usage
//!
//! ```ignore
//! use multirin::core::models::{atom::Atom, chain::ChainType, structure::Structure};
//! use nalgebra::Point3;
//!
//! let mut structure = Structure::new("2SHV");
//! let chain_id = structure.add_chain('A', ChainType::Protein);
//! let residue_id = structure.add_residue(chain_id, 1, "SER", true).unwrap();
//!
//! let atom = Atom::new("OG", residue_id, Point3::new(0.0, 0.0, 0.0)).with_alt_loc('A');
//! structure.add_atom_to_residue(residue_id, atom);
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod structure;
