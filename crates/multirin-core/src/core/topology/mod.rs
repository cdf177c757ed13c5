//! # Topology Module
//!
//! Fixed covalent topology of the protein backbone around a peptide bond.
//!
//! ## Overview
//!
//! The contact builder needs two pieces of structural knowledge that do not come from
//! coordinates: which atom names form the backbone, and how the backbone atoms of two
//! adjacent residues are bonded to each other. Both are encoded here, in the
//! [`backbone::BackboneTopologyGraph`], together with its proline and glycine variants.
//!
//! ## Key Components
//!
//! - [`backbone`] - Backbone roles, the peptide-bond graph and label-reachability counting

pub mod backbone;
