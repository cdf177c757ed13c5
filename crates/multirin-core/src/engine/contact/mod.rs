//! Per-structure contact graphs over alternate-conformer residues.
//!
//! [`builder::ContactGraphBuilder`] walks every pair of residues that carry alternate
//! conformers. Sequence neighbours are scored by sidechain/backbone sub-terms plus
//! backbone coupling across the peptide bond; all other pairs by a plain atom-pair
//! contact count. [`stats`] keeps the raw counts seen while doing so.

pub mod altconf;
pub mod builder;
pub(crate) mod search;
pub mod stats;
