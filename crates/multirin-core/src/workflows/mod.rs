//! # Workflows Module
//!
//! High-level entry points that tie the `core` inputs and the `engine` machinery into
//! complete analyses.
//!
//! ## Overview
//!
//! A workflow takes already-loaded structures, an alignment and a configuration, and
//! returns finished results together with everything it had to leave out. Progress is
//! reported through a [`ProgressReporter`](crate::engine::progress::ProgressReporter)
//! and single structures, or the whole batch, can be aborted through a
//! [`BatchCancellation`](crate::engine::cancel::BatchCancellation).
//!
//! ## Architecture
//!
//! - **Multi-Network Workflow** ([`multinetwork`]) - Contact graphs for a batch of structures,
//!   registered on the alignment and stacked into one normalized tensor
//! - **Subset Workflow** ([`subset`]) - Per-group tensors selected through a metadata column

pub mod multinetwork;
pub mod subset;
