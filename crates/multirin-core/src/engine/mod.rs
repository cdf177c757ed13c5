//! # Engine Module
//!
//! This module holds the stateful machinery of the analysis: building one contact graph
//! per structure and stacking those graphs into a single alignment-indexed tensor.
//!
//! ## Overview
//!
//! A [`contact::builder::ContactGraphBuilder`] turns the alternate conformers of a
//! structure into a weighted residue graph. A [`aggregate::aggregator::NetworkAggregator`]
//! projects many such graphs onto alignment columns, normalizes them and checks that
//! every slice is symmetric with an empty diagonal before handing the tensor out.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Distance windows, normalization and scaling settings
//! - **Contact Graphs** ([`contact`]) - Alternate-conformer indexing, contact search and statistics
//! - **Graph Model** ([`graph`]) - Canonical edge lists and adjacency maps
//! - **Aggregation** ([`aggregate`]) - Dense multi-structure tensor and its transformations
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Cancellation** ([`cancel`]) - Cooperative abort of long graph builds
//! - **Error Handling** ([`error`]) - Engine-level error types
//!
//! ## Key Capabilities
//!
//! - **Parallel construction** of per-structure graphs and slices behind the `parallel` feature
//! - **Per-structure rejection** so one bad structure never sinks a batch
//! - **Immutable derivations** of normalized and scaled tensors from the raw one

pub mod aggregate;
pub mod cancel;
pub mod config;
pub mod contact;
pub mod error;
pub mod graph;
pub mod progress;
