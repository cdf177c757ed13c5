use super::tensor::MultiNetworkTensor;
use crate::core::alignment::mapper::{AlignmentIndexMapper, MappingError};
use crate::core::alignment::msa::SequenceAlignment;
use crate::core::models::structure::Structure;
use crate::engine::config::{AggregationConfig, ConfigError};
use crate::engine::error::EngineError;
use crate::engine::graph::ContactGraph;
use ndarray::Array2;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A contact graph together with the residue numbering needed to place it on the alignment.
#[derive(Debug, Clone)]
pub struct StructureNetwork {
    pub graph: ContactGraph,
    /// Ordered polymer residue numbers of the source structure.
    pub residue_numbers: Vec<isize>,
}

impl StructureNetwork {
    pub fn new(graph: ContactGraph, residue_numbers: Vec<isize>) -> Self {
        Self {
            graph,
            residue_numbers,
        }
    }

    pub fn from_structure(graph: ContactGraph, structure: &Structure) -> Self {
        Self::new(graph, structure.residue_numbers())
    }

    pub fn structure_id(&self) -> &str {
        self.graph.structure_id()
    }
}

/// A structure left out of the aggregated tensor and why.
#[derive(Debug)]
pub struct RejectedStructure {
    pub structure_id: String,
    pub reason: EngineError,
}

#[derive(Debug)]
pub struct AggregationOutcome {
    /// Additive per-structure contributions before any normalization.
    pub raw: MultiNetworkTensor,
    /// Normalized, scaled and sanitized tensor that passed the integrity check.
    pub tensor: MultiNetworkTensor,
    pub rejected: Vec<RejectedStructure>,
}

/// Projects per-structure contact graphs onto alignment columns and stacks them.
pub struct NetworkAggregator<'a> {
    mapper: AlignmentIndexMapper<'a>,
    config: AggregationConfig,
}

impl<'a> NetworkAggregator<'a> {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a scale in `config` is not a positive finite number.
    pub fn new(
        alignment: &'a SequenceAlignment,
        config: AggregationConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            mapper: AlignmentIndexMapper::new(alignment),
            config,
        })
    }

    pub fn num_columns(&self) -> usize {
        self.mapper.alignment().num_columns()
    }

    /// Aggregates `networks` into one `(structure, column, column)` tensor.
    ///
    /// A structure whose residues cannot all be mapped, that repeats an earlier
    /// identifier, or whose slice breaks the symmetry/zero-diagonal invariant is
    /// reported in [`AggregationOutcome::rejected`] and left out of both tensors.
    #[instrument(skip_all, name = "network_aggregation", fields(structures = networks.len()))]
    pub fn add_networks(&self, networks: &[StructureNetwork]) -> AggregationOutcome {
        let mut rejected = Vec::new();
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(networks.len());
        for network in networks {
            if seen.insert(network.structure_id()) {
                unique.push(network);
            } else {
                warn!(structure = network.structure_id(), "Duplicate structure skipped.");
                rejected.push(RejectedStructure {
                    structure_id: network.structure_id().to_string(),
                    reason: EngineError::DuplicateStructure(network.structure_id().to_string()),
                });
            }
        }

        #[cfg(not(feature = "parallel"))]
        let iterator = unique.iter();

        #[cfg(feature = "parallel")]
        let iterator = unique.par_iter();

        let results: Vec<Result<Array2<f64>, MappingError>> =
            iterator.map(|network| self.build_slice(network)).collect();

        let mut accepted_ids = Vec::new();
        let mut slices = Vec::new();
        for (network, result) in unique.iter().zip(results) {
            match result {
                Ok(slice) => {
                    accepted_ids.push(network.structure_id().to_string());
                    slices.push(slice);
                }
                Err(error) => {
                    warn!(structure = network.structure_id(), %error, "Structure rejected.");
                    rejected.push(RejectedStructure {
                        structure_id: network.structure_id().to_string(),
                        reason: error.into(),
                    });
                }
            }
        }

        let mut raw = MultiNetworkTensor::zeros(accepted_ids, self.num_columns());
        for (index, slice) in slices.iter().enumerate() {
            raw.assign_slice(index, slice);
        }

        let mut tensor = self.derive(&raw);

        let violations = tensor.check_integrity();
        if !violations.is_empty() {
            let failed: Vec<String> = violations.iter().map(|v| v.structure().to_string()).collect();
            tensor = tensor.without(failed.iter().map(String::as_str));
            raw = raw.without(failed.iter().map(String::as_str));
            for violation in violations {
                warn!(structure = violation.structure(), %violation, "Structure failed integrity check.");
                rejected.push(RejectedStructure {
                    structure_id: violation.structure().to_string(),
                    reason: violation.into(),
                });
            }
        }

        info!(
            accepted = tensor.num_structures(),
            rejected = rejected.len(),
            columns = tensor.num_columns(),
            "Aggregated contact networks."
        );

        AggregationOutcome {
            raw,
            tensor,
            rejected,
        }
    }

    /// Applies the configured normalization and scaling, then clears non-finite cells.
    pub fn derive(&self, raw: &MultiNetworkTensor) -> MultiNetworkTensor {
        let mut tensor = if self.config.normalize_per_structure {
            debug!(scale = self.config.structure_scale, "Normalizing each structure.");
            raw.normalized_per_structure(self.config.structure_scale)
        } else {
            raw.clone()
        };
        if let Some(scale) = self.config.global_scale {
            debug!(scale, "Scaling the whole tensor.");
            tensor = tensor.scaled_globally(scale);
        }
        tensor.sanitized()
    }

    /// Dense slice of one structure, with each edge written symmetrically.
    fn build_slice(&self, network: &StructureNetwork) -> Result<Array2<f64>, MappingError> {
        let structure = network.structure_id();
        if !self.mapper.alignment().contains(structure) {
            return Err(MappingError::UnknownStructure(structure.to_string()));
        }
        let columns: HashMap<isize, usize> = network
            .graph
            .nodes()
            .into_iter()
            .map(|residue| {
                self.mapper
                    .to_alignment_column(structure, &network.residue_numbers, residue)
                    .map(|column| (residue, column - 1))
            })
            .collect::<Result<_, _>>()?;

        let size = self.num_columns();
        let mut slice = Array2::zeros((size, size));
        for edge in network.graph.edges() {
            let a = columns[&edge.residue_a];
            let b = columns[&edge.residue_b];
            slice[[a, b]] += edge.weight;
            slice[[b, a]] += edge.weight;
        }

        debug!(structure, edges = network.graph.edge_count(), "Placed network on alignment.");
        Ok(slice)
    }
}
