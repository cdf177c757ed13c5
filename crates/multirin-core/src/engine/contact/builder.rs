use super::altconf::{AltConfResidue, AltConformerIndex};
use super::search::{SearchOutcome, count_contacts};
use super::stats::{ContactCategory, ContactStatistics};
use crate::core::models::atom::Atom;
use crate::core::models::structure::Structure;
use crate::core::topology::backbone::{BackboneTopologyGraph, PairPosition};
use crate::engine::cancel::CancellationToken;
use crate::engine::config::{ConfigError, ContactConfig};
use crate::engine::error::EngineError;
use crate::engine::graph::{ContactEdge, ContactGraph};
use itertools::Itertools;
use tracing::{debug, info, instrument, trace};

/// Builds the alternate-conformer contact graph of a single structure.
///
/// The builder only holds its configuration, validated on construction; all accumulation
/// happens inside one [`build`](Self::build) call, so a builder can be shared across
/// structures and threads.
#[derive(Debug, Clone, Default)]
pub struct ContactGraphBuilder {
    config: ContactConfig,
}

impl ContactGraphBuilder {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` holds values its builder would refuse, e.g.
    /// after a field was edited directly.
    pub fn new(config: ContactConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    pub fn build(
        &self,
        structure: &Structure,
        cancel: Option<&CancellationToken>,
    ) -> Result<ContactGraph, EngineError> {
        self.build_with_statistics(structure, cancel)
            .map(|(graph, _)| graph)
    }

    /// Builds the graph and returns the raw per-category counts seen along the way.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] if `cancel` fires before every residue pair
    /// has been evaluated.
    #[instrument(skip_all, name = "contact_graph_build", fields(structure = structure.name()))]
    pub fn build_with_statistics(
        &self,
        structure: &Structure,
        cancel: Option<&CancellationToken>,
    ) -> Result<(ContactGraph, ContactStatistics), EngineError> {
        let index = AltConformerIndex::from_structure(structure);
        debug!(alt_conf_residues = index.len(), "Indexed alternate-conformer residues.");

        let mut statistics = ContactStatistics::new();
        let mut edges = Vec::new();

        for (first, second) in index.iter().tuple_combinations() {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(EngineError::Cancelled {
                    structure: structure.name().to_string(),
                });
            }

            let adjacent = second.residue_number == first.residue_number + 1;
            if adjacent && (first.is_amide_hydrogen_only() || second.is_amide_hydrogen_only()) {
                trace!(
                    first = first.residue_number,
                    second = second.residue_number,
                    "Skipping sequence neighbours with amide-hydrogen-only conformers."
                );
                continue;
            }

            let weight = if adjacent {
                self.adjacent_weight(first, second, &mut statistics)
            } else {
                self.non_adjacent_weight(first, second, &mut statistics)
            };

            match weight {
                Some(w) if w > 0.0 => {
                    edges.push(ContactEdge::new(first.residue_number, second.residue_number, w))
                }
                Some(_) => {}
                None => trace!(
                    first = first.residue_number,
                    second = second.residue_number,
                    "Residue pair abandoned beyond the too-far cutoff."
                ),
            }
        }

        let graph = ContactGraph::from_edges(structure.name(), edges);
        statistics.log(structure.name());
        info!(
            nodes = graph.nodes().len(),
            edges = graph.edge_count(),
            "Contact graph built."
        );
        Ok((graph, statistics))
    }

    /// Scale applied to every raw count of a residue pair.
    fn size_factor(&self, first: &AltConfResidue, second: &AltConfResidue) -> f64 {
        if !self.config.normalize_by_residue_size {
            return 1.0;
        }
        let total_atoms = (first.atom_count + second.atom_count).max(1);
        10.0 / total_atoms as f64
    }

    fn search(&self, first: &[&Atom], second: &[&Atom], exclusions: &[String]) -> Option<usize> {
        match count_contacts(first, second, &self.config, exclusions) {
            SearchOutcome::Count(count) => Some(count),
            SearchOutcome::TooFar => None,
        }
    }

    fn non_adjacent_weight(
        &self,
        first: &AltConfResidue,
        second: &AltConfResidue,
        statistics: &mut ContactStatistics,
    ) -> Option<f64> {
        let count = self.search(first.atoms(), second.atoms(), &[])?;
        statistics.record(ContactCategory::NonAdjacent, count);
        Some(count as f64 * self.size_factor(first, second))
    }

    fn adjacent_weight(
        &self,
        first: &AltConfResidue,
        second: &AltConfResidue,
        statistics: &mut ContactStatistics,
    ) -> Option<f64> {
        let exclusions = &self.config.mixed_exclusions;
        let (first_bb, first_sc) = (first.backbone_atoms(), first.sidechain_atoms());
        let (second_bb, second_sc) = (second.backbone_atoms(), second.sidechain_atoms());

        let sc_sc = self.search(&first_sc, &second_sc, &[])?;
        let sc_bb = self.search(&first_sc, &second_bb, exclusions)?;
        let bb_sc = self.search(&first_bb, &second_sc, exclusions)?;
        let bb_bb = self.backbone_coupling(first, second);

        statistics.record(ContactCategory::SidechainSidechain, sc_sc);
        statistics.record(ContactCategory::SidechainBackbone, sc_bb);
        statistics.record(ContactCategory::BackboneSidechain, bb_sc);
        if let Some(bb_bb) = bb_bb {
            statistics.record(ContactCategory::BackboneBackbone, bb_bb);
        }

        let raw = bb_bb.unwrap_or(0) + sc_bb + bb_sc + sc_sc;
        Some(raw as f64 * self.size_factor(first, second))
    }

    /// Label-reachability count across the peptide bond, summed over shared labels.
    ///
    /// `None` when coupling is disabled or the preceding residue has no alternate `C`
    /// or the following one no alternate `N`.
    fn backbone_coupling(&self, first: &AltConfResidue, second: &AltConfResidue) -> Option<usize> {
        if !self.config.include_backbone_coupling
            || !first.has_alt_conf_atom("C")
            || !second.has_alt_conf_atom("N")
        {
            return None;
        }

        let topology = BackboneTopologyGraph::for_pair(first.residue_type, second.residue_type);
        let shared_labels = first
            .alt_loc_labels()
            .intersection(&second.alt_loc_labels())
            .copied()
            .collect::<Vec<_>>();

        let total = shared_labels
            .into_iter()
            .map(|label| {
                topology.count_labelled_reachable(|node| {
                    let residue = match node.position {
                        PairPosition::Preceding => first,
                        PairPosition::Following => second,
                    };
                    residue.role_has_label(node.role, label)
                })
            })
            .sum();
        Some(total)
    }
}
