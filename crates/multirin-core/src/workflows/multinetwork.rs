use crate::core::alignment::msa::SequenceAlignment;
use crate::core::models::structure::Structure;
use crate::engine::aggregate::aggregator::{NetworkAggregator, RejectedStructure, StructureNetwork};
use crate::engine::aggregate::tensor::MultiNetworkTensor;
use crate::engine::cancel::BatchCancellation;
use crate::engine::config::NetworkConfig;
use crate::engine::contact::builder::ContactGraphBuilder;
use crate::engine::error::EngineError;
use crate::engine::graph::ContactGraph;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug)]
pub struct MultiNetworkResult {
    /// Normalized tensor over the accepted structures.
    pub tensor: MultiNetworkTensor,
    /// Additive tensor before normalization, over the same structures.
    pub raw: MultiNetworkTensor,
    /// Contact graphs of every structure whose build finished, in input order.
    pub graphs: Vec<ContactGraph>,
    pub rejected: Vec<RejectedStructure>,
}

impl MultiNetworkResult {
    pub fn graph(&self, structure_id: &str) -> Option<&ContactGraph> {
        self.graphs
            .iter()
            .find(|graph| graph.structure_id() == structure_id)
    }

    pub fn is_rejected(&self, structure_id: &str) -> bool {
        self.rejected
            .iter()
            .any(|rejected| rejected.structure_id == structure_id)
    }
}

/// Builds one contact graph per structure and aggregates them on `alignment`.
///
/// Each structure polls its own scope of `cancel`, so cancelling one structure leaves the
/// others building. Structures that are cancelled, cannot be mapped or fail the integrity
/// check are listed in [`MultiNetworkResult::rejected`]; the rest of the batch is unaffected.
///
/// # Errors
///
/// Returns [`EngineError::Config`] if `config` holds invalid values.
#[instrument(skip_all, name = "multinetwork_workflow", fields(structures = structures.len()))]
pub fn run(
    structures: &[Structure],
    alignment: &SequenceAlignment,
    config: &NetworkConfig,
    reporter: &ProgressReporter,
    cancel: Option<&BatchCancellation>,
) -> Result<MultiNetworkResult, EngineError> {
    let builder = ContactGraphBuilder::new(config.contact.clone())?;
    let aggregator = NetworkAggregator::new(alignment, config.aggregation.clone())?;

    // === Phase 1: Per-structure contact graphs ===
    let (networks, mut rejected) = build_networks(structures, &builder, reporter, cancel);

    // === Phase 2: Alignment registration and aggregation ===
    reporter.report(Progress::PhaseStart {
        name: "Aggregation",
    });
    info!(
        "Aggregating {} network(s) over {} alignment column(s).",
        networks.len(),
        alignment.num_columns()
    );
    let outcome = aggregator.add_networks(&networks);
    for entry in &outcome.rejected {
        reporter.report(Progress::Message(format!(
            "{} rejected: {}",
            entry.structure_id, entry.reason
        )));
    }
    rejected.extend(outcome.rejected);
    reporter.report(Progress::PhaseFinish);

    info!(
        accepted = outcome.tensor.num_structures(),
        rejected = rejected.len(),
        "Workflow complete."
    );

    Ok(MultiNetworkResult {
        tensor: outcome.tensor,
        raw: outcome.raw,
        graphs: networks.into_iter().map(|network| network.graph).collect(),
        rejected,
    })
}

fn build_networks(
    structures: &[Structure],
    builder: &ContactGraphBuilder,
    reporter: &ProgressReporter,
    cancel: Option<&BatchCancellation>,
) -> (Vec<StructureNetwork>, Vec<RejectedStructure>) {
    reporter.report(Progress::PhaseStart {
        name: "Contact Graphs",
    });
    info!("Building contact graphs for {} structure(s).", structures.len());

    reporter.report(Progress::TaskStart {
        total: structures.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = structures.iter();

    #[cfg(feature = "parallel")]
    let iterator = structures.par_iter();

    let results: Vec<Result<StructureNetwork, EngineError>> = iterator
        .map(|structure| {
            let token = cancel.map(|scopes| scopes.token_for(structure.name()));
            let result = builder
                .build(structure, token.as_ref())
                .map(|graph| StructureNetwork::from_structure(graph, structure));
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect();
    reporter.report(Progress::TaskFinish);

    let mut networks = Vec::with_capacity(results.len());
    let mut rejected = Vec::new();
    for (structure, result) in structures.iter().zip(results) {
        match result {
            Ok(network) => networks.push(network),
            Err(error) => {
                warn!(structure = structure.name(), %error, "Contact graph build failed.");
                reporter.report(Progress::Message(format!(
                    "{} rejected: {}",
                    structure.name(),
                    error
                )));
                rejected.push(RejectedStructure {
                    structure_id: structure.name().to_string(),
                    reason: error,
                });
            }
        }
    }

    reporter.report(Progress::PhaseFinish);
    (networks, rejected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::mapper::MappingError;
    use crate::core::models::atom::Atom;
    use crate::core::models::chain::ChainType;
    use crate::engine::config::ConfigError;
    use nalgebra::Point3;
    use std::sync::Mutex;

    /// Serines numbered `first..first + count`; every other residue starting at the
    /// first carries two alternate `OG` positions, spaced 3 Angstroms apart along x.
    fn alternating_structure(name: &str, first: isize, count: isize) -> Structure {
        let mut structure = Structure::new(name);
        let chain = structure.add_chain('A', ChainType::Protein);
        for offset in 0..count {
            let number = first + offset;
            let residue = structure.add_residue(chain, number, "SER", true).unwrap();
            let x = offset as f64 * 1.5;
            if offset % 2 == 0 {
                for (label, y) in [('A', 0.0), ('B', 0.5)] {
                    structure
                        .add_atom_to_residue(
                            residue,
                            Atom::new("OG", residue, Point3::new(x, y, 0.0)).with_alt_loc(label),
                        )
                        .unwrap();
                }
            } else {
                structure
                    .add_atom_to_residue(residue, Atom::new("CA", residue, Point3::new(x, 5.0, 0.0)))
                    .unwrap();
            }
        }
        structure
    }

    fn alignment() -> SequenceAlignment {
        SequenceAlignment::new([("2SHV", "SSSSSS"), ("1ALI", "SSSSSS"), ("3GAP", "--SSSS")])
            .unwrap()
    }

    #[test]
    fn offset_numbering_lands_on_identical_columns() {
        let structures = vec![
            alternating_structure("2SHV", 1, 6),
            alternating_structure("1ALI", 5, 6),
        ];
        let result = run(
            &structures,
            &alignment(),
            &NetworkConfig::default(),
            &ProgressReporter::new(),
            None,
        )
        .unwrap();

        assert!(result.rejected.is_empty());
        let shv = result.graph("2SHV").unwrap();
        let ali = result.graph("1ALI").unwrap();
        assert!(shv.weight(1, 3) > 0.0);
        assert!((shv.weight(1, 3) - ali.weight(5, 7)).abs() < 1e-9);

        let tensor = &result.tensor;
        let first = tensor.get("2SHV", 1, 3).unwrap();
        assert!(first > 0.0);
        assert!((first - tensor.get("1ALI", 1, 3).unwrap()).abs() < 1e-9);
        assert!((tensor.get("2SHV", 3, 5).unwrap() - tensor.get("1ALI", 3, 5).unwrap()).abs() < 1e-9);
        assert!(tensor.check_integrity().is_empty());
    }

    #[test]
    fn normalized_slices_peak_at_structure_scale() {
        let structures = vec![
            alternating_structure("2SHV", 1, 6),
            alternating_structure("3GAP", 20, 4),
        ];
        let result = run(
            &structures,
            &alignment(),
            &NetworkConfig::default(),
            &ProgressReporter::new(),
            None,
        )
        .unwrap();

        for id in ["2SHV", "3GAP"] {
            let max = result
                .tensor
                .slice(id)
                .unwrap()
                .iter()
                .copied()
                .fold(0.0, f64::max);
            assert!((max - 10.0).abs() < 1e-9, "{id} peaks at {max}");
        }
        // Residues 20 and 22 of 3GAP sit behind two leading gaps.
        assert!(result.tensor.get("3GAP", 3, 5).unwrap() > 0.0);
        assert_eq!(result.tensor.get("3GAP", 1, 3), Some(0.0));
    }

    #[test]
    fn unaligned_structure_is_rejected_without_failing_batch() {
        let structures = vec![
            alternating_structure("2SHV", 1, 6),
            alternating_structure("GHOST", 1, 6),
        ];
        let result = run(
            &structures,
            &alignment(),
            &NetworkConfig::default(),
            &ProgressReporter::new(),
            None,
        )
        .unwrap();

        assert_eq!(result.tensor.structure_ids(), &["2SHV"]);
        assert!(result.is_rejected("GHOST"));
        assert!(matches!(
            result.rejected[0].reason,
            EngineError::Mapping {
                source: MappingError::UnknownStructure(_)
            }
        ));
        // The graph itself was built before registration failed.
        assert!(result.graph("GHOST").is_some());
    }

    #[test]
    fn cancelling_the_batch_rejects_every_structure() {
        let cancel = BatchCancellation::new();
        cancel.cancel_all();
        let structures = vec![alternating_structure("2SHV", 1, 6)];
        let result = run(
            &structures,
            &alignment(),
            &NetworkConfig::default(),
            &ProgressReporter::new(),
            Some(&cancel),
        )
        .unwrap();

        assert_eq!(result.tensor.num_structures(), 0);
        assert!(result.graphs.is_empty());
        assert!(matches!(
            result.rejected[0].reason,
            EngineError::Cancelled { ref structure } if structure == "2SHV"
        ));
    }

    #[test]
    fn cancelling_one_structure_leaves_the_rest_of_the_batch() {
        let cancel = BatchCancellation::new();
        cancel.cancel_structure("1ALI");
        let structures = vec![
            alternating_structure("2SHV", 1, 6),
            alternating_structure("1ALI", 5, 6),
            alternating_structure("3GAP", 20, 4),
        ];
        let result = run(
            &structures,
            &alignment(),
            &NetworkConfig::default(),
            &ProgressReporter::new(),
            Some(&cancel),
        )
        .unwrap();

        assert_eq!(result.tensor.structure_ids(), &["2SHV", "3GAP"]);
        assert_eq!(result.rejected.len(), 1);
        assert!(matches!(
            result.rejected[0].reason,
            EngineError::Cancelled { ref structure } if structure == "1ALI"
        ));
        assert!(result.graph("1ALI").is_none());
    }

    #[cfg(not(feature = "parallel"))]
    #[test]
    fn cancelling_mid_batch_only_stops_the_targeted_structure() {
        let cancel = BatchCancellation::new();
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if event == Progress::TaskIncrement {
                cancel.cancel_structure("1ALI");
            }
        }));
        let structures = vec![
            alternating_structure("2SHV", 1, 6),
            alternating_structure("1ALI", 5, 6),
            alternating_structure("3GAP", 20, 4),
        ];
        let result = run(
            &structures,
            &alignment(),
            &NetworkConfig::default(),
            &reporter,
            Some(&cancel),
        )
        .unwrap();

        assert_eq!(result.tensor.structure_ids(), &["2SHV", "3GAP"]);
        assert!(result.is_rejected("1ALI"));
    }

    #[test]
    fn progress_events_follow_phases() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let structures = vec![
            alternating_structure("2SHV", 1, 6),
            alternating_structure("1ALI", 5, 6),
        ];
        run(&structures, &alignment(), &NetworkConfig::default(), &reporter, None).unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert_eq!(
            events,
            vec![
                Progress::PhaseStart {
                    name: "Contact Graphs"
                },
                Progress::TaskStart { total: 2 },
                Progress::TaskIncrement,
                Progress::TaskIncrement,
                Progress::TaskFinish,
                Progress::PhaseFinish,
                Progress::PhaseStart {
                    name: "Aggregation"
                },
                Progress::PhaseFinish,
            ]
        );
    }

    #[test]
    fn invalid_configuration_is_reported_before_any_work() {
        let mut config = NetworkConfig::default();
        config.aggregation.structure_scale = -1.0;
        let result = run(
            &[alternating_structure("2SHV", 1, 6)],
            &alignment(),
            &config,
            &ProgressReporter::new(),
            None,
        );
        assert!(matches!(
            result,
            Err(EngineError::Config(ConfigError::InvalidParameter {
                name: "structure_scale",
                ..
            }))
        ));
    }
}
