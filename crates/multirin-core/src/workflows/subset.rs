use crate::core::alignment::msa::SequenceAlignment;
use crate::core::io::metadata::{MetadataError, StructureMetadata, ValueBins};
use crate::engine::aggregate::tensor::MultiNetworkTensor;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, instrument, warn};

/// A group of structures cut out of an aggregated tensor, with its alignment rows and metadata.
#[derive(Debug, Clone)]
pub struct NetworkSubset {
    pub tensor: MultiNetworkTensor,
    /// Alignment rows of the group; the column count of the full alignment is kept.
    pub alignment: SequenceAlignment,
    pub metadata: StructureMetadata,
}

/// How metadata values are turned into groups.
#[derive(Debug, Clone, Copy, Default)]
pub enum Grouping<'a> {
    /// One group per distinct value.
    #[default]
    Distinct,
    /// One group per numeric bin, labelled `"{left}-{right}"`.
    Binned(&'a ValueBins),
}

/// Splits `tensor` into per-group subsets along a metadata column.
///
/// Each group is intersected with the structures present in the tensor; groups with no
/// structure left are skipped. When `group` is given only that group is produced.
///
/// # Errors
///
/// Returns [`MetadataError`] if `classifier` is not a column, a binned column holds a
/// non-numeric value, or `group` does not occur in the column.
#[instrument(skip_all, name = "subset_workflow", fields(classifier = classifier))]
pub fn by_metadata(
    tensor: &MultiNetworkTensor,
    alignment: &SequenceAlignment,
    metadata: &StructureMetadata,
    classifier: &str,
    grouping: Grouping,
    group: Option<&str>,
) -> Result<BTreeMap<String, NetworkSubset>, MetadataError> {
    let mut groups = match grouping {
        Grouping::Distinct => metadata.groups_by(classifier)?,
        Grouping::Binned(bins) => metadata.groups_by_bins(classifier, bins)?,
    };

    if let Some(name) = group {
        let members = groups
            .remove(name)
            .ok_or_else(|| MetadataError::UnknownGroup {
                classifier: classifier.to_string(),
                group: name.to_string(),
            })?;
        groups = BTreeMap::from([(name.to_string(), members)]);
    }

    let present: HashSet<&str> = tensor.structure_ids().iter().map(String::as_str).collect();
    let mut subsets = BTreeMap::new();

    for (name, members) in groups {
        let shared: Vec<&str> = members
            .iter()
            .map(String::as_str)
            .filter(|id| present.contains(id))
            .collect();
        if shared.is_empty() {
            warn!(group = %name, "No structures of this group are in the tensor.");
            continue;
        }

        let Some(aligned) = alignment.subset(shared.iter().copied()) else {
            warn!(group = %name, "No structures of this group are in the alignment.");
            continue;
        };

        debug!(group = %name, structures = shared.len(), "Built subset.");
        subsets.insert(
            name,
            NetworkSubset {
                tensor: tensor.subset(shared.iter().copied()),
                alignment: aligned,
                metadata: metadata.subset(shared.iter().copied()),
            },
        );
    }

    info!(groups = subsets.len(), "Split tensor by metadata.");
    Ok(subsets)
}
