use std::collections::{BTreeMap, BTreeSet};

/// Weighted contact between two residues of one structure, stored with `residue_a < residue_b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEdge {
    pub residue_a: isize,
    pub residue_b: isize,
    pub weight: f64,
}

impl ContactEdge {
    /// Creates an edge with its endpoints in canonical order.
    pub fn new(first: isize, second: isize, weight: f64) -> Self {
        let (residue_a, residue_b) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        Self {
            residue_a,
            residue_b,
            weight,
        }
    }

    pub fn connects(&self, first: isize, second: isize) -> bool {
        (self.residue_a, self.residue_b) == (first.min(second), first.max(second))
    }
}

/// Residue-level contact network of a single structure.
///
/// Nodes are residue numbers; only edges with a positive weight are kept, and a
/// residue is a node exactly when it takes part in one of them. The graph cannot be
/// modified once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactGraph {
    structure_id: String,
    edges: Vec<ContactEdge>,
}

impl ContactGraph {
    /// Builds a graph from raw edges.
    ///
    /// Self-loops and edges whose weight is not a positive finite number are dropped;
    /// repeated residue pairs keep their summed weight.
    pub fn from_edges<I>(structure_id: &str, edges: I) -> Self
    where
        I: IntoIterator<Item = ContactEdge>,
    {
        let mut merged: BTreeMap<(isize, isize), f64> = BTreeMap::new();
        for edge in edges {
            let edge = ContactEdge::new(edge.residue_a, edge.residue_b, edge.weight);
            if edge.residue_a == edge.residue_b || !edge.weight.is_finite() || edge.weight <= 0.0 {
                continue;
            }
            *merged.entry((edge.residue_a, edge.residue_b)).or_insert(0.0) += edge.weight;
        }

        Self {
            structure_id: structure_id.to_string(),
            edges: merged
                .into_iter()
                .map(|((a, b), weight)| ContactEdge::new(a, b, weight))
                .collect(),
        }
    }

    pub fn empty(structure_id: &str) -> Self {
        Self::from_edges(structure_id, std::iter::empty())
    }

    pub fn structure_id(&self) -> &str {
        &self.structure_id
    }

    /// Edges sorted by `(residue_a, residue_b)`.
    pub fn edges(&self) -> &[ContactEdge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn nodes(&self) -> BTreeSet<isize> {
        self.edges
            .iter()
            .flat_map(|edge| [edge.residue_a, edge.residue_b])
            .collect()
    }

    /// Weight between two residues in either order, 0 when they are not in contact.
    pub fn weight(&self, first: isize, second: isize) -> f64 {
        let key = (first.min(second), first.max(second));
        self.edges
            .binary_search_by(|edge| (edge.residue_a, edge.residue_b).cmp(&key))
            .map_or(0.0, |index| self.edges[index].weight)
    }

    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|edge| edge.weight).sum()
    }

    /// Symmetric `residue -> residue -> weight` view of the graph.
    pub fn to_adjacency(&self) -> BTreeMap<isize, BTreeMap<isize, f64>> {
        let mut adjacency: BTreeMap<isize, BTreeMap<isize, f64>> = BTreeMap::new();
        for edge in &self.edges {
            adjacency
                .entry(edge.residue_a)
                .or_default()
                .insert(edge.residue_b, edge.weight);
            adjacency
                .entry(edge.residue_b)
                .or_default()
                .insert(edge.residue_a, edge.weight);
        }
        adjacency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_new_canonicalizes_endpoints() {
        let edge = ContactEdge::new(12, 5, 1.5);
        assert_eq!((edge.residue_a, edge.residue_b), (5, 12));
        assert!(edge.connects(12, 5));
        assert!(edge.connects(5, 12));
        assert!(!edge.connects(5, 13));
    }

    #[test]
    fn from_edges_drops_invalid_weights_and_self_loops() {
        let graph = ContactGraph::from_edges(
            "2SHV",
            [
                ContactEdge::new(1, 2, 0.0),
                ContactEdge::new(3, 3, 1.0),
                ContactEdge::new(4, 5, f64::NAN),
                ContactEdge::new(6, 7, -1.0),
                ContactEdge::new(9, 8, 2.0),
            ],
        );
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0], ContactEdge::new(8, 9, 2.0));
        assert_eq!(graph.nodes().into_iter().collect::<Vec<_>>(), vec![8, 9]);
    }

    #[test]
    fn from_edges_sorts_and_merges_repeated_pairs() {
        let graph = ContactGraph::from_edges(
            "1ALI",
            [
                ContactEdge::new(10, 4, 1.0),
                ContactEdge::new(2, 3, 0.5),
                ContactEdge::new(4, 10, 0.25),
            ],
        );
        let pairs: Vec<_> = graph
            .edges()
            .iter()
            .map(|e| (e.residue_a, e.residue_b))
            .collect();
        assert_eq!(pairs, vec![(2, 3), (4, 10)]);
        assert!((graph.weight(10, 4) - 1.25).abs() < 1e-12);
        assert!((graph.total_weight() - 1.75).abs() < 1e-12);
    }

    #[test]
    fn weight_is_symmetric_and_zero_when_absent() {
        let graph = ContactGraph::from_edges("X", [ContactEdge::new(1, 5, 3.0)]);
        assert_eq!(graph.weight(1, 5), 3.0);
        assert_eq!(graph.weight(5, 1), 3.0);
        assert_eq!(graph.weight(1, 2), 0.0);
    }

    #[test]
    fn to_adjacency_is_symmetric() {
        let graph = ContactGraph::from_edges(
            "X",
            [ContactEdge::new(1, 2, 1.0), ContactEdge::new(2, 7, 4.0)],
        );
        let adjacency = graph.to_adjacency();
        assert_eq!(adjacency.len(), 3);
        assert_eq!(adjacency[&1][&2], 1.0);
        assert_eq!(adjacency[&2][&1], 1.0);
        assert_eq!(adjacency[&2][&7], 4.0);
        assert_eq!(adjacency[&7][&2], 4.0);
        assert!(!adjacency[&1].contains_key(&7));
    }

    #[test]
    fn empty_graph_has_no_nodes() {
        let graph = ContactGraph::empty("EMPTY");
        assert!(graph.is_empty());
        assert!(graph.nodes().is_empty());
        assert!(graph.to_adjacency().is_empty());
        assert_eq!(graph.structure_id(), "EMPTY");
    }
}
