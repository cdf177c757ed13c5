use crate::core::models::residue::ResidueType;
use phf::{Map, phf_map};
use std::collections::BTreeSet;

static BACKBONE_ROLES: Map<&'static str, BackboneRole> = phf_map! {
    "N" => BackboneRole::N,
    "H" => BackboneRole::H,
    "HN" => BackboneRole::H,
    "CA" => BackboneRole::CA,
    "HA" => BackboneRole::HA,
    "HA2" => BackboneRole::HA2,
    "HA3" => BackboneRole::HA3,
    "C" => BackboneRole::C,
    "O" => BackboneRole::O,
};

/// Canonical backbone atom roles that take part in the peptide-bond topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackboneRole {
    /// Amide nitrogen.
    N,
    /// Amide hydrogen (absent in proline).
    H,
    /// Alpha carbon.
    CA,
    /// Alpha hydrogen of non-glycine residues.
    HA,
    /// First alpha hydrogen of glycine.
    HA2,
    /// Second alpha hydrogen of glycine.
    HA3,
    /// Carbonyl carbon.
    C,
    /// Carbonyl oxygen.
    O,
}

impl BackboneRole {
    const ALL: [BackboneRole; 8] = [
        BackboneRole::N,
        BackboneRole::H,
        BackboneRole::CA,
        BackboneRole::HA,
        BackboneRole::HA2,
        BackboneRole::HA3,
        BackboneRole::C,
        BackboneRole::O,
    ];

    pub fn from_atom_name(name: &str) -> Option<Self> {
        BACKBONE_ROLES.get(name.trim()).copied()
    }

    /// Atom names that may fill this role, preferred name first.
    pub fn atom_names(&self) -> &'static [&'static str] {
        match self {
            BackboneRole::N => &["N"],
            BackboneRole::H => &["H", "HN"],
            BackboneRole::CA => &["CA"],
            BackboneRole::HA => &["HA"],
            BackboneRole::HA2 => &["HA2"],
            BackboneRole::HA3 => &["HA3"],
            BackboneRole::C => &["C"],
            BackboneRole::O => &["O"],
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Which residue of the adjacent pair a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PairPosition {
    /// Residue `i`, contributing the carbonyl of the peptide bond (suffix `_1`).
    Preceding,
    /// Residue `i + 1`, contributing the amide of the peptide bond (suffix `_2`).
    Following,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackboneNode {
    pub role: BackboneRole,
    pub position: PairPosition,
}

impl BackboneNode {
    pub const fn new(role: BackboneRole, position: PairPosition) -> Self {
        Self { role, position }
    }

    fn bit(&self) -> u16 {
        let offset = match self.position {
            PairPosition::Preceding => 0,
            PairPosition::Following => BackboneRole::ALL.len(),
        };
        1 << (offset + self.role.index())
    }
}

/// Directed covalent path across the peptide bond between residues `i` and `i + 1`.
///
/// Edges point away from the amide nitrogen of the following residue:
///
/// ```text
/// N_2 -> C_1, H_2, CA_2      CA_2 -> C_2, HA_2
/// C_1 -> O_1, CA_1           CA_1 -> HA_1, N_1
/// N_1 -> H_1
/// ```
///
/// Proline has no amide hydrogen, so its `N -> H` edge is dropped. Glycine carries two
/// non-stereospecific alpha hydrogens, so its `CA -> HA` edge becomes `CA -> HA2` and
/// `CA -> HA3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackboneTopologyGraph {
    edges: Vec<(BackboneNode, BackboneNode)>,
}

impl BackboneTopologyGraph {
    pub const ROOT: BackboneNode = BackboneNode::new(BackboneRole::N, PairPosition::Following);

    /// Builds the graph for a preceding/following residue pair of the given types.
    pub fn for_pair(preceding: Option<ResidueType>, following: Option<ResidueType>) -> Self {
        use BackboneRole::*;
        use PairPosition::*;

        let mut edges = vec![
            (BackboneNode::new(N, Following), BackboneNode::new(C, Preceding)),
            (BackboneNode::new(N, Following), BackboneNode::new(CA, Following)),
            (BackboneNode::new(CA, Following), BackboneNode::new(C, Following)),
            (BackboneNode::new(C, Preceding), BackboneNode::new(O, Preceding)),
            (BackboneNode::new(C, Preceding), BackboneNode::new(CA, Preceding)),
            (BackboneNode::new(CA, Preceding), BackboneNode::new(N, Preceding)),
        ];

        for (position, residue_type) in [(Preceding, preceding), (Following, following)] {
            if residue_type != Some(ResidueType::Proline) {
                edges.push((BackboneNode::new(N, position), BackboneNode::new(H, position)));
            }
            if residue_type == Some(ResidueType::Glycine) {
                edges.push((BackboneNode::new(CA, position), BackboneNode::new(HA2, position)));
                edges.push((BackboneNode::new(CA, position), BackboneNode::new(HA3, position)));
            } else {
                edges.push((BackboneNode::new(CA, position), BackboneNode::new(HA, position)));
            }
        }

        Self { edges }
    }

    pub fn edges(&self) -> &[(BackboneNode, BackboneNode)] {
        &self.edges
    }

    pub fn contains_edge(&self, from: BackboneNode, to: BackboneNode) -> bool {
        self.edges.iter().any(|&(a, b)| a == from && b == to)
    }

    pub fn successors(&self, node: BackboneNode) -> impl Iterator<Item = BackboneNode> + '_ {
        self.edges
            .iter()
            .filter(move |(from, _)| *from == node)
            .map(|&(_, to)| to)
    }

    pub fn nodes(&self) -> BTreeSet<BackboneNode> {
        self.edges.iter().flat_map(|&(a, b)| [a, b]).collect()
    }

    /// Counts the nodes reachable from [`Self::ROOT`] through an unbroken run of nodes
    /// for which `carries_label` holds. The root itself counts; if it does not carry
    /// the label the count is zero.
    pub fn count_labelled_reachable<F>(&self, carries_label: F) -> usize
    where
        F: Fn(BackboneNode) -> bool,
    {
        if !carries_label(Self::ROOT) {
            return 0;
        }

        let mut visited = Self::ROOT.bit();
        let mut worklist = vec![Self::ROOT];
        let mut count = 0;

        while let Some(node) = worklist.pop() {
            count += 1;
            for next in self.successors(node) {
                if visited & next.bit() == 0 && carries_label(next) {
                    visited |= next.bit();
                    worklist.push(next);
                }
            }
        }

        count
    }
}

/// Whether an atom name belongs to the backbone node set of any graph variant.
pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ROLES.contains_key(atom_name.trim())
}

pub fn is_amide_hydrogen(atom_name: &str) -> bool {
    BackboneRole::from_atom_name(atom_name) == Some(BackboneRole::H)
}
