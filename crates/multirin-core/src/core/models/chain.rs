use super::ids::ResidueId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Entity class of a chain, following the mmCIF `_entity.type` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainType {
    Protein,
    Ligand,
    Water,
    Other,
}

impl ChainType {
    /// Whether residues of this chain can take part in the contact network.
    ///
    /// Ligand and water chains never do, whatever their residues' polymer flags say.
    pub fn holds_polymer(self) -> bool {
        matches!(self, ChainType::Protein | ChainType::Other)
    }
}

#[derive(Debug, Error)]
#[error("Unrecognized entity type '{0}'")]
pub struct ParseChainTypeError(pub String);

impl FromStr for ChainType {
    type Err = ParseChainTypeError;

    /// Accepts the mmCIF entity types (`polymer`, `non-polymer`, `water`, `branched`,
    /// `macrolide`) as well as the plain names of the variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "polymer" | "protein" => Ok(ChainType::Protein),
            "non-polymer" | "ligand" => Ok(ChainType::Ligand),
            "water" => Ok(ChainType::Water),
            "branched" | "macrolide" | "other" => Ok(ChainType::Other),
            _ => Err(ParseChainTypeError(s.to_string())),
        }
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChainType::Protein => "polymer",
            ChainType::Ligand => "non-polymer",
            ChainType::Water => "water",
            ChainType::Other => "other",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: char,
    pub chain_type: ChainType,
    /// Residues in the order the reader added them, expected to be sequence order.
    pub(crate) residues: Vec<ResidueId>,
}

impl Chain {
    pub(crate) fn new(id: char, chain_type: ChainType) -> Self {
        Self {
            id,
            chain_type,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}
