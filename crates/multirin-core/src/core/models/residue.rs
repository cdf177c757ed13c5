use super::ids::{AtomId, ChainId};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResidueType {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // Alanine (ALA)
    Glycine,    // Glycine (GLY)
    Isoleucine, // Isoleucine (ILE)
    Leucine,    // Leucine (LEU)
    Proline,    // Proline (PRO)
    Valine,     // Valine (VAL)

    // --- Aromatic ---
    Phenylalanine, // Phenylalanine (PHE)
    Tryptophan,    // Tryptophan (TRP)
    Tyrosine,      // Tyrosine (TYR)

    // --- Polar, Uncharged ---
    Asparagine, // Asparagine (ASN)
    Cysteine,   // Cysteine (CYS)
    Glutamine,  // Glutamine (GLN)
    Serine,     // Serine (SER)
    Threonine,  // Threonine (THR)
    Methionine, // Methionine (MET)

    // --- Positively Charged (Basic) ---
    Arginine,  // Arginine (ARG)
    Histidine, // Histidine (HIS)
    Lysine,    // Lysine (LYS)

    // --- Negatively Charged (Acidic) ---
    AsparticAcid, // Aspartic Acid (ASP)
    GlutamicAcid, // Glutamic Acid (GLU)
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown residue name: '{0}'")]
pub struct ParseResidueTypeError(pub String);

impl ResidueType {
    pub fn to_three_letter(&self) -> &'static str {
        match self {
            ResidueType::Alanine => "ALA",
            ResidueType::Glycine => "GLY",
            ResidueType::Isoleucine => "ILE",
            ResidueType::Leucine => "LEU",
            ResidueType::Proline => "PRO",
            ResidueType::Valine => "VAL",
            ResidueType::Phenylalanine => "PHE",
            ResidueType::Tryptophan => "TRP",
            ResidueType::Tyrosine => "TYR",
            ResidueType::Asparagine => "ASN",
            ResidueType::Cysteine => "CYS",
            ResidueType::Glutamine => "GLN",
            ResidueType::Serine => "SER",
            ResidueType::Threonine => "THR",
            ResidueType::Methionine => "MET",
            ResidueType::Arginine => "ARG",
            ResidueType::Histidine => "HIS",
            ResidueType::Lysine => "LYS",
            ResidueType::AsparticAcid => "ASP",
            ResidueType::GlutamicAcid => "GLU",
        }
    }

    /// One-letter code as it appears in a sequence alignment.
    pub fn to_one_letter(&self) -> char {
        match self {
            ResidueType::Alanine => 'A',
            ResidueType::Glycine => 'G',
            ResidueType::Isoleucine => 'I',
            ResidueType::Leucine => 'L',
            ResidueType::Proline => 'P',
            ResidueType::Valine => 'V',
            ResidueType::Phenylalanine => 'F',
            ResidueType::Tryptophan => 'W',
            ResidueType::Tyrosine => 'Y',
            ResidueType::Asparagine => 'N',
            ResidueType::Cysteine => 'C',
            ResidueType::Glutamine => 'Q',
            ResidueType::Serine => 'S',
            ResidueType::Threonine => 'T',
            ResidueType::Methionine => 'M',
            ResidueType::Arginine => 'R',
            ResidueType::Histidine => 'H',
            ResidueType::Lysine => 'K',
            ResidueType::AsparticAcid => 'D',
            ResidueType::GlutamicAcid => 'E',
        }
    }
}

impl FromStr for ResidueType {
    type Err = ParseResidueTypeError;

    /// Parses a three-letter residue name, accepting the common protonation-state
    /// aliases written by refinement programs (HSD/HSE/HSP/HID/HIE/HIP, CYX, ASH, GLH, LYN).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALA" => Ok(ResidueType::Alanine),
            "GLY" => Ok(ResidueType::Glycine),
            "ILE" => Ok(ResidueType::Isoleucine),
            "LEU" => Ok(ResidueType::Leucine),
            "PRO" => Ok(ResidueType::Proline),
            "VAL" => Ok(ResidueType::Valine),
            "PHE" => Ok(ResidueType::Phenylalanine),
            "TRP" => Ok(ResidueType::Tryptophan),
            "TYR" => Ok(ResidueType::Tyrosine),
            "ASN" => Ok(ResidueType::Asparagine),
            "CYS" | "CYX" => Ok(ResidueType::Cysteine),
            "GLN" => Ok(ResidueType::Glutamine),
            "SER" => Ok(ResidueType::Serine),
            "THR" => Ok(ResidueType::Threonine),
            "MET" => Ok(ResidueType::Methionine),
            "ARG" => Ok(ResidueType::Arginine),
            "HIS" | "HSD" | "HSE" | "HSP" | "HID" | "HIE" | "HIP" => Ok(ResidueType::Histidine),
            "LYS" | "LYN" => Ok(ResidueType::Lysine),
            "ASP" | "ASH" => Ok(ResidueType::AsparticAcid),
            "GLU" | "GLH" => Ok(ResidueType::GlutamicAcid),
            _ => Err(ParseResidueTypeError(s.to_string())),
        }
    }
}

impl fmt::Display for ResidueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_three_letter())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub residue_number: isize,               // Residue sequence number from source file
    pub name: String,                        // Name of the residue (e.g., "ALA", "GLY")
    pub residue_type: Option<ResidueType>,   // Standard amino acid classification, if any
    pub is_polymer: bool,                    // False for ligands, waters and other HETATM groups
    pub chain_id: ChainId,                   // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,           // Atoms of this residue, every conformer included
    atom_name_map: HashMap<String, Vec<AtomId>>, // Atom name to all conformer copies
}

impl Residue {
    pub(crate) fn new(residue_number: isize, name: &str, is_polymer: bool, chain_id: ChainId) -> Self {
        Self {
            residue_number,
            name: name.to_string(),
            residue_type: ResidueType::from_str(name).ok(),
            is_polymer,
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_default()
            .push(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    /// Number of atom records in the residue, every alternate conformer counted.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn get_atom_ids_by_name(&self, name: &str) -> Option<&[AtomId]> {
        self.atom_name_map.get(name).map(|ids| ids.as_slice())
    }

    pub fn is_glycine(&self) -> bool {
        self.residue_type == Some(ResidueType::Glycine)
    }

    pub fn is_proline(&self) -> bool {
        self.residue_type == Some(ResidueType::Proline)
    }
}
