use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents an atom of a structural model.
///
/// Atoms refined in several discrete positions appear once per position, each copy
/// carrying its own alternate-location label (`'A'`, `'B'`, ...). Atoms without a
/// label are single-conformer atoms and are ignored by the contact builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "N", "OG1").
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The alternate-location label, if the atom is part of an alternate conformation.
    pub alt_loc: Option<char>,
}

impl Atom {
    /// Creates a new single-conformer `Atom`.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            name: name.trim().to_string(),
            residue_id,
            position,
            alt_loc: None,
        }
    }

    /// Sets the alternate-location label.
    ///
    /// Blank labels (a space, as written by PDB files for single-conformer atoms) are
    /// normalized to `None`.
    pub fn with_alt_loc(mut self, alt_loc: char) -> Self {
        self.alt_loc = if alt_loc.is_whitespace() {
            None
        } else {
            Some(alt_loc)
        };
        self
    }

    pub fn has_alt_loc(&self) -> bool {
        self.alt_loc.is_some()
    }

    /// Euclidean distance to another atom in Angstroms.
    pub fn distance_to(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }
}
