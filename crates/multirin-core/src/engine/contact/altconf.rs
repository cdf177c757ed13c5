use crate::core::models::atom::Atom;
use crate::core::models::residue::ResidueType;
use crate::core::models::structure::Structure;
use crate::core::topology::backbone::{BackboneRole, is_amide_hydrogen, is_backbone_atom};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// A polymer residue restricted to its atoms that carry an alternate-location label.
#[derive(Debug, Clone)]
pub struct AltConfResidue<'s> {
    pub residue_number: isize,
    pub name: String,
    pub residue_type: Option<ResidueType>,
    /// Atom records of the whole residue, labelled or not.
    pub atom_count: usize,
    atoms: Vec<&'s Atom>,
}

impl<'s> AltConfResidue<'s> {
    pub fn atoms(&self) -> &[&'s Atom] {
        &self.atoms
    }

    pub fn backbone_atoms(&self) -> Vec<&'s Atom> {
        self.atoms
            .iter()
            .copied()
            .filter(|atom| is_backbone_atom(&atom.name))
            .collect()
    }

    pub fn sidechain_atoms(&self) -> Vec<&'s Atom> {
        self.atoms
            .iter()
            .copied()
            .filter(|atom| !is_backbone_atom(&atom.name))
            .collect()
    }

    /// True when every alternate conformer of the residue is an amide hydrogen.
    pub fn is_amide_hydrogen_only(&self) -> bool {
        !self.atoms.is_empty() && self.atoms.iter().all(|atom| is_amide_hydrogen(&atom.name))
    }

    pub fn has_alt_conf_atom(&self, name: &str) -> bool {
        self.atoms.iter().any(|atom| atom.name == name)
    }

    pub fn alt_loc_labels(&self) -> BTreeSet<char> {
        self.atoms.iter().filter_map(|atom| atom.alt_loc).collect()
    }

    /// Whether some atom filling `role` carries `label`.
    pub fn role_has_label(&self, role: BackboneRole, label: char) -> bool {
        let names = role.atom_names();
        self.atoms
            .iter()
            .any(|atom| atom.alt_loc == Some(label) && names.contains(&atom.name.as_str()))
    }
}

/// Alternate-conformer residues of a structure, ordered by residue number.
#[derive(Debug, Clone, Default)]
pub struct AltConformerIndex<'s> {
    residues: BTreeMap<isize, AltConfResidue<'s>>,
}

impl<'s> AltConformerIndex<'s> {
    /// Collects every polymer residue with at least one labelled atom.
    ///
    /// Residues are keyed by number alone; if two chains share a number their labelled
    /// atoms are merged under the first residue seen.
    pub fn from_structure(structure: &'s Structure) -> Self {
        let mut residues: BTreeMap<isize, AltConfResidue<'s>> = BTreeMap::new();

        for (_, residue) in structure.polymer_residues() {
            let labelled: Vec<&Atom> = residue
                .atoms()
                .iter()
                .filter_map(|&id| structure.atom(id))
                .filter(|atom| atom.has_alt_loc())
                .collect();
            if labelled.is_empty() {
                continue;
            }

            match residues.get_mut(&residue.residue_number) {
                Some(existing) => {
                    warn!(
                        structure = structure.name(),
                        residue_number = residue.residue_number,
                        "Residue number appears in more than one chain; merging alternate conformers"
                    );
                    existing.atoms.extend(labelled);
                }
                None => {
                    residues.insert(
                        residue.residue_number,
                        AltConfResidue {
                            residue_number: residue.residue_number,
                            name: residue.name.clone(),
                            residue_type: residue.residue_type,
                            atom_count: residue.atom_count(),
                            atoms: labelled,
                        },
                    );
                }
            }
        }

        Self { residues }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn get(&self, residue_number: isize) -> Option<&AltConfResidue<'s>> {
        self.residues.get(&residue_number)
    }

    pub fn residue_numbers(&self) -> impl Iterator<Item = isize> + '_ {
        self.residues.keys().copied()
    }

    /// Residues in ascending residue-number order.
    pub fn iter(&self) -> impl Iterator<Item = &AltConfResidue<'s>> + Clone {
        self.residues.values()
    }
}
