use super::atom::Atom;
use super::chain::{Chain, ChainType};
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::Residue;
use slotmap::SlotMap;
use std::collections::HashMap;

/// A single structural model (one PDB entry, one refinement) and all of its atoms.
///
/// The structure owns its atoms, residues and chains in slot maps so that identifiers
/// remain stable. Its `name` is the identifier used to look the structure up in a
/// sequence alignment and to label its slice of the aggregated tensor.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Identifier of the structure, matching its record in the sequence alignment.
    name: String,
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// Chains in the order they were added.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding residues by chain ID and residue number.
    residue_id_map: HashMap<(ChainId, isize), ResidueId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
}

impl Structure {
    /// Creates a new, empty structure with the given identifier.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Retrieves an immutable reference to an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Returns an iterator over all atoms in the structure.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    /// Retrieves an immutable reference to a residue by its ID.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Returns an iterator over all residues, in no particular order.
    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    /// Retrieves an immutable reference to a chain by its ID.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over all chains in insertion order.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    /// Finds a chain ID by its single-character identifier.
    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue ID by its chain ID and residue number.
    pub fn find_residue_by_number(
        &self,
        chain_id: ChainId,
        residue_number: isize,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, residue_number))
            .copied()
    }

    /// Adds a new chain to the structure or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given ID already exists,
    /// it returns the existing chain ID without creating a duplicate.
    pub fn add_chain(&mut self, id: char, chain_type: ChainType) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(&id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id, chain_type));
        self.chain_id_map.insert(id, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Adds a new residue to a chain or returns the existing one.
    ///
    /// Residues are kept in insertion order within their chain, which readers are
    /// expected to match to the file's sequence order.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain to add the residue to.
    /// * `residue_number` - The sequence number of the residue.
    /// * `name` - The three-letter residue name.
    /// * `is_polymer` - Whether the residue is part of the polymer (`false` for HETATM groups).
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if successful, otherwise `None` if the chain doesn't exist.
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        name: &str,
        is_polymer: bool,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, residue_number);

        let residue_id = *self.residue_id_map.entry(key).or_insert_with(|| {
            let residue = Residue::new(residue_number, name, is_polymer, chain_id);
            self.residues.insert(residue)
        });

        if !chain.residues.contains(&residue_id) {
            chain.residues.push(residue_id);
        }

        Some(residue_id)
    }

    /// Adds an atom to a specific residue.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` if the residue doesn't exist.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }

        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);

        let residue = self.residues.get_mut(residue_id)?;
        residue.add_atom(&name, atom_id);

        Some(atom_id)
    }

    /// Iterates the polymer residues in chain order, then sequence order within each chain.
    ///
    /// Residues of ligand and water chains are skipped even if flagged as polymer.
    pub fn polymer_residues(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.chains_iter()
            .filter(|(_, chain)| chain.chain_type.holds_polymer())
            .flat_map(move |(_, chain)| {
                chain.residues().iter().filter_map(move |&id| {
                    self.residues
                        .get(id)
                        .filter(|residue| residue.is_polymer)
                        .map(|residue| (id, residue))
                })
            })
    }

    /// Ordered `(residue number, residue name)` pairs of the polymer.
    pub fn sequence(&self) -> Vec<(isize, String)> {
        self.polymer_residues()
            .map(|(_, residue)| (residue.residue_number, residue.name.clone()))
            .collect()
    }

    /// Ordered polymer residue numbers, the list consumed by the alignment mapper.
    pub fn residue_numbers(&self) -> Vec<isize> {
        self.polymer_residues()
            .map(|(_, residue)| residue.residue_number)
            .collect()
    }

    /// Ungapped one-letter sequence of the polymer; non-standard residues become `X`.
    pub fn one_letter_sequence(&self) -> String {
        self.polymer_residues()
            .map(|(_, residue)| {
                residue
                    .residue_type
                    .map_or('X', |residue_type| residue_type.to_one_letter())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn create_test_structure() -> (Structure, ResidueId, ResidueId, ResidueId) {
        let mut structure = Structure::new("1ABC");
        let chain_a = structure.add_chain('A', ChainType::Protein);
        let chain_w = structure.add_chain('W', ChainType::Water);

        let gly = structure.add_residue(chain_a, 1, "GLY", true).unwrap();
        let ser = structure.add_residue(chain_a, 2, "SER", true).unwrap();
        let hoh = structure.add_residue(chain_w, 301, "HOH", false).unwrap();

        structure
            .add_atom_to_residue(gly, Atom::new("CA", gly, Point3::new(0.0, 0.0, 0.0)))
            .unwrap();
        structure
            .add_atom_to_residue(
                ser,
                Atom::new("OG", ser, Point3::new(1.0, 0.0, 0.0)).with_alt_loc('A'),
            )
            .unwrap();
        structure
            .add_atom_to_residue(
                ser,
                Atom::new("OG", ser, Point3::new(1.5, 0.0, 0.0)).with_alt_loc('B'),
            )
            .unwrap();
        structure
            .add_atom_to_residue(hoh, Atom::new("O", hoh, Point3::new(5.0, 5.0, 5.0)))
            .unwrap();

        (structure, gly, ser, hoh)
    }

    #[test]
    fn add_chain_is_idempotent() {
        let mut structure = Structure::new("1ABC");
        let first = structure.add_chain('A', ChainType::Protein);
        let second = structure.add_chain('A', ChainType::Protein);
        assert_eq!(first, second);
        assert_eq!(structure.chains_iter().count(), 1);
        assert_eq!(structure.find_chain_by_id('A'), Some(first));
    }

    #[test]
    fn add_residue_is_idempotent_and_returns_none_for_missing_chain() {
        let (mut structure, gly, _, _) = create_test_structure();
        let chain_a = structure.find_chain_by_id('A').unwrap();
        assert_eq!(structure.add_residue(chain_a, 1, "GLY", true), Some(gly));
        assert_eq!(structure.chain(chain_a).unwrap().residues().len(), 2);

        let mut empty = Structure::new("3XYZ");
        assert!(empty.add_residue(ChainId::default(), 1, "ALA", true).is_none());
    }

    #[test]
    fn add_atom_to_missing_residue_returns_none() {
        let (mut structure, _, _, _) = create_test_structure();
        let missing = ResidueId::default();
        let atom = Atom::new("CA", missing, Point3::origin());
        assert!(structure.add_atom_to_residue(missing, atom).is_none());
    }

    #[test]
    fn atoms_are_registered_with_their_residue() {
        let (structure, gly, ser, _) = create_test_structure();
        assert_eq!(structure.residue(gly).unwrap().atom_count(), 1);
        let ser_residue = structure.residue(ser).unwrap();
        assert_eq!(ser_residue.atom_count(), 2);
        let og_ids = ser_residue.get_atom_ids_by_name("OG").unwrap();
        let labels: Vec<_> = og_ids
            .iter()
            .map(|&id| structure.atom(id).unwrap().alt_loc)
            .collect();
        assert_eq!(labels, vec![Some('A'), Some('B')]);
    }

    #[test]
    fn sequence_excludes_non_polymer_residues() {
        let (structure, _, _, _) = create_test_structure();
        assert_eq!(
            structure.sequence(),
            vec![(1, "GLY".to_string()), (2, "SER".to_string())]
        );
        assert_eq!(structure.residue_numbers(), vec![1, 2]);
        assert_eq!(structure.one_letter_sequence(), "GS");
    }

    #[test]
    fn ligand_chains_never_contribute_polymer_residues() {
        let (mut structure, _, _, _) = create_test_structure();
        let ligand = structure.add_chain('L', ChainType::Ligand);
        structure.add_residue(ligand, 401, "ATP", true).unwrap();
        assert_eq!(structure.residue_numbers(), vec![1, 2]);
    }

    #[test]
    fn find_residue_by_number_uses_chain_scope() {
        let (structure, gly, _, hoh) = create_test_structure();
        let chain_a = structure.find_chain_by_id('A').unwrap();
        let chain_w = structure.find_chain_by_id('W').unwrap();
        assert_eq!(structure.find_residue_by_number(chain_a, 1), Some(gly));
        assert_eq!(structure.find_residue_by_number(chain_w, 301), Some(hoh));
        assert_eq!(structure.find_residue_by_number(chain_a, 301), None);
    }
}
