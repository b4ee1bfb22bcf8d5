use super::ids::{AtomId, ChainId};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,                      // Residue sequence number from source file
    pub insertion_code: Option<char>,       // PDB insertion code, if any
    pub name: String,                       // Name of the residue (e.g., "ALA", "GLY")
    pub chain_id: ChainId,                  // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,          // Atoms in file order
    atom_name_map: HashMap<String, AtomId>, // Map from atom name to its stable ID
}

impl Residue {
    pub(crate) fn new(
        number: isize,
        insertion_code: Option<char>,
        name: &str,
        chain_id: ChainId,
    ) -> Self {
        Self {
            number,
            insertion_code,
            name: name.to_string(),
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        // Alternate locations share a name; the first one wins the lookup.
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_insert(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    fn dummy_chain_id(n: u64) -> ChainId {
        ChainId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let chain_id = dummy_chain_id(1);
        let residue = Residue::new(10, Some('A'), "GLY", chain_id);
        assert_eq!(residue.number, 10);
        assert_eq!(residue.insertion_code, Some('A'));
        assert_eq!(residue.name, "GLY");
        assert_eq!(residue.chain_id, chain_id);
        assert!(residue.atoms().is_empty());
        assert!(residue.get_atom_id_by_name("CA").is_none());
    }

    #[test]
    fn add_atom_preserves_order_and_maps_name() {
        let mut residue = Residue::new(5, None, "ALA", dummy_chain_id(2));
        let ca = dummy_atom_id(42);
        let cb = dummy_atom_id(43);
        residue.add_atom("CA", ca);
        residue.add_atom("CB", cb);
        assert_eq!(residue.atoms(), &[ca, cb]);
        assert_eq!(residue.get_atom_id_by_name("CA"), Some(ca));
        assert_eq!(residue.get_atom_id_by_name("CB"), Some(cb));
    }

    #[test]
    fn duplicate_atom_name_keeps_first_in_lookup() {
        let mut residue = Residue::new(7, None, "SER", dummy_chain_id(3));
        let first = dummy_atom_id(1);
        let second = dummy_atom_id(2);
        residue.add_atom("OG", first);
        residue.add_atom("OG", second);
        assert_eq!(residue.atoms().len(), 2);
        assert_eq!(residue.get_atom_id_by_name("OG"), Some(first));
    }
}
