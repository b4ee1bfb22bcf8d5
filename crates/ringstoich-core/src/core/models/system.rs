use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::Residue;
use nalgebra::Isometry3;
use slotmap::SlotMap;
use std::collections::HashMap;

type ResidueKey = (ChainId, isize, Option<char>);

/// Represents a complete molecular system with atoms, residues and chains.
///
/// This is the mutable model an alignment session works on: it is loaded from a
/// structure file, duplicated, moved as a rigid body and written back out.
/// Chains keep the order in which they were added, which is also the order in
/// which they are written.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms using a slot map for efficient ID management.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues using a slot map for efficient ID management.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains using a slot map for efficient ID management.
    chains: SlotMap<ChainId, Chain>,
    /// Chains in insertion order.
    chain_order: Vec<ChainId>,
    /// Lookup map for finding residues by chain, sequence number and insertion code.
    residue_id_map: HashMap<ResidueKey, ResidueId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Returns the number of atoms in the system.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Retrieves an immutable reference to a residue by its ID.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Retrieves an immutable reference to a chain by its ID.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over all chains in insertion order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(ChainId, &Chain)` pairs.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(move |&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    /// Finds a chain ID by its single-character identifier.
    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue ID by its chain, sequence number and insertion code.
    pub fn find_residue(
        &self,
        chain_id: ChainId,
        number: isize,
        insertion_code: Option<char>,
    ) -> Option<ResidueId> {
        self.residue_id_map
            .get(&(chain_id, number, insertion_code))
            .copied()
    }

    /// Adds a new chain to the system or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given identifier already
    /// exists, its ID is returned and nothing is created.
    pub fn add_chain(&mut self, id: char) -> ChainId {
        if let Some(&existing) = self.chain_id_map.get(&id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id));
        self.chain_id_map.insert(id, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Adds a new residue to a chain or returns the existing one.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain to add the residue to.
    /// * `number` - The residue sequence number.
    /// * `insertion_code` - The PDB insertion code, if any.
    /// * `name` - The residue name.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if successful, otherwise `None` (the chain doesn't exist).
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        number: isize,
        insertion_code: Option<char>,
        name: &str,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, number, insertion_code);

        let residue_id = *self.residue_id_map.entry(key).or_insert_with(|| {
            let residue = Residue::new(number, insertion_code, name, chain_id);
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
    /// Returns `Some(AtomId)` if successful, otherwise `None` (the residue doesn't exist).
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }

        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        self.residues.get_mut(residue_id)?.add_atom(&name, atom_id);

        Some(atom_id)
    }

    /// Returns the atoms of a chain in file order (residue by residue).
    pub fn chain_atom_ids(&self, chain_id: ChainId) -> Vec<AtomId> {
        let Some(chain) = self.chains.get(chain_id) else {
            return Vec::new();
        };
        chain
            .residues()
            .iter()
            .filter_map(|&res_id| self.residues.get(res_id))
            .flat_map(|residue| residue.atoms().iter().copied())
            .collect()
    }

    /// Applies a rigid-body transform to every atom of the system.
    pub fn apply_transform(&mut self, transform: &Isometry3<f64>) {
        for (_, atom) in self.atoms.iter_mut() {
            atom.position = transform.transform_point(&atom.position);
        }
    }

    /// Copies one chain of another system into this one under a new identifier.
    ///
    /// # Arguments
    ///
    /// * `source` - The system to copy from.
    /// * `source_chain` - The chain of `source` to copy.
    /// * `new_id` - The identifier of the chain in this system.
    ///
    /// # Return
    ///
    /// Returns the ID of the new chain, or `None` if `source_chain` doesn't exist
    /// or `new_id` is already taken in this system.
    pub fn append_chain_from(
        &mut self,
        source: &MolecularSystem,
        source_chain: ChainId,
        new_id: char,
    ) -> Option<ChainId> {
        let chain = source.chain(source_chain)?;
        if self.chain_id_map.contains_key(&new_id) {
            return None;
        }
        let chain_id = self.add_chain(new_id);

        for &src_res_id in chain.residues() {
            let src_residue = source.residue(src_res_id)?;
            let residue_id = self.add_residue(
                chain_id,
                src_residue.number,
                src_residue.insertion_code,
                &src_residue.name,
            )?;
            for &src_atom_id in src_residue.atoms() {
                let mut atom = source.atom(src_atom_id)?.clone();
                atom.residue_id = residue_id;
                self.add_atom_to_residue(residue_id, atom)?;
            }
        }

        Some(chain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point3, Translation3, UnitQuaternion, Vector3};

    struct TestRefs {
        chain_a: ChainId,
        chain_b: ChainId,
        a_ca: AtomId,
        b_ca: AtomId,
    }

    fn create_dimer_system() -> (MolecularSystem, TestRefs) {
        let mut system = MolecularSystem::new();

        let chain_a = system.add_chain('A');
        let gly = system.add_residue(chain_a, 1, None, "GLY").unwrap();
        system
            .add_atom_to_residue(gly, Atom::new("N", gly, Point3::new(0.0, 0.0, 0.0)))
            .unwrap();
        let a_ca = system
            .add_atom_to_residue(gly, Atom::new("CA", gly, Point3::new(1.5, 0.0, 0.0)))
            .unwrap();

        let chain_b = system.add_chain('B');
        let gly_b = system.add_residue(chain_b, 1, None, "GLY").unwrap();
        system
            .add_atom_to_residue(gly_b, Atom::new("N", gly_b, Point3::new(0.0, 5.0, 0.0)))
            .unwrap();
        let b_ca = system
            .add_atom_to_residue(gly_b, Atom::new("CA", gly_b, Point3::new(1.5, 5.0, 0.0)))
            .unwrap();

        (
            system,
            TestRefs {
                chain_a,
                chain_b,
                a_ca,
                b_ca,
            },
        )
    }

    #[test]
    fn system_creation_and_access() {
        let (system, refs) = create_dimer_system();

        assert_eq!(system.atom_count(), 4);
        assert_eq!(system.chains_iter().count(), 2);
        assert_eq!(system.find_chain_by_id('A'), Some(refs.chain_a));
        assert_eq!(system.find_chain_by_id('B'), Some(refs.chain_b));
        assert!(system.find_chain_by_id('C').is_none());
        assert!(system.find_residue(refs.chain_a, 1, None).is_some());
        assert!(system.find_residue(refs.chain_a, 1, Some('A')).is_none());
        assert_eq!(system.atom(refs.a_ca).unwrap().name, "CA");
    }

    #[test]
    fn add_chain_is_idempotent() {
        let (mut system, refs) = create_dimer_system();
        assert_eq!(system.add_chain('A'), refs.chain_a);
        assert_eq!(system.chains_iter().count(), 2);
    }

    #[test]
    fn chains_iter_preserves_insertion_order() {
        let (system, _) = create_dimer_system();
        let ids: Vec<char> = system.chains_iter().map(|(_, c)| c.id).collect();
        assert_eq!(ids, vec!['A', 'B']);
    }

    #[test]
    fn chain_atom_ids_follow_file_order() {
        let (system, refs) = create_dimer_system();
        let names: Vec<&str> = system
            .chain_atom_ids(refs.chain_b)
            .into_iter()
            .map(|id| system.atom(id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["N", "CA"]);
    }

    #[test]
    fn apply_transform_moves_every_atom() {
        let (mut system, refs) = create_dimer_system();
        let transform = Isometry3::from_parts(
            Translation3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2),
        );
        system.apply_transform(&transform);

        let a_ca = system.atom(refs.a_ca).unwrap().position;
        assert!((a_ca - Point3::new(1.0, 3.5, 3.0)).norm() < 1e-12);
        let b_ca = system.atom(refs.b_ca).unwrap().position;
        assert!((b_ca - Point3::new(-4.0, 3.5, 3.0)).norm() < 1e-12);
    }

    #[test]
    fn append_chain_from_copies_under_new_label() {
        let (source, refs) = create_dimer_system();
        let mut target = MolecularSystem::new();

        let new_chain = target.append_chain_from(&source, refs.chain_b, 'C').unwrap();
        assert_eq!(target.chain(new_chain).unwrap().id, 'C');
        let atoms = target.chain_atom_ids(new_chain);
        assert_eq!(atoms.len(), 2);
        let ca = target.atom(atoms[1]).unwrap();
        assert_eq!(ca.name, "CA");
        assert_eq!(ca.position, Point3::new(1.5, 5.0, 0.0));
        assert_eq!(target.residue(ca.residue_id).unwrap().chain_id, new_chain);

        assert!(target.append_chain_from(&source, refs.chain_a, 'C').is_none());
    }
}
