use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to an atom inside a [`MolecularSystem`](super::system::MolecularSystem).
    pub struct AtomId;
    /// Stable handle to a residue.
    pub struct ResidueId;
    /// Stable handle to a chain.
    pub struct ChainId;
}
