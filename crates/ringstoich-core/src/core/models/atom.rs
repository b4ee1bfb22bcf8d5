use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents an atom of a loaded structure.
///
/// Besides the name and coordinates needed by the alignment, the record keeps the
/// PDB bookkeeping fields (occupancy, B-factor, element, record kind) so that a
/// structure written back to disk is a faithful copy of the input. Serial numbers
/// are assigned on write.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy from the source file.
    pub occupancy: f64,
    /// Temperature factor from the source file.
    pub b_factor: f64,
    /// Element symbol, empty when the source file did not provide one.
    pub element: String,
    /// Whether the atom came from a `HETATM` record.
    pub is_hetero: bool,
}

impl Atom {
    /// Creates a new `Atom` with default bookkeeping fields.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            residue_id,
            position,
            occupancy: 1.0,
            b_factor: 0.0,
            element: String::new(),
            is_hetero: false,
        }
    }
}
