pub mod curve;
pub mod predict;

#[cfg(test)]
pub(crate) mod test_support {
    use ringstoich::core::io::pdb::PdbFile;
    use ringstoich::core::io::traits::MolecularFile;
    use ringstoich::core::models::atom::Atom;
    use ringstoich::core::models::system::MolecularSystem;
    use ringstoich::nalgebra::{Point3, UnitQuaternion, Vector3};
    use std::path::{Path, PathBuf};

    /// Writes chains A and B of a perfect `n`-fold ring of three-residue protomers.
    pub fn write_ring_dimer(dir: &Path, n: usize) -> PathBuf {
        let step = 2.0 * std::f64::consts::PI / n as f64;
        let mut system = MolecularSystem::new();
        for (chain_index, id) in ['A', 'B'].into_iter().enumerate() {
            let rotation =
                UnitQuaternion::from_axis_angle(&Vector3::z_axis(), step * chain_index as f64);
            let chain = system.add_chain(id);
            for number in 0..3 {
                let residue = system
                    .add_residue(chain, number + 1, None, "GLY")
                    .unwrap();
                for (k, name) in ["N", "CA", "C", "O"].into_iter().enumerate() {
                    let t = (number * 4) as f64 + k as f64;
                    let local = Point3::new(22.0 + 2.5 * t.sin(), 1.7 * t.cos(), 0.9 * t);
                    system
                        .add_atom_to_residue(residue, Atom::new(name, residue, rotation * local))
                        .unwrap();
                }
            }
        }
        let path = dir.join("dimer.pdb");
        PdbFile::write_system_to_path(&system, &path).unwrap();
        path
    }
}
