use crate::error::IntoPyResult;
use pyo3::prelude::*;
use ringstoich_core::core::structure::Structure as CoreStructure;
use std::path::PathBuf;

/// Read-only snapshot of a PDB file with chains numbered in file order.
#[pyclass(frozen)]
pub struct Structure {
    pub(crate) inner: CoreStructure,
}

#[pymethods]
impl Structure {
    #[staticmethod]
    fn from_path(path: PathBuf) -> PyResult<Self> {
        let inner = CoreStructure::from_path(&path).into_pyresult()?;
        Ok(Self { inner })
    }

    #[getter]
    fn n_atoms(&self) -> usize {
        self.inner.n_atoms()
    }

    #[getter]
    fn n_chains(&self) -> usize {
        self.inner.n_chains()
    }

    /// Coordinates of one atom, in nanometres.
    fn xyz(&self, atom_index: usize) -> Option<(f64, f64, f64)> {
        self.inner.xyz(atom_index).map(|p| (p.x, p.y, p.z))
    }

    fn chain_atom_indices(&self, chain_index: usize) -> Vec<usize> {
        self.inner.chain_atom_indices(chain_index)
    }

    /// Atom indices of the first `n_chains` chains.
    fn partition_chains(&self, n_chains: usize) -> Vec<Vec<usize>> {
        self.inner.partition_chains(n_chains)
    }

    fn __repr__(&self) -> String {
        format!(
            "Structure(n_atoms={}, n_chains={})",
            self.inner.n_atoms(),
            self.inner.n_chains()
        )
    }
}
