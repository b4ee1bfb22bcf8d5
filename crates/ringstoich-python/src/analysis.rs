use crate::error::IntoPyResult;
use crate::structure::Structure;
use pyo3::prelude::*;
use std::path::PathBuf;

/// RMSD in angstroms between two equally sized atom index lists.
#[pyfunction]
fn rmsd(chain_1: Vec<usize>, chain_2: Vec<usize>, structure: &Structure) -> PyResult<f64> {
    ringstoich_core::rmsd(&chain_1, &chain_2, &structure.inner).into_pyresult()
}

/// Index of the first strict local minimum after the reference points, or `None`.
#[pyfunction]
fn min_rmsd(rmsd_list: Vec<f64>) -> Option<usize> {
    ringstoich_core::min_rmsd(&rmsd_list)
}

#[pyfunction]
#[pyo3(signature = (filepath, filename, list_len, temp_file = PathBuf::from("temporary_file.pdb")))]
fn rmsd_list_from_dimer(
    py: Python<'_>,
    filepath: PathBuf,
    filename: String,
    list_len: usize,
    temp_file: PathBuf,
) -> PyResult<Vec<f64>> {
    py.allow_threads(|| {
        ringstoich_core::rmsd_list_from_dimer(&filepath, &filename, list_len, &temp_file)
    })
    .into_pyresult()
}

#[pyfunction]
fn predict_stoichiometry(
    py: Python<'_>,
    filepath: PathBuf,
    filename: String,
    max_expected_stoichiometry: usize,
) -> PyResult<usize> {
    py.allow_threads(|| {
        ringstoich_core::predict_stoichiometry(&filepath, &filename, max_expected_stoichiometry)
    })
    .into_pyresult()
}

/// Plots the RMSD curve to an SVG file and returns the plotted points.
#[pyfunction]
fn draw_rmsd_curve(
    py: Python<'_>,
    filepath: PathBuf,
    filename: String,
    max_expected_stoichiometry: usize,
    output: PathBuf,
) -> PyResult<Vec<(usize, f64)>> {
    py.allow_threads(|| {
        ringstoich_core::draw_rmsd_curve(&filepath, &filename, max_expected_stoichiometry, &output)
    })
    .into_pyresult()
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(rmsd, m)?)?;
    m.add_function(wrap_pyfunction!(min_rmsd, m)?)?;
    m.add_function(wrap_pyfunction!(rmsd_list_from_dimer, m)?)?;
    m.add_function(wrap_pyfunction!(predict_stoichiometry, m)?)?;
    m.add_function(wrap_pyfunction!(draw_rmsd_curve, m)?)?;
    Ok(())
}
