//! Python bindings for the ring stoichiometry predictor.
//!
//! Exposes `predict_stoichiometry`, `draw_rmsd_curve`, `rmsd_list_from_dimer`,
//! `rmsd`, `min_rmsd` and the `Structure` snapshot class.

mod analysis;
mod error;
mod structure;

use pyo3::prelude::*;

#[pymodule]
fn ringstoich(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<structure::Structure>()?;
    analysis::register(m)?;
    Ok(())
}
