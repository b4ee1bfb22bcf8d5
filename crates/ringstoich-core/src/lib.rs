//! # RingStoich Core Library
//!
//! Estimates the rotational stoichiometry (number of protomers) of a ring-shaped
//! protein assembly from a structural model of two adjacent protomers.
//!
//! ## Method
//!
//! Copies of the dimer are superimposed end-to-end (chain A of each new copy onto
//! chain B of the previous one) to walk a simulated ring. The deviation between the
//! first protomer and every protomer along the walk grows as the walk moves away
//! from the start and drops again when it wraps back around. The first dip in that
//! RMSD curve marks ring closure.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Molecular data models (`MolecularSystem`, the
//!   immutable `Structure`), PDB I/O and pure geometry (RMSD, rigid-body fitting).
//!
//! - **[`engine`]: The Logic Core.** The explicit `AlignmentSession` holding named
//!   copies of the dimer, the iterative superposition with outlier rejection, the
//!   RMSD and minimum-finding analysis, configuration, errors and progress events.
//!
//! - **[`workflows`]: The Public API.** Complete procedures: predicting the
//!   stoichiometry and rendering the RMSD curve.
//!
//! ```no_run
//! let n = ringstoich::predict_stoichiometry("./", "dimer.pdb", 35)?;
//! println!("Predicted ring stoichiometry: {}", n);
//! # Ok::<(), ringstoich::engine::error::EngineError>(())
//! ```

pub mod core;
pub mod engine;
pub mod workflows;

pub use nalgebra;

pub use engine::analysis::{min_rmsd, rmsd};
pub use workflows::curve::draw_rmsd_curve;
pub use workflows::stoichiometry::{predict_stoichiometry, rmsd_list_from_dimer};
