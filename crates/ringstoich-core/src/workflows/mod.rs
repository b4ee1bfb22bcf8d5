//! # Workflows Module
//!
//! Top-level entry points of the library. A workflow loads the dimer, runs the
//! alignment session and analysis from [`crate::engine`], and hands back results
//! ready for reporting.
//!
//! - **Stoichiometry Workflow** ([`stoichiometry`]) - Chains dimer copies into a
//!   ring fragment, measures the RMSD curve and predicts the ring size
//! - **Curve Rendering** ([`curve`]) - Plots the RMSD curve as SVG and exports it
//!   as CSV

pub mod curve;
pub mod stoichiometry;
