//! # Core Module
//!
//! Stateless building blocks used by the alignment engine.
//!
//! - **Molecular Representation** ([`models`]) - Mutable chains, residues and atoms
//!   held by an alignment session.
//! - **Analysis Snapshot** ([`structure`]) - Immutable, index-addressed view of a
//!   reloaded structure file with sequential chain numbering.
//! - **File I/O** ([`io`]) - Reading and writing the PDB records the pipeline needs.
//! - **Geometry** ([`utils`]) - RMSD and least-squares rigid-body fitting.

pub mod io;
pub mod models;
pub mod structure;
pub mod utils;
