//! Provides input/output functionality for molecular structure files.
//!
//! Only the Protein Data Bank format is supported, and only the records the
//! stoichiometry pipeline needs (`ATOM`, `HETATM`, `TER`, `MODEL`/`ENDMDL`, `END`).
//! Other records are carried through as opaque header lines.

pub mod pdb;
pub mod traits;
