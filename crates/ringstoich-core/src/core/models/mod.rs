//! # Core Models Module
//!
//! Data structures describing a molecular system as it is loaded from disk and
//! manipulated by the alignment engine: chains own residues, residues own atoms,
//! and every component is addressed through a stable slot-map key.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom record with name, coordinates and PDB bookkeeping fields
//! - [`residue`] - Residue with its ordered atoms and a name lookup
//! - [`chain`] - Chain identified by a single character
//! - [`system`] - The complete system and its rigid-body operations
//! - [`ids`] - Key types for atoms, residues and chains
//!
//! ```ignore
//! use ringstoich::core::models::{system::MolecularSystem, atom::Atom};
//!
//! let mut system = MolecularSystem::new();
//! let chain_id = system.add_chain('A');
//! let residue_id = system.add_residue(chain_id, 1, None, "ALA")?;
//! system.add_atom_to_residue(residue_id, Atom::new("CA", residue_id, Point3::origin()))?;
//! ```

pub mod atom;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
