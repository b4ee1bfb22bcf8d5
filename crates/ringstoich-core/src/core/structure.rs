//! Immutable, index-addressed snapshot of a structure file.
//!
//! A [`Structure`] is what the RMSD analysis works on. Atoms are addressed by their
//! position in the file, coordinates are stored in nanometers, and chains are
//! numbered sequentially in the order they appear: a new chain starts whenever
//! the chain identifier changes between consecutive atoms or a `TER` record
//! separates them. Several objects written into one file therefore keep distinct
//! chain indices even though they reuse the identifiers `A` and `B`.

use crate::core::io::pdb::{PdbError, PdbRecord, parse_record};
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Conversion factor from nanometers to Angstroms.
pub const ANGSTROMS_PER_NANOMETER: f64 = 10.0;

#[derive(Debug, Clone, PartialEq)]
struct ChainInfo {
    label: char,
    atom_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    xyz: Vec<Point3<f64>>,
    atom_chain: Vec<usize>,
    atom_names: Vec<String>,
    chains: Vec<ChainInfo>,
}

#[derive(Default)]
struct StructureBuilder {
    structure: Structure,
    previous_label: Option<char>,
    chain_closed: bool,
}

impl StructureBuilder {
    fn push_atom(&mut self, label: char, name: &str, position_angstrom: Point3<f64>) {
        let starts_chain = self.structure.chains.is_empty()
            || self.chain_closed
            || self.previous_label != Some(label);
        if starts_chain {
            self.structure.chains.push(ChainInfo {
                label,
                atom_count: 0,
            });
        }
        let chain_index = self.structure.chains.len() - 1;
        self.structure.chains[chain_index].atom_count += 1;

        self.structure
            .xyz
            .push(position_angstrom / ANGSTROMS_PER_NANOMETER);
        self.structure.atom_chain.push(chain_index);
        self.structure.atom_names.push(name.to_string());

        self.previous_label = Some(label);
        self.chain_closed = false;
    }

    fn close_chain(&mut self) {
        self.chain_closed = true;
    }

    fn build(self) -> Structure {
        self.structure
    }
}

impl Structure {
    /// Parses a structure from PDB text.
    ///
    /// Only the first model is read. Coordinates are converted from Angstroms
    /// to nanometers.
    ///
    /// # Errors
    ///
    /// Returns [`PdbError`] for malformed atom records, I/O failures, or a file
    /// without any atoms.
    pub fn read_from(reader: &mut impl BufRead) -> Result<Self, PdbError> {
        let mut builder = StructureBuilder::default();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            match parse_record(&line, line_num + 1)? {
                PdbRecord::Atom(record) => {
                    builder.push_atom(record.chain_id, &record.name, record.position)
                }
                PdbRecord::Ter => builder.close_chain(),
                PdbRecord::EndModel | PdbRecord::End => break,
                PdbRecord::Other => {}
            }
        }

        let structure = builder.build();
        if structure.xyz.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok(structure)
    }

    /// Loads a structure from a PDB file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PdbError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Builds a snapshot directly from an in-memory system, one sequential chain
    /// per system chain.
    pub fn from_system(system: &MolecularSystem) -> Self {
        let mut builder = StructureBuilder::default();
        for (chain_id, chain) in system.chains_iter() {
            for atom_id in system.chain_atom_ids(chain_id) {
                if let Some(atom) = system.atom(atom_id) {
                    builder.push_atom(chain.id, &atom.name, atom.position);
                }
            }
            builder.close_chain();
        }
        builder.build()
    }

    pub fn n_atoms(&self) -> usize {
        self.xyz.len()
    }

    pub fn n_chains(&self) -> usize {
        self.chains.len()
    }

    /// Coordinates of an atom in nanometers.
    pub fn xyz(&self, atom_index: usize) -> Option<&Point3<f64>> {
        self.xyz.get(atom_index)
    }

    pub fn atom_name(&self, atom_index: usize) -> Option<&str> {
        self.atom_names.get(atom_index).map(String::as_str)
    }

    /// Sequential index of the chain an atom belongs to.
    pub fn chain_of(&self, atom_index: usize) -> Option<usize> {
        self.atom_chain.get(atom_index).copied()
    }

    /// Identifier character the chain carried in the file.
    pub fn chain_label(&self, chain_index: usize) -> Option<char> {
        self.chains.get(chain_index).map(|c| c.label)
    }

    pub fn chain_atom_count(&self, chain_index: usize) -> Option<usize> {
        self.chains.get(chain_index).map(|c| c.atom_count)
    }

    /// Atom indices of one chain in file order. Empty for a nonexistent chain.
    pub fn chain_atom_indices(&self, chain_index: usize) -> Vec<usize> {
        self.atom_chain
            .iter()
            .enumerate()
            .filter(|&(_, &chain)| chain == chain_index)
            .map(|(atom, _)| atom)
            .collect()
    }

    /// Splits the atoms into the first `n_chains` chains.
    ///
    /// Chains beyond the last one present in the structure come back empty.
    pub fn partition_chains(&self, n_chains: usize) -> Vec<Vec<usize>> {
        let mut chain_list = vec![Vec::new(); n_chains];
        for (atom, &chain) in self.atom_chain.iter().enumerate() {
            if let Some(list) = chain_list.get_mut(chain) {
                list.push(atom);
            }
        }
        chain_list
    }
}
