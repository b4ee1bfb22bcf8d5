use super::config::SuperpositionConfig;
use super::error::EngineError;
use super::superposition::{SuperpositionOutcome, pair_homologous_atoms, superpose};
use crate::core::io::pdb::{PdbError, PdbFile};
use crate::core::io::traits::MolecularFile;
use crate::core::models::ids::ChainId;
use crate::core::models::system::MolecularSystem;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Identifiers given to ring model chains, in order.
const RING_CHAIN_LABELS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Addresses one chain of one session object, written `/object//chain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainSelector {
    pub object: String,
    pub chain: char,
}

impl ChainSelector {
    pub fn new(object: impl Into<String>, chain: char) -> Self {
        Self {
            object: object.into(),
            chain,
        }
    }
}

impl fmt::Display for ChainSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}//{}", self.object, self.chain)
    }
}

#[derive(Debug, Clone)]
pub struct SessionObject {
    pub name: String,
    pub system: MolecularSystem,
}

/// Named molecular objects manipulated by one analysis call.
///
/// Objects keep the order in which they were first created; that order is the
/// order they are saved in.
#[derive(Debug, Clone, Default)]
pub struct AlignmentSession {
    objects: Vec<SessionObject>,
}

impl AlignmentSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a PDB file into a new object.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] if the file cannot be read and
    /// [`EngineError::Format`] if it is not valid PDB.
    pub fn load(&mut self, path: &Path, name: &str) -> Result<(), EngineError> {
        let (system, _) = PdbFile::read_from_path(path).map_err(|e| match e {
            PdbError::Io(source) => EngineError::Io {
                path: path.display().to_string(),
                source,
            },
            other => EngineError::Format {
                path: path.display().to_string(),
                source: other,
            },
        })?;
        debug!(
            object = name,
            atoms = system.atom_count(),
            "Loaded structure into session."
        );
        self.insert(name, system);
        Ok(())
    }

    /// Adds an object, replacing one of the same name in place.
    pub fn insert(&mut self, name: &str, system: MolecularSystem) {
        match self.objects.iter_mut().find(|o| o.name == name) {
            Some(existing) => existing.system = system,
            None => self.objects.push(SessionObject {
                name: name.to_string(),
                system,
            }),
        }
    }

    /// Duplicates `source` under `new_name`.
    pub fn copy(&mut self, new_name: &str, source: &str) -> Result<(), EngineError> {
        let system = self.require(source)?.clone();
        self.insert(new_name, system);
        Ok(())
    }

    pub fn object(&self, name: &str) -> Option<&MolecularSystem> {
        self.objects
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.system)
    }

    pub fn objects(&self) -> impl Iterator<Item = &SessionObject> {
        self.objects.iter()
    }

    /// Superimposes the `mobile` chain onto the `target` chain.
    ///
    /// The fitted transform moves the whole mobile object, not only the
    /// selected chain.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ObjectNotFound`] or [`EngineError::InvalidStructure`]
    /// for selectors that match nothing, and [`EngineError::Superposition`] when
    /// the chains share too few homologous atoms for a fit.
    pub fn align(
        &mut self,
        mobile: &ChainSelector,
        target: &ChainSelector,
        config: &SuperpositionConfig,
    ) -> Result<SuperpositionOutcome, EngineError> {
        let (mobile_system, mobile_chain) = self.resolve(mobile)?;
        let (target_system, target_chain) = self.resolve(target)?;

        let pairs = pair_homologous_atoms(mobile_system, mobile_chain, target_system, target_chain);
        let outcome = superpose(&pairs, config).map_err(|e| EngineError::Superposition {
            mobile: mobile.to_string(),
            target: target.to_string(),
            reason: e.to_string(),
        })?;

        self.require_mut(&mobile.object)?
            .apply_transform(&outcome.transform);
        Ok(outcome)
    }

    /// Writes every object, in creation order, into one PDB file.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let io_error = |source: std::io::Error| EngineError::Io {
            path: path.display().to_string(),
            source,
        };
        let file = File::create(path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        PdbFile::write_systems_to(self.objects().map(|o| &o.system), &mut writer).map_err(
            |e| match e {
                PdbError::Io(source) => io_error(source),
                other => EngineError::Format {
                    path: path.display().to_string(),
                    source: other,
                },
            },
        )?;
        writer.flush().map_err(io_error)
    }

    /// Assembles the ring fragment produced by chaining `copies` together.
    ///
    /// The first copy contributes both `first` and `second`; every later copy
    /// contributes only `second`, since its `first` chain was superimposed onto
    /// the previous copy's `second` chain. Chains are relabelled `A`, `B`, `C`...
    pub fn ring_model(
        &self,
        copies: &[String],
        first: char,
        second: char,
    ) -> Result<MolecularSystem, EngineError> {
        let mut picks = Vec::with_capacity(copies.len() + 1);
        for (i, name) in copies.iter().enumerate() {
            if i == 0 {
                picks.push(ChainSelector::new(name.as_str(), first));
            }
            picks.push(ChainSelector::new(name.as_str(), second));
        }

        let available = RING_CHAIN_LABELS.chars().count();
        if picks.len() > available {
            return Err(EngineError::InvalidStructure(format!(
                "a ring model of {} chains exceeds the {} available chain identifiers",
                picks.len(),
                available
            )));
        }

        let mut model = MolecularSystem::new();
        for (selector, label) in picks.iter().zip(RING_CHAIN_LABELS.chars()) {
            let (system, chain) = self.resolve(selector)?;
            model.append_chain_from(system, chain, label).ok_or_else(|| {
                EngineError::InvalidStructure(format!("failed to copy chain {}", selector))
            })?;
        }
        Ok(model)
    }

    /// Writes [`ring_model`](Self::ring_model) to a PDB file.
    pub fn export_ring_model(
        &self,
        copies: &[String],
        first: char,
        second: char,
        path: &Path,
    ) -> Result<(), EngineError> {
        let model = self.ring_model(copies, first, second)?;
        PdbFile::write_system_to_path(&model, path).map_err(|e| EngineError::Export {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn require(&self, name: &str) -> Result<&MolecularSystem, EngineError> {
        self.object(name)
            .ok_or_else(|| EngineError::ObjectNotFound(name.to_string()))
    }

    fn require_mut(&mut self, name: &str) -> Result<&mut MolecularSystem, EngineError> {
        self.objects
            .iter_mut()
            .find(|o| o.name == name)
            .map(|o| &mut o.system)
            .ok_or_else(|| EngineError::ObjectNotFound(name.to_string()))
    }

    fn resolve(&self, selector: &ChainSelector) -> Result<(&MolecularSystem, ChainId), EngineError> {
        let system = self.require(&selector.object)?;
        let chain = system.find_chain_by_id(selector.chain).ok_or_else(|| {
            EngineError::InvalidStructure(format!("no chain matches selector {}", selector))
        })?;
        Ok((system, chain))
    }
}
