use crate::core::models::system::MolecularSystem;
use crate::core::structure::Structure;
use crate::engine::analysis::{min_rmsd, rmsd};
use crate::engine::config::{AnalysisConfig, AnalysisConfigBuilder, DEFAULT_SCRATCH_FILE};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::session::{AlignmentSession, ChainSelector};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct StoichiometryReport {
    /// Session name of the loaded dimer.
    pub object_name: String,
    pub max_stoichiometry: usize,
    /// RMSD in Angstroms between the reference protomer and each chained copy.
    pub rmsd_list: Vec<f64>,
    pub minimum_index: Option<usize>,
    pub stoichiometry: Option<usize>,
    /// Fit RMSD of every copy-on-copy superposition, in chaining order.
    pub alignment_rmsds: Vec<f64>,
}

impl StoichiometryReport {
    /// The plotted part of the curve: `(i, rmsd_list[i])` for every `i >= 1`.
    pub fn curve_points(&self) -> Vec<(usize, f64)> {
        self.rmsd_list
            .iter()
            .copied()
            .enumerate()
            .skip(1)
            .collect()
    }

    pub fn require_stoichiometry(&self) -> Result<usize, EngineError> {
        self.stoichiometry
            .ok_or(EngineError::NoStoichiometryFound {
                max_stoichiometry: self.max_stoichiometry,
            })
    }
}

/// Chains copies of a dimer into a ring fragment and measures how far each
/// copy lies from the first protomer.
///
/// # Arguments
///
/// * `config` - Input file, number of copies, scratch file and chain roles.
/// * `reporter` - Receives phase and per-alignment progress events.
///
/// # Return
///
/// The RMSD curve together with its first local minimum and the stoichiometry
/// it implies, if any.
///
/// # Errors
///
/// Fails if the input cannot be read, does not consist of exactly the
/// reference and partner chains, a superposition fails, or the scratch file
/// cannot be written and read back.
#[instrument(skip_all, name = "stoichiometry_workflow", fields(input = %config.input_path.display()))]
pub fn run(
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<StoichiometryReport, EngineError> {
    let list_len = config.max_stoichiometry;

    // === Phase 1: Load the dimer and replicate it ===
    reporter.report(Progress::PhaseStart { name: "Replicate" });
    let mut session = AlignmentSession::new();
    let copy_names: Vec<String> = (0..list_len).map(|i| format!("c{}", i)).collect();
    let object_name = source_object_name(&config.input_path, &copy_names)?;

    session.load(&config.input_path, &object_name)?;
    check_dimer_chains(&object_name, &session, config)?;
    for name in &copy_names {
        session.copy(name, &object_name)?;
    }
    info!(object = %object_name, copies = list_len, "Dimer loaded and replicated.");
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Chain the copies ===
    reporter.report(Progress::PhaseStart { name: "Align" });
    reporter.report(Progress::TaskStart {
        total_steps: list_len.saturating_sub(1) as u64,
    });
    let mut alignment_rmsds = Vec::with_capacity(list_len.saturating_sub(1));
    let mut rejected_total = 0;
    for (i, pair) in copy_names.windows(2).enumerate() {
        let mobile = ChainSelector::new(pair[1].as_str(), config.reference_chain);
        let target = ChainSelector::new(pair[0].as_str(), config.partner_chain);
        let outcome = session.align(&mobile, &target, &config.superposition)?;

        debug!(
            mobile = %mobile,
            target = %target,
            rmsd = outcome.rmsd,
            pairs = outcome.pairs_used,
            rejected = outcome.pairs_rejected,
            "Copy superimposed."
        );
        rejected_total += outcome.pairs_rejected;
        alignment_rmsds.push(outcome.rmsd);
        reporter.report(Progress::AlignmentStep {
            copy: i + 1,
            rmsd: outcome.rmsd,
        });
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);
    if rejected_total > 0 {
        warn!(
            rejected = rejected_total,
            "Outlier atom pairs were excluded from the copy superpositions."
        );
    }

    if let Some(path) = &config.ring_model_path {
        session.export_ring_model(
            &copy_names,
            config.reference_chain,
            config.partner_chain,
            path,
        )?;
        info!(path = %path.display(), "Ring model written.");
        reporter.report(Progress::Message(format!(
            "Ring model written to {}",
            path.display()
        )));
    }
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Save, reload and measure ===
    reporter.report(Progress::PhaseStart { name: "Measure" });
    session.save(&config.scratch_path)?;
    let structure = Structure::from_path(&config.scratch_path).map_err(|e| EngineError::Format {
        path: config.scratch_path.display().to_string(),
        source: e,
    })?;
    let rmsd_list = measure_rmsd_list(&structure, list_len)?;
    reporter.report(Progress::PhaseFinish);

    let minimum_index = min_rmsd(&rmsd_list);
    let stoichiometry = minimum_index.map(|i| i - 1);
    match stoichiometry {
        Some(n) => info!(stoichiometry = n, "Ring closure detected."),
        None => warn!(
            max_stoichiometry = list_len,
            "No local RMSD minimum found; the ring may be larger than the maximum tested."
        ),
    }

    Ok(StoichiometryReport {
        object_name,
        max_stoichiometry: list_len,
        rmsd_list,
        minimum_index,
        stoichiometry,
        alignment_rmsds,
    })
}

/// RMSD curve of a dimer chained `list_len` times.
///
/// `rmsd_list[0]` is the reference protomer against itself and always 0.
/// The session is saved to `temp_file`, which is overwritten.
pub fn rmsd_list_from_dimer(
    filepath: impl AsRef<Path>,
    filename: &str,
    list_len: usize,
    temp_file: impl AsRef<Path>,
) -> Result<Vec<f64>, EngineError> {
    let config = AnalysisConfigBuilder::new()
        .input_path(filepath.as_ref().join(filename))
        .max_stoichiometry(list_len)
        .scratch_path(temp_file.as_ref())
        .build()?;
    Ok(run(&config, &ProgressReporter::new())?.rmsd_list)
}

/// Predicts how many protomers close the ring the dimer belongs to.
///
/// Uses `temporary_file.pdb` in the working directory as scratch file.
///
/// # Errors
///
/// Returns [`EngineError::NoStoichiometryFound`] when the curve has no local
/// minimum up to `max_expected_stoichiometry`.
pub fn predict_stoichiometry(
    filepath: impl AsRef<Path>,
    filename: &str,
    max_expected_stoichiometry: usize,
) -> Result<usize, EngineError> {
    let config = AnalysisConfigBuilder::new()
        .input_path(filepath.as_ref().join(filename))
        .max_stoichiometry(max_expected_stoichiometry)
        .scratch_path(DEFAULT_SCRATCH_FILE)
        .build()?;
    run(&config, &ProgressReporter::new())?.require_stoichiometry()
}

fn measure_rmsd_list(structure: &Structure, list_len: usize) -> Result<Vec<f64>, EngineError> {
    let chain_list = structure.partition_chains(2 * list_len);
    (0..list_len)
        .map(|i| rmsd(&chain_list[0], &chain_list[2 * i], structure))
        .collect()
}

fn source_object_name(path: &Path, copy_names: &[String]) -> Result<String, EngineError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            EngineError::InvalidStructure(format!(
                "cannot derive an object name from '{}'",
                path.display()
            ))
        })?;
    if copy_names.iter().any(|c| c == stem) {
        Ok(format!("{}_source", stem))
    } else {
        Ok(stem.to_string())
    }
}

fn check_dimer_chains(
    object_name: &str,
    session: &AlignmentSession,
    config: &AnalysisConfig,
) -> Result<(), EngineError> {
    let system: &MolecularSystem = session
        .object(object_name)
        .ok_or_else(|| EngineError::ObjectNotFound(object_name.to_string()))?;

    for id in [config.reference_chain, config.partner_chain] {
        if system.find_chain_by_id(id).is_none() {
            return Err(EngineError::InvalidStructure(format!(
                "dimer '{}' has no chain '{}'",
                object_name, id
            )));
        }
    }
    let chain_count = system.chains_iter().count();
    if chain_count != 2 {
        return Err(EngineError::InvalidStructure(format!(
            "dimer '{}' must contain exactly chains '{}' and '{}', found {} chains",
            object_name, config.reference_chain, config.partner_chain, chain_count
        )));
    }
    Ok(())
}
