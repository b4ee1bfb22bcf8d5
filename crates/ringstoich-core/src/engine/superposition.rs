use super::config::SuperpositionConfig;
use crate::core::models::ids::ChainId;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::{calculate_rmsd, fit_rigid};
use nalgebra::{Isometry3, Point3};
use thiserror::Error;
use tracing::trace;

const MIN_PAIRS: usize = 3;
/// Below this RMSD (Angstroms) the fit is exact and rejection rounds stop.
const EXACT_FIT_RMSD: f64 = 1e-8;

#[derive(Debug, Error, PartialEq)]
pub enum SuperpositionFailure {
    #[error("only {0} homologous atom pairs, at least 3 are required")]
    TooFewPairs(usize),
    #[error("the covariance matrix could not be decomposed")]
    Degenerate,
}

/// Coordinates of matched atoms, index-aligned between the two sides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomPairs {
    pub mobile: Vec<Point3<f64>>,
    pub target: Vec<Point3<f64>>,
}

impl AtomPairs {
    pub fn len(&self) -> usize {
        self.mobile.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuperpositionOutcome {
    /// Maps mobile coordinates onto the target frame.
    pub transform: Isometry3<f64>,
    /// RMSD over the pairs kept in the final fit, in Angstroms.
    pub rmsd: f64,
    pub pairs_used: usize,
    pub pairs_rejected: usize,
    pub cycles_run: usize,
}

/// Pairs atoms of two chains that are homologous by residue identity.
///
/// Each residue of the mobile chain is matched with the target residue carrying
/// the same sequence number and insertion code, and within each residue pair
/// atoms are matched by name. Residues resolved in only one chain (a missing
/// terminus, a disordered loop) and atoms without a same-named partner are
/// skipped.
pub fn pair_homologous_atoms(
    mobile_system: &MolecularSystem,
    mobile_chain: ChainId,
    target_system: &MolecularSystem,
    target_chain: ChainId,
) -> AtomPairs {
    let mut pairs = AtomPairs::default();
    let Some(mobile) = mobile_system.chain(mobile_chain) else {
        return pairs;
    };
    if target_system.chain(target_chain).is_none() {
        return pairs;
    }

    for &mobile_res_id in mobile.residues() {
        let Some(mobile_res) = mobile_system.residue(mobile_res_id) else {
            continue;
        };
        let Some(target_res) = target_system
            .find_residue(target_chain, mobile_res.number, mobile_res.insertion_code)
            .and_then(|id| target_system.residue(id))
        else {
            continue;
        };

        for &atom_id in mobile_res.atoms() {
            let Some(atom) = mobile_system.atom(atom_id) else {
                continue;
            };
            let partner = target_res
                .get_atom_id_by_name(&atom.name)
                .and_then(|id| target_system.atom(id));
            if let Some(partner) = partner {
                pairs.mobile.push(atom.position);
                pairs.target.push(partner.position);
            }
        }
    }

    pairs
}

/// Best-fit superposition with iterative outlier rejection.
///
/// After the initial fit over all pairs, up to `config.cycles` rounds drop the
/// pairs whose post-fit distance exceeds `config.cutoff` times the current RMSD
/// and refit on the rest. Rounds stop early when nothing is rejected, when the
/// fit is already exact, or when rejection would leave fewer than three pairs.
pub fn superpose(
    pairs: &AtomPairs,
    config: &SuperpositionConfig,
) -> Result<SuperpositionOutcome, SuperpositionFailure> {
    if pairs.len() < MIN_PAIRS {
        return Err(SuperpositionFailure::TooFewPairs(pairs.len()));
    }

    let mut active: Vec<usize> = (0..pairs.len()).collect();
    let (mut transform, mut rmsd) = fit_subset(pairs, &active)?;
    let mut cycles_run = 0;

    while cycles_run < config.cycles && rmsd > EXACT_FIT_RMSD {
        let threshold = config.cutoff * rmsd;
        let kept: Vec<usize> = active
            .iter()
            .copied()
            .filter(|&i| (transform * pairs.mobile[i] - pairs.target[i]).norm() <= threshold)
            .collect();

        if kept.len() == active.len() || kept.len() < MIN_PAIRS {
            break;
        }

        cycles_run += 1;
        trace!(
            cycle = cycles_run,
            rejected = active.len() - kept.len(),
            "Rejecting outlier pairs."
        );
        active = kept;
        (transform, rmsd) = fit_subset(pairs, &active)?;
    }

    Ok(SuperpositionOutcome {
        transform,
        rmsd,
        pairs_used: active.len(),
        pairs_rejected: pairs.len() - active.len(),
        cycles_run,
    })
}

fn fit_subset(
    pairs: &AtomPairs,
    indices: &[usize],
) -> Result<(Isometry3<f64>, f64), SuperpositionFailure> {
    let mobile: Vec<_> = indices.iter().map(|&i| pairs.mobile[i]).collect();
    let target: Vec<_> = indices.iter().map(|&i| pairs.target[i]).collect();

    let transform = fit_rigid(&mobile, &target).ok_or(SuperpositionFailure::Degenerate)?;
    let moved: Vec<_> = mobile.iter().map(|p| transform * p).collect();
    let rmsd = calculate_rmsd(&moved, &target).ok_or(SuperpositionFailure::Degenerate)?;
    Ok((transform, rmsd))
}
