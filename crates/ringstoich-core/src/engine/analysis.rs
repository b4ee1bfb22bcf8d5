use super::error::EngineError;
use crate::core::structure::{ANGSTROMS_PER_NANOMETER, Structure};

/// Root-mean-square deviation between two chains of a structure, in Angstroms.
///
/// Atoms are compared pairwise in list order, without any superposition: the
/// value measures how far the chains lie from each other in the frame they
/// were saved in.
///
/// # Arguments
///
/// * `chain_1` - Atom indices of the first chain.
/// * `chain_2` - Atom indices of the second chain.
/// * `structure` - The structure the indices refer to.
///
/// # Errors
///
/// Returns [`EngineError::ChainLengthMismatch`] if the lists differ in length,
/// and [`EngineError::InvalidStructure`] if they are empty or an index does not
/// exist in `structure`.
pub fn rmsd(chain_1: &[usize], chain_2: &[usize], structure: &Structure) -> Result<f64, EngineError> {
    if chain_1.len() != chain_2.len() {
        return Err(EngineError::ChainLengthMismatch {
            left: chain_1.len(),
            right: chain_2.len(),
        });
    }
    if chain_1.is_empty() {
        return Err(EngineError::InvalidStructure(
            "cannot compute RMSD of empty chains".to_string(),
        ));
    }

    let position = |index: usize| {
        structure.xyz(index).ok_or_else(|| {
            EngineError::InvalidStructure(format!(
                "atom index {} is out of range for a structure of {} atoms",
                index,
                structure.n_atoms()
            ))
        })
    };

    let mut sum_sq = 0.0;
    for (&i, &j) in chain_1.iter().zip(chain_2) {
        sum_sq += (position(i)? - position(j)?).norm_squared();
    }

    Ok((sum_sq / chain_1.len() as f64).sqrt() * ANGSTROMS_PER_NANOMETER)
}

/// Index of the first local minimum of an RMSD curve.
///
/// Indices 0 and 1 describe the reference against itself and are never
/// candidates, nor is the final element. The first `i` in `2..=len-2` with
/// `rmsd_list[i-1] > rmsd_list[i] < rmsd_list[i+1]` wins.
pub fn min_rmsd(rmsd_list: &[f64]) -> Option<usize> {
    if rmsd_list.len() < 4 {
        return None;
    }
    (2..rmsd_list.len() - 1)
        .find(|&i| rmsd_list[i - 1] > rmsd_list[i] && rmsd_list[i] < rmsd_list[i + 1])
}
