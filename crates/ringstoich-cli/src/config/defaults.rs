use ringstoich::engine::config::{
    DEFAULT_PARTNER_CHAIN, DEFAULT_REFERENCE_CHAIN, DEFAULT_SCRATCH_FILE, SuperpositionConfig,
};
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub max_stoichiometry: usize,
    pub scratch_file: PathBuf,
    pub reference_chain: char,
    pub partner_chain: char,
    pub superposition_cycles: usize,
    pub superposition_cutoff: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let superposition = SuperpositionConfig::default();
        Self {
            max_stoichiometry: 35,
            scratch_file: PathBuf::from(DEFAULT_SCRATCH_FILE),
            reference_chain: DEFAULT_REFERENCE_CHAIN,
            partner_chain: DEFAULT_PARTNER_CHAIN,
            superposition_cycles: superposition.cycles,
            superposition_cutoff: superposition.cutoff,
        }
    }
}
