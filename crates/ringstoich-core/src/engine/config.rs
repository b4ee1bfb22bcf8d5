use std::path::PathBuf;
use thiserror::Error;

/// Scratch file written next to the working directory when none is configured.
pub const DEFAULT_SCRATCH_FILE: &str = "temporary_file.pdb";
pub const DEFAULT_REFERENCE_CHAIN: char = 'A';
pub const DEFAULT_PARTNER_CHAIN: char = 'B';

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Controls the best-fit superposition of one chain onto another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuperpositionConfig {
    /// Maximum number of outlier-rejection rounds after the initial fit.
    pub cycles: usize,
    /// Pairs deviating by more than `cutoff` times the current RMSD are dropped.
    pub cutoff: f64,
}

impl Default for SuperpositionConfig {
    fn default() -> Self {
        Self {
            cycles: 5,
            cutoff: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub input_path: PathBuf,
    /// Number of dimer copies chained together; the largest ring size tested.
    pub max_stoichiometry: usize,
    pub scratch_path: PathBuf,
    pub reference_chain: char,
    pub partner_chain: char,
    pub superposition: SuperpositionConfig,
    /// Where to write the deduplicated ring fragment, if anywhere.
    pub ring_model_path: Option<PathBuf>,
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    input_path: Option<PathBuf>,
    max_stoichiometry: Option<usize>,
    scratch_path: Option<PathBuf>,
    reference_chain: Option<char>,
    partner_chain: Option<char>,
    superposition: Option<SuperpositionConfig>,
    ring_model_path: Option<PathBuf>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }
    pub fn max_stoichiometry(mut self, n: usize) -> Self {
        self.max_stoichiometry = Some(n);
        self
    }
    pub fn scratch_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scratch_path = Some(path.into());
        self
    }
    pub fn reference_chain(mut self, id: char) -> Self {
        self.reference_chain = Some(id);
        self
    }
    pub fn partner_chain(mut self, id: char) -> Self {
        self.partner_chain = Some(id);
        self
    }
    pub fn superposition(mut self, config: SuperpositionConfig) -> Self {
        self.superposition = Some(config);
        self
    }
    pub fn ring_model_path(mut self, path: Option<PathBuf>) -> Self {
        self.ring_model_path = path;
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let input_path = self
            .input_path
            .ok_or(ConfigError::MissingParameter("input_path"))?;
        let max_stoichiometry = self
            .max_stoichiometry
            .ok_or(ConfigError::MissingParameter("max_stoichiometry"))?;
        if max_stoichiometry == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_stoichiometry",
                reason: "must be at least 1".to_string(),
            });
        }

        let reference_chain = self.reference_chain.unwrap_or(DEFAULT_REFERENCE_CHAIN);
        let partner_chain = self.partner_chain.unwrap_or(DEFAULT_PARTNER_CHAIN);
        if reference_chain == partner_chain {
            return Err(ConfigError::InvalidParameter {
                name: "partner_chain",
                reason: format!("must differ from the reference chain '{}'", reference_chain),
            });
        }

        let superposition = self.superposition.unwrap_or_default();
        if !(superposition.cutoff > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "superposition.cutoff",
                reason: format!("must be positive, got {}", superposition.cutoff),
            });
        }

        Ok(AnalysisConfig {
            input_path,
            max_stoichiometry,
            scratch_path: self
                .scratch_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRATCH_FILE)),
            reference_chain,
            partner_chain,
            superposition,
            ring_model_path: self.ring_model_path,
        })
    }
}
