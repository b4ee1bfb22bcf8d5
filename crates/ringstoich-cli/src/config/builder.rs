use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::AnalysisArgs;
use crate::error::{CliError, Result};
use ringstoich::engine::config as core_config;
use std::path::PathBuf;
use std::str::FromStr;

/// Merges defaults, the config file, `--set` overrides and explicit flags, in
/// increasing order of precedence.
pub fn build_config(args: &AnalysisArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let analysis_file = file_config.analysis.take().unwrap_or_default();
    let superposition_file = file_config.superposition.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();

    let superposition = core_config::SuperpositionConfig {
        cycles: superposition_file
            .cycles
            .unwrap_or(defaults.superposition_cycles),
        cutoff: superposition_file
            .cutoff
            .unwrap_or(defaults.superposition_cutoff),
    };

    let analysis = core_config::AnalysisConfigBuilder::new()
        .input_path(args.input.clone())
        .max_stoichiometry(
            args.max_stoichiometry
                .or(analysis_file.max_stoichiometry)
                .unwrap_or(defaults.max_stoichiometry),
        )
        .scratch_path(
            args.scratch
                .clone()
                .or(analysis_file.scratch_file)
                .unwrap_or(defaults.scratch_file),
        )
        .reference_chain(
            args.reference_chain
                .or(analysis_file.reference_chain)
                .unwrap_or(defaults.reference_chain),
        )
        .partner_chain(
            args.partner_chain
                .or(analysis_file.partner_chain)
                .unwrap_or(defaults.partner_chain),
        )
        .superposition(superposition)
        .ring_model_path(args.ring_output.clone().or(output_file.ring_model))
        .build()?;

    Ok(AppConfig { analysis })
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "analysis.max-stoichiometry" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .max_stoichiometry = Some(parse_value(key, value_str, "integer")?);
            }
            "analysis.scratch-file" => {
                config.analysis.get_or_insert_with(Default::default).scratch_file =
                    Some(PathBuf::from(value_str));
            }
            "analysis.reference-chain" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .reference_chain = Some(parse_value(key, value_str, "chain")?);
            }
            "analysis.partner-chain" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .partner_chain = Some(parse_value(key, value_str, "chain")?);
            }
            "superposition.cycles" => {
                config
                    .superposition
                    .get_or_insert_with(Default::default)
                    .cycles = Some(parse_value(key, value_str, "integer")?);
            }
            "superposition.cutoff" => {
                config
                    .superposition
                    .get_or_insert_with(Default::default)
                    .cutoff = Some(parse_value(key, value_str, "float")?);
            }
            "output.ring-model" => {
                config.output.get_or_insert_with(Default::default).ring_model =
                    Some(PathBuf::from(value_str));
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringstoich::engine::config::ConfigError;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn base_args() -> AnalysisArgs {
        AnalysisArgs {
            input: PathBuf::from("dimer.pdb"),
            ..Default::default()
        }
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("ringstoich.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_fill_every_unset_value() {
        let app = build_config(&base_args()).expect("build ok");
        let cfg = app.analysis;

        assert_eq!(cfg.input_path, PathBuf::from("dimer.pdb"));
        assert_eq!(cfg.max_stoichiometry, 35);
        assert_eq!(cfg.scratch_path, PathBuf::from("temporary_file.pdb"));
        assert_eq!(cfg.reference_chain, 'A');
        assert_eq!(cfg.partner_chain, 'B');
        assert_eq!(cfg.superposition.cycles, 5);
        assert_eq!(cfg.superposition.cutoff, 2.0);
        assert!(cfg.ring_model_path.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let mut args = base_args();
        args.config = Some(write_config(
            &dir,
            r#"
            [analysis]
            max-stoichiometry = 20
            partner-chain = "C"

            [superposition]
            cycles = 2

            [output]
            ring-model = "ring.pdb"
            "#,
        ));

        let cfg = build_config(&args).unwrap().analysis;

        assert_eq!(cfg.max_stoichiometry, 20);
        assert_eq!(cfg.partner_chain, 'C');
        assert_eq!(cfg.superposition.cycles, 2);
        assert_eq!(cfg.superposition.cutoff, 2.0);
        assert_eq!(cfg.ring_model_path, Some(PathBuf::from("ring.pdb")));
    }

    #[test]
    fn set_values_override_file_and_flags_override_both() {
        let dir = tempdir().unwrap();
        let mut args = base_args();
        args.config = Some(write_config(
            &dir,
            "[analysis]\nmax-stoichiometry = 20\n\n[superposition]\ncutoff = 3.0\n",
        ));
        args.set_values = vec![
            "analysis.max-stoichiometry=25".to_string(),
            "superposition.cutoff=1.5".to_string(),
            "analysis.scratch-file=work/scratch.pdb".to_string(),
        ];
        args.scratch = Some(PathBuf::from("flag.pdb"));

        let cfg = build_config(&args).unwrap().analysis;

        assert_eq!(cfg.max_stoichiometry, 25);
        assert_eq!(cfg.superposition.cutoff, 1.5);
        assert_eq!(cfg.scratch_path, PathBuf::from("flag.pdb"));

        args.max_stoichiometry = Some(40);
        let cfg = build_config(&args).unwrap().analysis;
        assert_eq!(cfg.max_stoichiometry, 40);
    }

    #[test]
    fn malformed_set_value_is_a_config_error() {
        for bad in ["superposition.cycles", "superposition.cycles=many", "analysis.partner-chain=AB"] {
            let mut args = base_args();
            args.set_values = vec![bad.to_string()];
            let result = build_config(&args);
            assert!(matches!(result, Err(CliError::Config(_))), "{}", bad);
        }
    }

    #[test]
    fn unsupported_set_key_is_rejected() {
        let mut args = base_args();
        args.set_values = vec!["analysis.colour=blue".to_string()];

        let Err(CliError::Config(msg)) = build_config(&args) else {
            panic!("Expected a configuration error");
        };
        assert!(msg.contains("analysis.colour"));
    }

    #[test]
    fn core_validation_errors_keep_their_type() {
        let mut args = base_args();
        args.reference_chain = Some('B');

        let result = build_config(&args);
        assert!(matches!(
            result,
            Err(CliError::InvalidSettings(ConfigError::InvalidParameter {
                name: "partner_chain",
                ..
            }))
        ));

        let mut args = base_args();
        args.max_stoichiometry = Some(0);
        assert!(matches!(
            build_config(&args),
            Err(CliError::InvalidSettings(ConfigError::InvalidParameter {
                name: "max_stoichiometry",
                ..
            }))
        ));

        let mut args = base_args();
        args.set_values = vec!["superposition.cutoff=-1".to_string()];
        assert!(matches!(
            build_config(&args),
            Err(CliError::InvalidSettings(ConfigError::InvalidParameter {
                name: "superposition.cutoff",
                ..
            }))
        ));
    }
}
