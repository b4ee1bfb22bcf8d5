use crate::cli::CurveArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use ringstoich::engine::progress::ProgressReporter;
use ringstoich::workflows::{curve, stoichiometry};
use tracing::{info, warn};

pub fn run(args: CurveArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args.analysis)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let report = stoichiometry::run(&app.analysis, &reporter)?;
    let points = report.curve_points();

    curve::render_rmsd_curve(&points, report.minimum_index, &args.output)?;
    println!("✓ RMSD curve written to: {}", args.output.display());

    if let Some(csv_path) = &args.csv {
        curve::write_curve_csv(&points, csv_path)?;
        println!("✓ Curve points written to: {}", csv_path.display());
    }

    match report.stoichiometry {
        Some(n) => println!("  First RMSD minimum implies a ring of {} protomers.", n),
        None => {
            warn!("The curve has no local minimum.");
            println!("  No RMSD minimum found; try a larger maximum stoichiometry.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::AnalysisArgs;
    use crate::commands::test_support::write_ring_dimer;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn curve_writes_svg_and_csv() {
        let dir = tempdir().unwrap();
        let args = CurveArgs {
            analysis: AnalysisArgs {
                input: write_ring_dimer(dir.path(), 10),
                max_stoichiometry: Some(13),
                scratch: Some(dir.path().join("scratch.pdb")),
                ..Default::default()
            },
            output: dir.path().join("curve.svg"),
            csv: Some(dir.path().join("curve.csv")),
        };

        run(args).unwrap();

        assert!(dir.path().join("curve.svg").exists());
        let csv = fs::read_to_string(dir.path().join("curve.csv")).unwrap();
        assert_eq!(csv.lines().count(), 13);
        assert!(csv.starts_with("protomer,rmsd_angstrom"));
    }

    #[test]
    fn curve_without_minimum_still_succeeds() {
        let dir = tempdir().unwrap();
        let args = CurveArgs {
            analysis: AnalysisArgs {
                input: write_ring_dimer(dir.path(), 10),
                max_stoichiometry: Some(5),
                scratch: Some(dir.path().join("scratch.pdb")),
                ..Default::default()
            },
            output: dir.path().join("short.svg"),
            csv: None,
        };

        run(args).unwrap();
        assert!(dir.path().join("short.svg").exists());
    }
}
