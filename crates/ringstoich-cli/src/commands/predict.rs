use crate::cli::PredictArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use ringstoich::engine::progress::ProgressReporter;
use ringstoich::workflows::stoichiometry::{self, StoichiometryReport};
use tracing::info;

pub fn run(args: PredictArgs) -> Result<()> {
    let stoichiometry = predict(&args)?.require_stoichiometry()?;
    println!("✓ Predicted ring stoichiometry: {}", stoichiometry);
    Ok(())
}

fn predict(args: &PredictArgs) -> Result<StoichiometryReport> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args.analysis)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Chaining {} copies of {}...",
        app.analysis.max_stoichiometry,
        app.analysis.input_path.display()
    );
    let report = stoichiometry::run(&app.analysis, &reporter)?;
    info!(
        minimum = ?report.minimum_index,
        "Workflow finished with {} RMSD values.",
        report.rmsd_list.len()
    );
    Ok(report)
}
