use super::stoichiometry;
use crate::engine::config::{AnalysisConfigBuilder, DEFAULT_SCRATCH_FILE};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use plotters::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::info;

const FIGURE_SIZE: (u32, u32) = (800, 500);

#[derive(Debug, Serialize)]
struct CurveRow {
    protomer: usize,
    rmsd_angstrom: f64,
}

/// Computes the RMSD curve of a dimer and plots it as an SVG scatter chart.
///
/// Points are `(i, rmsd_list[i])` for `i` in `1..max_expected_stoichiometry`;
/// the reference point at index 0 is left out. The first local minimum, when
/// there is one, is drawn in red. Uses `temporary_file.pdb` as scratch file.
///
/// # Return
///
/// The plotted points.
pub fn draw_rmsd_curve(
    filepath: impl AsRef<Path>,
    filename: &str,
    max_expected_stoichiometry: usize,
    output: impl AsRef<Path>,
) -> Result<Vec<(usize, f64)>, EngineError> {
    let config = AnalysisConfigBuilder::new()
        .input_path(filepath.as_ref().join(filename))
        .max_stoichiometry(max_expected_stoichiometry)
        .scratch_path(DEFAULT_SCRATCH_FILE)
        .build()?;
    let report = stoichiometry::run(&config, &ProgressReporter::new())?;

    let points = report.curve_points();
    render_rmsd_curve(&points, report.minimum_index, output.as_ref())?;
    Ok(points)
}

/// Renders curve points to an SVG file.
///
/// `highlight` is an x value (protomer index) to mark.
pub fn render_rmsd_curve(
    points: &[(usize, f64)],
    highlight: Option<usize>,
    path: &Path,
) -> Result<(), EngineError> {
    draw_chart(points, highlight, path).map_err(|e| EngineError::Export {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    info!(path = %path.display(), points = points.len(), "RMSD curve rendered.");
    Ok(())
}

fn draw_chart(
    points: &[(usize, f64)],
    highlight: Option<usize>,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    if points.is_empty() {
        root.draw(&Text::new(
            "No RMSD data",
            (FIGURE_SIZE.0 as i32 / 2, FIGURE_SIZE.1 as i32 / 2),
            ("sans-serif", 20).into_font().color(&BLACK),
        ))?;
        root.present()?;
        return Ok(());
    }

    let x_max = points.iter().map(|&(x, _)| x).max().unwrap_or(1) + 1;
    let y_max = points
        .iter()
        .map(|&(_, y)| y)
        .fold(0.0f64, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..x_max, 0.0..y_max * 1.1)?;

    chart
        .configure_mesh()
        .x_desc("Protomer N")
        .y_desc("RMSD (1, N), Å")
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
    )?;

    if let Some(&(x, y)) = highlight.and_then(|h| points.iter().find(|(x, _)| *x == h)) {
        chart.draw_series(std::iter::once(Circle::new((x, y), 6, RED.filled())))?;
    }

    root.present()?;
    Ok(())
}

/// Writes curve points as CSV with a `protomer,rmsd_angstrom` header.
pub fn write_curve_csv(points: &[(usize, f64)], path: &Path) -> Result<(), EngineError> {
    let export_error = |reason: String| EngineError::Export {
        path: path.display().to_string(),
        reason,
    };

    let mut writer = csv::Writer::from_path(path).map_err(|e| export_error(e.to_string()))?;
    for &(protomer, rmsd_angstrom) in points {
        writer
            .serialize(CurveRow {
                protomer,
                rmsd_angstrom,
            })
            .map_err(|e| export_error(e.to_string()))?;
    }
    writer.flush().map_err(|e| export_error(e.to_string()))
}
