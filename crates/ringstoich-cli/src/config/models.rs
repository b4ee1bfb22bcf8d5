use ringstoich::engine::config::AnalysisConfig;

/// Fully merged settings for one command run.
pub struct AppConfig {
    pub analysis: AnalysisConfig,
}
