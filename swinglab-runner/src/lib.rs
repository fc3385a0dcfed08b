//! SwingLab Runner — config, CSV loading, batch simulation, episodes, export.
//!
//! This crate builds on `swinglab-core` to provide:
//! - TOML pipeline config with a stable content hash
//! - CSV loading of bars, volatility and regime columns
//! - Parallel scoring and decision batches across bars and assets
//! - Seeded decision policies for episode runs
//! - Per-asset artifact layout (`Cryptocurrencies/` vs `Stocks/`)

pub mod asset;
pub mod batch;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod pipeline;
pub mod policy;
pub mod rng;

pub use asset::AssetClass;
pub use batch::{simulate_batch, suggested_decisions, ScoredOutcome};
pub use config::{ConfigError, PipelineConfig, PolicyKind, RunSection};
pub use data_loader::{load_csv, read_series, LoadError, LoadedSeries};
pub use export::{export_features_csv, export_outcomes_csv, save_asset_artifacts, ExportError};
pub use metrics::OutcomeSummary;
pub use pipeline::{
    build_table, process_asset, run_assets, simulate_table, AssetInput, AssetReport,
    AssetSummary, RunError, RunMode, RunReport, SimulationReport,
};
pub use policy::{build_policy, ConfidencePolicy, RandomPolicy};
pub use rng::RngHierarchy;

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<PipelineConfig>();
        assert_sync::<PipelineConfig>();
        assert_send::<RngHierarchy>();
        assert_sync::<RngHierarchy>();
    }

    #[test]
    fn report_types_are_send_sync() {
        assert_send::<AssetReport>();
        assert_sync::<AssetReport>();
        assert_send::<RunReport>();
        assert_sync::<RunReport>();
        assert_send::<OutcomeSummary>();
        assert_sync::<OutcomeSummary>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }

    #[test]
    fn policies_are_send() {
        assert_send::<ConfidencePolicy>();
        assert_send::<RandomPolicy>();
    }
}
