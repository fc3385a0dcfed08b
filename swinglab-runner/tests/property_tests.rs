//! Property tests for runner invariants.
//!
//! 1. Parallel batches match a sequential replay of the same decisions
//! 2. Config TOML round-trips keep the config hash
//! 3. Crypto detection depends only on the quote suffix

use proptest::prelude::*;
use swinglab_core::domain::bars_from_closes;
use swinglab_core::regime::RegimeSignals;
use swinglab_core::scoring::CandidateScorer;
use swinglab_core::simulation::{RewardFunction, RewardInputs, TradeSimulator};
use swinglab_core::table::FeatureTable;
use swinglab_runner::{simulate_batch, suggested_decisions, AssetClass, PipelineConfig};

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-2.0..2.0_f64, 20..150).prop_map(|steps| {
        let mut price = 500.0;
        steps
            .into_iter()
            .map(|s| {
                price += s;
                price
            })
            .collect()
    })
}

fn table(closes: &[f64], confidence: f64) -> FeatureTable {
    let bars = bars_from_closes(closes);
    let n = bars.len();
    let config = PipelineConfig::default();
    FeatureTable::build(
        "PROP",
        bars,
        vec![1.0; n],
        vec![RegimeSignals::with_confidence(confidence); n],
        &config.feature_engine(),
        &CandidateScorer::new(config.scoring),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn batch_matches_sequential_replay(closes in arb_closes(), conf in -1.0..1.0_f64) {
        let table = table(&closes, conf);
        let simulator = TradeSimulator::default();
        let reward = RewardFunction::default();
        let decisions = suggested_decisions(&table, 0.3);
        let batch = simulate_batch(&table, &decisions, &simulator, &reward).unwrap();

        prop_assert_eq!(batch.len(), decisions.len());
        for (scored, decision) in batch.iter().zip(&decisions) {
            let outcome = simulator.simulate(&table.bars, &table.raw_volatility, decision).unwrap();
            let r = reward.reward(&RewardInputs::from_outcome(&outcome, &table.regime[decision.bar_index]));
            prop_assert_eq!(scored.outcome, outcome);
            prop_assert_eq!(scored.reward, r);
        }
    }

    #[test]
    fn config_hash_survives_toml(seed in any::<u64>(), period in 1usize..100) {
        let mut config = PipelineConfig::default();
        config.run.seed = seed;
        config.run.atr_period = period;
        let text = config.to_toml_string().unwrap();
        let back = PipelineConfig::from_toml_str(&text).unwrap();
        prop_assert_eq!(back.config_hash().unwrap(), config.config_hash().unwrap());
    }

    #[test]
    fn quote_suffix_decides_asset_class(base in "[A-Z]{1,6}") {
        for quote in ["USDT", "busd", "BTC", "ETH", "BNB", "USDC"] {
            prop_assert_eq!(AssetClass::detect(&format!("{base}{quote}")), AssetClass::Crypto);
        }
        prop_assert_eq!(AssetClass::detect(&format!("{base}X")), AssetClass::Stock);
    }
}
