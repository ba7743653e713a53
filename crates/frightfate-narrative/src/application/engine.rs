//! The narrative engine: every oracle-backed component, wired to one oracle
//! and one configuration.

use std::sync::Arc;

use frightfate_core::oracle::NarrativeOracle;

use super::answer_evaluator::AnswerEvaluator;
use super::config::NarrativeConfig;
use super::results_aggregator::ResultsAggregator;
use super::scenario_generator::ScenarioGenerator;

/// Bundle handed to the command handlers.
#[derive(Debug, Clone)]
pub struct NarrativeEngine {
    /// Scenario generation.
    pub scenarios: ScenarioGenerator,
    /// Answer scoring.
    pub evaluator: AnswerEvaluator,
    /// Death narratives and final results.
    pub results: ResultsAggregator,
}

impl NarrativeEngine {
    /// Builds every component over the same oracle and configuration.
    #[must_use]
    pub fn new(oracle: Arc<dyn NarrativeOracle>, config: NarrativeConfig) -> Self {
        Self {
            scenarios: ScenarioGenerator::new(Arc::clone(&oracle), config),
            evaluator: AnswerEvaluator::new(Arc::clone(&oracle), config),
            results: ResultsAggregator::new(oracle, config),
        }
    }
}
