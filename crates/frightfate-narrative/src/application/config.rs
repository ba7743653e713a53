//! Engine configuration: time budgets and sampling parameters per call site.

use std::time::Duration;

use frightfate_core::oracle::GenerationParams;

/// Explicit configuration handed to every engine component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrativeConfig {
    /// Budget for one scenario generation call.
    pub scenario_budget: Duration,
    /// Budget for one answer analysis call.
    pub analysis_budget: Duration,
    /// Budget for one results or death-narrative call.
    pub results_budget: Duration,
    /// Sampling for scenario generation.
    pub scenario_params: GenerationParams,
    /// Sampling for answer analysis. Kept cool so scores are stable.
    pub analysis_params: GenerationParams,
    /// Sampling for results narratives.
    pub results_params: GenerationParams,
}

impl NarrativeConfig {
    /// Default configuration with the given time budgets.
    #[must_use]
    pub fn with_budgets(scenario: Duration, analysis: Duration, results: Duration) -> Self {
        Self {
            scenario_budget: scenario,
            analysis_budget: analysis,
            results_budget: results,
            ..Self::default()
        }
    }
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            scenario_budget: Duration::from_secs(30),
            analysis_budget: Duration::from_secs(20),
            results_budget: Duration::from_secs(25),
            scenario_params: GenerationParams {
                temperature: 0.7,
                top_p: 0.8,
                top_k: 40,
                max_output_tokens: 2048,
            },
            analysis_params: GenerationParams {
                temperature: 0.3,
                top_p: 0.8,
                top_k: 40,
                max_output_tokens: 512,
            },
            results_params: GenerationParams {
                temperature: 0.8,
                top_p: 0.9,
                top_k: 40,
                max_output_tokens: 1500,
            },
        }
    }
}
