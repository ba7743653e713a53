//! Answer scoring through the oracle, with the keyword heuristic as fallback.
//!
//! Whichever path produces the score, the hazard table is applied the same
//! way through [`Verdict::settle`].

use std::sync::Arc;

use frightfate_core::oracle::{NarrativeOracle, OracleError};
use frightfate_core::scenario::Scenario;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::bounded::bounded_or_else;
use super::config::NarrativeConfig;
use super::oracle_json::extract_json;
use super::prompts;
use crate::domain::choice_pattern::poor_choice_count;
use crate::domain::evaluation::{
    ChoiceClassification, ChoiceRecord, EvaluationResult, Verdict, history_scores,
};
use crate::domain::fallback::FallbackPolicy;

/// Analysis as the oracle returns it. `survival_score` and `analysis` are
/// required; everything else is optional.
#[derive(Debug, Deserialize)]
struct AnalysisReply {
    survival_score: f64,
    analysis: String,
    #[serde(default)]
    instant_death: Option<bool>,
    #[serde(default)]
    death_reason: Option<String>,
    #[serde(default)]
    story_progression: Option<String>,
    #[serde(default)]
    classification: Option<String>,
}

fn parse_classification(label: &str) -> Option<ChoiceClassification> {
    match label.trim().to_ascii_lowercase().as_str() {
        "cautious" => Some(ChoiceClassification::Cautious),
        "neutral" => Some(ChoiceClassification::Neutral),
        "reckless" => Some(ChoiceClassification::Reckless),
        "deadly" => Some(ChoiceClassification::Deadly),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_score(raw: f64) -> Result<u32, OracleError> {
    if !raw.is_finite() {
        return Err(OracleError::MalformedOutput(format!(
            "survival_score is not a number: {raw}"
        )));
    }
    Ok(raw.round().clamp(0.0, 100.0) as u32)
}

impl AnalysisReply {
    fn into_verdict(self) -> Result<Verdict, OracleError> {
        let analysis = self.analysis.trim().to_owned();
        if analysis.is_empty() {
            return Err(OracleError::MalformedOutput("empty analysis".to_owned()));
        }
        Ok(Verdict {
            score: clamp_score(self.survival_score)?,
            instant_death: self.instant_death,
            death_reason: self.death_reason,
            analysis,
            story_progression: self.story_progression,
            classification: self.classification.as_deref().and_then(parse_classification),
        })
    }
}

/// Scores answers and decides elimination.
#[derive(Clone)]
pub struct AnswerEvaluator {
    oracle: Arc<dyn NarrativeOracle>,
    config: NarrativeConfig,
}

impl std::fmt::Debug for AnswerEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerEvaluator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AnswerEvaluator {
    /// Creates an evaluator over `oracle`.
    #[must_use]
    pub fn new(oracle: Arc<dyn NarrativeOracle>, config: NarrativeConfig) -> Self {
        Self { oracle, config }
    }

    /// Scores `answer_text` against `scenario`, given the player's earlier
    /// choices in question order. Never fails.
    #[instrument(
        skip_all,
        fields(question_number = scenario.question_number, risk = ?scenario.death_risk_level)
    )]
    pub async fn evaluate(
        &self,
        scenario: &Scenario,
        answer_text: &str,
        history: &[ChoiceRecord],
    ) -> EvaluationResult {
        let prior_poor_choices = poor_choice_count(&history_scores(history));
        let request =
            prompts::answer_analysis(scenario, answer_text, history, self.config.analysis_params);

        let result = bounded_or_else(
            "evaluate_answer",
            self.config.analysis_budget,
            async {
                let text = self.oracle.generate(&request).await?;
                let reply: AnalysisReply = extract_json(&text)?;
                Ok(reply
                    .into_verdict()?
                    .settle(scenario.death_risk_level, prior_poor_choices))
            },
            || FallbackPolicy::evaluate(scenario, answer_text, history),
        )
        .await;

        debug!(
            score = result.score,
            instant_death = result.instant_death,
            "answer evaluated"
        );
        result
    }
}
