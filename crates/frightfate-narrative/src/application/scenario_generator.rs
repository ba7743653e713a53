//! Scenario generation through the oracle, with deterministic fallback.

use std::sync::Arc;

use frightfate_core::oracle::{NarrativeOracle, OracleError};
use frightfate_core::scenario::{DeathRiskLevel, Scenario};
use frightfate_core::theme::Theme;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::bounded::{bounded, bounded_or_else};
use super::config::NarrativeConfig;
use super::oracle_json::extract_json;
use super::prompts;
use crate::domain::choice_pattern::ChoicePattern;
use crate::domain::evaluation::{ChoiceRecord, history_scores};
use crate::domain::fallback::FallbackPolicy;

const MIN_TITLE_CHARS: usize = 3;
const MIN_DESCRIPTION_CHARS: usize = 50;

/// Scenario as the oracle returns it, before validation.
#[derive(Debug, Deserialize)]
struct ScenarioDraft {
    title: String,
    description: String,
    #[serde(default)]
    survival_factors: Vec<String>,
    #[serde(default)]
    story_context: Option<String>,
    #[serde(default)]
    death_risk_level: Option<String>,
    #[serde(default)]
    branching_paths: Vec<String>,
    #[serde(default)]
    narrative_consequences: Option<String>,
}

fn parse_risk(level: &str) -> Option<DeathRiskLevel> {
    match level.trim().to_ascii_lowercase().as_str() {
        "low" => Some(DeathRiskLevel::Low),
        "medium" => Some(DeathRiskLevel::Medium),
        "high" => Some(DeathRiskLevel::High),
        "instant" => Some(DeathRiskLevel::Instant),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl ScenarioDraft {
    /// Validates the draft and turns it into a scenario.
    ///
    /// `default_risk` applies when the draft names no (recognised) risk
    /// level; `default_context` when it carries no story context.
    fn into_scenario(
        self,
        question_number: u32,
        default_risk: DeathRiskLevel,
        default_context: &str,
    ) -> Result<Scenario, OracleError> {
        let title = self.title.trim().to_owned();
        if title.chars().count() < MIN_TITLE_CHARS {
            return Err(OracleError::InvalidScenario(format!(
                "title shorter than {MIN_TITLE_CHARS} characters"
            )));
        }
        let description = self.description.trim().to_owned();
        if description.chars().count() < MIN_DESCRIPTION_CHARS {
            return Err(OracleError::InvalidScenario(format!(
                "description shorter than {MIN_DESCRIPTION_CHARS} characters"
            )));
        }

        let mut survival_factors: Vec<String> = Vec::new();
        for factor in self.survival_factors {
            let factor = factor.trim().to_owned();
            if !factor.is_empty() && !survival_factors.contains(&factor) {
                survival_factors.push(factor);
            }
        }
        if survival_factors.is_empty() {
            return Err(OracleError::InvalidScenario(
                "no survival factors".to_owned(),
            ));
        }

        Ok(Scenario {
            question_number,
            title,
            description,
            survival_factors,
            story_context: non_blank(self.story_context)
                .unwrap_or_else(|| default_context.to_owned()),
            death_risk_level: self
                .death_risk_level
                .as_deref()
                .and_then(parse_risk)
                .unwrap_or(default_risk),
            branching_paths: self
                .branching_paths
                .into_iter()
                .map(|p| p.trim().to_owned())
                .filter(|p| !p.is_empty())
                .collect(),
            narrative_consequences: non_blank(self.narrative_consequences),
        })
    }
}

/// Produces the scenarios players respond to.
#[derive(Clone)]
pub struct ScenarioGenerator {
    oracle: Arc<dyn NarrativeOracle>,
    config: NarrativeConfig,
}

impl std::fmt::Debug for ScenarioGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ScenarioGenerator {
    /// Creates a generator over `oracle`.
    #[must_use]
    pub fn new(oracle: Arc<dyn NarrativeOracle>, config: NarrativeConfig) -> Self {
        Self { oracle, config }
    }

    /// The opening scenario for `theme`. Never fails: any oracle problem
    /// yields the canned opener for the theme.
    #[instrument(skip(self, theme), fields(theme = %theme))]
    pub async fn generate_initial(&self, theme: &Theme) -> Scenario {
        let request = prompts::initial_scenario(theme, self.config.scenario_params);
        let default_context = format!("The {} nightmare begins.", theme.display_name());

        bounded_or_else(
            "generate_initial",
            self.config.scenario_budget,
            async {
                let text = self.oracle.generate(&request).await?;
                let draft: ScenarioDraft = extract_json(&text)?;
                draft.into_scenario(1, DeathRiskLevel::Medium, &default_context)
            },
            || FallbackPolicy::initial_scenario(theme),
        )
        .await
    }

    /// A follow-up scenario conditioned on the player's `history` and the
    /// running `story_context`.
    ///
    /// Returns `None` when the oracle fails; the caller decides what to
    /// serve instead.
    #[instrument(
        skip(self, theme, history, story_context),
        fields(theme = %theme, history_len = history.len())
    )]
    pub async fn generate_next(
        &self,
        theme: &Theme,
        question_number: u32,
        history: &[ChoiceRecord],
        story_context: &str,
    ) -> Option<Scenario> {
        let pattern = ChoicePattern::classify(&history_scores(history));
        debug!(pattern = pattern.as_str(), "classified choice history");

        let request = prompts::next_scenario(
            theme,
            question_number,
            pattern,
            history,
            story_context,
            self.config.scenario_params,
        );
        let default_risk = FallbackPolicy::risk_for(pattern, question_number);

        let outcome = bounded(self.config.scenario_budget, async {
            let text = self.oracle.generate(&request).await?;
            let draft: ScenarioDraft = extract_json(&text)?;
            draft.into_scenario(question_number, default_risk, story_context)
        })
        .await;

        match outcome {
            Ok(scenario) => Some(scenario),
            Err(error) => {
                warn!(call_site = "generate_next", %error, "oracle call failed, no scenario");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use frightfate_test_support::{FailingOracle, ScriptedOracle, StallingOracle};

    const LONG_DESCRIPTION: &str = "The basement stairs groan under your weight as the single bulb above you flickers and dies. What do you do?";

    fn generator(oracle: Arc<dyn NarrativeOracle>) -> ScenarioGenerator {
        ScenarioGenerator::new(oracle, NarrativeConfig::default())
    }

    fn scenario_json(title: &str, description: &str, factors: &[&str]) -> String {
        serde_json::json!({
            "question_number": 9,
            "title": title,
            "description": description,
            "survival_factors": factors,
            "story_context": "Down in the dark.",
            "death_risk_level": "HIGH",
            "branching_paths": ["go up", "go down"]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_generate_initial_uses_valid_oracle_scenario() {
        // Arrange
        let reply = format!(
            "```json\n{}\n```",
            scenario_json("The Basement", LONG_DESCRIPTION, &["caution", "caution", "courage"])
        );
        let oracle = Arc::new(ScriptedOracle::always(reply));

        // Act
        let scenario = generator(oracle.clone()).generate_initial(&Theme::HauntedHouse).await;

        // Assert
        assert_eq!(scenario.question_number, 1);
        assert_eq!(scenario.title, "The Basement");
        assert_eq!(scenario.survival_factors, vec!["caution", "courage"]);
        assert_eq!(scenario.death_risk_level, DeathRiskLevel::High);
        assert_eq!(oracle.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generate_initial_rejects_short_description() {
        let oracle = Arc::new(ScriptedOracle::always(scenario_json(
            "The Basement",
            "Too short.",
            &["caution"],
        )));

        let scenario = generator(oracle).generate_initial(&Theme::SlasherMovie).await;

        assert_eq!(scenario, FallbackPolicy::initial_scenario(&Theme::SlasherMovie));
    }

    #[tokio::test]
    async fn test_generate_initial_rejects_short_title_and_empty_factors() {
        let short_title = generator(Arc::new(ScriptedOracle::always(scenario_json(
            "Go",
            LONG_DESCRIPTION,
            &["caution"],
        ))))
        .generate_initial(&Theme::AlienInvasion)
        .await;
        let no_factors = generator(Arc::new(ScriptedOracle::always(scenario_json(
            "The Basement",
            LONG_DESCRIPTION,
            &[" "],
        ))))
        .generate_initial(&Theme::AlienInvasion)
        .await;

        let fallback = FallbackPolicy::initial_scenario(&Theme::AlienInvasion);
        assert_eq!(short_title, fallback);
        assert_eq!(no_factors, fallback);
    }

    #[tokio::test]
    async fn test_generate_initial_falls_back_when_oracle_unreachable() {
        let scenario = generator(Arc::new(FailingOracle::default()))
            .generate_initial(&Theme::Custom("clown_carnival".to_owned()))
            .await;

        assert!(scenario.description.starts_with("This is a clown carnival nightmare."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_initial_falls_back_after_scenario_budget() {
        // Arrange
        let started = tokio::time::Instant::now();

        // Act
        let scenario = generator(Arc::new(StallingOracle))
            .generate_initial(&Theme::DeepSeaTerror)
            .await;

        // Assert
        assert_eq!(scenario, FallbackPolicy::initial_scenario(&Theme::DeepSeaTerror));
        assert!(started.elapsed() >= Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_generate_next_fills_defaults_from_context_and_pattern() {
        // Arrange
        let reply = serde_json::json!({
            "title": "The Flooded Corridor",
            "description": LONG_DESCRIPTION,
            "survival_factors": ["resourcefulness"],
            "death_risk_level": "catastrophic"
        })
        .to_string();
        let history = vec![
            ChoiceRecord { question_number: 1, answer_text: "run".to_owned(), score: 10 },
            ChoiceRecord { question_number: 2, answer_text: "scream".to_owned(), score: 5 },
        ];

        // Act
        let scenario = generator(Arc::new(ScriptedOracle::always(reply)))
            .generate_next(&Theme::DeepSeaTerror, 3, &history, "Water is rising.")
            .await
            .unwrap();

        // Assert
        assert_eq!(scenario.question_number, 3);
        assert_eq!(scenario.story_context, "Water is rising.");
        assert_eq!(scenario.death_risk_level, DeathRiskLevel::High);
        assert!(scenario.branching_paths.is_empty());
    }

    #[tokio::test]
    async fn test_generate_next_reports_absence_on_malformed_output() {
        let oracle = Arc::new(ScriptedOracle::always("I'm sorry, I can't write that."));

        let scenario = generator(oracle.clone())
            .generate_next(&Theme::HauntedHouse, 2, &[], "")
            .await;

        assert!(scenario.is_none());
        assert_eq!(oracle.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_next_reports_absence_on_timeout() {
        let scenario = generator(Arc::new(StallingOracle))
            .generate_next(&Theme::HauntedHouse, 2, &[], "")
            .await;

        assert!(scenario.is_none());
    }
}
