//! Answer evaluation results and the hazard model.

use frightfate_core::scenario::DeathRiskLevel;
use serde::{Deserialize, Serialize};

use super::fallback::FallbackPolicy;

/// Elimination reason recorded when an evaluation kills a player without
/// saying why.
pub const DEFAULT_DEATH_REASON: &str = "Poor survival choices";

/// One earlier answer from the same player, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRecord {
    /// Question the answer belonged to.
    pub question_number: u32,
    /// What the player wrote.
    pub answer_text: String,
    /// Score it received.
    pub score: u32,
}

/// Scores of a history, in order.
#[must_use]
pub fn history_scores(history: &[ChoiceRecord]) -> Vec<u32> {
    history.iter().map(|c| c.score).collect()
}

/// Qualitative label for a single decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceClassification {
    /// A careful, well-reasoned decision.
    Cautious,
    /// Neither clearly good nor clearly bad.
    Neutral,
    /// An impulsive or dangerous decision.
    Reckless,
    /// A decision that got the player killed.
    Deadly,
}

impl ChoiceClassification {
    /// Label derived from the final score and death outcome.
    #[must_use]
    pub fn from_outcome(score: u32, instant_death: bool) -> Self {
        if instant_death {
            Self::Deadly
        } else if score >= 70 {
            Self::Cautious
        } else if score >= 40 {
            Self::Neutral
        } else {
            Self::Reckless
        }
    }
}

/// Outcome of scoring one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Survival score in `[0, 100]`.
    pub score: u32,
    /// Whether this answer eliminates the player.
    pub instant_death: bool,
    /// Why the player died. `Some` only when `instant_death` is set.
    pub death_reason: Option<String>,
    /// Explanation of the score.
    pub analysis: String,
    /// What happens next in the story because of this choice.
    pub story_progression: String,
    /// Qualitative label.
    pub classification: ChoiceClassification,
}

/// A score plus whatever else the scoring path could say about an answer,
/// before the hazard table has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Score in `[0, 100]`.
    pub score: u32,
    /// Explicit death call from the scorer, if it made one.
    pub instant_death: Option<bool>,
    /// Scorer-supplied death reason.
    pub death_reason: Option<String>,
    /// Explanation of the score.
    pub analysis: String,
    /// Scorer-supplied story beat.
    pub story_progression: Option<String>,
    /// Scorer-supplied label.
    pub classification: Option<ChoiceClassification>,
}

impl Verdict {
    /// Applies the hazard table and fills every field the scorer left out.
    ///
    /// The table always runs. An explicit `instant_death: true` from the
    /// scorer can add a death the table did not call, but can never veto one
    /// it did.
    #[must_use]
    pub fn settle(self, risk: DeathRiskLevel, prior_poor_choices: usize) -> EvaluationResult {
        let score = self.score.min(100);
        let instant_death = is_instant_death(risk, score, prior_poor_choices)
            || self.instant_death == Some(true);

        let classification = if instant_death {
            ChoiceClassification::Deadly
        } else {
            self.classification
                .filter(|c| *c != ChoiceClassification::Deadly)
                .unwrap_or_else(|| ChoiceClassification::from_outcome(score, false))
        };

        let death_reason = instant_death.then(|| {
            self.death_reason
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| FallbackPolicy::death_reason(risk, prior_poor_choices).to_owned())
        });

        let story_progression = self
            .story_progression
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| FallbackPolicy::story_progression(classification).to_owned());

        EvaluationResult {
            score,
            instant_death,
            death_reason,
            analysis: self.analysis,
            story_progression,
            classification,
        }
    }
}

/// The hazard table. Rules are checked in order; the first match kills.
///
/// 1. instant-risk scenario and `score < 40`
/// 2. high-risk scenario, at least two prior poor choices, and `score < 30`
/// 3. at least three prior poor choices and `score < 25`
#[must_use]
pub fn is_instant_death(risk: DeathRiskLevel, score: u32, prior_poor_choices: usize) -> bool {
    if risk == DeathRiskLevel::Instant && score < 40 {
        return true;
    }
    if risk == DeathRiskLevel::High && prior_poor_choices >= 2 && score < 30 {
        return true;
    }
    prior_poor_choices >= 3 && score < 25
}
