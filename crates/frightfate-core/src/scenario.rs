//! The scenario value object presented to a player.

use serde::{Deserialize, Serialize};

/// How lethal a scenario is allowed to be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathRiskLevel {
    /// Mistakes are survivable.
    Low,
    /// Default risk.
    #[default]
    Medium,
    /// Repeated poor judgement can kill.
    High,
    /// A bad answer kills outright.
    Instant,
}

/// One narrative decision point. Identity is `(session, question_number)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// 1-based position in the player's run.
    pub question_number: u32,
    /// Short title.
    pub title: String,
    /// 150–300 words ending in a call to action.
    pub description: String,
    /// Survival skills the scenario tests, in presentation order.
    pub survival_factors: Vec<String>,
    /// Running summary carried into the next scenario.
    pub story_context: String,
    /// Lethality of this scenario.
    pub death_risk_level: DeathRiskLevel,
    /// Advisory hints for future branching UI.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branching_paths: Vec<String>,
    /// How earlier choices shaped this scenario, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_consequences: Option<String>,
}
