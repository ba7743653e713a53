//! End-of-game ranking and fate narratives.
//!
//! Ranking is always computed here; the oracle only writes prose. Active
//! players share one batch call, each eliminated player gets a call of their
//! own, and all of them run concurrently under the results budget.

use std::collections::HashMap;
use std::sync::Arc;

use frightfate_core::oracle::{NarrativeOracle, OracleError};
use frightfate_core::theme::Theme;
use futures::future::join_all;
use serde::Deserialize;
use tracing::{info, instrument};

use super::bounded::bounded_or_else;
use super::config::NarrativeConfig;
use super::oracle_json::extract_json;
use super::prompts;
use crate::domain::evaluation::DEFAULT_DEATH_REASON;
use crate::domain::fallback::FallbackPolicy;
use crate::domain::results::{DeathNarrative, PlayerFate, RosterEntry, Standings};

/// One entry of the survivor batch as the oracle writes it. Rank and
/// survival are ignored; the engine assigns both.
#[derive(Debug, Deserialize)]
struct FateDraft {
    player_name: String,
    #[serde(default)]
    fate_title: Option<String>,
    narrative: String,
    #[serde(default)]
    survival_analysis: Option<String>,
}

/// A death scene as the oracle writes it.
#[derive(Debug, Deserialize)]
struct DeathDraft {
    #[serde(default)]
    fate_title: Option<String>,
    narrative: String,
    #[serde(default)]
    survival_analysis: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn required_text(value: String, field: &str) -> Result<String, OracleError> {
    non_blank(Some(value)).ok_or_else(|| OracleError::MalformedOutput(format!("empty {field}")))
}

fn rank_at(start: u32, offset: usize) -> u32 {
    start.saturating_add(u32::try_from(offset).unwrap_or(u32::MAX))
}

/// Builds the final results list.
#[derive(Clone)]
pub struct ResultsAggregator {
    oracle: Arc<dyn NarrativeOracle>,
    config: NarrativeConfig,
}

impl std::fmt::Debug for ResultsAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultsAggregator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ResultsAggregator {
    /// Creates an aggregator over `oracle`.
    #[must_use]
    pub fn new(oracle: Arc<dyn NarrativeOracle>, config: NarrativeConfig) -> Self {
        Self { oracle, config }
    }

    /// Ranks `roster` and writes a fate for every player.
    ///
    /// The output has exactly one entry per roster entry, in rank order:
    /// active players by score (rank 1 is the sole survivor), then eliminated
    /// players from the most recent death back to the first.
    #[instrument(skip_all, fields(theme = %theme, roster_len = roster.len()))]
    pub async fn aggregate(&self, theme: &Theme, roster: Vec<RosterEntry>) -> Vec<PlayerFate> {
        let standings = Standings::from_roster(roster);
        let first_eliminated = standings.first_eliminated_rank();

        let eliminated_fates = standings
            .eliminated
            .iter()
            .enumerate()
            .map(|(offset, entry)| {
                self.eliminated_fate(theme, entry, rank_at(first_eliminated, offset))
            });

        let (mut fates, eliminated) = tokio::join!(
            self.active_fates(theme, &standings.active),
            join_all(eliminated_fates)
        );
        fates.extend(eliminated);

        info!(
            active = standings.active.len(),
            eliminated = standings.eliminated.len(),
            "results aggregated"
        );
        fates
    }

    /// A personal death narrative for a player who has just been
    /// eliminated. Never fails.
    #[instrument(skip_all, fields(player = %entry.player_name))]
    pub async fn narrate_death(&self, theme: &Theme, entry: &RosterEntry) -> DeathNarrative {
        let reason = entry
            .elimination_reason
            .as_deref()
            .unwrap_or(DEFAULT_DEATH_REASON);
        let fallback = FallbackPolicy::death_narrative(&entry.player_name, reason);

        match self.death_draft(theme, entry, reason).await {
            Some(draft) => DeathNarrative {
                player_name: entry.player_name.clone(),
                fate_title: non_blank(draft.fate_title).unwrap_or(fallback.fate_title),
                narrative: draft.narrative,
                elimination_reason: fallback.elimination_reason,
            },
            None => fallback,
        }
    }

    async fn death_draft(
        &self,
        theme: &Theme,
        entry: &RosterEntry,
        reason: &str,
    ) -> Option<DeathDraft> {
        let request = prompts::death_narrative(theme, entry, reason, self.config.results_params);
        bounded_or_else(
            "death_narrative",
            self.config.results_budget,
            async {
                let text = self.oracle.generate(&request).await?;
                let mut draft: DeathDraft = extract_json(&text)?;
                draft.narrative = required_text(draft.narrative, "narrative")?;
                Ok(Some(draft))
            },
            || None,
        )
        .await
    }

    async fn eliminated_fate(&self, theme: &Theme, entry: &RosterEntry, rank: u32) -> PlayerFate {
        let fallback = FallbackPolicy::eliminated_fate(entry, rank);
        let reason = entry
            .elimination_reason
            .as_deref()
            .unwrap_or(DEFAULT_DEATH_REASON);

        match self.death_draft(theme, entry, reason).await {
            Some(draft) => PlayerFate {
                player_name: entry.player_name.clone(),
                rank,
                survived: false,
                fate_title: non_blank(draft.fate_title).unwrap_or(fallback.fate_title),
                narrative: draft.narrative,
                survival_analysis: non_blank(draft.survival_analysis)
                    .unwrap_or(fallback.survival_analysis),
            },
            None => fallback,
        }
    }

    /// Fates for the active players, already in rank order. All of them fall
    /// back together if the batch is unusable or misses anyone.
    async fn active_fates(&self, theme: &Theme, ranked: &[RosterEntry]) -> Vec<PlayerFate> {
        let fallback = || -> Vec<PlayerFate> {
            ranked
                .iter()
                .enumerate()
                .map(|(offset, entry)| FallbackPolicy::active_fate(entry, rank_at(1, offset)))
                .collect()
        };
        if ranked.is_empty() {
            return Vec::new();
        }

        let request = prompts::survivor_fates(theme, ranked, self.config.results_params);
        bounded_or_else(
            "survivor_fates",
            self.config.results_budget,
            async {
                let text = self.oracle.generate(&request).await?;
                let drafts: Vec<FateDraft> = extract_json(&text)?;
                merge_drafts(ranked, drafts)
            },
            fallback,
        )
        .await
    }
}

/// Pairs each ranked player with the draft written for them, by name.
fn merge_drafts(
    ranked: &[RosterEntry],
    drafts: Vec<FateDraft>,
) -> Result<Vec<PlayerFate>, OracleError> {
    let mut by_name: HashMap<String, FateDraft> = HashMap::new();
    for draft in drafts {
        by_name
            .entry(draft.player_name.trim().to_owned())
            .or_insert(draft);
    }

    ranked
        .iter()
        .enumerate()
        .map(|(offset, entry)| {
            let rank = rank_at(1, offset);
            let draft = by_name.remove(entry.player_name.trim()).ok_or_else(|| {
                OracleError::MalformedOutput(format!("no fate for {}", entry.player_name))
            })?;
            let fallback = FallbackPolicy::active_fate(entry, rank);
            Ok(PlayerFate {
                player_name: entry.player_name.clone(),
                rank,
                survived: fallback.survived,
                fate_title: non_blank(draft.fate_title).unwrap_or(fallback.fate_title),
                narrative: required_text(draft.narrative, "narrative")?,
                survival_analysis: non_blank(draft.survival_analysis)
                    .unwrap_or(fallback.survival_analysis),
            })
        })
        .collect()
}
