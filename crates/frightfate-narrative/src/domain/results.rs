//! End-of-game roster, ranking, and fate records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One player's standing at game end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Player identifier.
    pub player_id: Uuid,
    /// Display name.
    pub player_name: String,
    /// Sum of the player's answer scores.
    pub total_score: u32,
    /// Number of answers recorded.
    pub answer_count: usize,
    /// Set iff the player was eliminated.
    pub elimination_reason: Option<String>,
    /// Position in the elimination sequence, if eliminated.
    pub death_order: Option<u32>,
}

impl RosterEntry {
    /// Whether the player was eliminated.
    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.elimination_reason.is_some()
    }
}

/// A player's final fate as shown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerFate {
    /// Display name.
    pub player_name: String,
    /// 1 is the sole survivor.
    pub rank: u32,
    /// Only rank 1 survives.
    pub survived: bool,
    /// Headline ("SOLE SURVIVOR", "DIED #3", ...).
    pub fate_title: String,
    /// Two or three sentences of story.
    pub narrative: String,
    /// Why the player lived or died.
    pub survival_analysis: String,
}

/// Personalised narrative for a player who was just eliminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathNarrative {
    /// Display name.
    pub player_name: String,
    /// Headline.
    pub fate_title: String,
    /// How they died.
    pub narrative: String,
    /// The recorded elimination reason.
    pub elimination_reason: String,
}

/// Roster split into rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standings {
    /// Active players, highest total first. Index 0 is the survivor.
    pub active: Vec<RosterEntry>,
    /// Eliminated players, last to die first.
    pub eliminated: Vec<RosterEntry>,
}

impl Standings {
    /// Orders a roster.
    ///
    /// Active players sort by total score descending; ties keep roster
    /// order. Eliminated players rank below every active player, the most
    /// recently eliminated first; players without a recorded death order
    /// come last in roster order.
    #[must_use]
    pub fn from_roster(roster: Vec<RosterEntry>) -> Self {
        let (mut active, mut eliminated): (Vec<_>, Vec<_>) =
            roster.into_iter().partition(|e| !e.is_eliminated());
        active.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        eliminated.sort_by(|a, b| match (a.death_order, b.death_order) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Self { active, eliminated }
    }

    /// Rank given to the first eliminated player.
    #[must_use]
    pub fn first_eliminated_rank(&self) -> u32 {
        u32::try_from(self.active.len()).unwrap_or(u32::MAX - 1) + 1
    }

    /// Total number of players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len() + self.eliminated.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
