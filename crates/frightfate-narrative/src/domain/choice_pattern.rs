//! Coarse classification of a player's decision history.
//!
//! Both scenario escalation and the hazard table read this, so there is one
//! implementation and both call sites go through it.

use serde::{Deserialize, Serialize};

/// Scores strictly below this count as a poor choice.
pub const POOR_CHOICE_THRESHOLD: u32 = 30;

/// Number of poor choices in a score history.
#[must_use]
pub fn poor_choice_count(scores: &[u32]) -> usize {
    scores
        .iter()
        .filter(|&&score| score < POOR_CHOICE_THRESHOLD)
        .count()
}

/// Summary of how a player has been deciding so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoicePattern {
    /// No answers yet.
    NewPlayer,
    /// Two or more poor choices.
    ConsistentlyReckless,
    /// Averaging 70 or better.
    CautiousSurvivor,
    /// Averaging 50 to 69.
    MixedDecisions,
    /// Averaging below 50.
    PoorJudgment,
}

impl ChoicePattern {
    /// Classifies an ordered score history.
    #[must_use]
    pub fn classify(scores: &[u32]) -> Self {
        if scores.is_empty() {
            return Self::NewPlayer;
        }
        if poor_choice_count(scores) >= 2 {
            return Self::ConsistentlyReckless;
        }
        // Compare sums instead of averages to stay in integers.
        let total: u64 = scores.iter().map(|&s| u64::from(s)).sum();
        let count = scores.len() as u64;
        if total >= 70 * count {
            Self::CautiousSurvivor
        } else if total >= 50 * count {
            Self::MixedDecisions
        } else {
            Self::PoorJudgment
        }
    }

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NewPlayer => "new_player",
            Self::ConsistentlyReckless => "consistently_reckless",
            Self::CautiousSurvivor => "cautious_survivor",
            Self::MixedDecisions => "mixed_decisions",
            Self::PoorJudgment => "poor_judgment",
        }
    }

    /// How the next scenario should escalate for this kind of player.
    #[must_use]
    pub fn escalation_guidance(self) -> &'static str {
        match self {
            Self::NewPlayer => {
                "The player has no track record yet. Build tension steadily with a survivable threat."
            }
            Self::ConsistentlyReckless => {
                "The player has made two or more poor choices. Their recklessness has caught up with them: present a potential death scenario where one more mistake is fatal."
            }
            Self::CautiousSurvivor => {
                "The player has been careful and smart. Reward them with a sliver of hope, but raise the stakes with a cleverer, more demanding threat."
            }
            Self::MixedDecisions => {
                "The player has been inconsistent. Let earlier mistakes echo as complications and escalate the danger moderately."
            }
            Self::PoorJudgment => {
                "The player has shown poor judgment. Escalate sharply and make the consequences of their past choices felt."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_is_new_player() {
        assert_eq!(ChoicePattern::classify(&[]), ChoicePattern::NewPlayer);
    }

    #[test]
    fn test_two_poor_choices_are_consistently_reckless() {
        assert_eq!(
            ChoicePattern::classify(&[10, 20]),
            ChoicePattern::ConsistentlyReckless
        );
    }

    #[test]
    fn test_poor_choice_rule_wins_over_high_average() {
        // Average is 66, but two scores are below 30.
        assert_eq!(
            ChoicePattern::classify(&[100, 100, 100, 29, 1]),
            ChoicePattern::ConsistentlyReckless
        );
    }

    #[test]
    fn test_high_average_is_cautious_survivor() {
        assert_eq!(
            ChoicePattern::classify(&[80, 90]),
            ChoicePattern::CautiousSurvivor
        );
        assert_eq!(ChoicePattern::classify(&[70]), ChoicePattern::CautiousSurvivor);
    }

    #[test]
    fn test_middle_average_is_mixed_decisions() {
        assert_eq!(ChoicePattern::classify(&[50]), ChoicePattern::MixedDecisions);
        assert_eq!(
            ChoicePattern::classify(&[69, 70]),
            ChoicePattern::MixedDecisions
        );
    }

    #[test]
    fn test_low_average_with_one_poor_choice_is_poor_judgment() {
        assert_eq!(
            ChoicePattern::classify(&[20, 45]),
            ChoicePattern::PoorJudgment
        );
    }

    #[test]
    fn test_poor_choice_count_uses_strict_threshold() {
        assert_eq!(poor_choice_count(&[29, 30, 31, 0]), 2);
    }
}
