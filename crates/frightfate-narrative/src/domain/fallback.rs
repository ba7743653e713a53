//! Deterministic substitutes for everything the oracle produces.
//!
//! Every function here is pure: identical inputs give identical outputs and
//! nothing touches the network. The engine reaches for these whenever an
//! oracle call errors, times out, or returns something unusable.

use frightfate_core::scenario::{DeathRiskLevel, Scenario};
use frightfate_core::theme::Theme;

use super::choice_pattern::{ChoicePattern, poor_choice_count};
use super::evaluation::{
    ChoiceClassification, ChoiceRecord, DEFAULT_DEATH_REASON, EvaluationResult, Verdict,
    history_scores,
};
use super::results::{DeathNarrative, PlayerFate, RosterEntry};

const EXCELLENT_KEYWORDS: [&str; 10] = [
    "carefully", "slowly", "quietly", "observe", "listen", "plan", "strategy", "safe", "caution",
    "think",
];
const GOOD_KEYWORDS: [&str; 9] = [
    "check", "look", "examine", "search", "prepare", "ready", "escape", "help", "consider",
];
const BAD_KEYWORDS: [&str; 8] = [
    "run", "charge", "attack", "rush", "fast", "immediately", "grab", "fight",
];
const TERRIBLE_KEYWORDS: [&str; 6] = ["scream", "panic", "freeze", "give up", "surrender", "ignore"];

const CALL_TO_ACTION: &str = "What do you do?";

/// Number of distinct keywords that occur anywhere in `text`.
fn keyword_hits(text: &str, keywords: &[&str]) -> i32 {
    let hits = keywords.iter().filter(|k| text.contains(*k)).count();
    i32::try_from(hits).unwrap_or(i32::MAX)
}

/// The deterministic fallback policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackPolicy;

impl FallbackPolicy {
    /// Keyword heuristic score for an answer, clamped to `[0, 100]`.
    ///
    /// Starts at 50; each distinct keyword adds or subtracts by tier
    /// (excellent +15, good +10, bad −10, terrible −20); answers longer than
    /// 100 characters gain 5 and answers shorter than 20 lose 10; each `?`
    /// adds 3, up to 9.
    #[must_use]
    pub fn keyword_score(answer: &str) -> u32 {
        let lower = answer.to_lowercase();
        let mut score: i32 = 50;
        score += 15 * keyword_hits(&lower, &EXCELLENT_KEYWORDS);
        score += 10 * keyword_hits(&lower, &GOOD_KEYWORDS);
        score -= 10 * keyword_hits(&lower, &BAD_KEYWORDS);
        score -= 20 * keyword_hits(&lower, &TERRIBLE_KEYWORDS);

        let length = answer.chars().count();
        if length > 100 {
            score += 5;
        } else if length < 20 {
            score -= 10;
        }

        let questions = answer.matches('?').count().min(3);
        score += 3 * i32::try_from(questions).unwrap_or(3);

        u32::try_from(score.clamp(0, 100)).unwrap_or_default()
    }

    /// Full fallback evaluation of an answer, hazard table included.
    #[must_use]
    pub fn evaluate(scenario: &Scenario, answer: &str, history: &[ChoiceRecord]) -> EvaluationResult {
        let score = Self::keyword_score(answer);
        let verdict = Verdict {
            score,
            instant_death: None,
            death_reason: None,
            analysis: Self::analysis(score).to_owned(),
            story_progression: None,
            classification: None,
        };
        verdict.settle(
            scenario.death_risk_level,
            poor_choice_count(&history_scores(history)),
        )
    }

    /// Canned explanation for a score.
    #[must_use]
    pub fn analysis(score: u32) -> &'static str {
        if score >= 80 {
            "Excellent survival instincts! Your cautious and methodical approach shows strong decision-making under pressure."
        } else if score >= 60 {
            "Good survival thinking. You show awareness of danger and make mostly sensible choices."
        } else if score >= 40 {
            "Mixed survival decisions. Some good instincts but also some questionable choices that could be dangerous."
        } else {
            "Poor survival instincts. Your impulsive or reckless decisions would likely lead to trouble in a real scenario."
        }
    }

    /// Canned story beat following a decision.
    #[must_use]
    pub fn story_progression(classification: ChoiceClassification) -> &'static str {
        match classification {
            ChoiceClassification::Cautious => {
                "Your caution pays off. You slip past the immediate danger and buy yourself precious time."
            }
            ChoiceClassification::Neutral => {
                "You survive the moment, but the threat is still out there and the tension keeps building."
            }
            ChoiceClassification::Reckless => {
                "Your rash choice draws attention. You escape for now, but the danger is closer than ever."
            }
            ChoiceClassification::Deadly => {
                "The darkness closes in. This was the last choice you will ever make."
            }
        }
    }

    /// Canned elimination reason.
    #[must_use]
    pub fn death_reason(risk: DeathRiskLevel, prior_poor_choices: usize) -> &'static str {
        match risk {
            DeathRiskLevel::Instant => "A fatal mistake in a situation that allowed none",
            DeathRiskLevel::High if prior_poor_choices >= 2 => {
                "Recklessness finally caught up with them"
            }
            _ if prior_poor_choices >= 3 => "A long string of poor survival choices",
            _ => DEFAULT_DEATH_REASON,
        }
    }

    /// The opening scenario for a theme.
    #[must_use]
    pub fn initial_scenario(theme: &Theme) -> Scenario {
        let description = match theme {
            Theme::Custom(_) => format!(
                "This is a {} nightmare. {}",
                theme.display_name(),
                opening_description(theme)
            ),
            _ => opening_description(theme).to_owned(),
        };
        Scenario {
            question_number: 1,
            title: opening_title(theme).to_owned(),
            description,
            survival_factors: opening_factors(theme)
                .iter()
                .map(|&f| f.to_owned())
                .collect(),
            story_context: format!("The {} nightmare begins.", theme.display_name()),
            death_risk_level: DeathRiskLevel::Medium,
            branching_paths: vec![
                "investigate the threat".to_owned(),
                "find a hiding place".to_owned(),
                "search for a way out".to_owned(),
            ],
            narrative_consequences: None,
        }
    }

    /// A follow-up scenario shaped by the player's choice pattern. Used by
    /// callers when the oracle could not produce one.
    #[must_use]
    pub fn next_scenario(
        theme: &Theme,
        question_number: u32,
        pattern: ChoicePattern,
        story_context: &str,
    ) -> Scenario {
        let risk = Self::risk_for(pattern, question_number);
        let title = pattern_title(pattern);
        let description = [
            backdrop_passage(theme),
            pattern_passage(pattern),
            choice_passage(theme),
            risk_passage(risk),
            CALL_TO_ACTION,
        ]
        .join(" ");
        let chapter = format!("Chapter {question_number}: {title}.");
        let story_context = if story_context.trim().is_empty() {
            format!("The {} nightmare continues. {chapter}", theme.display_name())
        } else {
            format!("{} {chapter}", story_context.trim())
        };

        Scenario {
            question_number,
            title: title.to_owned(),
            description,
            survival_factors: pattern_factors(pattern)
                .iter()
                .map(|&f| f.to_owned())
                .collect(),
            story_context,
            death_risk_level: risk,
            branching_paths: Vec::new(),
            narrative_consequences: Some(format!(
                "Shaped by a {} history.",
                pattern.as_str().replace('_', " ")
            )),
        }
    }

    /// Risk level for a fallback follow-up scenario. Late questions escalate
    /// one step.
    #[must_use]
    pub fn risk_for(pattern: ChoicePattern, question_number: u32) -> DeathRiskLevel {
        let base = match pattern {
            ChoicePattern::NewPlayer => DeathRiskLevel::Low,
            ChoicePattern::CautiousSurvivor | ChoicePattern::MixedDecisions => {
                DeathRiskLevel::Medium
            }
            ChoicePattern::PoorJudgment | ChoicePattern::ConsistentlyReckless => {
                DeathRiskLevel::High
            }
        };
        if question_number < 6 {
            return base;
        }
        match base {
            DeathRiskLevel::Low => DeathRiskLevel::Medium,
            DeathRiskLevel::Medium => DeathRiskLevel::High,
            DeathRiskLevel::High | DeathRiskLevel::Instant => DeathRiskLevel::Instant,
        }
    }

    /// Fate of an active player at `rank` when no personalised narrative is
    /// available: rank 1 is the sole survivor, rank 2 came close, everyone
    /// else was undone by reckless decisions.
    #[must_use]
    pub fn active_fate(entry: &RosterEntry, rank: u32) -> PlayerFate {
        let (survived, fate_title, narrative) = match rank {
            1 => (
                true,
                "🎉 SOLE SURVIVOR".to_owned(),
                "Your strategic thinking and careful decision-making kept you alive when others perished. Every choice you made showed wisdom and survival instinct.",
            ),
            2 => (
                false,
                format!("💀 DIED #{rank}"),
                "You came so close. Your instincts carried you almost to the end, but one hesitation at the final moment let the darkness take you.",
            ),
            _ => (
                false,
                format!("💀 DIED #{rank}"),
                "Your reckless decisions led to your demise. While some choices showed promise, critical errors sealed your fate.",
            ),
        };
        PlayerFate {
            player_name: entry.player_name.clone(),
            rank,
            survived,
            fate_title,
            narrative: narrative.to_owned(),
            survival_analysis: format!(
                "Your total score of {} reflects your decision-making under pressure.",
                entry.total_score
            ),
        }
    }

    /// Fate of an eliminated player at `rank`.
    #[must_use]
    pub fn eliminated_fate(entry: &RosterEntry, rank: u32) -> PlayerFate {
        let reason = entry
            .elimination_reason
            .as_deref()
            .unwrap_or(DEFAULT_DEATH_REASON);
        let death = Self::death_narrative(&entry.player_name, reason);
        PlayerFate {
            player_name: death.player_name,
            rank,
            survived: false,
            fate_title: death.fate_title,
            narrative: death.narrative,
            survival_analysis: format!(
                "Eliminated after {} decisions with a total score of {}: {}.",
                entry.answer_count,
                entry.total_score,
                reason.trim_end_matches('.')
            ),
        }
    }

    /// Templated death narrative.
    #[must_use]
    pub fn death_narrative(player_name: &str, reason: &str) -> DeathNarrative {
        let reason = reason.trim().trim_end_matches('.');
        DeathNarrative {
            player_name: player_name.to_owned(),
            fate_title: "💀 ELIMINATED".to_owned(),
            narrative: format!(
                "{player_name}'s story ends here. {reason}. The shadows claimed another victim, and the others can only hope to learn from the mistake."
            ),
            elimination_reason: reason.to_owned(),
        }
    }
}

fn opening_title(theme: &Theme) -> &'static str {
    match theme {
        Theme::HauntedHouse => "The Locked Door",
        Theme::ZombieOutbreak => "The Last Convoy",
        Theme::SlasherMovie => "Lights Out at Camp",
        Theme::AlienInvasion => "The Hum",
        Theme::DeepSeaTerror => "Breach",
        Theme::Custom(_) => "Something Is Wrong",
    }
}

fn opening_factors(theme: &Theme) -> &'static [&'static str] {
    match theme {
        Theme::HauntedHouse => &["logical_thinking", "caution", "resourcefulness"],
        Theme::ZombieOutbreak => &["resourcefulness", "leadership", "quick_decisions"],
        Theme::SlasherMovie => &["caution", "investigation", "self_preservation"],
        Theme::AlienInvasion => &["stealth", "quick_decisions", "leadership"],
        Theme::DeepSeaTerror => &["logical_thinking", "composure", "quick_decisions"],
        Theme::Custom(_) => &["logical_thinking", "caution"],
    }
}

fn pattern_title(pattern: ChoicePattern) -> &'static str {
    match pattern {
        ChoicePattern::NewPlayer => "Deeper Into the Dark",
        ChoicePattern::ConsistentlyReckless => "The Reckoning",
        ChoicePattern::CautiousSurvivor => "A Glimmer of Hope",
        ChoicePattern::MixedDecisions => "Cracks in the Plan",
        ChoicePattern::PoorJudgment => "Cornered",
    }
}

fn pattern_factors(pattern: ChoicePattern) -> &'static [&'static str] {
    match pattern {
        ChoicePattern::NewPlayer => &["caution", "investigation"],
        ChoicePattern::ConsistentlyReckless => &["self_preservation", "composure", "caution"],
        ChoicePattern::CautiousSurvivor => &["logical_thinking", "resourcefulness", "stealth"],
        ChoicePattern::MixedDecisions => &["logical_thinking", "quick_decisions"],
        ChoicePattern::PoorJudgment => &["self_preservation", "resourcefulness"],
    }
}

fn opening_description(theme: &Theme) -> &'static str {
    match theme {
        Theme::HauntedHouse => {
            "You have inherited your great aunt's Victorian mansion. The moment you step inside, the heavy oak door slams shut behind you with a resounding bang, and the antique key that turned smoothly a minute ago now refuses to move in the lock. Through the grimy windows you can still see your car in the gravel driveway, close enough to touch, yet the door will not budge no matter how hard you push. The air in the foyer is unnaturally cold and smells of wet ash and old lilies. A grandfather clock you are certain was silent begins to tick. Somewhere above you, slow and deliberate footsteps creak across the floorboards, pause directly over your head, and then continue toward the staircase. You came here alone. Your phone shows no signal, and the single candle on the hall table has just lit itself. Wax is already running down its side. What do you do?"
        }
        Theme::ZombieOutbreak => {
            "Day nineteen of the outbreak. You have been holed up in the back office of an abandoned pharmacy, rationing bottled water and listening to the radio repeat the same evacuation message on a loop. This morning the broadcast changed: the last rescue convoy leaves the stadium across town at sunset, and it will not come back. Peering through the blinds, you count at least a dozen infected shuffling between the overturned cars on the main street, drawn by a car alarm that will not stop wailing. Your supplies are nearly gone, the back door is barricaded with shelving, and a set of keys to a delivery van sits on the desk beside you. Then you hear it: a child's voice calling for help from the apartment above the store, followed by the wet, dragging footsteps of something climbing the stairwell toward it. Sunset is only a few hours away. What do you do?"
        }
        Theme::SlasherMovie => {
            "The summer camp was supposed to be closed for the season, which is exactly why your friends thought it would be the perfect place for one last weekend together. Now the campfire has burned down to embers, the cabins are dark, and nobody has seen Jess since she went to the lake for more firewood an hour ago. The landline in the lodge is dead, its cord neatly cut. As you sweep a flashlight across the tree line, the beam catches a figure standing perfectly still between the pines, wearing a cracked white mask and holding something long that glints in the light. When you blink, it is gone. Behind you, the screen door of the lodge creaks open and bangs shut, though you are certain everyone else is out searching. Your car keys are in your pocket, and the car is parked by the lodge. An owl falls silent. What do you do?"
        }
        Theme::AlienInvasion => {
            "The lights went out across the entire city at exactly 3:14 in the morning, and then the sky began to hum. From the roof of your apartment building you watched dozens of black, silent craft descend through the clouds and hover over every major intersection, sweeping the streets with pale violet beams. Anyone caught in the light simply stopped moving, then rose into the air and vanished into the ships. Now it is dawn. Emergency broadcasts on your battery radio urge survivors to reach the old subway tunnels, where the military has set up a shelter. The nearest station entrance is four blocks away. Below your window, something tall and many-jointed is walking slowly from door to door, tilting its eyeless head as if listening for heartbeats. Your neighbor is pounding on your door, begging to be let in. The knocking is getting louder, and the creature below has stopped walking. What do you do?"
        }
        Theme::DeepSeaTerror => {
            "You are three hundred meters beneath the Pacific in Meridian Station, a research facility built to study a newly discovered trench. Six hours ago the drilling team breached a cavity beneath the seabed, and since then the station has gone wrong. The hydrophones pick up a low, rhythmic pulse that sounds almost like breathing. Two divers went out to inspect the drill head and never came back; their tethers were reeled in frayed and slick with black slime. Now the lights in your module are flickering, a hairline crack is weeping seawater down the viewport, and the pressure alarm has started a slow, steady chirp. The intercom crackles with the station commander's voice ordering everyone to the escape pod bay, but the only route there runs through the flooded maintenance corridor, and something large just brushed against the hull outside. The pulse on the hydrophones is getting faster. What do you do?"
        }
        Theme::Custom(_) => {
            "The night you arrived, everything felt almost normal. Now the power is out, the roads are blocked, and the only other people you have seen are hiding behind locked doors that they refuse to open. An unnatural silence has settled over everything, broken only by a scraping sound that seems to follow you from room to room, always just out of sight. You have a flashlight with weak batteries, a half-empty bottle of water, and a pocketknife. The door in front of you leads deeper into the building, toward what might be a way out. The window behind you overlooks a yard full of shifting shadows that do not match anything that could be casting them. Somewhere close, something breathes slowly and waits. Whatever is out there has noticed you, and it is patient. Your heart is pounding so loudly you are sure it can hear it too. You have perhaps a minute before it decides to come closer, and nobody knows where you are. What do you do?"
        }
    }
}

fn backdrop_passage(theme: &Theme) -> &'static str {
    match theme {
        Theme::HauntedHouse => {
            "The mansion has rearranged itself again. Hallways you walked minutes ago now end in bare plaster, portraits have turned their faces to the wall, and a child's lullaby drifts up through the floor vents in a voice that is almost, but not quite, human. The temperature keeps dropping, and every breath you take now hangs in the air like smoke."
        }
        Theme::ZombieOutbreak => {
            "The streets are worse than they were an hour ago. Smoke from a burning gas station hangs low over the rooftops, the infected have started moving in packs, and the distant gunfire you have been using to judge where the survivors are has gone silent. Every shadow could be hiding another mouth, and your supplies are running out."
        }
        Theme::SlasherMovie => {
            "The killer is playing with you now. You have found your friends' phones arranged in a neat circle on the dock, a message scrawled in red across the boathouse wall, and the cut brake lines of the only car. Every so often you hear a soft whistle from the woods, always a little closer than the last time."
        }
        Theme::AlienInvasion => {
            "The invaders are adapting. Their beams now sweep the streets in patterns, drones the size of birds hunt between buildings, and the few survivors you have met whisper that the creatures can smell fear. Overhead, the mothership has begun to glow a deeper violet, and the hum in the air has become a low, constant pressure behind your eyes."
        }
        Theme::DeepSeaTerror => {
            "The station is dying around you. Emergency lights paint every corridor red, seawater sloshes ankle-deep through the lower modules, and the rhythmic pulse on the hydrophones is now loud enough to feel through the deck plates. Whatever came up from the trench is inside the station now, and it is learning the layout as fast as you are."
        }
        Theme::Custom(_) => {
            "The nightmare has only deepened. The place you thought you understood has turned hostile, the exits you remembered are gone, and the silence between the sounds has become the worst part. Whatever is hunting you has stopped hiding its presence, and every decision you make now seems to echo back at you from the dark."
        }
    }
}

fn choice_passage(theme: &Theme) -> &'static str {
    match theme {
        Theme::HauntedHouse => {
            "Ahead of you, the door to the cellar stands open, and a faint light flickers at the bottom of the stairs. To your left, a narrow servants' passage leads toward the kitchen and, maybe, the back door. Behind you, the footsteps have started again, slow and patient."
        }
        Theme::ZombieOutbreak => {
            "A narrow alley to your right leads toward the river and a boat that might still have fuel. The hardware store across the street has its shutters half raised, and you can hear someone inside. Behind you, the groaning of the pack is getting louder with every second."
        }
        Theme::SlasherMovie => {
            "The boathouse door is unlocked and there is a canoe inside, but the lake is wide open and bright under the moon. The trail to the ranger station runs straight through the woods where the whistling came from. Somewhere behind you, a twig snaps."
        }
        Theme::AlienInvasion => {
            "A maintenance hatch in the alley might lead down into the storm drains, but you can hear clicking echoing up from below. The rooftops offer a view and a route, but also put you under the open sky. A drone has just turned its lens in your direction."
        }
        Theme::DeepSeaTerror => {
            "The maintenance corridor is flooding fast, but it is the shortest way to the escape pods. A ventilation shaft runs above it, cramped and dark, toward the control room and the emergency beacon. Something is scraping slowly along the outside of the hull, keeping pace with you."
        }
        Theme::Custom(_) => {
            "One path leads toward the light you glimpsed earlier, across open ground with nowhere to hide. Another leads into the dark, quieter but completely unknown. Something behind you has started to move, and you can hear it drawing closer with every passing heartbeat."
        }
    }
}

fn pattern_passage(pattern: ChoicePattern) -> &'static str {
    match pattern {
        ChoicePattern::NewPlayer => {
            "You steady yourself and take stock. So far you have been lucky, but luck is a poor plan, and the danger in front of you is real. You have a moment to think before it reaches you."
        }
        ChoicePattern::ConsistentlyReckless => {
            "Your earlier mistakes have caught up with you. The noise you made, the risks you took, and the warnings you ignored have led the threat straight to you, and this time there is nowhere left to run. One more wrong move will be your last."
        }
        ChoicePattern::CautiousSurvivor => {
            "Your careful choices have kept you alive and given you an edge: you have found a hiding place, a few supplies, and a glimpse of a way out. But the threat has grown smarter too, and it is searching methodically, closing off every easy escape."
        }
        ChoicePattern::MixedDecisions => {
            "Some of your choices have helped you and some have hurt you. You are bruised, tired, and short on supplies, and the consequences of your earlier gambles are starting to stack up. The path ahead offers a chance, but only if you stop second-guessing yourself."
        }
        ChoicePattern::PoorJudgment => {
            "Your decisions so far have left you exposed, injured, and alone. The threat knows exactly where you are, and the few resources you had are gone. Whatever you do next has to be smarter than anything you have tried so far."
        }
    }
}

fn risk_passage(risk: DeathRiskLevel) -> &'static str {
    match risk {
        DeathRiskLevel::Low => "For now the danger is still a few steps away, and there may be time to prepare.",
        DeathRiskLevel::Medium => "The danger is close enough that hesitation could cost you dearly.",
        DeathRiskLevel::High => "The danger is right on top of you, and a careless move could easily be fatal.",
        DeathRiskLevel::Instant => "There is no margin left: the wrong choice here means certain death.",
    }
}
