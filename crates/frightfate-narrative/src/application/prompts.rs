//! Prompt builders for every oracle call site.

use std::fmt::Write as _;

use frightfate_core::oracle::{GenerationParams, OracleRequest, PromptMessage};
use frightfate_core::scenario::Scenario;
use frightfate_core::theme::Theme;

use crate::domain::choice_pattern::ChoicePattern;
use crate::domain::evaluation::ChoiceRecord;
use crate::domain::results::RosterEntry;

const GAME_TITLE: &str = "FrightFate: Who Dies First?";

/// Answers are analysed against at most this many earlier choices.
pub const ANALYSIS_HISTORY_WINDOW: usize = 3;

/// Scenario descriptions are cut to this many characters in analysis
/// prompts.
const SCENARIO_EXCERPT_CHARS: usize = 400;

fn writer_system() -> PromptMessage {
    PromptMessage::system(format!(
        "You are a master horror writer creating survival scenarios for \"{GAME_TITLE}\", \
         a multiplayer horror game. Respond with ONLY valid JSON, no commentary."
    ))
}

fn recent(history: &[ChoiceRecord]) -> &[ChoiceRecord] {
    &history[history.len().saturating_sub(ANALYSIS_HISTORY_WINDOW)..]
}

fn render_history(history: &[ChoiceRecord]) -> String {
    if history.is_empty() {
        return "none yet".to_owned();
    }
    let mut out = String::new();
    for choice in history {
        let _ = writeln!(
            out,
            "- Question {}: \"{}\" (scored {}/100)",
            choice.question_number, choice.answer_text, choice.score
        );
    }
    out
}

fn excerpt(text: &str) -> String {
    match text.char_indices().nth(SCENARIO_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

/// Prompt for the opening scenario of a session.
#[must_use]
pub fn initial_scenario(theme: &Theme, params: GenerationParams) -> OracleRequest {
    let user = format!(
        "Create the opening scenario for the theme: {description}.

Requirements:
- A life-or-death situation with several plausible ways out
- The description must be 150-300 words and end with \"What do you do?\"
- Atmospheric, visceral and genuinely challenging

Return ONLY a JSON object in this exact format:
{{
  \"question_number\": 1,
  \"title\": \"The Creaking Door\",
  \"description\": \"Detailed scenario ending with 'What do you do?'\",
  \"survival_factors\": [\"logical_thinking\", \"caution\", \"creativity\"],
  \"story_context\": \"One sentence summarising where the story stands\",
  \"branching_paths\": [\"investigate\", \"hide\", \"flee\"]
}}",
        description = theme.archetype_description()
    );
    OracleRequest {
        messages: vec![writer_system(), PromptMessage::user(user)],
        params,
    }
}

/// Prompt for a follow-up scenario conditioned on the player's history.
#[must_use]
pub fn next_scenario(
    theme: &Theme,
    question_number: u32,
    pattern: ChoicePattern,
    history: &[ChoiceRecord],
    story_context: &str,
    params: GenerationParams,
) -> OracleRequest {
    let story_context = if story_context.trim().is_empty() {
        "The story has just begun."
    } else {
        story_context.trim()
    };
    let user = format!(
        "Continue a {theme_name} horror story: {description}.

STORY SO FAR: {story_context}

PLAYER'S RECENT CHOICES:
{choices}
PLAYER PATTERN: {pattern}
ESCALATION: {guidance}

Write scenario number {question_number}. The consequences of earlier choices must be felt.
The description must be 150-300 words and end with \"What do you do?\"
death_risk_level is one of \"low\", \"medium\", \"high\", \"instant\".

Return ONLY a JSON object in this exact format:
{{
  \"question_number\": {question_number},
  \"title\": \"Scenario title\",
  \"description\": \"Detailed scenario ending with 'What do you do?'\",
  \"survival_factors\": [\"caution\", \"resourcefulness\"],
  \"story_context\": \"The running story, updated with this scene\",
  \"death_risk_level\": \"high\",
  \"narrative_consequences\": \"How earlier choices shaped this scene\",
  \"branching_paths\": [\"fight\", \"hide\"]
}}",
        theme_name = theme.display_name(),
        description = theme.archetype_description(),
        choices = render_history(recent(history)),
        pattern = pattern.as_str(),
        guidance = pattern.escalation_guidance(),
    );
    OracleRequest {
        messages: vec![writer_system(), PromptMessage::user(user)],
        params,
    }
}

/// Prompt for scoring one answer.
#[must_use]
pub fn answer_analysis(
    scenario: &Scenario,
    answer_text: &str,
    history: &[ChoiceRecord],
    params: GenerationParams,
) -> OracleRequest {
    let system = PromptMessage::system(
        "You are an expert survival analyst for a horror survival game. Analyse responses \
         harshly but fairly: most people in a horror story die because of poor decisions. \
         Respond with ONLY valid JSON, no commentary.",
    );
    let user = format!(
        "SCENARIO: {scenario}

SCENARIO RISK: {risk:?}

SURVIVAL FACTORS BEING TESTED: {factors}

PLAYER'S PREVIOUS CHOICES:
{choices}
PLAYER RESPONSE: {answer_text}

Consider whether the response addresses the immediate danger, shows logical thinking rather than
impulse, takes appropriate precautions, and would realistically help them survive.

Return ONLY a JSON object:
{{
  \"survival_score\": 75,
  \"analysis\": \"50-100 words explaining the score\",
  \"instant_death\": false,
  \"death_reason\": null,
  \"story_progression\": \"One or two sentences on what happens next because of this choice\",
  \"classification\": \"cautious\"
}}

Score scale: 0-20 certain death, 21-40 very likely to die, 41-60 mixed, 61-80 smart, 81-100 brilliant.
classification is one of \"cautious\", \"neutral\", \"reckless\", \"deadly\".",
        scenario = excerpt(&scenario.description),
        risk = scenario.death_risk_level,
        factors = scenario.survival_factors.join(", "),
        choices = render_history(recent(history)),
    );
    OracleRequest {
        messages: vec![system, PromptMessage::user(user)],
        params,
    }
}

fn novelist_system() -> PromptMessage {
    PromptMessage::system(format!(
        "You are a horror novelist writing the final results for \"{GAME_TITLE}\". \
         Narratives are cinematic, personal and horror-themed without being gratuitously \
         graphic. Respond with ONLY valid JSON, no commentary."
    ))
}

/// Prompt for the batch of surviving-player fates. `ranked` is in rank
/// order; rank 1 is the sole survivor and every other active player dies.
#[must_use]
pub fn survivor_fates(
    theme: &Theme,
    ranked: &[RosterEntry],
    params: GenerationParams,
) -> OracleRequest {
    let mut roster = String::new();
    for (index, entry) in ranked.iter().enumerate() {
        let _ = writeln!(
            roster,
            "- rank {rank}: {name}, total score {score} over {count} decisions",
            rank = index + 1,
            name = entry.player_name,
            score = entry.total_score,
            count = entry.answer_count,
        );
    }
    let user = format!(
        "The {theme_name} nightmare is over. These players made it to the end:
{roster}
Rank 1 is the SOLE SURVIVOR. Everyone else dies, in rank order.
Write one entry per player using their exact player_name, personalised to their score
(high scores mean smart decisions, low scores mean poor ones).

Return ONLY a JSON array:
[
  {{
    \"player_name\": \"PlayerName\",
    \"fate_title\": \"🎉 SOLE SURVIVOR\",
    \"narrative\": \"2-3 sentences of how they survived or died\",
    \"survival_analysis\": \"1-2 sentences on WHY, based on their score\"
  }}
]",
        theme_name = theme.display_name(),
    );
    OracleRequest {
        messages: vec![novelist_system(), PromptMessage::user(user)],
        params,
    }
}

/// Prompt for one eliminated player's death narrative.
#[must_use]
pub fn death_narrative(
    theme: &Theme,
    entry: &RosterEntry,
    reason: &str,
    params: GenerationParams,
) -> OracleRequest {
    let user = format!(
        "{name} has just died in a {theme_name} horror story after {count} decisions \
         (total score {score}).
Cause of death: {reason}

Write their death scene in 2-3 dramatic sentences.

Return ONLY a JSON object:
{{
  \"fate_title\": \"💀 ELIMINATED\",
  \"narrative\": \"How they died\",
  \"survival_analysis\": \"1-2 sentences on the mistake that killed them\"
}}",
        name = entry.player_name,
        theme_name = theme.display_name(),
        count = entry.answer_count,
        score = entry.total_score,
    );
    OracleRequest {
        messages: vec![novelist_system(), PromptMessage::user(user)],
        params,
    }
}
