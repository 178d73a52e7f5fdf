//! Prompt templates for the narrative guidance steps.
//!
//! Every template asks for supportive, non-judgmental language; the footprint
//! numbers always come from the deterministic estimator, never from the model.

use super::domain::ChatTurn;
use crate::footprint::{BreakdownEntry, Category, FootprintLevel, FootprintResult, UserInputs};

pub const TOP_DRIVER_COUNT: usize = 3;
pub const CHAT_HISTORY_WINDOW: usize = 6;

const IMMEDIATE_ACTION_FALLBACK: &str = "Focus on reducing top emission drivers";
const RECOMMENDATION_PROFILE: [Category; 4] = [
    Category::TransportMode,
    Category::Diet,
    Category::Electricity,
    Category::AirTravel,
];
const CHALLENGE_PROFILE: [Category; 2] = [Category::TransportMode, Category::Diet];

/// Labels of the highest scoring breakdown entries.
pub fn top_drivers(result: &FootprintResult, count: usize) -> Vec<&str> {
    result
        .breakdown
        .iter()
        .take(count)
        .map(|entry| entry.category.as_str())
        .collect()
}

pub fn format_breakdown(breakdown: &[BreakdownEntry]) -> String {
    breakdown
        .iter()
        .map(|entry| {
            format!(
                "- {}: {} (Score: {:.1}, {:.1}% of total)",
                entry.category,
                entry.value,
                f64::from(entry.score),
                entry.percentage
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Label: answer` pairs for the requested categories that were answered.
pub fn lifestyle_summary(inputs: &UserInputs, categories: &[Category]) -> String {
    categories
        .iter()
        .filter_map(|category| {
            inputs
                .get(category.key())
                .map(|value| format!("{}: {}", short_label(*category), value))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn short_label(category: Category) -> &'static str {
    match category {
        Category::TransportMode => "Transport",
        Category::Diet => "Diet",
        Category::Electricity => "Electricity",
        Category::AirTravel => "Air Travel",
        other => other.label(),
    }
}

pub fn impact_analysis_prompt(result: &FootprintResult) -> String {
    let level = result.level();
    format!(
        "You are a supportive climate action advisor. Explain the main drivers of this \
person's carbon footprint without judgment.\n\n\
Carbon footprint breakdown:\n{breakdown}\n\n\
Total footprint score: {total}\n\
Footprint level: {level} ({description})\n\n\
Please provide:\n\
1. A short, encouraging summary of their footprint level\n\
2. The top 3 contributing lifestyle factors from the breakdown\n\
3. For each factor, why it matters for the climate and why it stands out in their case\n\n\
Guidelines:\n\
- Focus on opportunities, not problems\n\
- Use plain language and avoid jargon\n\
- Keep it to 2-3 short bullet points per factor\n\n\
Your response:",
        breakdown = format_breakdown(&result.breakdown),
        total = result.total_score,
        level = level.label(),
        description = level.description(),
    )
}

pub fn recommendation_prompt(result: &FootprintResult) -> String {
    format!(
        "You are a climate action advisor helping someone choose realistic, impactful \
changes that balance impact with feasibility.\n\n\
Profile:\n\
- Top emission drivers: {drivers}\n\
- Current lifestyle: {lifestyle}\n\
- Footprint level: {level}\n\n\
Give one recommendation in each of these three groups, as short bullet points covering \
the action, why it fits them, and the expected impact:\n\n\
1. **Immediate Low-Effort Change** (can start today)\n\
2. **Medium-Term Improvement** (within 1-3 months)\n\
3. **Long-Term Lifestyle Shift** (for future planning)\n\n\
Guidelines:\n\
- Be practical and personal, avoid generic advice\n\
- Do not suggest anything clearly unrealistic for their situation\n\
- Use headers and bullet points\n\n\
Your response:",
        drivers = top_drivers(result, TOP_DRIVER_COUNT).join(", "),
        lifestyle = lifestyle_summary(&result.raw_inputs, &RECOMMENDATION_PROFILE),
        level = result.level().label(),
    )
}

pub fn challenge_prompt(result: &FootprintResult, recommendations: &str) -> String {
    format!(
        "Based on this person's carbon footprint and recommendations, suggest ONE specific, \
realistic challenge they can commit to for the next 7 days.\n\n\
Context:\n\
- Top emission drivers: {drivers}\n\
- Recommended immediate action: {action}\n\
- Lifestyle summary: {lifestyle}\n\n\
The challenge must be specific, measurable, achievable within 7 days, and have a clear \
environmental benefit.\n\n\
Format your response as:\n\
**Challenge Title**: [a short, positive title]\n\n\
**What to do**: [clear instructions]\n\n\
**Why it matters**: [one sentence on the impact]\n\n\
**Success criteria**: [how they will know they succeeded]\n\n\
Your response:",
        drivers = top_drivers(result, TOP_DRIVER_COUNT).join(", "),
        action = extract_immediate_action(recommendations),
        lifestyle = lifestyle_summary(&result.raw_inputs, &CHALLENGE_PROFILE),
    )
}

/// Chat prompt carrying the user's profile so answers stay personal.
///
/// Without a scored profile the assistant sees a `Low` level and no drivers.
pub fn chat_prompt(
    profile: Option<&FootprintResult>,
    current_challenge: Option<&str>,
    message: &str,
    history: &[ChatTurn],
) -> String {
    let level = profile
        .map(FootprintResult::level)
        .unwrap_or(FootprintLevel::Low);
    let drivers = profile
        .map(|result| top_drivers(result, TOP_DRIVER_COUNT))
        .filter(|drivers| !drivers.is_empty())
        .map(|drivers| drivers.join(", "))
        .unwrap_or_else(|| "Not analyzed yet".to_string());
    let challenge = current_challenge
        .map(str::trim)
        .filter(|challenge| !challenge.is_empty())
        .unwrap_or("None selected");

    format!(
        "You are ClimateSense, a friendly and knowledgeable climate action advisor who helps \
people understand their carbon footprint and decide how to reduce it.\n\n\
User profile:\n\
- Footprint level: {level}\n\
- Top emission drivers: {drivers}\n\
- Selected challenge: {challenge}\n\n\
Guidelines:\n\
- Be supportive and never use fear or guilt\n\
- Give practical, actionable steps and refer to their profile when relevant\n\
- Give balanced answers to comparison questions\n\
- Admit when you do not know something\n\
- Keep answers concise\n\n\
User question: {message}\n\n\
Conversation so far:\n{history}\n\n\
Reply helpfully and encouragingly, keeping their footprint profile in mind.",
        level = level.label(),
        history = format_chat_history(history),
    )
}

/// The last few turns rendered as `Role: content` lines.
pub fn format_chat_history(history: &[ChatTurn]) -> String {
    if history.is_empty() {
        return "No previous conversation.".to_string();
    }

    let start = history.len().saturating_sub(CHAT_HISTORY_WINDOW);
    history[start..]
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pull the first lines of the "immediate / low-effort" section out of
/// generated recommendations. Best effort; falls back to a generic nudge.
pub fn extract_immediate_action(recommendations: &str) -> String {
    let mut collected = Vec::new();
    let mut in_section = false;

    for line in recommendations.lines() {
        let trimmed = line.trim();
        let lowered = trimmed.to_lowercase();

        if lowered.contains("immediate") || lowered.contains("low-effort") {
            in_section = true;
        } else if !in_section || trimmed.is_empty() {
            continue;
        } else if is_heading(trimmed) {
            if lowered.contains("medium") {
                break;
            }
        } else {
            collected.push(trimmed.trim_start_matches(['-', '*', ' ']));
        }
    }

    if collected.is_empty() {
        IMMEDIATE_ACTION_FALLBACK.to_string()
    } else {
        collected
            .into_iter()
            .take(3)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn is_heading(line: &str) -> bool {
    let without_number = line.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
    line.starts_with("**") || line.starts_with('#') || without_number.trim_start().starts_with("**")
}
