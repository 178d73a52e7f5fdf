use serde::{Deserialize, Serialize};

const DEFAULT_TITLE: &str = "Your Climate Challenge";
const DEFAULT_IMPACT: &str = "Reducing your carbon footprint";
const DEFAULT_SUCCESS_CRITERIA: &str = "Complete the challenge for 7 days";

/// Week-long behavior change suggested to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub title: String,
    pub description: String,
    pub impact: String,
    pub success_criteria: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    Impact,
    SuccessCriteria,
}

#[derive(Default)]
struct Sections {
    title: Option<String>,
    description: Option<String>,
    impact: Option<String>,
    success_criteria: Option<String>,
}

impl Sections {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Impact => &mut self.impact,
            Field::SuccessCriteria => &mut self.success_criteria,
        }
    }

    fn append(&mut self, field: Field, text: &str) {
        let slot = self.slot(field);
        match slot.take() {
            Some(mut existing) => {
                existing.push(' ');
                existing.push_str(text);
                *slot = Some(existing);
            }
            None => *slot = Some(text.to_string()),
        }
    }
}

/// Best-effort split of generated challenge text into its four fields.
///
/// Model output is unstructured, so every field always comes back populated:
/// anything the markers do not cover keeps its default, and the description
/// falls back to the whole raw text.
pub fn parse_challenge(raw: &str) -> Challenge {
    let mut sections = Sections::default();
    let mut current = None;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((field, inline)) = marker(line) {
            current = Some(field);
            if !inline.is_empty() {
                sections.append(field, inline);
            }
            continue;
        }

        if line.starts_with("**") && line.ends_with("**") {
            continue;
        }

        if let Some(field) = current {
            sections.append(field, line);
        }
    }

    Challenge {
        title: sections.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: sections.description.unwrap_or_else(|| raw.trim().to_string()),
        impact: sections.impact.unwrap_or_else(|| DEFAULT_IMPACT.to_string()),
        success_criteria: sections
            .success_criteria
            .unwrap_or_else(|| DEFAULT_SUCCESS_CRITERIA.to_string()),
    }
}

fn marker(line: &str) -> Option<(Field, &str)> {
    let stripped = line.trim_start_matches(|c: char| {
        c == '*' || c == '#' || c == '-' || c == '.' || c.is_ascii_digit() || c.is_whitespace()
    });
    let lowered = stripped.to_ascii_lowercase();

    let field = if lowered.starts_with("challenge title") || lowered.starts_with("title") {
        Field::Title
    } else if lowered.starts_with("what to do") {
        Field::Description
    } else if lowered.starts_with("why it matters") {
        Field::Impact
    } else if lowered.starts_with("success criteria") {
        Field::SuccessCriteria
    } else {
        return None;
    };

    let inline = stripped
        .split_once(':')
        .map(|(_, rest)| rest.trim_matches(|c: char| c == '*' || c.is_whitespace()))
        .unwrap_or("");
    Some((field, inline))
}
