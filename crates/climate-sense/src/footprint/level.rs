use serde::{Deserialize, Serialize};

/// Qualitative band for a footprint total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FootprintLevel {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl FootprintLevel {
    /// Half-open bands `[-inf, 50)`, `[50, 100)`, `[100, 150)`, `[150, inf)`.
    /// A boundary value belongs to the upper band. NaN reads as `Low`.
    pub fn from_score(total_score: f64) -> Self {
        if total_score.is_nan() || total_score < 50.0 {
            Self::Low
        } else if total_score < 100.0 {
            Self::Medium
        } else if total_score < 150.0 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Low => "Your lifestyle has a relatively low carbon impact. Great job!",
            Self::Medium => "Your carbon footprint is moderate. There's room for improvement.",
            Self::High => {
                "Your lifestyle has a significant carbon impact. Let's work on reducing it."
            }
            Self::VeryHigh => "Your carbon footprint is quite high. Every change matters!",
        }
    }
}

/// Level name and its encouraging description for a total score.
pub fn classify_level(total_score: f64) -> (&'static str, &'static str) {
    let level = FootprintLevel::from_score(total_score);
    (level.label(), level.description())
}
