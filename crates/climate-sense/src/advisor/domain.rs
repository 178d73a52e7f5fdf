use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::challenge::Challenge;
use crate::footprint::{
    compute_footprint, disclaimer, FootprintLevel, FootprintResult, UserInputs,
};

/// Identifier wrapper for registered users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for issued challenges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChallengeId(pub String);

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Persisted snapshot of one scoring request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintRecord {
    pub user_id: UserId,
    pub inputs: UserInputs,
    pub total_score: i32,
    pub level: FootprintLevel,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub id: ChallengeId,
    pub user_id: UserId,
    pub challenge: Challenge,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub user_id: UserId,
    pub user_message: String,
    pub assistant_response: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// Prior message replayed to the assistant as conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Chat message plus the profile the assistant should keep in view.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub user_id: UserId,
    pub message: String,
    #[serde(default)]
    pub inputs: Option<UserInputs>,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub current_challenge: Option<String>,
}

/// Scored footprint with its level and the canonical caveat, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    #[serde(flatten)]
    pub footprint: FootprintResult,
    pub level: FootprintLevel,
    pub level_description: &'static str,
    pub disclaimer: &'static str,
}

impl Assessment {
    pub fn from_inputs(inputs: &UserInputs) -> Self {
        let footprint = compute_footprint(inputs);
        let level = footprint.level();
        Self {
            footprint,
            level,
            level_description: level.description(),
            disclaimer: disclaimer(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedChallenge {
    pub challenge: Challenge,
    /// Absent when the challenge could not be stored.
    pub challenge_id: Option<ChallengeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserHistory {
    pub footprints: Vec<FootprintRecord>,
    pub challenges: Vec<ChallengeRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub username: String,
    pub accepted_challenges: usize,
}
