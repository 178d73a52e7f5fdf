//! Narrative guidance layered on top of the footprint estimator.
//!
//! The advisor builds prompts from a scored profile, hands them to a hosted
//! [`TextGenerator`], and records results through a [`ClimateRepository`]. The
//! score itself is always recomputed from the submitted answers.

pub mod challenge;
pub mod domain;
pub mod gemini;
pub mod generator;
pub mod prompts;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use challenge::{parse_challenge, Challenge};
pub use domain::{
    Assessment, ChallengeId, ChallengeRecord, ChatRecord, ChatRequest, ChatRole, ChatTurn,
    FootprintRecord, IssuedChallenge, LeaderboardEntry, UserHistory, UserId, UserRecord,
};
pub use gemini::GeminiClient;
pub use generator::{GenerationError, TextGenerator};
pub use repository::{ClimateRepository, RepositoryError};
pub use router::advisor_router;
pub use service::{AdvisorError, ClimateAdvisorService};
