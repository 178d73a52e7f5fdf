use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::challenge::parse_challenge;
use super::domain::{
    Assessment, ChallengeId, ChallengeRecord, ChatRecord, ChatRequest, FootprintRecord,
    IssuedChallenge, LeaderboardEntry, UserHistory, UserId, UserRecord,
};
use super::generator::{GenerationError, TextGenerator};
use super::prompts;
use super::repository::{ClimateRepository, RepositoryError};
use crate::footprint::{compute_footprint, validate_inputs, InputError, UserInputs};

pub const HISTORY_FOOTPRINT_LIMIT: usize = 10;
pub const HISTORY_CHALLENGE_LIMIT: usize = 5;

/// Service composing the estimator, the text generator, and the repository.
pub struct ClimateAdvisorService<G, R> {
    generator: Arc<G>,
    repository: Arc<R>,
}

static USER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static CHALLENGE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_user_id() -> UserId {
    let id = USER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    UserId(format!("user-{id:06}"))
}

fn next_challenge_id() -> ChallengeId {
    let id = CHALLENGE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ChallengeId(format!("challenge-{id:06}"))
}

impl<G, R> ClimateAdvisorService<G, R>
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    pub fn new(generator: Arc<G>, repository: Arc<R>) -> Self {
        Self {
            generator,
            repository,
        }
    }

    /// Register a username, returning the existing user when it is already known.
    pub fn register(&self, username: &str) -> Result<UserRecord, AdvisorError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AdvisorError::InvalidRequest(
                "Username is required".to_string(),
            ));
        }

        if let Some(existing) = self.repository.find_user_by_name(username)? {
            return Ok(existing);
        }

        let record = UserRecord {
            id: next_user_id(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        let stored = self.repository.insert_user(record)?;
        info!(user_id = %stored.id, "registered user");
        Ok(stored)
    }

    /// Score the questionnaire and record it against the user.
    ///
    /// A storage failure is logged and the assessment is still returned.
    pub fn assess(
        &self,
        user_id: &UserId,
        inputs: &UserInputs,
    ) -> Result<Assessment, AdvisorError> {
        self.require_user(user_id)?;
        validate_inputs(inputs)?;

        let assessment = Assessment::from_inputs(inputs);
        let record = FootprintRecord {
            user_id: user_id.clone(),
            inputs: inputs.clone(),
            total_score: assessment.footprint.total_score,
            level: assessment.level,
            created_at: Utc::now(),
        };
        if let Err(err) = self.repository.insert_footprint(record) {
            warn!(user_id = %user_id, error = %err, "failed to persist footprint");
        }

        info!(
            user_id = %user_id,
            total_score = assessment.footprint.total_score,
            level = assessment.level.label(),
            "footprint assessed"
        );
        Ok(assessment)
    }

    pub async fn analyze(&self, inputs: &UserInputs) -> Result<String, AdvisorError> {
        validate_inputs(inputs)?;
        let footprint = compute_footprint(inputs);
        let prompt = prompts::impact_analysis_prompt(&footprint);
        Ok(self.generator.generate(&prompt).await?)
    }

    /// Prioritized recommendations; the prior analysis must have been produced.
    pub async fn recommend(
        &self,
        inputs: &UserInputs,
        analysis: &str,
    ) -> Result<String, AdvisorError> {
        validate_inputs(inputs)?;
        if analysis.trim().is_empty() {
            return Err(AdvisorError::InvalidRequest(
                "Footprint and analysis data required".to_string(),
            ));
        }

        let footprint = compute_footprint(inputs);
        let prompt = prompts::recommendation_prompt(&footprint);
        Ok(self.generator.generate(&prompt).await?)
    }

    pub async fn challenge(
        &self,
        user_id: &UserId,
        inputs: &UserInputs,
        recommendations: &str,
    ) -> Result<IssuedChallenge, AdvisorError> {
        self.require_user(user_id)?;
        validate_inputs(inputs)?;
        if recommendations.trim().is_empty() {
            return Err(AdvisorError::InvalidRequest(
                "Footprint and recommendations data required".to_string(),
            ));
        }

        let footprint = compute_footprint(inputs);
        let prompt = prompts::challenge_prompt(&footprint, recommendations);
        let text = self.generator.generate(&prompt).await?;
        let challenge = parse_challenge(&text);

        let record = ChallengeRecord {
            id: next_challenge_id(),
            user_id: user_id.clone(),
            challenge: challenge.clone(),
            accepted: false,
            created_at: Utc::now(),
        };
        let challenge_id = match self.repository.insert_challenge(record) {
            Ok(stored) => Some(stored.id),
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "failed to persist challenge");
                None
            }
        };

        Ok(IssuedChallenge {
            challenge,
            challenge_id,
        })
    }

    pub fn accept_challenge(
        &self,
        challenge_id: &ChallengeId,
    ) -> Result<ChallengeRecord, AdvisorError> {
        let record = self.repository.accept_challenge(challenge_id)?;
        info!(challenge_id = %challenge_id, user_id = %record.user_id, "challenge accepted");
        Ok(record)
    }

    /// Answer a chat message in the context of the user's profile.
    pub async fn chat(&self, request: ChatRequest) -> Result<String, AdvisorError> {
        self.require_user(&request.user_id)?;
        let message = request.message.trim();
        if message.is_empty() {
            return Err(AdvisorError::InvalidRequest("Message required".to_string()));
        }

        let profile = request.inputs.as_ref().map(compute_footprint);
        let prompt = prompts::chat_prompt(
            profile.as_ref(),
            request.current_challenge.as_deref(),
            message,
            &request.history,
        );
        let response = self.generator.generate(&prompt).await?;

        let record = ChatRecord {
            user_id: request.user_id.clone(),
            user_message: message.to_string(),
            assistant_response: response.clone(),
            created_at: Utc::now(),
        };
        if let Err(err) = self.repository.insert_chat(record) {
            warn!(user_id = %request.user_id, error = %err, "failed to persist chat turn");
        }

        Ok(response)
    }

    pub fn history(&self, user_id: &UserId) -> Result<UserHistory, AdvisorError> {
        self.require_user(user_id)?;
        let footprints = self
            .repository
            .recent_footprints(user_id, HISTORY_FOOTPRINT_LIMIT)?;
        let challenges = self
            .repository
            .recent_challenges(user_id, HISTORY_CHALLENGE_LIMIT)?;
        Ok(UserHistory {
            footprints,
            challenges,
        })
    }

    /// Users ranked by accepted challenges, ties broken by username.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, AdvisorError> {
        let mut counts: BTreeMap<UserId, usize> = BTreeMap::new();
        for record in self.repository.accepted_challenges()? {
            *counts.entry(record.user_id).or_default() += 1;
        }

        let mut entries = Vec::with_capacity(counts.len());
        for (user_id, accepted_challenges) in counts {
            let username = match self.repository.fetch_user(&user_id)? {
                Some(user) => user.username,
                None => user_id.0.clone(),
            };
            entries.push(LeaderboardEntry {
                user_id,
                username,
                accepted_challenges,
            });
        }

        entries.sort_by(|left, right| {
            right
                .accepted_challenges
                .cmp(&left.accepted_challenges)
                .then_with(|| left.username.cmp(&right.username))
        });
        entries.truncate(limit);
        Ok(entries)
    }

    fn require_user(&self, user_id: &UserId) -> Result<UserRecord, AdvisorError> {
        self.repository
            .fetch_user(user_id)?
            .ok_or_else(|| AdvisorError::UnknownUser(user_id.clone()))
    }
}

/// Error raised by the advisor service.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("{0}")]
    InvalidRequest(String),
    #[error("user {0} is not registered")]
    UnknownUser(UserId),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
