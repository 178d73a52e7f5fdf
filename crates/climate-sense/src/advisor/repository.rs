use super::domain::{
    ChallengeId, ChallengeRecord, ChatRecord, FootprintRecord, UserId, UserRecord,
};

/// Storage abstraction so the advisor service can be exercised in isolation.
///
/// `recent_*` queries return newest records first.
pub trait ClimateRepository: Send + Sync {
    fn insert_user(&self, record: UserRecord) -> Result<UserRecord, RepositoryError>;
    fn fetch_user(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError>;
    fn find_user_by_name(&self, username: &str) -> Result<Option<UserRecord>, RepositoryError>;

    fn insert_footprint(&self, record: FootprintRecord) -> Result<(), RepositoryError>;
    fn recent_footprints(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<FootprintRecord>, RepositoryError>;

    fn insert_challenge(&self, record: ChallengeRecord) -> Result<ChallengeRecord, RepositoryError>;
    /// Flag a challenge as accepted, returning the updated record.
    fn accept_challenge(&self, id: &ChallengeId) -> Result<ChallengeRecord, RepositoryError>;
    fn recent_challenges(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<ChallengeRecord>, RepositoryError>;
    fn accepted_challenges(&self) -> Result<Vec<ChallengeRecord>, RepositoryError>;

    fn insert_chat(&self, record: ChatRecord) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
