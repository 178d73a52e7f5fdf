use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::advisor::domain::{
    ChallengeId, ChallengeRecord, ChatRecord, FootprintRecord, UserId, UserRecord,
};
use crate::advisor::generator::{GenerationError, TextGenerator};
use crate::advisor::repository::{ClimateRepository, RepositoryError};
use crate::advisor::{advisor_router, ClimateAdvisorService};
use crate::footprint::UserInputs;

pub(super) const CHALLENGE_TEXT: &str = "**Challenge Title**: Car-Free Commute\n\n\
**What to do**: Take the bus to work every weekday.\n\n\
**Why it matters**: Transport is your largest driver.\n\n\
**Success criteria**: Five bus commutes logged.";

/// Car commuter scoring 122 (High).
pub(super) fn complete_inputs() -> UserInputs {
    [
        ("transport_mode", "Car"),
        ("vehicle_distance", "Medium"),
        ("electricity", "High"),
        ("diet", "Mixed"),
        ("air_travel", "Rare"),
        ("waste", "Medium"),
        ("recycling", "No"),
        ("device_usage", "High"),
    ]
    .into_iter()
    .map(|(key, value)| (key, value.to_string()))
    .collect()
}

/// Cyclist scoring 23 (Low).
pub(super) fn low_impact_inputs() -> UserInputs {
    [
        ("transport_mode", "Bike"),
        ("vehicle_distance", "Low"),
        ("electricity", "Low"),
        ("diet", "Veg"),
        ("air_travel", "Never"),
        ("waste", "Low"),
        ("recycling", "Yes"),
        ("device_usage", "Low"),
    ]
    .into_iter()
    .map(|(key, value)| (key, value.to_string()))
    .collect()
}

pub(super) fn incomplete_inputs() -> UserInputs {
    let mut inputs = UserInputs::new();
    for (key, value) in complete_inputs().iter() {
        if key != "diet" {
            inputs.insert(key, value.clone());
        }
    }
    inputs
}

/// Generator replying with a fixed text and recording every prompt it saw.
#[derive(Default)]
pub(super) struct ScriptedGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub(super) fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt mutex poisoned").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts
            .lock()
            .expect("prompt mutex poisoned")
            .push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

/// Generator that always fails with the configured error.
pub(super) struct FailingGenerator(pub(super) GenerationError);

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(self.0.clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) users: Arc<Mutex<Vec<UserRecord>>>,
    pub(super) footprints: Arc<Mutex<Vec<FootprintRecord>>>,
    pub(super) challenges: Arc<Mutex<Vec<ChallengeRecord>>>,
    pub(super) chats: Arc<Mutex<Vec<ChatRecord>>>,
}

impl MemoryRepository {
    pub(super) fn with_user(id: &str, username: &str) -> Self {
        let repository = Self::default();
        repository
            .insert_user(UserRecord {
                id: UserId(id.to_string()),
                username: username.to_string(),
                created_at: Utc::now(),
            })
            .expect("seed user");
        repository
    }

    pub(super) fn chats(&self) -> Vec<ChatRecord> {
        self.chats.lock().expect("chat mutex poisoned").clone()
    }
}

impl ClimateRepository for MemoryRepository {
    fn insert_user(&self, record: UserRecord) -> Result<UserRecord, RepositoryError> {
        let mut guard = self.users.lock().expect("user mutex poisoned");
        if guard.iter().any(|user| user.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        let guard = self.users.lock().expect("user mutex poisoned");
        Ok(guard.iter().find(|user| &user.id == id).cloned())
    }

    fn find_user_by_name(&self, username: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let guard = self.users.lock().expect("user mutex poisoned");
        Ok(guard.iter().find(|user| user.username == username).cloned())
    }

    fn insert_footprint(&self, record: FootprintRecord) -> Result<(), RepositoryError> {
        self.footprints
            .lock()
            .expect("footprint mutex poisoned")
            .push(record);
        Ok(())
    }

    fn recent_footprints(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<FootprintRecord>, RepositoryError> {
        let guard = self.footprints.lock().expect("footprint mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|record| &record.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn insert_challenge(&self, record: ChallengeRecord) -> Result<ChallengeRecord, RepositoryError> {
        self.challenges
            .lock()
            .expect("challenge mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn accept_challenge(&self, id: &ChallengeId) -> Result<ChallengeRecord, RepositoryError> {
        let mut guard = self.challenges.lock().expect("challenge mutex poisoned");
        let record = guard
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or(RepositoryError::NotFound)?;
        record.accepted = true;
        Ok(record.clone())
    }

    fn recent_challenges(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<ChallengeRecord>, RepositoryError> {
        let guard = self.challenges.lock().expect("challenge mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .filter(|record| &record.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn accepted_challenges(&self) -> Result<Vec<ChallengeRecord>, RepositoryError> {
        let guard = self.challenges.lock().expect("challenge mutex poisoned");
        Ok(guard.iter().filter(|record| record.accepted).cloned().collect())
    }

    fn insert_chat(&self, record: ChatRecord) -> Result<(), RepositoryError> {
        self.chats.lock().expect("chat mutex poisoned").push(record);
        Ok(())
    }
}

/// Knows its users but refuses every write after registration.
pub(super) struct ReadOnlyRepository {
    pub(super) inner: MemoryRepository,
}

impl ClimateRepository for ReadOnlyRepository {
    fn insert_user(&self, _record: UserRecord) -> Result<UserRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        self.inner.fetch_user(id)
    }

    fn find_user_by_name(&self, username: &str) -> Result<Option<UserRecord>, RepositoryError> {
        self.inner.find_user_by_name(username)
    }

    fn insert_footprint(&self, _record: FootprintRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn recent_footprints(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<FootprintRecord>, RepositoryError> {
        self.inner.recent_footprints(user_id, limit)
    }

    fn insert_challenge(&self, _record: ChallengeRecord) -> Result<ChallengeRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn accept_challenge(&self, _id: &ChallengeId) -> Result<ChallengeRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn recent_challenges(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<ChallengeRecord>, RepositoryError> {
        self.inner.recent_challenges(user_id, limit)
    }

    fn accepted_challenges(&self) -> Result<Vec<ChallengeRecord>, RepositoryError> {
        self.inner.accepted_challenges()
    }

    fn insert_chat(&self, _record: ChatRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl ClimateRepository for UnavailableRepository {
    fn insert_user(&self, _record: UserRecord) -> Result<UserRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_user(&self, _id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_user_by_name(&self, _username: &str) -> Result<Option<UserRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_footprint(&self, _record: FootprintRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent_footprints(
        &self,
        _user_id: &UserId,
        _limit: usize,
    ) -> Result<Vec<FootprintRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_challenge(&self, _record: ChallengeRecord) -> Result<ChallengeRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn accept_challenge(&self, _id: &ChallengeId) -> Result<ChallengeRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent_challenges(
        &self,
        _user_id: &UserId,
        _limit: usize,
    ) -> Result<Vec<ChallengeRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn accepted_challenges(&self) -> Result<Vec<ChallengeRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_chat(&self, _record: ChatRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service(
    reply: &str,
) -> (
    ClimateAdvisorService<ScriptedGenerator, MemoryRepository>,
    Arc<ScriptedGenerator>,
    Arc<MemoryRepository>,
) {
    let generator = Arc::new(ScriptedGenerator::replying(reply));
    let repository = Arc::new(MemoryRepository::default());
    let service = ClimateAdvisorService::new(generator.clone(), repository.clone());
    (service, generator, repository)
}

pub(super) fn router_with_service<G, R>(service: ClimateAdvisorService<G, R>) -> axum::Router
where
    G: TextGenerator + 'static,
    R: ClimateRepository + 'static,
{
    advisor_router(Arc::new(service))
}

pub(super) fn json_request(uri: &str, body: Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(&body).expect("serialize body"),
        ))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
