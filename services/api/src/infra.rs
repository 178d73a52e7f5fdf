use climate_sense::advisor::{
    ChallengeId, ChallengeRecord, ChatRecord, ClimateRepository, FootprintRecord,
    RepositoryError, UserId, UserRecord,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Tables {
    users: Vec<UserRecord>,
    footprints: Vec<FootprintRecord>,
    challenges: Vec<ChallengeRecord>,
    chats: Vec<ChatRecord>,
}

/// Process-local store; records are appended so reverse iteration yields newest first.
#[derive(Default, Clone)]
pub(crate) struct InMemoryClimateRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryClimateRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl ClimateRepository for InMemoryClimateRepository {
    fn insert_user(&self, record: UserRecord) -> Result<UserRecord, RepositoryError> {
        let mut tables = self.lock()?;
        if tables
            .users
            .iter()
            .any(|user| user.id == record.id || user.username == record.username)
        {
            return Err(RepositoryError::Conflict);
        }
        tables.users.push(record.clone());
        Ok(record)
    }

    fn fetch_user(&self, id: &UserId) -> Result<Option<UserRecord>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|user| &user.id == id).cloned())
    }

    fn find_user_by_name(&self, username: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    fn insert_footprint(&self, record: FootprintRecord) -> Result<(), RepositoryError> {
        self.lock()?.footprints.push(record);
        Ok(())
    }

    fn recent_footprints(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<FootprintRecord>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .footprints
            .iter()
            .rev()
            .filter(|record| &record.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn insert_challenge(&self, record: ChallengeRecord) -> Result<ChallengeRecord, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.challenges.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.challenges.push(record.clone());
        Ok(record)
    }

    fn accept_challenge(&self, id: &ChallengeId) -> Result<ChallengeRecord, RepositoryError> {
        let mut tables = self.lock()?;
        let record = tables
            .challenges
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
        let tables = self.lock()?;
        Ok(tables
            .challenges
            .iter()
            .rev()
            .filter(|record| &record.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn accepted_challenges(&self) -> Result<Vec<ChallengeRecord>, RepositoryError> {
        let tables = self.lock()?;
        Ok(tables
            .challenges
            .iter()
            .filter(|record| record.accepted)
            .cloned()
            .collect())
    }

    fn insert_chat(&self, record: ChatRecord) -> Result<(), RepositoryError> {
        self.lock()?.chats.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_sense::advisor::parse_challenge;

    fn user(id: &str, username: &str) -> UserRecord {
        UserRecord {
            id: UserId(id.to_string()),
            username: username.to_string(),
            created_at: Default::default(),
        }
    }

    fn challenge(id: &str, user_id: &str) -> ChallengeRecord {
        ChallengeRecord {
            id: ChallengeId(id.to_string()),
            user_id: UserId(user_id.to_string()),
            challenge: parse_challenge("Title: Cold wash week"),
            accepted: false,
            created_at: Default::default(),
        }
    }

    #[test]
    fn usernames_are_unique() {
        let repository = InMemoryClimateRepository::default();
        repository.insert_user(user("user-1", "fern")).expect("first insert");

        let result = repository.insert_user(user("user-2", "fern"));
        assert!(matches!(result, Err(RepositoryError::Conflict)));
        assert_eq!(
            repository
                .find_user_by_name("fern")
                .expect("lookup")
                .map(|record| record.id),
            Some(UserId("user-1".to_string()))
        );
    }

    #[test]
    fn challenges_are_listed_newest_first_and_can_be_accepted() {
        let repository = InMemoryClimateRepository::default();
        for id in ["challenge-1", "challenge-2", "challenge-3"] {
            repository
                .insert_challenge(challenge(id, "user-1"))
                .expect("insert");
        }
        repository
            .insert_challenge(challenge("challenge-4", "user-2"))
            .expect("insert");

        let recent = repository
            .recent_challenges(&UserId("user-1".to_string()), 2)
            .expect("listing");
        let ids: Vec<&str> = recent.iter().map(|record| record.id.0.as_str()).collect();
        assert_eq!(ids, vec!["challenge-3", "challenge-2"]);

        let accepted = repository
            .accept_challenge(&ChallengeId("challenge-2".to_string()))
            .expect("accept");
        assert!(accepted.accepted);
        assert_eq!(repository.accepted_challenges().expect("listing").len(), 1);

        let missing = repository.accept_challenge(&ChallengeId("challenge-9".to_string()));
        assert!(matches!(missing, Err(RepositoryError::NotFound)));
    }
}
